//! Embedded document store for billing-service.
//!
//! One JSON-lines datafile per document collection, loaded when the
//! collection opens and rewritten after every mutation. Documents only
//! cross this boundary as DTOs; the store never sees a live model.

use std::path::{Path, PathBuf};

use anyhow::anyhow;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, instrument};
use uuid::Uuid;

use billing_core::error::AppError;

use crate::models::{InvoiceDto, QuotationDto, ReceiptDto};
use crate::services::metrics::{DOCUMENTS_SAVED_TOTAL, ERRORS_TOTAL, STORE_OP_DURATION};

/// Record behavior the store needs from a document DTO.
pub trait PersistedDocument:
    Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
    /// Collection label; also names the document type in error reports.
    fn document_type() -> &'static str;
    fn id(&self) -> Option<&str>;
    fn set_id(&mut self, id: String);
    fn number(&self) -> &str;
    fn deleted(&self) -> bool;
    fn currency(&self) -> &str;
}

impl PersistedDocument for InvoiceDto {
    fn document_type() -> &'static str {
        "Invoice"
    }

    fn id(&self) -> Option<&str> {
        self.body.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.body.id = Some(id);
    }

    fn number(&self) -> &str {
        &self.invoice_number
    }

    fn deleted(&self) -> bool {
        self.body.deleted
    }

    fn currency(&self) -> &str {
        &self.body.currency
    }
}

impl PersistedDocument for QuotationDto {
    fn document_type() -> &'static str {
        "Quotation"
    }

    fn id(&self) -> Option<&str> {
        self.body.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.body.id = Some(id);
    }

    fn number(&self) -> &str {
        &self.quotation_number
    }

    fn deleted(&self) -> bool {
        self.body.deleted
    }

    fn currency(&self) -> &str {
        &self.body.currency
    }
}

impl PersistedDocument for ReceiptDto {
    fn document_type() -> &'static str {
        "Receipt"
    }

    fn id(&self) -> Option<&str> {
        self.body.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.body.id = Some(id);
    }

    fn number(&self) -> &str {
        &self.receipt_number
    }

    fn deleted(&self) -> bool {
        self.body.deleted
    }

    fn currency(&self) -> &str {
        &self.body.currency
    }
}

/// One document collection persisted to a single datafile.
pub struct DocumentStore<D> {
    path: PathBuf,
    records: RwLock<Vec<D>>,
}

impl<D: PersistedDocument> DocumentStore<D> {
    /// Open the collection: ensure the data directory exists and load
    /// whatever records the datafile already holds.
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, AppError> {
        let dir = data_dir.as_ref();
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            AppError::StorageError(anyhow!(
                "Failed to create data directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        let path = dir.join(format!("{}.db", D::document_type().to_lowercase()));

        let mut records = Vec::new();
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                for line in contents.lines().filter(|line| !line.trim().is_empty()) {
                    let record = serde_json::from_str(line).map_err(|e| {
                        AppError::StorageError(anyhow!(
                            "Corrupt record in {}: {}",
                            path.display(),
                            e
                        ))
                    })?;
                    records.push(record);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(AppError::StorageError(anyhow!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        }

        info!(
            document_type = D::document_type(),
            records = records.len(),
            "Collection loaded"
        );

        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    /// Insert a new record: assigns a fresh id and refuses a number that a
    /// non-deleted record already holds. Returns the assigned id.
    #[instrument(skip(self, dto), fields(document_type = D::document_type(), number = dto.number()))]
    pub async fn save(&self, mut dto: D) -> Result<String, AppError> {
        let timer = STORE_OP_DURATION.with_label_values(&["save"]).start_timer();

        let mut records = self.records.write().await;
        if records
            .iter()
            .any(|record| !record.deleted() && record.number() == dto.number())
        {
            ERRORS_TOTAL.with_label_values(&["number_conflict"]).inc();
            return Err(AppError::Conflict(anyhow!(
                "{} number '{}' is already in use",
                D::document_type(),
                dto.number()
            )));
        }

        let id = Uuid::new_v4().to_string();
        dto.set_id(id.clone());
        records.push(dto);
        if let Err(e) = self.persist(&records).await {
            records.pop();
            return Err(e);
        }
        timer.observe_duration();

        DOCUMENTS_SAVED_TOTAL
            .with_label_values(&[D::document_type()])
            .inc();
        info!(id = %id, "Document saved");

        Ok(id)
    }

    /// Replace a stored record, matched by id when the DTO carries one and
    /// by number otherwise. A renumbered record must not collide with
    /// another live one.
    #[instrument(skip(self, dto), fields(document_type = D::document_type(), number = dto.number()))]
    pub async fn update(&self, dto: D) -> Result<(), AppError> {
        let timer = STORE_OP_DURATION.with_label_values(&["update"]).start_timer();

        let mut records = self.records.write().await;
        let position = match dto.id() {
            Some(id) => records.iter().position(|record| record.id() == Some(id)),
            None => records
                .iter()
                .position(|record| record.number() == dto.number()),
        };
        let Some(position) = position else {
            return Err(AppError::NotFound(anyhow!(
                "{} '{}' not found",
                D::document_type(),
                dto.number()
            )));
        };

        if !dto.deleted()
            && records.iter().enumerate().any(|(i, record)| {
                i != position && !record.deleted() && record.number() == dto.number()
            })
        {
            ERRORS_TOTAL.with_label_values(&["number_conflict"]).inc();
            return Err(AppError::Conflict(anyhow!(
                "{} number '{}' is already in use",
                D::document_type(),
                dto.number()
            )));
        }

        let mut dto = dto;
        if dto.id().is_none() {
            if let Some(existing) = records[position].id() {
                dto.set_id(existing.to_string());
            }
        }

        let previous = std::mem::replace(&mut records[position], dto);
        if let Err(e) = self.persist(&records).await {
            records[position] = previous;
            return Err(e);
        }
        timer.observe_duration();

        Ok(())
    }

    /// Fetch one record by its storage id.
    pub async fn find_by_id(&self, id: &str) -> Option<D> {
        let records = self.records.read().await;
        records.iter().find(|record| record.id() == Some(id)).cloned()
    }

    /// Fetch one record by its current number, deleted or not.
    pub async fn find_by_number(&self, number: &str) -> Option<D> {
        let records = self.records.read().await;
        records
            .iter()
            .find(|record| record.number() == number)
            .cloned()
    }

    /// Non-deleted records whose number carries the year, in insertion
    /// order. Numbers are `YYYYMM-seq` with an optional type-letter
    /// prefix, so the year is read from the leading digits.
    pub async fn list_year(&self, year: &str) -> Vec<D> {
        let records = self.records.read().await;
        records
            .iter()
            .filter(|record| !record.deleted() && number_year(record.number()) == year)
            .cloned()
            .collect()
    }

    async fn persist(&self, records: &[D]) -> Result<(), AppError> {
        let mut contents = String::new();
        for record in records {
            let line = serde_json::to_string(record)
                .map_err(|e| AppError::StorageError(anyhow!("Failed to encode record: {}", e)))?;
            contents.push_str(&line);
            contents.push('\n');
        }
        tokio::fs::write(&self.path, contents).await.map_err(|e| {
            ERRORS_TOTAL.with_label_values(&["persist"]).inc();
            AppError::StorageError(anyhow!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

/// Year digits of a document number, skipping any type-letter prefix.
fn number_year(number: &str) -> &str {
    let digits = number.trim_start_matches(|c: char| !c.is_ascii_digit());
    digits.get(..4).unwrap_or("")
}
