//! The shared billing-document base: common state plus the behavior every
//! document variant inherits.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::company::Company;
use super::currency::{Currency, UnknownCurrency};
use super::line_item::{LineItem, LineItemEntry, PricedLineItem};

/// Display currency assumed when a document stores none.
pub const DEFAULT_CURRENCY: &str = "THB";

/// State shared by every document variant. Variant structs wrap this and
/// add their own number and date fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentBody {
    /// Storage key; absent until the first save.
    pub id: Option<String>,
    pub from_company: Company,
    pub target_company: Company,
    pub project_name: String,
    pub remark: String,
    /// Kept verbatim as entered. Read through [`DocumentBody::currency`],
    /// which applies the default; nothing is normalized eagerly.
    pub currency: Option<String>,
    pub items: Vec<PricedLineItem>,
    pub deleted: bool,
    pub payment: String,
}

impl DocumentBody {
    /// Resolved display currency code.
    pub fn currency(&self) -> &str {
        self.currency
            .as_deref()
            .filter(|code| !code.is_empty())
            .unwrap_or(DEFAULT_CURRENCY)
    }

    /// Format an amount in the document's current currency.
    pub fn format_amount(&self, amount: Decimal) -> Result<String, UnknownCurrency> {
        Ok(Currency::lookup(self.currency())?.format(amount))
    }

    /// Sum of the priced rows; zero when the document has none.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(PricedLineItem::total).sum()
    }

    /// Priced rows in entry order followed by the Total, VAT and Grand
    /// Total aggregates, in that order. Recomputed on every call.
    pub fn display_items(&self) -> Vec<LineItem<'_>> {
        let mut rows: Vec<LineItem<'_>> = self
            .items
            .iter()
            .map(|item| LineItem::Priced { owner: self, item })
            .collect();
        rows.push(LineItem::Total { owner: self });
        rows.push(LineItem::Tax { owner: self });
        rows.push(LineItem::GrandTotal { owner: self });
        rows
    }

    /// Insert a blank row before `index`; an anchor past the end appends.
    /// The only insertion path: new rows always start blank.
    pub fn add_item_before(&mut self, index: usize) {
        let at = index.min(self.items.len());
        self.items.insert(at, PricedLineItem::default());
    }

    /// Remove the row at `index`; an absent anchor is a no-op so delete
    /// actions stay idempotent.
    pub fn remove_item(&mut self, index: usize) {
        if index < self.items.len() {
            self.items.remove(index);
        }
    }

    pub fn parse(dto: DocumentBodyDto) -> Self {
        Self {
            id: dto.id,
            from_company: dto.from_company,
            target_company: dto.target_company,
            project_name: dto.project_name,
            remark: dto.remark,
            currency: (!dto.currency.is_empty()).then_some(dto.currency),
            items: dto.items.into_iter().map(PricedLineItem::from).collect(),
            deleted: dto.deleted,
            payment: dto.payment,
        }
    }

    pub fn to_dto(&self) -> DocumentBodyDto {
        DocumentBodyDto {
            id: self.id.clone(),
            from_company: self.from_company.clone(),
            target_company: self.target_company.clone(),
            project_name: self.project_name.clone(),
            remark: self.remark.clone(),
            currency: self.currency().to_string(),
            payment: self.payment.clone(),
            deleted: self.deleted,
            items: self.items.iter().map(LineItemEntry::from).collect(),
        }
    }
}

/// Shared slice of every document DTO, flattened into the variant wire
/// shapes. This and the variant DTOs are the only serializable document
/// types: live models hold borrows in their display rows and never reach
/// storage directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentBodyDto {
    /// Storage key. Accepts the legacy `_id` key found in old datastore
    /// records.
    #[serde(alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub from_company: Company,
    pub target_company: Company,
    pub project_name: String,
    pub remark: String,
    /// Resolved display currency; never empty on output.
    pub currency: String,
    pub payment: String,
    pub deleted: bool,
    pub items: Vec<LineItemEntry>,
}

/// One printable heading of a document page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintTitle {
    pub id: u32,
    pub title: String,
    pub css: &'static str,
}

/// Capability set a document variant supplies: its type label and which
/// stored fields act as the user-facing number and date. Everything else
/// is provided behavior over the shared body; one level of specialization
/// is all a new variant needs.
pub trait BillingDocument {
    fn document_type(&self) -> &'static str;
    fn body(&self) -> &DocumentBody;
    fn body_mut(&mut self) -> &mut DocumentBody;
    fn number(&self) -> &str;
    fn set_number(&mut self, number: String);
    fn date(&self) -> &str;
    fn set_date(&mut self, date: String);

    // Edit-form hints: which reference fields the variant carries.
    fn has_invoice_number(&self) -> bool {
        false
    }
    fn has_quotation_number(&self) -> bool {
        false
    }
    fn has_receipt_number(&self) -> bool {
        false
    }

    fn total(&self) -> Decimal {
        self.body().total()
    }

    fn display_items(&self) -> Vec<LineItem<'_>> {
        self.body().display_items()
    }

    fn add_item_before(&mut self, index: usize) {
        self.body_mut().add_item_before(index);
    }

    fn remove_item(&mut self, index: usize) {
        self.body_mut().remove_item(index);
    }

    fn url(&self) -> String {
        format!(
            "/{}/{}",
            self.document_type().to_lowercase(),
            self.number()
        )
    }

    fn duplication_url(&self) -> String {
        format!("{}/duplicate", self.url())
    }

    fn edition_url(&self) -> String {
        format!("{}/edit", self.url())
    }

    fn list_path(&self) -> String {
        format!("/{}s", self.document_type().to_lowercase())
    }

    /// Name used when the rendered document is exported to PDF.
    fn filename(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.number(),
            self.document_type().to_uppercase(),
            self.body().target_company.name,
            self.body().project_name
        )
    }

    /// Print headings: the original shows on screen and paper, the copy
    /// is paper-only.
    fn titles(&self) -> Vec<PrintTitle> {
        vec![
            PrintTitle {
                id: 1,
                title: format!("{} (original)", self.document_type()),
                css: "",
            },
            PrintTitle {
                id: 2,
                title: format!("{} (copy)", self.document_type()),
                css: "print-only",
            },
        ]
    }

    /// Shrink item rows past three entries so a page still fits.
    fn item_class(&self) -> &'static str {
        if self.body().items.len() > 3 {
            "small"
        } else {
            ""
        }
    }

    /// Shrink the target company name past forty characters.
    fn target_company_name_class(&self) -> &'static str {
        if self.body().target_company.name.chars().count() > 40 {
            "small"
        } else {
            ""
        }
    }

    /// Tighten the table when a payment note needs the space.
    fn table_padding_class(&self) -> &'static str {
        if self.body().payment.is_empty() {
            ""
        } else {
            "dense"
        }
    }

    /// Soft delete: the record stays, and the number is rewritten so a new
    /// active document can reuse it while the stored one stays unique.
    fn mark_as_deleted(&mut self) {
        self.mark_as_deleted_at(Utc::now().timestamp_millis());
    }

    /// Deterministic variant of [`BillingDocument::mark_as_deleted`];
    /// tests supply the timestamp.
    fn mark_as_deleted_at(&mut self, timestamp_millis: i64) {
        self.body_mut().deleted = true;
        let number = format!("{}-cancelled-{}", self.number(), timestamp_millis);
        self.set_number(number);
    }

    fn set_date_today(&mut self) {
        self.set_date_on(Utc::now().date_naive());
    }

    fn set_date_on(&mut self, date: NaiveDate) {
        self.set_date(date.format("%Y-%m-%d").to_string());
    }

    /// Year-month seed for the next document number, e.g. `"202001-"`.
    fn number_prefix(&self, date: NaiveDate) -> String {
        date.format("%Y%m-").to_string()
    }
}
