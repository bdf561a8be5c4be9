//! Quotation document and its wire/storage shape.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::document::{BillingDocument, DocumentBody, DocumentBodyDto};

/// An offer of work and prices, sent before any invoice exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Quotation {
    pub body: DocumentBody,
    pub quotation_number: String,
    pub quotation_date: String,
}

impl Quotation {
    /// Materialize a stored record; absent fields default.
    pub fn parse(dto: QuotationDto) -> Self {
        Self {
            body: DocumentBody::parse(dto.body),
            quotation_number: dto.quotation_number,
            quotation_date: dto.quotation_date,
        }
    }

    /// Storage-safe projection; see [`Invoice::to_dto`](super::Invoice::to_dto).
    pub fn to_dto(&self) -> QuotationDto {
        QuotationDto {
            quotation_number: self.quotation_number.clone(),
            quotation_date: self.quotation_date.clone(),
            body: self.body.to_dto(),
        }
    }
}

/// Export rendering of a quotation number: `YYYYMM-seq` becomes
/// `seq-MMYYYY`; any other shape passes through unchanged.
fn export_number(number: &str) -> String {
    match number.split_once('-') {
        Some((stamp, seq))
            if stamp.len() == 6 && stamp.chars().all(|c| c.is_ascii_digit()) && !seq.is_empty() =>
        {
            format!("{}-{}{}", seq, &stamp[4..], &stamp[..4])
        }
        _ => number.to_string(),
    }
}

impl BillingDocument for Quotation {
    fn document_type(&self) -> &'static str {
        "Quotation"
    }

    fn body(&self) -> &DocumentBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut DocumentBody {
        &mut self.body
    }

    fn number(&self) -> &str {
        &self.quotation_number
    }

    fn set_number(&mut self, number: String) {
        self.quotation_number = number;
    }

    fn date(&self) -> &str {
        &self.quotation_date
    }

    fn set_date(&mut self, date: String) {
        self.quotation_date = date;
    }

    fn has_quotation_number(&self) -> bool {
        true
    }

    /// Quotation exports keep their historical naming, with the sequence
    /// ahead of the month and year.
    fn filename(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            export_number(self.number()),
            self.document_type().to_uppercase(),
            self.body.target_company.name,
            self.body.project_name
        )
    }
}

/// Wire and storage shape of a quotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct QuotationDto {
    #[validate(length(min = 1, message = "quotation number is required"))]
    pub quotation_number: String,
    pub quotation_date: String,
    #[serde(flatten)]
    pub body: DocumentBodyDto,
}
