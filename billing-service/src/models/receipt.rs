//! Receipt document and its wire/storage shape.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::document::{BillingDocument, DocumentBody, DocumentBodyDto};

/// Confirmation of a settled payment, referencing the invoice it settles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Receipt {
    pub body: DocumentBody,
    pub receipt_number: String,
    pub receipt_date: String,
    pub invoice_number: String,
}

impl Receipt {
    /// Materialize a stored record; absent fields default.
    pub fn parse(dto: ReceiptDto) -> Self {
        Self {
            body: DocumentBody::parse(dto.body),
            receipt_number: dto.receipt_number,
            receipt_date: dto.receipt_date,
            invoice_number: dto.invoice_number,
        }
    }

    /// Storage-safe projection; see [`Invoice::to_dto`](super::Invoice::to_dto).
    pub fn to_dto(&self) -> ReceiptDto {
        ReceiptDto {
            receipt_number: self.receipt_number.clone(),
            receipt_date: self.receipt_date.clone(),
            invoice_number: self.invoice_number.clone(),
            body: self.body.to_dto(),
        }
    }
}

impl BillingDocument for Receipt {
    fn document_type(&self) -> &'static str {
        "Receipt"
    }

    fn body(&self) -> &DocumentBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut DocumentBody {
        &mut self.body
    }

    fn number(&self) -> &str {
        &self.receipt_number
    }

    fn set_number(&mut self, number: String) {
        self.receipt_number = number;
    }

    fn date(&self) -> &str {
        &self.receipt_date
    }

    fn set_date(&mut self, date: String) {
        self.receipt_date = date;
    }

    fn has_receipt_number(&self) -> bool {
        true
    }

    fn has_invoice_number(&self) -> bool {
        true
    }
}

/// Wire and storage shape of a receipt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ReceiptDto {
    #[validate(length(min = 1, message = "receipt number is required"))]
    pub receipt_number: String,
    pub receipt_date: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub invoice_number: String,
    #[serde(flatten)]
    pub body: DocumentBodyDto,
}
