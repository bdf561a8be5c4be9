//! Invoice document and its wire/storage shape.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::document::{BillingDocument, DocumentBody, DocumentBodyDto};

/// Billable work presented for payment. Carries references to the
/// quotation and purchase order it stems from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Invoice {
    pub body: DocumentBody,
    pub invoice_number: String,
    pub invoice_date: String,
    pub quotation_number: String,
    pub purchase_order_number: String,
}

impl Invoice {
    /// Materialize a stored record; absent fields default.
    pub fn parse(dto: InvoiceDto) -> Self {
        Self {
            body: DocumentBody::parse(dto.body),
            invoice_number: dto.invoice_number,
            invoice_date: dto.invoice_date,
            quotation_number: dto.quotation_number,
            purchase_order_number: dto.purchase_order_number,
        }
    }

    /// Storage-safe projection: scalars plus plain line-item entries, with
    /// the display currency resolved. The only route to persistence.
    pub fn to_dto(&self) -> InvoiceDto {
        InvoiceDto {
            invoice_number: self.invoice_number.clone(),
            invoice_date: self.invoice_date.clone(),
            quotation_number: self.quotation_number.clone(),
            purchase_order_number: self.purchase_order_number.clone(),
            body: self.body.to_dto(),
        }
    }
}

impl BillingDocument for Invoice {
    fn document_type(&self) -> &'static str {
        "Invoice"
    }

    fn body(&self) -> &DocumentBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut DocumentBody {
        &mut self.body
    }

    fn number(&self) -> &str {
        &self.invoice_number
    }

    fn set_number(&mut self, number: String) {
        self.invoice_number = number;
    }

    fn date(&self) -> &str {
        &self.invoice_date
    }

    fn set_date(&mut self, date: String) {
        self.invoice_date = date;
    }

    fn has_invoice_number(&self) -> bool {
        true
    }

    fn has_quotation_number(&self) -> bool {
        true
    }
}

/// Wire and storage shape of an invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceDto {
    #[validate(length(min = 1, message = "invoice number is required"))]
    pub invoice_number: String,
    pub invoice_date: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub quotation_number: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub purchase_order_number: String,
    #[serde(flatten)]
    pub body: DocumentBodyDto,
}
