//! billing-service: billing documents (invoices, quotations and receipts)
//! for a small business, backed by an embedded document store and exposed
//! over HTTP.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
