//! Test helper module for billing-service integration tests.

#![allow(dead_code)]

use billing_core::config::Config as CoreConfig;
use billing_service::config::{AuthConfig, BillingConfig, StoreConfig};
use billing_service::models::{Company, DocumentBodyDto, Invoice, InvoiceDto, LineItemEntry};
use billing_service::services::init_metrics;
use billing_service::startup::Application;
use tempfile::TempDir;

pub const TEST_PASSWORD: &str = "open sesame";

/// Test application wrapper: a server on a random port over a throwaway
/// datastore directory.
pub struct TestApp {
    pub address: String,
    pub port: u16,
    // Keeps the datastore directory alive for the test's duration.
    _data_dir: TempDir,
}

impl TestApp {
    /// Spawn a new test application on a random port.
    pub async fn spawn() -> Self {
        init_metrics();

        let data_dir = tempfile::tempdir().expect("Failed to create temp data dir");

        let config = BillingConfig {
            common: CoreConfig {
                port: 0,
                log_level: "warn".to_string(),
            },
            store: StoreConfig {
                data_dir: data_dir.path().display().to_string(),
            },
            auth: AuthConfig {
                password: TEST_PASSWORD.to_string(),
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept requests.
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            _data_dir: data_dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

/// A fully populated invoice record, the shape an edit session round-trips.
pub fn sample_invoice_dto() -> InvoiceDto {
    InvoiceDto {
        invoice_number: "I202001-001".to_string(),
        invoice_date: "2020-01-03".to_string(),
        quotation_number: "201912-060".to_string(),
        purchase_order_number: "PO 20034910343".to_string(),
        body: DocumentBodyDto {
            id: Some("oRFlyXTZX9cV6hIS".to_string()),
            from_company: Company {
                name: "ODDS HQ".to_string(),
                address: Some("69 We are not hiring".to_string()),
                tax_id: Some("0100000000000".to_string()),
                tel: Some("+66896669999".to_string()),
            },
            target_company: Company {
                name: "Facebook HQ".to_string(),
                address: Some("1601 Willow Rd Menlo Park, California".to_string()),
                tax_id: Some("0100008000007".to_string()),
                tel: Some("+1 650-960-1300".to_string()),
            },
            project_name: "React".to_string(),
            remark: "Dec 2019".to_string(),
            currency: "THB".to_string(),
            payment: "bank transfer".to_string(),
            deleted: false,
            items: vec![
                LineItemEntry {
                    name: "Consulting".to_string(),
                    price: "20000".to_string(),
                    amount: "20".to_string(),
                },
                LineItemEntry {
                    name: "Scrum master".to_string(),
                    price: "80".to_string(),
                    amount: "10".to_string(),
                },
            ],
        },
    }
}

pub fn sample_invoice() -> Invoice {
    Invoice::parse(sample_invoice_dto())
}
