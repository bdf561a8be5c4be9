//! End-to-end document lifecycle tests over the HTTP surface.

mod common;

use common::{sample_invoice_dto, TestApp, TEST_PASSWORD};

use billing_service::models::{
    BillingDocument, Company, DocumentBodyDto, Invoice, InvoiceDto, QuotationDto,
};
use reqwest::StatusCode;

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

fn new_invoice_dto(number: &str) -> InvoiceDto {
    InvoiceDto {
        invoice_number: number.to_string(),
        invoice_date: "2020-01-03".to_string(),
        body: DocumentBodyDto {
            id: None,
            target_company: Company {
                name: "Facebook HQ".to_string(),
                ..Company::default()
            },
            ..sample_invoice_dto().body
        },
        ..InvoiceDto::default()
    }
}

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn().await;

    let response = client()
        .get(app.url("/health"))
        .send()
        .await
        .expect("Failed to reach health endpoint");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_text() {
    let app = TestApp::spawn().await;

    let response = client().get(app.url("/metrics")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("billing_"));
}

#[tokio::test]
async fn create_then_fetch_round_trips_the_record() {
    let app = TestApp::spawn().await;
    let dto = new_invoice_dto("I202001-001");

    let response = client()
        .post(app.url("/invoices"))
        .json(&dto)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let id: String = response.json().await.unwrap();
    assert!(!id.is_empty());

    let fetched: InvoiceDto = client()
        .get(app.url("/invoice/I202001-001"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(fetched.body.id.as_deref(), Some(id.as_str()));
    assert_eq!(fetched.invoice_number, dto.invoice_number);
    assert_eq!(fetched.body.items, dto.body.items);
    assert_eq!(fetched.body.currency, "THB");
}

#[tokio::test]
async fn fetching_an_unknown_number_is_not_found() {
    let app = TestApp::spawn().await;

    let response = client()
        .get(app.url("/invoice/I209912-999"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_numbers_conflict_while_the_original_is_live() {
    let app = TestApp::spawn().await;
    let dto = new_invoice_dto("I202001-001");

    let first = client()
        .post(app.url("/invoices"))
        .json(&dto)
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = client()
        .post(app.url("/invoices"))
        .json(&dto)
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn update_replaces_the_stored_record() {
    let app = TestApp::spawn().await;

    client()
        .post(app.url("/invoices"))
        .json(&new_invoice_dto("I202001-001"))
        .send()
        .await
        .unwrap();

    let mut stored: InvoiceDto = client()
        .get(app.url("/invoice/I202001-001"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    stored.body.remark = "Paid in advance".to_string();

    let response = client()
        .put(app.url("/invoice/I202001-001"))
        .json(&stored)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let echoed: InvoiceDto = response.json().await.unwrap();
    assert_eq!(echoed.body.remark, "Paid in advance");

    let fetched: InvoiceDto = client()
        .get(app.url("/invoice/I202001-001"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched.body.remark, "Paid in advance");
}

#[tokio::test]
async fn updating_an_unknown_record_is_not_found() {
    let app = TestApp::spawn().await;

    let response = client()
        .put(app.url("/invoice/I202001-001"))
        .json(&new_invoice_dto("I202001-001"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_is_scoped_to_the_year_of_the_number() {
    let app = TestApp::spawn().await;

    for number in ["I202001-001", "I202012-002", "I201912-060"] {
        let response = client()
            .post(app.url("/invoices"))
            .json(&new_invoice_dto(number))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let of_2020: Vec<InvoiceDto> = client()
        .get(app.url("/invoices/2020"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let numbers: Vec<_> = of_2020.iter().map(|dto| dto.invoice_number.as_str()).collect();
    assert_eq!(numbers, vec!["I202001-001", "I202012-002"]);

    let of_2021: Vec<InvoiceDto> = client()
        .get(app.url("/invoices/2021"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(of_2021.is_empty());
}

#[tokio::test]
async fn soft_delete_frees_the_number_for_reuse() {
    let app = TestApp::spawn().await;

    client()
        .post(app.url("/invoices"))
        .json(&new_invoice_dto("I202001-001"))
        .send()
        .await
        .unwrap();

    // The edit session deletes through the model, then saves the DTO back.
    let stored: InvoiceDto = client()
        .get(app.url("/invoice/I202001-001"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let mut invoice = Invoice::parse(stored);
    invoice.mark_as_deleted_at(1_610_194_022_999);

    let response = client()
        .put(app.url("/invoice/I202001-001"))
        .json(&invoice.to_dto())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let listed: Vec<InvoiceDto> = client()
        .get(app.url("/invoices/2020"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.is_empty());

    // The deleted record survives under its rewritten number.
    let cancelled: InvoiceDto = client()
        .get(app.url("/invoice/I202001-001-cancelled-1610194022999"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(cancelled.body.deleted);

    // A new active document can take the original number.
    let reuse = client()
        .post(app.url("/invoices"))
        .json(&new_invoice_dto("I202001-001"))
        .send()
        .await
        .unwrap();
    assert_eq!(reuse.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn create_rejects_a_missing_number() {
    let app = TestApp::spawn().await;

    let response = client()
        .post(app.url("/invoices"))
        .json(&new_invoice_dto(""))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn create_rejects_an_unsupported_currency() {
    let app = TestApp::spawn().await;
    let mut dto = new_invoice_dto("I202001-001");
    dto.body.currency = "EUR".to_string();

    let response = client()
        .post(app.url("/invoices"))
        .json(&dto)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn quotations_have_their_own_collection() {
    let app = TestApp::spawn().await;
    let dto = QuotationDto {
        quotation_number: "202001-001".to_string(),
        quotation_date: "2020-01-03".to_string(),
        body: DocumentBodyDto {
            project_name: "React".to_string(),
            ..DocumentBodyDto::default()
        },
    };

    let response = client()
        .post(app.url("/quotations"))
        .json(&dto)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let fetched: QuotationDto = client()
        .get(app.url("/quotation/202001-001"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched.quotation_number, "202001-001");

    // Same number, different collection: invoices stay empty.
    let invoices: Vec<InvoiceDto> = client()
        .get(app.url("/invoices/2020"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(invoices.is_empty());
}

#[tokio::test]
async fn login_accepts_the_configured_password() {
    let app = TestApp::spawn().await;

    let response = client()
        .post(app.url("/login"))
        .json(&serde_json::json!({ "password": TEST_PASSWORD }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(!body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn login_reports_a_wrong_password_on_the_401_path() {
    let app = TestApp::spawn().await;

    let response = client()
        .post(app.url("/login"))
        .json(&serde_json::json!({ "password": "guess" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("invalid password"));
}
