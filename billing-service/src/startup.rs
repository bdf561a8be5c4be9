use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use billing_core::error::AppError;

use crate::config::BillingConfig;
use crate::handlers;
use crate::handlers::StoreOf;
use crate::models::{InvoiceDto, QuotationDto, ReceiptDto};
use crate::services::DocumentStore;

#[derive(Clone)]
pub struct AppState {
    pub config: BillingConfig,
    pub invoices: Arc<DocumentStore<InvoiceDto>>,
    pub quotations: Arc<DocumentStore<QuotationDto>>,
    pub receipts: Arc<DocumentStore<ReceiptDto>>,
}

impl StoreOf<InvoiceDto> for AppState {
    fn store(&self) -> &DocumentStore<InvoiceDto> {
        &self.invoices
    }
}

impl StoreOf<QuotationDto> for AppState {
    fn store(&self) -> &DocumentStore<QuotationDto> {
        &self.quotations
    }
}

impl StoreOf<ReceiptDto> for AppState {
    fn store(&self) -> &DocumentStore<ReceiptDto> {
        &self.receipts
    }
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    pub async fn build(config: BillingConfig) -> Result<Self, AppError> {
        let data_dir = &config.store.data_dir;
        let invoices = Arc::new(DocumentStore::open(data_dir).await?);
        let quotations = Arc::new(DocumentStore::open(data_dir).await?);
        let receipts = Arc::new(DocumentStore::open(data_dir).await?);

        let state = AppState {
            config: config.clone(),
            invoices,
            quotations,
            receipts,
        };

        let app = Router::new()
            .route("/health", get(handlers::health_check))
            .route("/metrics", get(handlers::metrics_endpoint))
            .route("/login", post(handlers::login))
            .route(
                "/invoices/:year",
                get(handlers::list_documents::<InvoiceDto>),
            )
            .route("/invoices", post(handlers::create_document::<InvoiceDto>))
            .route(
                "/invoice/:number",
                get(handlers::get_document::<InvoiceDto>)
                    .put(handlers::update_document::<InvoiceDto>),
            )
            .route(
                "/quotations/:year",
                get(handlers::list_documents::<QuotationDto>),
            )
            .route(
                "/quotations",
                post(handlers::create_document::<QuotationDto>),
            )
            .route(
                "/quotation/:number",
                get(handlers::get_document::<QuotationDto>)
                    .put(handlers::update_document::<QuotationDto>),
            )
            .route(
                "/receipts/:year",
                get(handlers::list_documents::<ReceiptDto>),
            )
            .route("/receipts", post(handlers::create_document::<ReceiptDto>))
            .route(
                "/receipt/:number",
                get(handlers::get_document::<ReceiptDto>)
                    .put(handlers::update_document::<ReceiptDto>),
            )
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
