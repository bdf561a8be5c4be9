//! Document CRUD handlers, generic over the three document collections.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use billing_core::error::AppError;

use crate::models::Currency;
use crate::services::{DocumentStore, PersistedDocument};
use crate::startup::AppState;

/// Maps the shared state to the store of one document collection, so the
/// handlers below stay collection-agnostic.
pub trait StoreOf<D: PersistedDocument> {
    fn store(&self) -> &DocumentStore<D>;
}

/// `GET /{type}s/:year`: non-deleted documents of the year.
pub async fn list_documents<D>(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> Result<Json<Vec<D>>, AppError>
where
    D: PersistedDocument,
    AppState: StoreOf<D>,
{
    let documents = state.store().list_year(&year).await;
    Ok(Json(documents))
}

/// `GET /{type}/:number`.
pub async fn get_document<D>(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<D>, AppError>
where
    D: PersistedDocument,
    AppState: StoreOf<D>,
{
    state
        .store()
        .find_by_number(&number)
        .await
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!(
                "{} '{}' not found",
                D::document_type(),
                number
            ))
        })
}

/// `POST /{type}s`: validates and saves a new document; responds with the
/// assigned storage id.
pub async fn create_document<D>(
    State(state): State<AppState>,
    Json(dto): Json<D>,
) -> Result<impl IntoResponse, AppError>
where
    D: PersistedDocument + Validate,
    AppState: StoreOf<D>,
{
    dto.validate()?;
    check_currency(&dto)?;
    let id = state.store().save(dto).await?;
    Ok((StatusCode::CREATED, Json(id)))
}

/// `PUT /{type}/:number`: replaces the stored record and echoes the body.
/// The number in the path is display routing only; the record is matched
/// by the id the body carries.
pub async fn update_document<D>(
    State(state): State<AppState>,
    Path(_number): Path<String>,
    Json(dto): Json<D>,
) -> Result<Json<D>, AppError>
where
    D: PersistedDocument,
    AppState: StoreOf<D>,
{
    check_currency(&dto)?;
    state.store().update(dto.clone()).await?;
    Ok(Json(dto))
}

/// Unsupported currency codes fail fast before a record is written; an
/// absent code is legal and resolves to the default at read time.
fn check_currency<D: PersistedDocument>(dto: &D) -> Result<(), AppError> {
    let code = dto.currency();
    if code.is_empty() {
        return Ok(());
    }
    Currency::lookup(code)
        .map(|_| ())
        .map_err(|e| AppError::BadRequest(anyhow::Error::new(e)))
}
