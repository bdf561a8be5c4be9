mod auth;
mod documents;
mod health;

pub use auth::login;
pub use documents::{
    create_document, get_document, list_documents, update_document, StoreOf,
};
pub use health::{health_check, metrics_endpoint};
