//! Infrastructure services for billing-service.

pub mod metrics;
pub mod store;

pub use metrics::{get_metrics, init_metrics};
pub use store::{DocumentStore, PersistedDocument};
