use thiserror::Error;

use crate::channels::channels_errors::ChannelError;
use crate::products::products_errors::ProductError;

/// Stable error vocabulary surfaced to the caller of a reconciliation run,
/// regardless of which backend produced the failure.
#[derive(Debug, Error)]
pub enum ReconciliationError {
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No available platform slots for SKU '{sku}'")]
    SlotExhausted { sku: String },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<ProductError> for ReconciliationError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::SlotExhausted(sku) => ReconciliationError::SlotExhausted { sku },
            ProductError::DuplicateSku(_) | ProductError::InvalidData(_) => {
                ReconciliationError::Validation(err.to_string())
            }
            ProductError::AlreadyLinked(_) => ReconciliationError::Validation(err.to_string()),
            ProductError::NotFound(_) | ProductError::DatabaseError(_) => {
                ReconciliationError::Persistence(err.to_string())
            }
        }
    }
}

/// Result type for reconciliation operations
pub type Result<T> = std::result::Result<T, ReconciliationError>;
