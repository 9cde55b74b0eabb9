use diesel::result::DatabaseErrorKind;
use diesel::result::Error as DieselError;
use thiserror::Error;

use crate::errors::DatabaseError;

/// Custom error type for product catalog operations
#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("A product with SKU '{0}' already exists for this client")]
    DuplicateSku(String),
    #[error("Channel '{0}' is already linked to this product")]
    AlreadyLinked(String),
    #[error("No available platform slots for SKU '{0}'")]
    SlotExhausted(String),
}

impl From<DieselError> for ProductError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => ProductError::NotFound("Record not found".to_string()),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                ProductError::InvalidData(format!("Constraint violation: {}", info.message()))
            }
            _ => ProductError::DatabaseError(err.to_string()),
        }
    }
}

impl From<DatabaseError> for ProductError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::QueryFailed(DieselError::NotFound) => {
                ProductError::NotFound("Record not found".to_string())
            }
            _ => ProductError::DatabaseError(err.to_string()),
        }
    }
}

/// Result type for product operations
pub type Result<T> = std::result::Result<T, ProductError>;
