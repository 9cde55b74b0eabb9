pub(crate) mod products_constants;
pub(crate) mod products_errors;
pub(crate) mod products_model;
pub(crate) mod products_repository;
pub(crate) mod products_service;
pub(crate) mod products_traits;

// Re-export the public interface
pub use products_constants::*;
pub use products_model::{ChannelLink, NewProduct, Product};
pub use products_repository::ProductRepository;
pub use products_service::ProductService;
pub use products_traits::ProductRepositoryTrait;

// Re-export error types for convenience
pub use products_errors::{ProductError, Result};
