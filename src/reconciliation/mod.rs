pub(crate) mod allocator;
pub(crate) mod matcher;
pub(crate) mod reconciliation_errors;
pub(crate) mod reconciliation_model;
pub(crate) mod reconciliation_service;
pub(crate) mod reconciliation_traits;

// Re-export the public interface
pub use allocator::{CommitOutcome, SlotAllocator};
pub use matcher::{build_sku_index, classify};
pub use reconciliation_model::{
    CandidateState, Classification, ListingCandidate, ReconciliationSummary,
};
pub use reconciliation_service::ReconciliationService;
pub use reconciliation_traits::ReconciliationServiceTrait;

// Re-export error types for convenience
pub use reconciliation_errors::{ReconciliationError, Result};
