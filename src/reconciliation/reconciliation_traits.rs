use async_trait::async_trait;

use crate::channels::channels_model::{ChannelConfig, ExternalListing};

use super::reconciliation_errors::Result;
use super::reconciliation_model::{ListingCandidate, ReconciliationSummary};

/// Surface consumed by the UI layer
#[async_trait]
pub trait ReconciliationServiceTrait: Send + Sync {
    async fn fetch_listings(&self, config: &ChannelConfig) -> Result<Vec<ExternalListing>>;
    async fn fetch_listings_many(
        &self,
        configs: &[ChannelConfig],
    ) -> Vec<Result<Vec<ExternalListing>>>;
    fn classify_listings(
        &self,
        client_id: &str,
        listings: Vec<ExternalListing>,
    ) -> Result<Vec<ListingCandidate>>;
    fn select(&self, candidates: &mut [ListingCandidate], ids: &[String]) -> Result<()>;
    async fn commit_selection(
        &self,
        client_id: &str,
        candidates: &mut [ListingCandidate],
    ) -> ReconciliationSummary;
    async fn reconcile_all(
        &self,
        client_id: &str,
        listings: Vec<ExternalListing>,
    ) -> Result<ReconciliationSummary>;
}
