use async_trait::async_trait;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use futures::future::join_all;
use log::{error, info, warn};
use std::sync::Arc;

use crate::channels::channel_factory::ChannelProviderFactory;
use crate::channels::channels_model::{ChannelConfig, ExternalListing};
use crate::channels::channels_traits::{ChannelCredentialStore, ChannelProvider};
use crate::products::products_repository::ProductRepository;
use crate::products::products_traits::ProductRepositoryTrait;

use super::allocator::{CommitOutcome, SlotAllocator};
use super::matcher;
use super::reconciliation_errors::{ReconciliationError, Result};
use super::reconciliation_model::{
    CandidateState, Classification, ListingCandidate, ReconciliationSummary,
};
use super::reconciliation_traits::ReconciliationServiceTrait;

/// Drives a reconciliation run: fetch listings from a channel, classify them
/// against the catalog snapshot, commit the caller's selection and summarize.
pub struct ReconciliationService {
    repository: Arc<dyn ProductRepositoryTrait>,
    allocator: SlotAllocator,
}

impl ReconciliationService {
    /// Creates a service backed by the SQLite catalog
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        let repository: Arc<dyn ProductRepositoryTrait> = Arc::new(ProductRepository::new(pool));
        Self::with_repository(repository)
    }

    /// Creates a service over an explicit repository seam
    pub fn with_repository(repository: Arc<dyn ProductRepositoryTrait>) -> Self {
        Self {
            allocator: SlotAllocator::new(repository.clone()),
            repository,
        }
    }

    /// Fetches listings through an already-built provider. Used by the
    /// multi-config fetch and by callers injecting their own adapter.
    pub async fn fetch_with_provider(
        &self,
        provider: Arc<dyn ChannelProvider>,
    ) -> Result<Vec<ExternalListing>> {
        let listings = provider.fetch_listings().await?;
        info!(
            "Fetched {} listings from channel '{}'",
            listings.len(),
            provider.channel()
        );
        Ok(listings)
    }

    /// Fetches through several already-built providers concurrently. Each
    /// provider's result stands alone; a failed channel never aborts or
    /// taints the others.
    pub async fn fetch_with_providers(
        &self,
        providers: Vec<Arc<dyn ChannelProvider>>,
    ) -> Vec<Result<Vec<ExternalListing>>> {
        let futures = providers
            .into_iter()
            .map(|provider| self.fetch_with_provider(provider));
        join_all(futures).await
    }

    /// Resolves credentials through the store and fetches that channel
    pub async fn fetch_listings_for(
        &self,
        credentials: &dyn ChannelCredentialStore,
        client_id: &str,
        channel: &str,
    ) -> Result<Vec<ExternalListing>> {
        let config = credentials.get_config(client_id, channel)?;
        self.fetch_listings(&config).await
    }
}

#[async_trait]
impl ReconciliationServiceTrait for ReconciliationService {
    /// Fetches one channel's listings. A channel-level failure aborts only
    /// this fetch and surfaces translated; no partial listings are returned.
    async fn fetch_listings(&self, config: &ChannelConfig) -> Result<Vec<ExternalListing>> {
        let provider = ChannelProviderFactory::from_config(config)?;
        self.fetch_with_provider(provider).await
    }

    /// Fetches several channel configurations concurrently. The adapters
    /// share no mutable state, so the fetches are independent; one channel's
    /// failure leaves the others untouched.
    async fn fetch_listings_many(
        &self,
        configs: &[ChannelConfig],
    ) -> Vec<Result<Vec<ExternalListing>>> {
        let futures = configs.iter().map(|config| self.fetch_listings(config));
        join_all(futures).await
    }

    /// Classifies fetched listings against a fresh catalog snapshot
    fn classify_listings(
        &self,
        client_id: &str,
        listings: Vec<ExternalListing>,
    ) -> Result<Vec<ListingCandidate>> {
        let snapshot = self.repository.list(client_id)?;
        let index = matcher::build_sku_index(&snapshot);

        Ok(listings
            .into_iter()
            .map(|listing| {
                let (classification, matched) = matcher::classify(&listing, &index);
                ListingCandidate::new(
                    listing,
                    classification,
                    matched.map(|p| p.id.clone()),
                )
            })
            .collect())
    }

    /// Marks the given candidates as selected for commit. Selecting an
    /// EXISTING candidate is a validation error.
    fn select(&self, candidates: &mut [ListingCandidate], ids: &[String]) -> Result<()> {
        for id in ids {
            let candidate = candidates
                .iter_mut()
                .find(|c| &c.id == id)
                .ok_or_else(|| {
                    ReconciliationError::Validation(format!("Unknown candidate '{}'", id))
                })?;

            if !candidate.is_selectable() {
                return Err(ReconciliationError::Validation(format!(
                    "Listing with SKU '{}' is already linked to this channel",
                    candidate.listing.sku
                )));
            }
            candidate.state = CandidateState::Selected;
        }
        Ok(())
    }

    /// Commits all selected candidates sequentially. Each commit either
    /// succeeds or appends an error entry; the run never aborts early on a
    /// single listing's failure.
    async fn commit_selection(
        &self,
        client_id: &str,
        candidates: &mut [ListingCandidate],
    ) -> ReconciliationSummary {
        let mut summary = ReconciliationSummary::default();

        for candidate in candidates
            .iter_mut()
            .filter(|c| c.state == CandidateState::Selected)
        {
            match self.allocator.commit(client_id, &candidate.listing).await {
                Ok(CommitOutcome::Imported) => {
                    candidate.state = CandidateState::CommittedNew;
                    summary.imported += 1;
                }
                Ok(CommitOutcome::Linked) => {
                    candidate.state = CandidateState::CommittedLinked;
                    summary.linked += 1;
                }
                Err(e) => {
                    candidate.state = CandidateState::Failed;
                    warn!(
                        "Commit failed for SKU '{}' from '{}': {}",
                        candidate.listing.sku, candidate.listing.channel, e
                    );
                    summary.errors.push(e.to_string());
                }
            }
        }

        if !summary.errors.is_empty() {
            error!(
                "Reconciliation run for client '{}' finished with {} errors",
                client_id,
                summary.errors.len()
            );
        }
        info!("{}", summary.message());
        summary
    }

    /// Convenience wrapper: classify, select everything committable, commit.
    async fn reconcile_all(
        &self,
        client_id: &str,
        listings: Vec<ExternalListing>,
    ) -> Result<ReconciliationSummary> {
        let mut candidates = self.classify_listings(client_id, listings)?;
        let selectable: Vec<String> = candidates
            .iter()
            .filter(|c| c.classification != Classification::Existing)
            .map(|c| c.id.clone())
            .collect();
        self.select(&mut candidates, &selectable)?;
        Ok(self.commit_selection(client_id, &mut candidates).await)
    }
}
