use dashmap::DashMap;
use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::channels::channels_model::ExternalListing;
use crate::products::products_errors::ProductError;
use crate::products::products_model::NewProduct;
use crate::products::products_traits::ProductRepositoryTrait;

use super::reconciliation_errors::{ReconciliationError, Result};

/// How a single listing was committed into the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new product was created with the listing in slot 1
    Imported,
    /// The listing's channel was written into a free slot of an existing product
    Linked,
}

/// Commits classified listings into persistent catalog state.
///
/// Commits targeting the same (client, SKU) are serialized through a
/// per-product async mutex; the unique indexes on the link table guard
/// against writers in other processes. Classification may be stale by commit
/// time, so existence is re-checked immediately before every write.
pub struct SlotAllocator {
    repository: Arc<dyn ProductRepositoryTrait>,
    product_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SlotAllocator {
    pub fn new(repository: Arc<dyn ProductRepositoryTrait>) -> Self {
        Self {
            repository,
            product_locks: DashMap::new(),
        }
    }

    /// Commits one listing. The caller decided the listing is committable
    /// (NEW or LINKABLE at classification time); the fresh catalog state
    /// decides what actually happens.
    pub async fn commit(
        &self,
        client_id: &str,
        listing: &ExternalListing,
    ) -> Result<CommitOutcome> {
        let sku = listing.sku.trim().to_string();
        if sku.is_empty() {
            return Err(ReconciliationError::Validation(
                "Listing has no SKU".to_string(),
            ));
        }

        let key = format!("{}:{}", client_id, sku);
        let lock = self
            .product_locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let result = {
            let _guard = lock.lock().await;
            match self.repository.find_by_sku(client_id, &sku) {
                Ok(None) => self.commit_new(client_id, listing, &sku),
                Ok(Some(product)) => self.commit_link(&product.id, listing, &sku),
                Err(e) => Err(e.into()),
            }
        };

        // Uncontended entries are evicted so the map stays bounded across
        // runs of a long-lived service. An entry whose only remaining
        // reference is the map's is not held by any other committer.
        drop(lock);
        self.product_locks
            .remove_if(&key, |_, entry| Arc::strong_count(entry) == 1);

        result
    }

    fn commit_new(
        &self,
        client_id: &str,
        listing: &ExternalListing,
        sku: &str,
    ) -> Result<CommitOutcome> {
        let new_product = NewProduct {
            id: None,
            client_id: client_id.to_string(),
            sku: sku.to_string(),
            name: listing.name.clone(),
            stock: listing.stock,
            description: listing.description.clone(),
            image_url: listing.image_url.clone(),
            weight_kg: listing.weight_kg,
        };

        let product = match self.repository.create(new_product) {
            Ok(product) => product,
            // A racer in another process created the product between the
            // re-check and the insert; degrade to a link attempt.
            Err(ProductError::DuplicateSku(_)) => {
                warn!(
                    "Product with SKU '{}' appeared during commit, linking instead",
                    sku
                );
                let product = self
                    .repository
                    .find_by_sku(client_id, sku)?
                    .ok_or_else(|| {
                        ReconciliationError::Persistence(format!(
                            "Product with SKU '{}' vanished during commit",
                            sku
                        ))
                    })?;
                return self.commit_link(&product.id, listing, sku);
            }
            Err(e) => return Err(e.into()),
        };

        self.repository
            .link_channel(&product.id, &listing.channel, &listing.external_id)?;

        debug!(
            "Imported listing '{}' from '{}' as product '{}'",
            sku, listing.channel, product.id
        );
        Ok(CommitOutcome::Imported)
    }

    fn commit_link(
        &self,
        product_id: &str,
        listing: &ExternalListing,
        sku: &str,
    ) -> Result<CommitOutcome> {
        match self
            .repository
            .link_channel(product_id, &listing.channel, &listing.external_id)
        {
            Ok(link) => {
                debug!(
                    "Linked '{}' listing for SKU '{}' into slot {}",
                    listing.channel, sku, link.slot_index
                );
                Ok(CommitOutcome::Linked)
            }
            // Re-commit of an already linked (channel, SKU) pair is a no-op
            Err(ProductError::AlreadyLinked(_)) => {
                debug!(
                    "Channel '{}' already linked for SKU '{}', skipping",
                    listing.channel, sku
                );
                Ok(CommitOutcome::Linked)
            }
            Err(e) => Err(e.into()),
        }
    }
}
