use std::collections::HashMap;

use crate::channels::channels_model::ExternalListing;
use crate::products::products_model::Product;

use super::reconciliation_model::Classification;

/// Indexes a catalog snapshot by trimmed SKU. SKU uniqueness is enforced per
/// client at creation, so the first product seen for a SKU is authoritative.
pub fn build_sku_index(products: &[Product]) -> HashMap<&str, &Product> {
    let mut index: HashMap<&str, &Product> = HashMap::with_capacity(products.len());
    for product in products {
        index.entry(product.sku.trim()).or_insert(product);
    }
    index
}

/// Classifies one listing against the snapshot index.
///
/// Slot exhaustion is deliberately not considered here: a full product still
/// classifies as Linkable, and the commit surfaces the slot error.
pub fn classify<'a>(
    listing: &ExternalListing,
    index: &HashMap<&str, &'a Product>,
) -> (Classification, Option<&'a Product>) {
    match index.get(listing.sku.trim()) {
        None => (Classification::New, None),
        Some(product) => {
            if product.link_for_channel(&listing.channel).is_some() {
                (Classification::Existing, Some(product))
            } else {
                (Classification::Linkable, Some(product))
            }
        }
    }
}
