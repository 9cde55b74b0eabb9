use serde::{Deserialize, Serialize};

use crate::channels::channels_model::ExternalListing;

/// How a fetched listing relates to the existing catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Classification {
    /// No catalog product carries this SKU
    New,
    /// A product with this SKU already has a slot for this channel; terminal
    Existing,
    /// A product with this SKU exists but this channel is not linked yet
    Linkable,
}

/// Per-listing state machine for one reconciliation run.
///
/// Idle -> Selected -> CommittedNew | CommittedLinked | Failed.
/// Existing candidates never leave Idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CandidateState {
    Idle,
    Selected,
    CommittedNew,
    CommittedLinked,
    Failed,
}

/// One fetched listing with its classification and run state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingCandidate {
    pub id: String,
    pub listing: ExternalListing,
    pub classification: Classification,
    pub state: CandidateState,
    /// Id of the matched catalog product, for Existing/Linkable candidates
    pub product_id: Option<String>,
}

impl ListingCandidate {
    pub fn new(
        listing: ExternalListing,
        classification: Classification,
        product_id: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            listing,
            classification,
            state: CandidateState::Idle,
            product_id,
        }
    }

    /// Existing listings are terminal and can never be selected
    pub fn is_selectable(&self) -> bool {
        self.classification != Classification::Existing && self.state == CandidateState::Idle
    }
}

/// Outcome of a reconciliation run
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationSummary {
    pub imported: u32,
    pub linked: u32,
    pub errors: Vec<String>,
}

impl ReconciliationSummary {
    /// Human-readable run summary. Reports partial success with the first
    /// error's text when anything failed.
    pub fn message(&self) -> String {
        if self.errors.is_empty() {
            format!(
                "Import completed: {} imported, {} linked.",
                self.imported, self.linked
            )
        } else {
            format!(
                "Import partially completed: {} imported, {} linked, {} failed. First error: {}",
                self.imported,
                self.linked,
                self.errors.len(),
                self.errors[0]
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn listing_fixture() -> ExternalListing {
        ExternalListing {
            channel: "shopify".to_string(),
            external_id: "ext1".to_string(),
            sku: "X1".to_string(),
            name: "Bottle".to_string(),
            price: dec!(9.99),
            weight_kg: None,
            stock: 3,
            description: None,
            image_url: None,
            variant_attributes: None,
        }
    }

    #[test]
    fn test_existing_candidates_are_never_selectable() {
        let candidate =
            ListingCandidate::new(listing_fixture(), Classification::Existing, Some("p1".into()));
        assert!(!candidate.is_selectable());

        let candidate = ListingCandidate::new(listing_fixture(), Classification::New, None);
        assert!(candidate.is_selectable());
    }

    #[test]
    fn test_full_success_message() {
        let summary = ReconciliationSummary {
            imported: 10,
            linked: 2,
            errors: vec![],
        };
        assert_eq!(summary.message(), "Import completed: 10 imported, 2 linked.");
    }

    #[test]
    fn test_partial_success_message_includes_first_error() {
        let summary = ReconciliationSummary {
            imported: 10,
            linked: 0,
            errors: vec![
                "No available platform slots for SKU 'X1'".to_string(),
                "Persistence error: disk full".to_string(),
            ],
        };
        let message = summary.message();
        assert!(message.contains("10 imported"));
        assert!(message.contains("2 failed"));
        assert!(message.contains("No available platform slots for SKU 'X1'"));
        assert!(!message.contains("disk full"));
    }
}
