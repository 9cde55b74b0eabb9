use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal_macros::dec;

use stocklink_core::channels::{
    ChannelConfig, ChannelError, ChannelProvider, ExternalListing, CHANNEL_BOL, CHANNEL_CCV,
    CHANNEL_SHOPIFY,
};
use stocklink_core::products::{
    NewProduct, ProductRepository, ProductRepositoryTrait,
};
use stocklink_core::reconciliation::{
    CandidateState, Classification, ReconciliationService, ReconciliationServiceTrait,
};

mod common;

const CLIENT: &str = "client-1";

fn listing(sku: &str, channel: &str, external_id: &str) -> ExternalListing {
    ExternalListing {
        channel: channel.to_string(),
        external_id: external_id.to_string(),
        sku: sku.to_string(),
        name: format!("Product {}", sku),
        price: dec!(19.95),
        weight_kg: Some(dec!(0.250)),
        stock: 5,
        description: Some("Imported listing".to_string()),
        image_url: Some("https://example.com/img.jpg".to_string()),
        variant_attributes: None,
    }
}

struct StubChannel {
    channel: &'static str,
    listings: Vec<ExternalListing>,
    fail: bool,
}

#[async_trait]
impl ChannelProvider for StubChannel {
    fn channel(&self) -> &'static str {
        self.channel
    }

    async fn fetch_listings(&self) -> Result<Vec<ExternalListing>, ChannelError> {
        if self.fail {
            return Err(ChannelError::Unavailable("connection timed out".to_string()));
        }
        Ok(self.listings.clone())
    }
}

#[tokio::test]
async fn test_scenario_a_new_listing_creates_product_in_slot_one() {
    let pool = common::setup_test_db();
    let repository = Arc::new(ProductRepository::new(pool));
    let service = ReconciliationService::with_repository(repository.clone());

    let summary = service
        .reconcile_all(CLIENT, vec![listing("X1", CHANNEL_SHOPIFY, "ext1")])
        .await
        .unwrap();

    assert_eq!(summary.imported, 1);
    assert_eq!(summary.linked, 0);
    assert!(summary.errors.is_empty());

    let product = repository.find_by_sku(CLIENT, "X1").unwrap().unwrap();
    assert_eq!(product.name, "Product X1");
    assert_eq!(product.stock, 5);
    assert_eq!(product.weight_kg, Some(dec!(0.250)));
    assert_eq!(product.links.len(), 1);
    assert_eq!(product.links[0].slot_index, 1);
    assert_eq!(product.links[0].channel, CHANNEL_SHOPIFY);
    assert_eq!(product.links[0].external_id, "ext1");
}

#[tokio::test]
async fn test_scenario_b_same_channel_is_existing_and_unselectable() {
    let pool = common::setup_test_db();
    let repository = Arc::new(ProductRepository::new(pool));
    let service = ReconciliationService::with_repository(repository.clone());

    service
        .reconcile_all(CLIENT, vec![listing("X1", CHANNEL_SHOPIFY, "e1")])
        .await
        .unwrap();

    let mut candidates = service
        .classify_listings(CLIENT, vec![listing("X1", CHANNEL_SHOPIFY, "e1")])
        .unwrap();

    assert_eq!(candidates[0].classification, Classification::Existing);
    assert!(!candidates[0].is_selectable());

    let ids = vec![candidates[0].id.clone()];
    assert!(service.select(&mut candidates, &ids).is_err());
}

#[tokio::test]
async fn test_scenario_c_other_channel_links_into_slot_two() {
    let pool = common::setup_test_db();
    let repository = Arc::new(ProductRepository::new(pool));
    let service = ReconciliationService::with_repository(repository.clone());

    service
        .reconcile_all(CLIENT, vec![listing("X1", CHANNEL_SHOPIFY, "e1")])
        .await
        .unwrap();

    let candidates = service
        .classify_listings(CLIENT, vec![listing("X1", CHANNEL_BOL, "bol-77")])
        .unwrap();
    assert_eq!(candidates[0].classification, Classification::Linkable);

    let summary = service
        .reconcile_all(CLIENT, vec![listing("X1", CHANNEL_BOL, "bol-77")])
        .await
        .unwrap();
    assert_eq!(summary.imported, 0);
    assert_eq!(summary.linked, 1);

    let product = repository.find_by_sku(CLIENT, "X1").unwrap().unwrap();
    assert_eq!(product.links.len(), 2);
    assert_eq!(product.links[1].slot_index, 2);
    assert_eq!(product.links[1].channel, CHANNEL_BOL);
    assert_eq!(product.links[1].external_id, "bol-77");
}

#[tokio::test]
async fn test_scenario_d_slot_exhaustion_leaves_product_unchanged() {
    let pool = common::setup_test_db();
    let repository = Arc::new(ProductRepository::new(pool));
    let service = ReconciliationService::with_repository(repository.clone());

    let product = repository
        .create(NewProduct {
            client_id: CLIENT.to_string(),
            sku: "X1".to_string(),
            name: "Full product".to_string(),
            stock: 1,
            ..Default::default()
        })
        .unwrap();
    for channel in ["a", "b", "c", "d", "e", "f"] {
        repository
            .link_channel(&product.id, channel, &format!("{}-id", channel))
            .unwrap();
    }

    let summary = service
        .reconcile_all(CLIENT, vec![listing("X1", CHANNEL_CCV, "ccv-1")])
        .await
        .unwrap();

    assert_eq!(summary.imported, 0);
    assert_eq!(summary.linked, 0);
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.message().contains("available platform slots"));

    let unchanged = repository.find_by_sku(CLIENT, "X1").unwrap().unwrap();
    assert_eq!(unchanged.links.len(), 6);
    assert!(unchanged.link_for_channel(CHANNEL_CCV).is_none());
}

#[tokio::test]
async fn test_scenario_e_partial_failure_reports_first_error() {
    let pool = common::setup_test_db();
    let repository = Arc::new(ProductRepository::new(pool));
    let service = ReconciliationService::with_repository(repository.clone());

    let mut listings: Vec<ExternalListing> = (1..=10)
        .map(|i| listing(&format!("SKU-{}", i), CHANNEL_SHOPIFY, &format!("e{}", i)))
        .collect();

    // Two listings with blank names fail product validation at commit time
    let mut bad1 = listing("BAD-1", CHANNEL_SHOPIFY, "b1");
    bad1.name = String::new();
    let mut bad2 = listing("BAD-2", CHANNEL_SHOPIFY, "b2");
    bad2.name = String::new();
    listings.push(bad1);
    listings.push(bad2);

    let summary = service.reconcile_all(CLIENT, listings).await.unwrap();

    assert_eq!(summary.imported, 10);
    assert_eq!(summary.linked, 0);
    assert_eq!(summary.errors.len(), 2);

    let message = summary.message();
    assert!(message.contains("10 imported"));
    assert!(message.contains("2 failed"));
    assert!(message.contains(&summary.errors[0]));
}

#[tokio::test]
async fn test_recommit_same_pair_is_idempotent() {
    let pool = common::setup_test_db();
    let repository = Arc::new(ProductRepository::new(pool));
    let service = ReconciliationService::with_repository(repository.clone());

    service
        .reconcile_all(CLIENT, vec![listing("X1", CHANNEL_SHOPIFY, "e1")])
        .await
        .unwrap();
    // The second run classifies as EXISTING and commits nothing
    let summary = service
        .reconcile_all(CLIENT, vec![listing("X1", CHANNEL_SHOPIFY, "e1")])
        .await
        .unwrap();

    assert_eq!(summary.imported, 0);
    assert_eq!(summary.linked, 0);

    let products = repository.list(CLIENT).unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].links.len(), 1);
}

#[tokio::test]
async fn test_link_fills_first_free_slot_in_order() {
    let pool = common::setup_test_db();
    let repository = Arc::new(ProductRepository::new(pool));

    let product = repository
        .create(NewProduct {
            client_id: CLIENT.to_string(),
            sku: "GAP".to_string(),
            name: "Gapped product".to_string(),
            stock: 0,
            ..Default::default()
        })
        .unwrap();

    repository.link_channel(&product.id, "a", "a1").unwrap();
    repository.link_channel(&product.id, "b", "b1").unwrap();
    let link = repository.link_channel(&product.id, "c", "c1").unwrap();
    assert_eq!(link.slot_index, 3);
}

#[tokio::test]
async fn test_fetch_with_stub_provider_surfaces_channel_error() {
    let pool = common::setup_test_db();
    let repository = Arc::new(ProductRepository::new(pool));
    let service = ReconciliationService::with_repository(repository);

    let failing = Arc::new(StubChannel {
        channel: CHANNEL_SHOPIFY,
        listings: vec![],
        fail: true,
    });
    let err = service.fetch_with_provider(failing).await.unwrap_err();
    assert!(err.to_string().contains("Channel unavailable"));

    let ok = Arc::new(StubChannel {
        channel: CHANNEL_SHOPIFY,
        listings: vec![listing("X1", CHANNEL_SHOPIFY, "e1")],
        fail: false,
    });
    let service2 = ReconciliationService::with_repository(Arc::new(ProductRepository::new(
        common::setup_test_db(),
    )));
    let listings = service2.fetch_with_provider(ok).await.unwrap();
    assert_eq!(listings.len(), 1);
}

#[tokio::test]
async fn test_multi_channel_fetch_isolates_failures() {
    let pool = common::setup_test_db();
    let repository = Arc::new(ProductRepository::new(pool));
    let service = ReconciliationService::with_repository(repository);

    let failing: Arc<dyn ChannelProvider> = Arc::new(StubChannel {
        channel: CHANNEL_BOL,
        listings: vec![],
        fail: true,
    });
    let succeeding: Arc<dyn ChannelProvider> = Arc::new(StubChannel {
        channel: CHANNEL_SHOPIFY,
        listings: vec![
            listing("X1", CHANNEL_SHOPIFY, "e1"),
            listing("X2", CHANNEL_SHOPIFY, "e2"),
        ],
        fail: false,
    });

    let results = service
        .fetch_with_providers(vec![failing, succeeding])
        .await;

    assert_eq!(results.len(), 2);
    assert!(results[0]
        .as_ref()
        .unwrap_err()
        .to_string()
        .contains("Channel unavailable"));

    // The failing channel leaves the other's listings intact
    let ok = results[1].as_ref().unwrap();
    assert_eq!(ok.len(), 2);
    assert_eq!(ok[0].sku, "X1");
    assert_eq!(ok[1].sku, "X2");
}

#[tokio::test]
async fn test_fetch_many_keeps_per_config_errors_in_order() {
    let pool = common::setup_test_db();
    let repository = Arc::new(ProductRepository::new(pool));
    let service = ReconciliationService::with_repository(repository);

    let unsupported = ChannelConfig {
        channel: "etsy".to_string(),
        client_id: CLIENT.to_string(),
        domain: "https://example.com".to_string(),
        api_key: "key".to_string(),
        api_secret: None,
    };
    // CCV requires a signing secret; leaving it out fails provider construction
    let unsigned = ChannelConfig {
        channel: CHANNEL_CCV.to_string(),
        client_id: CLIENT.to_string(),
        domain: "https://demo.ccvshop.nl".to_string(),
        api_key: "pub_key".to_string(),
        api_secret: None,
    };

    let results = service
        .fetch_listings_many(&[unsupported, unsigned])
        .await;

    assert_eq!(results.len(), 2);
    assert!(results[0]
        .as_ref()
        .unwrap_err()
        .to_string()
        .contains("Unsupported channel"));
    assert!(results[1]
        .as_ref()
        .unwrap_err()
        .to_string()
        .contains("Missing channel API credentials"));
}

#[tokio::test]
async fn test_commit_states_follow_the_state_machine() {
    let pool = common::setup_test_db();
    let repository = Arc::new(ProductRepository::new(pool));
    let service = ReconciliationService::with_repository(repository.clone());

    service
        .reconcile_all(CLIENT, vec![listing("X1", CHANNEL_SHOPIFY, "e1")])
        .await
        .unwrap();

    let mut candidates = service
        .classify_listings(
            CLIENT,
            vec![
                listing("X1", CHANNEL_BOL, "bol-1"),
                listing("NEW-1", CHANNEL_BOL, "bol-2"),
                listing("X1", CHANNEL_SHOPIFY, "e1"),
            ],
        )
        .unwrap();

    let selectable: Vec<String> = candidates
        .iter()
        .filter(|c| c.is_selectable())
        .map(|c| c.id.clone())
        .collect();
    assert_eq!(selectable.len(), 2);

    service.select(&mut candidates, &selectable).unwrap();
    let summary = service.commit_selection(CLIENT, &mut candidates).await;

    assert_eq!(summary.imported, 1);
    assert_eq!(summary.linked, 1);
    assert_eq!(candidates[0].state, CandidateState::CommittedLinked);
    assert_eq!(candidates[1].state, CandidateState::CommittedNew);
    // EXISTING candidates never leave Idle
    assert_eq!(candidates[2].state, CandidateState::Idle);
}
