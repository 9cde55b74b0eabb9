use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

use crate::channels::channels_constants::{
    CHANNEL_BOL, DEFAULT_REQUEST_TIMEOUT_SECS, PLACEHOLDER_IMAGE_URL,
};
use crate::channels::channels_errors::{ChannelError, Result};
use crate::channels::channels_model::{ChannelConfig, ExternalListing};
use crate::channels::channels_traits::ChannelProvider;

const RETAILER_API_MEDIA_TYPE: &str = "application/vnd.retailer.v9+json";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OffersResponse {
    #[serde(default)]
    offers: Vec<BolOffer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BolOffer {
    offer_id: String,
    #[serde(default)]
    reference_code: Option<String>,
    #[serde(default)]
    store: Option<BolStore>,
    #[serde(default)]
    pricing: Option<BolPricing>,
    #[serde(default)]
    stock: Option<BolStock>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BolStore {
    #[serde(default)]
    product_title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BolPricing {
    #[serde(default)]
    bundle_prices: Vec<BolBundlePrice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BolBundlePrice {
    quantity: u32,
    unit_price: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BolStock {
    #[serde(default)]
    amount: i32,
}

/// Adapter for the bol.com Retailer API. Offers are flat: one offer is one
/// purchasable unit, so no variant flattening happens here. The API does not
/// expose weight.
pub struct BolProvider {
    client: Client,
    api_base: String,
    access_token: String,
}

impl BolProvider {
    pub fn new(config: &ChannelConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ChannelError::MissingApiData);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ChannelError::Unknown(e.to_string()))?;

        let api_base = if config.domain.trim().is_empty() {
            "https://api.bol.com".to_string()
        } else {
            config.domain.trim_end_matches('/').to_string()
        };

        Ok(Self {
            client,
            api_base,
            access_token: config.api_key.clone(),
        })
    }

    fn to_listing(offer: BolOffer) -> Option<ExternalListing> {
        let sku = match offer.reference_code.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => {
                debug!("Skipping bol offer {}: no reference code", offer.offer_id);
                return None;
            }
        };

        // The single-unit bundle price is the listing price
        let price = match offer
            .pricing
            .as_ref()
            .and_then(|p| p.bundle_prices.iter().find(|b| b.quantity == 1))
            .map(|b| b.unit_price)
        {
            Some(p) => p,
            None => {
                warn!("Skipping bol offer '{}': no single-unit price", sku);
                return None;
            }
        };

        let name = offer
            .store
            .as_ref()
            .and_then(|s| s.product_title.clone())
            .unwrap_or_else(|| sku.clone());

        Some(ExternalListing {
            channel: CHANNEL_BOL.to_string(),
            external_id: offer.offer_id,
            sku,
            name,
            price,
            weight_kg: None,
            stock: offer.stock.map(|s| s.amount).unwrap_or(0).max(0),
            description: None,
            image_url: Some(PLACEHOLDER_IMAGE_URL.to_string()),
            variant_attributes: None,
        })
    }
}

#[async_trait]
impl ChannelProvider for BolProvider {
    fn channel(&self) -> &'static str {
        CHANNEL_BOL
    }

    async fn fetch_listings(&self) -> Result<Vec<ExternalListing>> {
        let url = format!("{}/retailer/offers", self.api_base);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::ACCEPT, RETAILER_API_MEDIA_TYPE)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ChannelError::AuthenticationFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }
        if !status.is_success() {
            return Err(ChannelError::Unavailable(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let parsed: OffersResponse = serde_json::from_str(&body)?;
        Ok(parsed.offers.into_iter().filter_map(Self::to_listing).collect())
    }
}
