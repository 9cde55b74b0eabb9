use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use log::{debug, warn};
use reqwest::Client;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use sha2::Sha512;
use std::time::Duration;

use crate::channels::channels_constants::{
    CHANNEL_CCV, DEFAULT_PAGE_SIZE, DEFAULT_REQUEST_TIMEOUT_SECS, PLACEHOLDER_IMAGE_URL,
};
use crate::channels::channels_errors::{ChannelError, Result};
use crate::channels::channels_model::{ChannelConfig, ExternalListing};
use crate::channels::channels_traits::ChannelProvider;

type HmacSha512 = Hmac<Sha512>;

#[derive(Debug, Deserialize)]
struct ItemsResponse {
    items: Vec<CcvProduct>,
}

#[derive(Debug, Deserialize)]
struct CcvProduct {
    id: i64,
    name: String,
    #[serde(default)]
    productnumber: Option<String>,
    #[serde(default)]
    price: Option<Decimal>,
    #[serde(default)]
    weight: Option<Decimal>,
    #[serde(default)]
    stock: Option<Decimal>,
    #[serde(default)]
    shortdescription: Option<String>,
    #[serde(default)]
    photos: Vec<CcvPhoto>,
}

#[derive(Debug, Deserialize)]
struct CcvPhoto {
    #[serde(default)]
    deeplink: Option<String>,
}

/// Adapter for the CCV Shop API. Every request is signed: the canonical
/// string `public_key|method|uri|body|timestamp` is HMAC-SHA512'd with the
/// private key and sent in the `x-hash` header next to `x-public` and
/// `x-date`.
pub struct CcvProvider {
    client: Client,
    domain: String,
    public_key: String,
    private_key: String,
}

impl CcvProvider {
    pub fn new(config: &ChannelConfig) -> Result<Self> {
        let private_key = config
            .api_secret
            .clone()
            .ok_or(ChannelError::MissingApiData)?;
        if config.domain.trim().is_empty() || config.api_key.trim().is_empty() {
            return Err(ChannelError::MissingApiData);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ChannelError::Unknown(e.to_string()))?;

        Ok(Self {
            client,
            domain: config.domain.trim_end_matches('/').to_string(),
            public_key: config.api_key.clone(),
            private_key,
        })
    }

    fn canonical_string(
        public_key: &str,
        method: &str,
        uri: &str,
        body: &str,
        timestamp: &str,
    ) -> String {
        format!("{}|{}|{}|{}|{}", public_key, method, uri, body, timestamp)
    }

    fn sign(&self, method: &str, uri: &str, body: &str, timestamp: &str) -> Result<String> {
        let canonical = Self::canonical_string(&self.public_key, method, uri, body, timestamp);
        let mut mac = HmacSha512::new_from_slice(self.private_key.as_bytes())
            .map_err(|e| ChannelError::Unknown(format!("Invalid HMAC key length: {}", e)))?;
        mac.update(canonical.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// The body is only trusted after it parses as a JSON object carrying an
    /// `items` array.
    fn validate_shape(body: &str) -> Result<()> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        match value.get("items") {
            Some(items) if items.is_array() => Ok(()),
            _ => Err(ChannelError::MalformedResponse(
                "Response is not an object with an 'items' array".to_string(),
            )),
        }
    }

    fn to_listing(product: CcvProduct) -> Option<ExternalListing> {
        let sku = match product.productnumber.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => {
                debug!("Skipping CCV product {}: no product number", product.id);
                return None;
            }
        };

        let price = match product.price {
            Some(p) => p,
            None => {
                warn!("Skipping CCV product '{}': no price", sku);
                return None;
            }
        };

        Some(ExternalListing {
            channel: CHANNEL_CCV.to_string(),
            external_id: product.id.to_string(),
            sku,
            name: product.name,
            price,
            // CCV reports weight in kilograms already
            weight_kg: product.weight,
            stock: product.stock.and_then(|s| s.to_i32()).unwrap_or(0).max(0),
            description: product.shortdescription,
            image_url: Some(
                product
                    .photos
                    .first()
                    .and_then(|p| p.deeplink.clone())
                    .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
            ),
            variant_attributes: None,
        })
    }
}

#[async_trait]
impl ChannelProvider for CcvProvider {
    fn channel(&self) -> &'static str {
        CHANNEL_CCV
    }

    async fn fetch_listings(&self) -> Result<Vec<ExternalListing>> {
        let uri = format!("/api/rest/v1/products?size={}", DEFAULT_PAGE_SIZE);
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let hash = self.sign("GET", &uri, "", &timestamp)?;

        let url = format!("{}{}", self.domain, uri);
        let response = self
            .client
            .get(&url)
            .header("x-public", &self.public_key)
            .header("x-hash", hash)
            .header("x-date", &timestamp)
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

        Self::validate_shape(&body)?;
        let parsed: ItemsResponse = serde_json::from_str(&body)?;
        Ok(parsed.items.into_iter().filter_map(Self::to_listing).collect())
    }
}
