use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

use crate::channels::channels_constants::{
    CHANNEL_WOOCOMMERCE, DEFAULT_PAGE_SIZE, DEFAULT_REQUEST_TIMEOUT_SECS, PLACEHOLDER_IMAGE_URL,
};
use crate::channels::channels_errors::{ChannelError, Result};
use crate::channels::channels_model::{ChannelConfig, ExternalListing};
use crate::channels::channels_traits::ChannelProvider;

#[derive(Debug, Deserialize)]
struct WooProduct {
    id: u64,
    name: String,
    #[serde(default)]
    sku: String,
    #[serde(rename = "type", default)]
    product_type: String,
    #[serde(default)]
    price: String,
    #[serde(default)]
    weight: String,
    #[serde(default)]
    stock_quantity: Option<i32>,
    #[serde(default)]
    short_description: String,
    #[serde(default)]
    images: Vec<WooImage>,
    #[serde(default)]
    attributes: Vec<WooAttribute>,
}

#[derive(Debug, Deserialize)]
struct WooImage {
    src: String,
}

#[derive(Debug, Deserialize)]
struct WooAttribute {
    #[serde(default)]
    option: Option<String>,
}

pub struct WooCommerceProvider {
    client: Client,
    domain: String,
    consumer_key: String,
    consumer_secret: String,
}

impl WooCommerceProvider {
    pub fn new(config: &ChannelConfig) -> Result<Self> {
        let consumer_secret = config
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
            consumer_key: config.api_key.clone(),
            consumer_secret,
        })
    }

    fn to_listing(product: WooProduct) -> Option<ExternalListing> {
        let sku = product.sku.trim();
        if sku.is_empty() {
            debug!("Skipping WooCommerce product {}: no SKU", product.id);
            return None;
        }

        let price = match Decimal::from_str(&product.price) {
            Ok(p) => p,
            Err(e) => {
                warn!(
                    "Skipping WooCommerce product {}: unparseable price '{}': {}",
                    product.id, product.price, e
                );
                return None;
            }
        };

        // WooCommerce reports weight in the shop's weight unit; stores
        // feeding this integration are configured for kilograms.
        let weight_kg = Decimal::from_str(product.weight.trim()).ok();

        let variant_attributes = if product.product_type == "variation" {
            let values: Vec<&str> = product
                .attributes
                .iter()
                .filter_map(|a| a.option.as_deref())
                .filter(|v| !v.is_empty())
                .collect();
            (!values.is_empty()).then(|| values.join(", "))
        } else {
            None
        };

        Some(ExternalListing {
            channel: CHANNEL_WOOCOMMERCE.to_string(),
            external_id: product.id.to_string(),
            sku: sku.to_string(),
            name: product.name,
            price,
            weight_kg,
            stock: product.stock_quantity.unwrap_or(0).max(0),
            description: (!product.short_description.is_empty())
                .then(|| product.short_description.clone()),
            image_url: Some(
                product
                    .images
                    .first()
                    .map(|i| i.src.clone())
                    .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
            ),
            variant_attributes,
        })
    }
}

#[async_trait]
impl ChannelProvider for WooCommerceProvider {
    fn channel(&self) -> &'static str {
        CHANNEL_WOOCOMMERCE
    }

    async fn fetch_listings(&self) -> Result<Vec<ExternalListing>> {
        let url = format!(
            "{}/wp-json/wc/v3/products?per_page={}",
            self.domain, DEFAULT_PAGE_SIZE
        );

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.consumer_key, Some(&self.consumer_secret))
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

        let parsed: Vec<WooProduct> = serde_json::from_str(&body)?;
        Ok(parsed.into_iter().filter_map(Self::to_listing).collect())
    }
}
