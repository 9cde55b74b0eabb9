use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

use crate::channels::channels_constants::{
    CHANNEL_SHOPIFY, DEFAULT_REQUEST_TIMEOUT_SECS, PLACEHOLDER_IMAGE_URL,
};
use crate::channels::channels_errors::{ChannelError, Result};
use crate::channels::channels_model::{ChannelConfig, ExternalListing};
use crate::channels::channels_traits::ChannelProvider;

const API_VERSION: &str = "2024-01";

#[derive(Debug, Deserialize)]
struct ProductsResponse {
    products: Vec<ShopifyProduct>,
}

#[derive(Debug, Deserialize)]
struct ShopifyProduct {
    id: u64,
    title: String,
    #[serde(default)]
    body_html: Option<String>,
    #[serde(default)]
    image: Option<ShopifyImage>,
    #[serde(default)]
    images: Vec<ShopifyImage>,
    variants: Vec<ShopifyVariant>,
}

#[derive(Debug, Deserialize)]
struct ShopifyVariant {
    id: u64,
    #[serde(default)]
    sku: Option<String>,
    price: String,
    #[serde(default)]
    grams: i64,
    #[serde(default)]
    inventory_quantity: Option<i32>,
    #[serde(default)]
    image_id: Option<u64>,
    #[serde(default)]
    option1: Option<String>,
    #[serde(default)]
    option2: Option<String>,
    #[serde(default)]
    option3: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ShopifyImage {
    #[serde(default)]
    id: Option<u64>,
    src: String,
}

pub struct ShopifyProvider {
    client: Client,
    domain: String,
    access_token: String,
}

impl ShopifyProvider {
    pub fn new(config: &ChannelConfig) -> Result<Self> {
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
            access_token: config.api_key.clone(),
        })
    }

    /// Builds the "Red, XL" style attribute string from variant option
    /// values. Single-variant products carry Shopify's synthetic
    /// "Default Title" option, which is not an attribute.
    fn variant_attributes(variant: &ShopifyVariant) -> Option<String> {
        let values: Vec<&str> = [&variant.option1, &variant.option2, &variant.option3]
            .iter()
            .filter_map(|o| o.as_deref())
            .filter(|v| !v.is_empty() && *v != "Default Title")
            .collect();

        if values.is_empty() {
            None
        } else {
            Some(values.join(", "))
        }
    }

    /// Image fallback chain: variant image, then parent product image, then
    /// the placeholder.
    fn resolve_image(product: &ShopifyProduct, variant: &ShopifyVariant) -> String {
        if let Some(image_id) = variant.image_id {
            if let Some(img) = product.images.iter().find(|i| i.id == Some(image_id)) {
                return img.src.clone();
            }
        }
        if let Some(img) = &product.image {
            return img.src.clone();
        }
        if let Some(img) = product.images.first() {
            return img.src.clone();
        }
        PLACEHOLDER_IMAGE_URL.to_string()
    }

    fn flatten(products: Vec<ShopifyProduct>) -> Vec<ExternalListing> {
        let mut listings = Vec::new();

        for product in &products {
            let multi_variant = product.variants.len() > 1;

            for variant in &product.variants {
                let sku = match variant.sku.as_deref().map(str::trim) {
                    Some(s) if !s.is_empty() => s.to_string(),
                    _ => {
                        debug!(
                            "Skipping Shopify variant {} of product {}: no SKU",
                            variant.id, product.id
                        );
                        continue;
                    }
                };

                let price = match Decimal::from_str(&variant.price) {
                    Ok(p) => p,
                    Err(e) => {
                        warn!(
                            "Skipping Shopify variant {}: unparseable price '{}': {}",
                            variant.id, variant.price, e
                        );
                        continue;
                    }
                };

                // Shopify reports weight in grams
                let weight_kg = (variant.grams > 0).then(|| Decimal::new(variant.grams, 3));

                listings.push(ExternalListing {
                    channel: CHANNEL_SHOPIFY.to_string(),
                    external_id: variant.id.to_string(),
                    sku,
                    name: product.title.clone(),
                    price,
                    weight_kg,
                    stock: variant.inventory_quantity.unwrap_or(0).max(0),
                    description: product.body_html.clone(),
                    image_url: Some(Self::resolve_image(product, variant)),
                    variant_attributes: if multi_variant {
                        Self::variant_attributes(variant)
                    } else {
                        None
                    },
                });
            }
        }

        listings
    }
}

#[async_trait]
impl ChannelProvider for ShopifyProvider {
    fn channel(&self) -> &'static str {
        CHANNEL_SHOPIFY
    }

    async fn fetch_listings(&self) -> Result<Vec<ExternalListing>> {
        let url = format!(
            "{}/admin/api/{}/products.json?limit=250",
            self.domain, API_VERSION
        );

        let response = self
            .client
            .get(&url)
            .header("X-Shopify-Access-Token", &self.access_token)
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

        let parsed: ProductsResponse = serde_json::from_str(&body)?;
        Ok(Self::flatten(parsed.products))
    }
}
