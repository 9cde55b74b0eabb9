use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One purchasable unit as reported by a channel's API, normalized to the
/// canonical shape: variant granularity, decimal price, weight in kilograms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExternalListing {
    pub channel: String,
    pub external_id: String,
    pub sku: String,
    pub name: String,
    pub price: Decimal,
    pub weight_kg: Option<Decimal>,
    pub stock: i32,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Human-readable option values for multi-variant parents, e.g. "Red, XL"
    pub variant_attributes: Option<String>,
}

/// Connection details for one (client, channel) pair, as returned by the
/// credential store.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChannelConfig {
    pub channel: String,
    pub client_id: String,
    /// Shop base URL, e.g. "https://demo.myshopify.com"
    pub domain: String,
    pub api_key: String,
    pub api_secret: Option<String>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            channel: String::new(),
            client_id: String::new(),
            domain: String::new(),
            api_key: String::new(),
            api_secret: None,
        }
    }
}
