/// Channel identifiers
pub const CHANNEL_SHOPIFY: &str = "shopify";
pub const CHANNEL_WOOCOMMERCE: &str = "woocommerce";
pub const CHANNEL_BOL: &str = "bol";
pub const CHANNEL_CCV: &str = "ccv";

/// Default values
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Image used when neither the variant nor the parent product has one
pub const PLACEHOLDER_IMAGE_URL: &str = "https://static.stocklink.app/placeholder-product.png";
