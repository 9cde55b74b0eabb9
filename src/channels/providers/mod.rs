pub(crate) mod bol_provider;
pub(crate) mod ccv_provider;
pub(crate) mod shopify_provider;
pub(crate) mod woocommerce_provider;

pub use bol_provider::BolProvider;
pub use ccv_provider::CcvProvider;
pub use shopify_provider::ShopifyProvider;
pub use woocommerce_provider::WooCommerceProvider;
