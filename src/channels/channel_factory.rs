use std::sync::Arc;

use log::debug;

use super::channels_constants::{CHANNEL_BOL, CHANNEL_CCV, CHANNEL_SHOPIFY, CHANNEL_WOOCOMMERCE};
use super::channels_errors::{ChannelError, Result};
use super::channels_model::ChannelConfig;
use super::channels_traits::ChannelProvider;
use super::providers::bol_provider::BolProvider;
use super::providers::ccv_provider::CcvProvider;
use super::providers::shopify_provider::ShopifyProvider;
use super::providers::woocommerce_provider::WooCommerceProvider;

pub struct ChannelProviderFactory;

impl ChannelProviderFactory {
    pub fn from_config(config: &ChannelConfig) -> Result<Arc<dyn ChannelProvider>> {
        debug!(
            "Building channel provider '{}' for client '{}'",
            config.channel, config.client_id
        );
        match config.channel.as_str() {
            CHANNEL_SHOPIFY => Ok(Arc::new(ShopifyProvider::new(config)?)),
            CHANNEL_WOOCOMMERCE => Ok(Arc::new(WooCommerceProvider::new(config)?)),
            CHANNEL_BOL => Ok(Arc::new(BolProvider::new(config)?)),
            CHANNEL_CCV => Ok(Arc::new(CcvProvider::new(config)?)),
            other => Err(ChannelError::UnsupportedChannel(other.to_string())),
        }
    }
}
