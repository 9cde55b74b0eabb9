use async_trait::async_trait;

use super::channels_errors::Result;
use super::channels_model::{ChannelConfig, ExternalListing};

/// One external sales platform adapter. Implementations are stateless apart
/// from their HTTP client and credentials; a fetch either returns the full
/// page of listings or a channel-level error, never a partial result.
#[async_trait]
pub trait ChannelProvider: Send + Sync {
    fn channel(&self) -> &'static str;
    async fn fetch_listings(&self) -> Result<Vec<ExternalListing>>;
}

/// External collaborator: resolves stored connection details for a
/// (client, channel) pair.
pub trait ChannelCredentialStore: Send + Sync {
    fn get_config(&self, client_id: &str, channel: &str) -> Result<ChannelConfig>;
}
