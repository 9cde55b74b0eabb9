pub(crate) mod channel_factory;
pub(crate) mod channels_constants;
pub(crate) mod channels_errors;
pub(crate) mod channels_model;
pub(crate) mod channels_traits;
pub(crate) mod providers;

// Re-export the public interface
pub use channel_factory::ChannelProviderFactory;
pub use channels_constants::*;
pub use channels_model::{ChannelConfig, ExternalListing};
pub use channels_traits::{ChannelCredentialStore, ChannelProvider};

// Re-export error types for convenience
pub use channels_errors::{ChannelError, Result};
