use keyring::Entry;

use crate::errors::{Error, Result};

const USERNAME: &str = "default";

/// Stores channel API secrets in the operating system keyring, one entry per
/// (client, channel) pair.
pub struct SecretManager;

impl SecretManager {
    fn service(client_id: &str, channel: &str) -> String {
        format!("stocklink:{}:{}", client_id, channel)
    }

    /// Store an API secret for the given client and channel.
    pub fn set_api_secret(client_id: &str, channel: &str, secret: &str) -> Result<()> {
        let entry =
            Entry::new(&Self::service(client_id, channel), USERNAME).map_err(Error::from)?;
        entry.set_password(secret).map_err(Error::from)
    }

    /// Retrieve an API secret for the given client and channel.
    pub fn get_api_secret(client_id: &str, channel: &str) -> Result<Option<String>> {
        let entry =
            Entry::new(&Self::service(client_id, channel), USERNAME).map_err(Error::from)?;
        match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(Error::from(e)),
        }
    }

    /// Delete an API secret for the given client and channel.
    pub fn delete_api_secret(client_id: &str, channel: &str) -> Result<()> {
        let entry =
            Entry::new(&Self::service(client_id, channel), USERNAME).map_err(Error::from)?;
        match entry.delete_password() {
            Ok(_) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()), // If no entry, it's already "deleted"
            Err(e) => Err(Error::from(e)),
        }
    }
}
