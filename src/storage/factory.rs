// Copyright 2025 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.
//
// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

use super::client::StorageClient;
use super::config::StorageConfig;
use super::error::StorageResult;
use super::object_store::ObjectStoreClient;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Hands out storage clients bound to an account
#[async_trait]
pub trait StorageConnector: Send + Sync {
    /// Get a client for `account`.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be configured for the account.
    async fn connect(&self, account: &str) -> StorageResult<Arc<dyn StorageClient>>;
}

/// Connector building object_store backed clients from one configuration
///
/// Clients are kept per account, so repeated calls for the same account share
/// one authenticated client and its container handles.
pub struct ConfigConnector {
    config: StorageConfig,
    clients: Mutex<HashMap<String, Arc<dyn StorageClient>>>,
}

impl ConfigConnector {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

#[async_trait]
impl StorageConnector for ConfigConnector {
    async fn connect(&self, account: &str) -> StorageResult<Arc<dyn StorageClient>> {
        let mut clients = self.clients.lock().await;
        if let Some(client) = clients.get(account) {
            return Ok(Arc::clone(client));
        }

        debug!("Connecting account={}", account);
        let client: Arc<dyn StorageClient> =
            Arc::new(ObjectStoreClient::new(self.config.clone(), account)?);
        clients.insert(account.to_string(), Arc::clone(&client));
        Ok(client)
    }
}

/// Factory for creating storage clients
pub struct StorageClientFactory;

impl StorageClientFactory {
    /// Create a storage client for `account` from configuration.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// * The account name is empty
    /// * Required configuration options are missing
    pub fn from_config(
        config: StorageConfig,
        account: &str,
    ) -> StorageResult<Arc<dyn StorageClient>> {
        let client = ObjectStoreClient::new(config, account)?;
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[tokio::test]
    async fn test_connector_reuses_client_per_account() {
        let connector = ConfigConnector::new(StorageConfig::memory());

        let first = connector.connect("acct").await.unwrap();
        first
            .upload("c1", "x.json", Bytes::from_static(b"{}"))
            .await
            .unwrap();

        let second = connector.connect("acct").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            second.download("c1", "x.json").await.unwrap().as_ref(),
            b"{}"
        );
    }

    #[tokio::test]
    async fn test_connector_separates_accounts() {
        let connector = ConfigConnector::new(StorageConfig::memory());

        let a = connector.connect("a").await.unwrap();
        let b = connector.connect("b").await.unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(b.base_url(), "memory://b");
    }

    #[tokio::test]
    async fn test_connector_propagates_config_errors() {
        let connector = ConfigConnector::new(StorageConfig::local());
        assert!(connector.connect("acct").await.is_err());
    }

    #[test]
    fn test_factory_from_config() {
        let client = StorageClientFactory::from_config(StorageConfig::azure(), "acct").unwrap();
        assert_eq!(client.account(), "acct");
        assert_eq!(client.base_url(), "https://acct.blob.core.windows.net");
    }
}
