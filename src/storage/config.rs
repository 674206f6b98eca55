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

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default endpoint domain of the Azure Blob service.
pub const AZURE_BLOB_DOMAIN: &str = "blob.core.windows.net";

/// Default number of entries requested per listing page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Options consumed by the SDK client itself rather than by a backend builder.
pub(crate) const CLIENT_OPTION_KEYS: [&str; 6] = [
    "timeout",
    "connect_timeout",
    "max_retries",
    "retry_timeout",
    "pool_idle_timeout",
    "pool_max_idle_per_host",
];

/// Storage backend type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// Azure Blob Storage
    Azure,
    /// Local filesystem, each sub-directory of `path` is a container
    Local,
    /// Process-local in-memory containers
    Memory,
}

/// Configuration for the storage client layer
///
/// Backend specific settings live in a string map that is handed to the
/// object_store builders. Account and container are *not* part of the
/// configuration: they are supplied per request and projected onto the
/// configured endpoint.
///
/// # Examples
///
/// ## Azure with ambient identity
/// ```
/// use blob_facade::storage::StorageConfig;
///
/// let config = StorageConfig::azure();
/// ```
///
/// ## Azure with a service principal
/// ```
/// use blob_facade::storage::StorageConfig;
///
/// let config = StorageConfig::azure()
///     .with_option("tenant_id", "TENANT_ID")
///     .with_option("client_id", "CLIENT_ID")
///     .with_option("client_secret", "CLIENT_SECRET");
/// ```
///
/// ## Azurite emulator
/// ```
/// use blob_facade::storage::StorageConfig;
///
/// let config = StorageConfig::azure()
///     .with_option("endpoint", "http://127.0.0.1:10000")
///     .with_option("access_key", "ACCOUNT_KEY")
///     .with_option("allow_http", "true");
/// ```
///
/// ## Local filesystem
/// ```
/// use blob_facade::storage::StorageConfig;
///
/// let config = StorageConfig::local().with_option("path", "/tmp/blobs");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage backend type
    #[serde(rename = "type")]
    pub storage_type: StorageType,

    /// Backend specific configuration options
    ///
    /// Azure:
    /// - access_key / account_key: Account key (Shared Key auth)
    /// - sas_token: SAS token
    /// - tenant_id, client_id, client_secret: Service principal
    /// - endpoint: Custom endpoint URL, the account is appended as a path segment
    /// - endpoint_domain: Endpoint domain (default `blob.core.windows.net`)
    /// - use_emulator: "true" to target a local Azurite instance
    /// - allow_http: "true" to allow HTTP connections
    ///
    /// Local:
    /// - path: Root directory holding one sub-directory per container
    ///
    /// All backends:
    /// - max_page_size: Default page size for container listings
    #[serde(default)]
    pub options: HashMap<String, String>,
}

impl StorageConfig {
    /// Create a new storage configuration.
    ///
    /// # Arguments
    ///
    /// * `storage_type` - The type of storage backend ("azure", "local", "memory")
    ///
    /// # Panics
    ///
    /// Panics on an unknown storage type.
    pub fn new(storage_type: impl Into<String>) -> Self {
        let storage_type_str = storage_type.into();
        let storage_type = match storage_type_str.to_lowercase().as_str() {
            "azure" | "blob" => StorageType::Azure,
            "local" | "file" => StorageType::Local,
            "memory" => StorageType::Memory,
            _ => panic!("Unknown storage type: {}", storage_type_str),
        };

        Self {
            storage_type,
            options: Self::default_options(),
        }
    }

    /// Create an Azure Blob Storage configuration with default options.
    pub fn azure() -> Self {
        Self {
            storage_type: StorageType::Azure,
            options: Self::default_options(),
        }
    }

    /// Create a local filesystem configuration with default options.
    pub fn local() -> Self {
        Self {
            storage_type: StorageType::Local,
            options: Self::default_options(),
        }
    }

    /// Create an in-memory configuration.
    pub fn memory() -> Self {
        Self {
            storage_type: StorageType::Memory,
            options: HashMap::new(),
        }
    }

    /// Get default options for the SDK client.
    ///
    /// # Returns
    ///
    /// A HashMap containing default timeout, retry, and connection pool settings.
    pub fn default_options() -> HashMap<String, String> {
        [
            ("timeout", "1200"),
            ("connect_timeout", "30"),
            ("max_retries", "20"),
            ("retry_timeout", "1200"),
            ("pool_idle_timeout", "15"),
            ("pool_max_idle_per_host", "5"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    /// Add a configuration option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Add multiple configuration options.
    pub fn with_options(mut self, options: HashMap<String, String>) -> Self {
        self.options.extend(options);
        self
    }

    /// Get a configuration option.
    pub fn get_option(&self, key: &str) -> Option<&String> {
        self.options.get(key)
    }

    /// Whether a boolean option is set to "true" (case-insensitive).
    pub fn flag(&self, key: &str) -> bool {
        self.get_option(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    /// Get the storage type as a string.
    pub fn storage_type_str(&self) -> &str {
        match self.storage_type {
            StorageType::Azure => "azure",
            StorageType::Local => "local",
            StorageType::Memory => "memory",
        }
    }

    /// Page size used by container listings when a request does not set one.
    pub fn default_page_size(&self) -> usize {
        self.get_option("max_page_size")
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Account key used for Shared Key signing, if configured.
    pub fn access_key(&self) -> Option<&String> {
        self.get_option("access_key")
            .or_else(|| self.get_option("account_key"))
    }

    /// Project an account name onto the configured endpoint.
    ///
    /// # Returns
    ///
    /// * Azure: `https://{account}.blob.core.windows.net`, or
    ///   `{endpoint}/{account}` when a custom endpoint is configured
    /// * Local: `file://{path}`
    /// * Memory: `memory://{account}`
    pub fn base_url(&self, account: &str) -> String {
        match self.storage_type {
            StorageType::Azure => {
                if let Some(endpoint) = self.get_option("endpoint") {
                    format!("{}/{}", endpoint.trim_end_matches('/'), account)
                } else if self.flag("use_emulator") {
                    format!("http://127.0.0.1:10000/{}", account)
                } else {
                    let domain = self
                        .get_option("endpoint_domain")
                        .map(String::as_str)
                        .unwrap_or(AZURE_BLOB_DOMAIN);
                    format!("https://{}.{}", account, domain)
                }
            }
            StorageType::Local => {
                let root = self
                    .get_option("path")
                    .map(|p| p.trim_end_matches('/').to_string())
                    .unwrap_or_default();
                format!("file://{}", root)
            }
            StorageType::Memory => format!("memory://{}", account),
        }
    }
}

impl From<StorageConfig> for String {
    fn from(config: StorageConfig) -> Self {
        config.storage_type_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_type_serialization() {
        assert_eq!(
            serde_json::to_string(&StorageType::Azure).unwrap(),
            "\"azure\""
        );
        assert_eq!(
            serde_json::to_string(&StorageType::Local).unwrap(),
            "\"local\""
        );
        assert_eq!(
            serde_json::to_string(&StorageType::Memory).unwrap(),
            "\"memory\""
        );
    }

    #[test]
    fn test_storage_config_new() {
        assert_eq!(StorageConfig::new("azure").storage_type, StorageType::Azure);
        assert_eq!(StorageConfig::new("AZURE").storage_type, StorageType::Azure);
        assert_eq!(StorageConfig::new("blob").storage_type, StorageType::Azure);
        assert_eq!(StorageConfig::new("local").storage_type, StorageType::Local);
        assert_eq!(StorageConfig::new("memory").storage_type, StorageType::Memory);
    }

    #[test]
    #[should_panic(expected = "Unknown storage type")]
    fn test_storage_config_new_invalid() {
        StorageConfig::new("ftp");
    }

    #[test]
    fn test_default_options() {
        let config = StorageConfig::azure();
        assert_eq!(config.get_option("timeout"), Some(&"1200".to_string()));
        assert_eq!(config.get_option("max_retries"), Some(&"20".to_string()));
        assert!(StorageConfig::memory().options.is_empty());
    }

    #[test]
    fn test_option_override() {
        let config = StorageConfig::azure()
            .with_option("timeout", "600")
            .with_option("timeout", "900");

        assert_eq!(config.get_option("timeout"), Some(&"900".to_string()));
    }

    #[test]
    fn test_with_options_keeps_defaults() {
        let mut custom = HashMap::new();
        custom.insert("sas_token".to_string(), "sv=2022&sig=abc".to_string());

        let config = StorageConfig::azure().with_options(custom);
        assert_eq!(
            config.get_option("sas_token"),
            Some(&"sv=2022&sig=abc".to_string())
        );
        assert_eq!(config.get_option("timeout"), Some(&"1200".to_string()));
    }

    #[test]
    fn test_azure_base_url() {
        let config = StorageConfig::azure();
        assert_eq!(
            config.base_url("acct"),
            "https://acct.blob.core.windows.net"
        );
    }

    #[test]
    fn test_azure_base_url_custom_domain() {
        let config = StorageConfig::azure().with_option("endpoint_domain", "blob.core.usgovcloudapi.net");
        assert_eq!(
            config.base_url("acct"),
            "https://acct.blob.core.usgovcloudapi.net"
        );
    }

    #[test]
    fn test_azure_base_url_with_endpoint() {
        let config = StorageConfig::azure().with_option("endpoint", "http://127.0.0.1:10000/");
        assert_eq!(
            config.base_url("devstoreaccount1"),
            "http://127.0.0.1:10000/devstoreaccount1"
        );
    }

    #[test]
    fn test_azure_base_url_emulator() {
        let config = StorageConfig::azure().with_option("use_emulator", "TRUE");
        assert_eq!(
            config.base_url("devstoreaccount1"),
            "http://127.0.0.1:10000/devstoreaccount1"
        );
    }

    #[test]
    fn test_local_and_memory_base_url() {
        let local = StorageConfig::local().with_option("path", "/tmp/blobs/");
        assert_eq!(local.base_url("acct"), "file:///tmp/blobs");
        assert_eq!(StorageConfig::memory().base_url("acct"), "memory://acct");
    }

    #[test]
    fn test_default_page_size() {
        assert_eq!(StorageConfig::azure().default_page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(
            StorageConfig::azure()
                .with_option("max_page_size", "5")
                .default_page_size(),
            5
        );
        assert_eq!(
            StorageConfig::azure()
                .with_option("max_page_size", "0")
                .default_page_size(),
            DEFAULT_PAGE_SIZE
        );
    }

    #[test]
    fn test_access_key_alias() {
        let config = StorageConfig::azure().with_option("account_key", "a2V5");
        assert_eq!(config.access_key(), Some(&"a2V5".to_string()));
    }

    #[test]
    fn test_config_deserialization() {
        let json = r#"{"type":"azure","options":{"sas_token":"sig=abc"}}"#;
        let config: StorageConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.storage_type, StorageType::Azure);
        assert_eq!(config.get_option("sas_token"), Some(&"sig=abc".to_string()));
        let as_string: String = config.into();
        assert_eq!(as_string, "azure");
    }
}
