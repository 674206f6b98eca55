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

use super::client::{
    string_to_path, BlobItem, ContainerItem, CopyOutcome, CopyStatus, DeleteReceipt,
    StorageClient, UploadReceipt,
};
use super::config::{StorageConfig, StorageType, CLIENT_OPTION_KEYS};
use super::containers::{parse_sas_token, ContainerLister, ListAuth};
use super::error::{StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use futures::stream::StreamExt;
use object_store::{
    azure::{AzureConfigKey, MicrosoftAzure, MicrosoftAzureBuilder},
    local::LocalFileSystem,
    memory::InMemory,
    ClientOptions, ObjectStore, PutPayload, RetryConfig,
};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Container handle cache, keyed by container name
type StoreMap = HashMap<String, Arc<dyn ObjectStore>>;

enum Backend {
    Azure,
    Local { root: PathBuf },
    Memory,
}

/// Storage client for one account, backed by object_store
///
/// object_store binds a store to a single container, so a handle is built on
/// first use of each container and kept for the lifetime of the client.
pub struct ObjectStoreClient {
    config: StorageConfig,
    account: String,
    base_url: String,
    backend: Backend,
    stores: RwLock<StoreMap>,
}

impl ObjectStoreClient {
    /// Create a client for `account` from configuration.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// * The account name is empty
    /// * Local storage is selected and 'path' is missing or not a directory
    pub fn new(config: StorageConfig, account: impl Into<String>) -> StorageResult<Self> {
        let account = account.into();
        if account.is_empty() {
            return Err(StorageError::ConfigError(
                "Storage client requires an account name".to_string(),
            ));
        }

        let backend = match config.storage_type {
            StorageType::Azure => Backend::Azure,
            StorageType::Memory => Backend::Memory,
            StorageType::Local => Backend::Local {
                root: Self::resolve_local_root(&config)?,
            },
        };

        let base_url = match &backend {
            Backend::Local { root } => {
                format!("file://{}", root.to_string_lossy().trim_end_matches('/'))
            }
            _ => config.base_url(&account),
        };

        info!(
            "Created storage client type={} account={} base_url={}",
            config.storage_type_str(),
            account,
            base_url
        );

        Ok(Self {
            config,
            account,
            base_url,
            backend,
            stores: RwLock::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn resolve_local_root(config: &StorageConfig) -> StorageResult<PathBuf> {
        let path = config.get_option("path").ok_or_else(|| {
            StorageError::ConfigError("Local storage requires 'path' option".to_string())
        })?;

        let canonical_path = PathBuf::from(path).canonicalize().map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to resolve path '{}': {} (path must exist)",
                path, e
            ))
        })?;

        if !canonical_path.is_dir() {
            return Err(StorageError::ConfigError(format!(
                "Base path is not a directory: {}",
                canonical_path.display()
            )));
        }
        Ok(canonical_path)
    }

    /// Parse a numeric option, ignoring values that do not parse.
    fn parse_option<T: std::str::FromStr>(config: &StorageConfig, key: &str) -> Option<T> {
        config.get_option(key).and_then(|v| v.parse().ok())
    }

    /// Timeout option in seconds. `Some(None)` means explicitly disabled.
    fn timeout_option(config: &StorageConfig, key: &str) -> Option<Option<Duration>> {
        match config.get_option(key).map(String::as_str) {
            Some("0") | Some("disabled") => Some(None),
            _ => Self::parse_option(config, key).map(|secs| Some(Duration::from_secs(secs))),
        }
    }

    /// HTTP client settings handed to the SDK.
    fn build_connection_options(config: &StorageConfig) -> ClientOptions {
        let mut options = ClientOptions::default();
        options = match Self::timeout_option(config, "timeout") {
            Some(Some(timeout)) => options.with_timeout(timeout),
            Some(None) => options.with_timeout_disabled(),
            None => options,
        };
        options = match Self::timeout_option(config, "connect_timeout") {
            Some(Some(timeout)) => options.with_connect_timeout(timeout),
            Some(None) => options.with_connect_timeout_disabled(),
            None => options,
        };
        if let Some(secs) = Self::parse_option::<u64>(config, "pool_idle_timeout") {
            options = options.with_pool_idle_timeout(Duration::from_secs(secs));
        }
        if let Some(max_idle) = Self::parse_option::<usize>(config, "pool_max_idle_per_host") {
            options = options.with_pool_max_idle_per_host(max_idle);
        }
        options
    }

    /// SDK retry policy. The facade itself never retries.
    fn build_retry_options(config: &StorageConfig) -> RetryConfig {
        let defaults = RetryConfig::default();
        RetryConfig {
            backoff: Default::default(),
            max_retries: Self::parse_option(config, "max_retries")
                .unwrap_or(defaults.max_retries),
            retry_timeout: Self::parse_option(config, "retry_timeout")
                .map(Duration::from_secs)
                .unwrap_or(defaults.retry_timeout),
        }
    }

    /// Configure an Azure builder bound to one container.
    ///
    /// Credentials not given as options are resolved by the SDK from the
    /// ambient environment (`AZURE_*` variables, workload or managed identity).
    fn azure_builder(
        config: &StorageConfig,
        account: &str,
        container: &str,
    ) -> MicrosoftAzureBuilder {
        let mut builder = MicrosoftAzureBuilder::from_env()
            .with_client_options(Self::build_connection_options(config))
            .with_retry(Self::build_retry_options(config))
            .with_account(account)
            .with_container_name(container);

        for (key, value) in &config.options {
            match key.as_str() {
                "access_key" | "account_key" => builder = builder.with_access_key(value),
                "sas_token" => builder = builder.with_sas_authorization(parse_sas_token(value)),
                "tenant_id" => builder = builder.with_tenant_id(value),
                "client_id" => builder = builder.with_client_id(value),
                "client_secret" => builder = builder.with_client_secret(value),
                "endpoint" | "endpoint_domain" => {
                    builder = builder.with_endpoint(config.base_url(account))
                }
                "use_emulator" => builder = builder.with_use_emulator(config.flag(key)),
                "allow_http" => builder = builder.with_allow_http(config.flag(key)),
                "max_page_size" => (),
                k if CLIENT_OPTION_KEYS.contains(&k) => (),
                _ => {
                    tracing::info!("Unknown Azure option: {}", key);
                }
            }
        }
        builder
    }

    fn build_azure(builder: MicrosoftAzureBuilder) -> StorageResult<MicrosoftAzure> {
        builder.build().map_err(|e| {
            StorageError::ConfigError(format!("Failed to create Azure store: {}", e))
        })
    }

    fn build_azure_store(
        config: &StorageConfig,
        account: &str,
        container: &str,
    ) -> StorageResult<MicrosoftAzure> {
        Self::build_azure(Self::azure_builder(config, account, container))
    }

    /// Authorization for account-level requests the SDK does not cover.
    ///
    /// The account key is read back from the builder so keys that only come
    /// from the environment sign requests the same way the SDK does.
    fn list_auth(
        config: &StorageConfig,
        builder: MicrosoftAzureBuilder,
    ) -> StorageResult<ListAuth> {
        let access_key = builder.get_config_value(&AzureConfigKey::AccessKey);
        let store = Self::build_azure(builder)?;
        ListAuth::from_config(config, access_key, Arc::clone(store.credentials()))
    }

    /// Reject container names that could address anything but one
    /// sub-directory of the local root.
    fn check_container_name(container: &str) -> StorageResult<()> {
        let invalid = container.is_empty()
            || container == "."
            || container == ".."
            || container.contains(['/', '\\'])
            || Path::new(container).is_absolute();
        if invalid {
            return Err(StorageError::HttpError {
                status: 400,
                code: Some("InvalidResourceName".to_string()),
                message: format!("Invalid container name: {}", container),
            });
        }
        Ok(())
    }

    fn container_not_found(container: &str) -> StorageError {
        StorageError::HttpError {
            status: 404,
            code: Some("ContainerNotFound".to_string()),
            message: format!("The specified container does not exist: {}", container),
        }
    }

    /// Get the store for a container, building it on first use.
    ///
    /// Local and in-memory containers only come into existence on write, so
    /// lookups with `create == false` report `ContainerNotFound` like the
    /// Blob service does.
    async fn store_for(
        &self,
        container: &str,
        create: bool,
    ) -> StorageResult<Arc<dyn ObjectStore>> {
        if let Some(store) = self.stores.read().await.get(container) {
            return Ok(Arc::clone(store));
        }

        let mut stores = self.stores.write().await;
        if let Some(store) = stores.get(container) {
            return Ok(Arc::clone(store));
        }

        let store: Arc<dyn ObjectStore> = match &self.backend {
            Backend::Azure => Arc::new(Self::build_azure_store(
                &self.config,
                &self.account,
                container,
            )?),
            Backend::Memory => {
                if !create {
                    return Err(Self::container_not_found(container));
                }
                Arc::new(InMemory::new())
            }
            Backend::Local { root } => {
                Self::check_container_name(container)?;
                let dir = root.join(container);
                if !dir.is_dir() {
                    if !create {
                        return Err(Self::container_not_found(container));
                    }
                    tokio::fs::create_dir_all(&dir).await?;
                }
                Arc::new(LocalFileSystem::new_with_prefix(&dir)?)
            }
        };

        debug!(
            "Opened container={} account={} type={}",
            container,
            self.account,
            self.config.storage_type_str()
        );
        stores.insert(container.to_string(), Arc::clone(&store));
        Ok(store)
    }

    /// Split a fully qualified blob URL of this account into container and blob.
    fn parse_blob_url<'a>(&self, url: &'a str) -> StorageResult<(&'a str, &'a str)> {
        url.strip_prefix(self.base_url.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .and_then(|rest| rest.split_once('/'))
            .filter(|(container, blob)| !container.is_empty() && !blob.is_empty())
            .ok_or_else(|| StorageError::InvalidSource(url.to_string()))
    }

    /// Names of locally known containers, sorted.
    async fn local_container_names(&self) -> StorageResult<Vec<String>> {
        let mut names = Vec::new();
        match &self.backend {
            Backend::Local { root } => {
                let mut entries = tokio::fs::read_dir(root).await?;
                while let Some(entry) = entries.next_entry().await? {
                    if entry.file_type().await?.is_dir() {
                        names.push(entry.file_name().to_string_lossy().to_string());
                    }
                }
            }
            Backend::Memory => names.extend(self.stores.read().await.keys().cloned()),
            Backend::Azure => (),
        }
        names.sort();
        Ok(names)
    }
}

#[async_trait]
impl StorageClient for ObjectStoreClient {
    fn account(&self) -> &str {
        &self.account
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn download(&self, container: &str, blob: &str) -> StorageResult<Bytes> {
        let store = self.store_for(container, false).await?;
        let result = store.get(&string_to_path(blob)).await?;
        let bytes = result.bytes().await?;
        debug!(
            "Downloaded blob={} container={} size={}",
            blob,
            container,
            bytes.len()
        );
        Ok(bytes)
    }

    async fn upload(
        &self,
        container: &str,
        blob: &str,
        content: Bytes,
    ) -> StorageResult<UploadReceipt> {
        let store = self.store_for(container, true).await?;
        let size = content.len();
        let result = store
            .put(&string_to_path(blob), PutPayload::from(content))
            .await?;
        debug!(
            "Uploaded blob={} container={} size={}",
            blob, container, size
        );

        Ok(UploadReceipt {
            request_id: result.e_tag.clone(),
            e_tag: result.e_tag,
            version: result.version,
        })
    }

    async fn copy_from_url(
        &self,
        container: &str,
        source_url: &str,
        destination: &str,
    ) -> StorageResult<CopyOutcome> {
        let (source_container, source_blob) = self.parse_blob_url(source_url)?;
        if source_container != container {
            return Err(StorageError::InvalidSource(source_url.to_string()));
        }

        let store = self.store_for(container, false).await?;
        store
            .copy(&string_to_path(source_blob), &string_to_path(destination))
            .await?;
        debug!(
            "Copied source={} destination={} container={}",
            source_url, destination, container
        );

        Ok(CopyOutcome {
            copy_status: CopyStatus::Success,
            error_code: None,
            source: source_url.to_string(),
            destination: destination.to_string(),
        })
    }

    async fn delete(&self, container: &str, blob: &str) -> StorageResult<DeleteReceipt> {
        let store = self.store_for(container, false).await?;
        let path = string_to_path(blob);

        // Some backends treat deleting a missing object as success.
        store.head(&path).await?;
        store.delete(&path).await?;
        debug!("Deleted blob={} container={}", blob, container);

        Ok(DeleteReceipt {
            blob: blob.to_string(),
            deleted_at: Utc::now(),
            error_code: None,
        })
    }

    async fn list_containers(&self, page_size: usize) -> StorageResult<Vec<ContainerItem>> {
        let page_size = page_size.max(1);

        if let Backend::Azure = self.backend {
            // Any container name yields the account's credential chain.
            let builder = Self::azure_builder(&self.config, &self.account, "$root");
            let auth = Self::list_auth(&self.config, builder)?;
            let lister = ContainerLister::new(&self.account, &self.base_url, auth);
            return lister.list_all(page_size).await;
        }

        let names = self.local_container_names().await?;
        let mut containers = Vec::with_capacity(names.len());
        for (page, chunk) in names.chunks(page_size).enumerate() {
            debug!(
                "Listed container page={} count={} account={}",
                page + 1,
                chunk.len(),
                self.account
            );
            containers.extend(chunk.iter().map(ContainerItem::named));
        }
        Ok(containers)
    }

    async fn list_blobs(&self, container: &str) -> StorageResult<Vec<BlobItem>> {
        let store = self.store_for(container, false).await?;

        let mut blobs = Vec::new();
        let mut stream = store.list(None);
        while let Some(meta) = stream.next().await {
            let meta = meta?;
            blobs.push(BlobItem {
                name: meta.location.to_string(),
                size: meta.size,
                last_modified: Some(meta.last_modified),
                e_tag: meta.e_tag,
                version: meta.version,
            });
        }

        info!(
            "Listed count={} blobs in container={} account={}",
            blobs.len(),
            container,
            self.account
        );
        Ok(blobs)
    }
}

impl Debug for ObjectStoreClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StorageClient(type={}, account={}, base_url={})",
            self.config.storage_type_str(),
            self.account,
            self.base_url
        )
    }
}
