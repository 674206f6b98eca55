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

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use object_store::path::Path as ObjectPath;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};

use super::error::StorageResult;

/// Metadata about a blob in a container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobItem {
    /// Full blob name within the container
    pub name: String,

    /// Size in bytes
    pub size: u64,

    /// Last modified timestamp
    pub last_modified: Option<DateTime<Utc>>,

    /// Entity tag
    pub e_tag: Option<String>,

    /// Version identifier, for accounts with versioning enabled
    pub version: Option<String>,
}

/// Metadata about a container in an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerItem {
    pub name: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub e_tag: Option<String>,
    pub lease_status: Option<String>,
    pub public_access: Option<String>,
}

impl ContainerItem {
    /// Descriptor carrying only a name, for backends without container properties.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            last_modified: None,
            e_tag: None,
            lease_status: None,
            public_access: None,
        }
    }
}

/// What the service answered to an upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    /// Confirmation identifier, `None` when the service did not produce one
    pub request_id: Option<String>,
    pub e_tag: Option<String>,
    pub version: Option<String>,
}

/// State of a server-side copy, using the Blob service's `x-ms-copy-status` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyStatus {
    Success,
    Pending,
    Aborted,
    Failed,
}

/// Result of a server-side copy
///
/// object_store does not surface the service's copy status, so
/// [`ObjectStoreClient`](super::ObjectStoreClient) reports
/// [`CopyStatus::Success`] whenever the copy call returns without error. On
/// Azure a large copy may still be completing in the background at that point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyOutcome {
    /// Inferred from the copy call, see the type docs
    pub copy_status: CopyStatus,
    pub error_code: Option<String>,
    /// Fully qualified source URL
    pub source: String,
    /// Destination blob name within the container
    pub destination: String,
}

/// Confirmation of a blob deletion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReceipt {
    /// Deleted blob name within the container
    pub blob: String,
    pub deleted_at: DateTime<Utc>,
    pub error_code: Option<String>,
}

/// Client for a single storage account
///
/// Every call is one round trip (or a short fixed sequence) to the storage
/// service. Implementations do not retry beyond what the underlying SDK does.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Account this client is bound to.
    fn account(&self) -> &str;

    /// Base URL of the account, e.g. `https://acct.blob.core.windows.net`.
    fn base_url(&self) -> &str;

    /// Fully qualified URL of a blob.
    fn blob_url(&self, container: &str, blob: &str) -> String {
        [self.base_url(), container, blob].join("/")
    }

    /// Download the full contents of a blob into memory.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the container or blob does not exist.
    async fn download(&self, container: &str, blob: &str) -> StorageResult<Bytes>;

    /// Upload `content` to a blob, overwriting whatever is there.
    async fn upload(&self, container: &str, blob: &str, content: Bytes)
        -> StorageResult<UploadReceipt>;

    /// Server-side copy from a fully qualified source URL to `destination`
    /// within `container`. The source blob is left untouched.
    async fn copy_from_url(
        &self,
        container: &str,
        source_url: &str,
        destination: &str,
    ) -> StorageResult<CopyOutcome>;

    /// Delete a blob.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the blob does not exist.
    async fn delete(&self, container: &str, blob: &str) -> StorageResult<DeleteReceipt>;

    /// Enumerate all containers of the account, requesting `page_size`
    /// entries per page and flattening the pages.
    async fn list_containers(&self, page_size: usize) -> StorageResult<Vec<ContainerItem>>;

    /// Flat (non-hierarchical) listing of every blob in a container.
    async fn list_blobs(&self, container: &str) -> StorageResult<Vec<BlobItem>>;
}

impl Debug for dyn StorageClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "StorageClient(account={}, base_url={})",
            self.account(),
            self.base_url()
        )
    }
}

/// Helper function to create an ObjectPath from a string
pub(crate) fn string_to_path(s: &str) -> ObjectPath {
    ObjectPath::from(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticClient;

    #[async_trait]
    impl StorageClient for StaticClient {
        fn account(&self) -> &str {
            "acct"
        }

        fn base_url(&self) -> &str {
            "https://acct.blob.core.windows.net"
        }

        async fn download(&self, _container: &str, _blob: &str) -> StorageResult<Bytes> {
            Ok(Bytes::new())
        }

        async fn upload(
            &self,
            _container: &str,
            _blob: &str,
            _content: Bytes,
        ) -> StorageResult<UploadReceipt> {
            Ok(UploadReceipt {
                request_id: None,
                e_tag: None,
                version: None,
            })
        }

        async fn copy_from_url(
            &self,
            _container: &str,
            source_url: &str,
            destination: &str,
        ) -> StorageResult<CopyOutcome> {
            Ok(CopyOutcome {
                copy_status: CopyStatus::Success,
                error_code: None,
                source: source_url.to_string(),
                destination: destination.to_string(),
            })
        }

        async fn delete(&self, _container: &str, blob: &str) -> StorageResult<DeleteReceipt> {
            Ok(DeleteReceipt {
                blob: blob.to_string(),
                deleted_at: Utc::now(),
                error_code: None,
            })
        }

        async fn list_containers(&self, _page_size: usize) -> StorageResult<Vec<ContainerItem>> {
            Ok(vec![])
        }

        async fn list_blobs(&self, _container: &str) -> StorageResult<Vec<BlobItem>> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_blob_url_joins_segments() {
        let client = StaticClient;
        assert_eq!(
            client.blob_url("c1", "archive/x.json"),
            "https://acct.blob.core.windows.net/c1/archive/x.json"
        );
    }

    #[test]
    fn test_storage_client_debug() {
        let client: &dyn StorageClient = &StaticClient;
        let debug_str = format!("{:?}", client);
        assert!(debug_str.contains("StorageClient"));
        assert!(debug_str.contains("account=acct"));
    }

    #[test]
    fn test_copy_status_serialization() {
        assert_eq!(
            serde_json::to_string(&CopyStatus::Success).unwrap(),
            "\"success\""
        );
        assert_eq!(
            serde_json::to_string(&CopyStatus::Pending).unwrap(),
            "\"pending\""
        );
    }

    #[test]
    fn test_copy_outcome_camel_case() {
        let outcome = CopyOutcome {
            copy_status: CopyStatus::Success,
            error_code: None,
            source: "https://acct.blob.core.windows.net/c1/x.json".to_string(),
            destination: "archive/x.json".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["copyStatus"], "success");
        assert!(json["errorCode"].is_null());
    }

    #[test]
    fn test_container_item_named() {
        let item = ContainerItem::named("c1");
        assert_eq!(item.name, "c1");
        assert!(item.last_modified.is_none());
        assert!(item.lease_status.is_none());
    }

    #[test]
    fn test_string_to_path_with_slashes() {
        let path_str = "archive/2024/x.json";
        assert_eq!(string_to_path(path_str).as_ref(), path_str);
    }
}
