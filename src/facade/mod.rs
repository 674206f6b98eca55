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

//! Blob facade
//!
//! One method per use case. Each validates its request before touching the
//! network, delegates to a [`StorageClient`](crate::storage::StorageClient)
//! and returns a [`FacadeResult`]. Nothing is retried here and nothing
//! panics: validation and remote failures both come back as `Err`.
//!
//! Copy and move stay within one container: the blob `filename` is copied to
//! `destination/filename` server-side. A move is a copy followed by a delete
//! of the source. If that delete fails the copy is *not* undone unless the
//! facade was built with [`BlobFacadeBuilder::with_rollback_on_move_failure`],
//! and the error reports where the orphaned copy lives.

pub mod error;
pub mod outcome;
pub mod request;

use std::sync::Arc;

use tracing::{info, warn};

use crate::storage::{
    BlobItem, ConfigConnector, ContainerItem, CopyOutcome, DeleteReceipt, StorageClient,
    StorageConfig, StorageConnector,
};
use error::{FacadeError, FacadeResult, Rollback};
use request::{
    join_blob_path, BlobRequest, LOCATE_BLOB, LOCATE_CONTAINER, RELOCATE_BLOB, WRITE_BLOB,
};

/// Copy result followed by the delete result of the source
pub type MoveOutcome = (CopyOutcome, DeleteReceipt);

/// Builder for [`BlobFacade`]
pub struct BlobFacadeBuilder {
    config: StorageConfig,
    connector: Option<Arc<dyn StorageConnector>>,
    rollback_on_move_failure: bool,
}

impl BlobFacadeBuilder {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            connector: None,
            rollback_on_move_failure: false,
        }
    }

    /// Use a custom connector instead of one built from the configuration.
    pub fn with_connector(mut self, connector: Arc<dyn StorageConnector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Delete the copy again when a move fails to delete its source.
    pub fn with_rollback_on_move_failure(mut self, enabled: bool) -> Self {
        self.rollback_on_move_failure = enabled;
        self
    }

    pub fn build(self) -> BlobFacade {
        let default_page_size = self.config.default_page_size();
        let connector = self
            .connector
            .unwrap_or_else(|| Arc::new(ConfigConnector::new(self.config)));

        BlobFacade {
            connector,
            default_page_size,
            rollback_on_move_failure: self.rollback_on_move_failure,
        }
    }
}

/// Read, write, copy, move, delete and list blobs of any account
pub struct BlobFacade {
    connector: Arc<dyn StorageConnector>,
    default_page_size: usize,
    rollback_on_move_failure: bool,
}

impl BlobFacade {
    /// Facade over a custom connector with the default page size.
    pub fn new(connector: Arc<dyn StorageConnector>) -> Self {
        Self {
            connector,
            default_page_size: crate::storage::config::DEFAULT_PAGE_SIZE,
            rollback_on_move_failure: false,
        }
    }

    pub fn builder(config: StorageConfig) -> BlobFacadeBuilder {
        BlobFacadeBuilder::new(config)
    }

    pub fn from_config(config: StorageConfig) -> Self {
        BlobFacadeBuilder::new(config).build()
    }

    async fn client(&self, request: &BlobRequest) -> FacadeResult<Arc<dyn StorageClient>> {
        Ok(self.connector.connect(&request.account).await?)
    }

    /// Read a blob as UTF-8 text.
    ///
    /// The whole blob is buffered in memory before it is decoded.
    ///
    /// Requires `account`, `container` and `filename`.
    pub async fn read(&self, request: &BlobRequest) -> FacadeResult<String> {
        request.require(LOCATE_BLOB)?;
        let client = self.client(request).await?;

        let bytes = client
            .download(&request.container, &request.filename)
            .await?;
        String::from_utf8(bytes.to_vec()).map_err(|source| FacadeError::Decode {
            filename: request.filename.clone(),
            source,
        })
    }

    /// Upload `content` as the blob `filename`, replacing any existing blob.
    ///
    /// Requires `account`, `container`, `filename` and `content`.
    ///
    /// # Returns
    ///
    /// The confirmation identifier issued by the service. An upload the
    /// service accepted without issuing one is reported as
    /// [`FacadeError::Confirmation`].
    pub async fn write(&self, request: &BlobRequest) -> FacadeResult<String> {
        request.require(WRITE_BLOB)?;
        let client = self.client(request).await?;

        let receipt = client
            .upload(
                &request.container,
                &request.filename,
                request.content.clone().into(),
            )
            .await?;

        match receipt.request_id.filter(|id| !id.is_empty()) {
            Some(id) => {
                info!(
                    "Wrote blob={} container={} account={} size={}",
                    request.filename,
                    request.container,
                    request.account,
                    request.content.len()
                );
                Ok(id)
            }
            None => {
                warn!(
                    "Upload of blob={} container={} returned no confirmation",
                    request.filename, request.container
                );
                Err(FacadeError::Confirmation {
                    filename: request.filename.clone(),
                })
            }
        }
    }

    /// Copy `filename` to `destination/filename` in the same container.
    ///
    /// Requires `account`, `container`, `filename` and `destination`.
    pub async fn copy(&self, request: &BlobRequest) -> FacadeResult<CopyOutcome> {
        request.require(RELOCATE_BLOB)?;
        let client = self.client(request).await?;
        Self::copy_with(client.as_ref(), request).await
    }

    async fn copy_with(
        client: &dyn StorageClient,
        request: &BlobRequest,
    ) -> FacadeResult<CopyOutcome> {
        let destination = join_blob_path(request.destination_folder(), &request.filename);
        let source = client.blob_url(&request.container, &request.filename);

        let outcome = client
            .copy_from_url(&request.container, &source, &destination)
            .await?;
        info!(
            "Copied blob={} to destination={} container={} account={}",
            request.filename, destination, request.container, request.account
        );
        Ok(outcome)
    }

    /// Move `filename` to `destination/filename` in the same container.
    ///
    /// Requires `account`, `container`, `filename` and `destination`.
    ///
    /// # Errors
    ///
    /// If the copy succeeds but deleting the source fails, the result is
    /// [`FacadeError::MoveIncomplete`]; both blobs then exist unless rollback
    /// was enabled and succeeded.
    pub async fn move_blob(&self, request: &BlobRequest) -> FacadeResult<MoveOutcome> {
        request.require(RELOCATE_BLOB)?;
        let client = self.client(request).await?;

        let copied = Self::copy_with(client.as_ref(), request).await?;

        match client.delete(&request.container, &request.filename).await {
            Ok(deleted) => {
                info!(
                    "Moved blob={} to destination={} container={} account={}",
                    request.filename, copied.destination, request.container, request.account
                );
                Ok((copied, deleted))
            }
            Err(source) => {
                warn!(
                    "Move of blob={} copied to destination={} but delete failed: {}",
                    request.filename, copied.destination, source
                );
                let rollback = if self.rollback_on_move_failure {
                    match client.delete(&request.container, &copied.destination).await {
                        Ok(_) => Rollback::Completed,
                        Err(e) => {
                            warn!(
                                "Rollback of destination={} failed: {}",
                                copied.destination, e
                            );
                            Rollback::Failed(e.to_string())
                        }
                    }
                } else {
                    Rollback::NotAttempted
                };

                Err(FacadeError::MoveIncomplete {
                    copied_to: copied.destination,
                    source,
                    rollback,
                })
            }
        }
    }

    /// Delete the blob `filename`.
    ///
    /// Requires `account`, `container` and `filename`.
    pub async fn delete(&self, request: &BlobRequest) -> FacadeResult<DeleteReceipt> {
        request.require(LOCATE_BLOB)?;
        let client = self.client(request).await?;

        let receipt = client.delete(&request.container, &request.filename).await?;
        info!(
            "Deleted blob={} container={} account={}",
            request.filename, request.container, request.account
        );
        Ok(receipt)
    }

    /// List every container of the account, `max_page_size` per page.
    ///
    /// Requires `account` and `container`.
    pub async fn list_containers(&self, request: &BlobRequest) -> FacadeResult<Vec<ContainerItem>> {
        request.require(LOCATE_CONTAINER)?;
        let client = self.client(request).await?;

        let page_size = request
            .max_page_size
            .filter(|n| *n > 0)
            .unwrap_or(self.default_page_size);
        Ok(client.list_containers(page_size).await?)
    }

    /// List every blob in the container with its metadata.
    ///
    /// Requires `account` and `container`.
    pub async fn list_files(&self, request: &BlobRequest) -> FacadeResult<Vec<BlobItem>> {
        request.require(LOCATE_CONTAINER)?;
        let client = self.client(request).await?;
        Ok(client.list_blobs(&request.container).await?)
    }

    /// List the names of every blob in the container.
    ///
    /// Requires `account` and `container`.
    pub async fn list_files_by_name(&self, request: &BlobRequest) -> FacadeResult<Vec<String>> {
        let blobs = self.list_files(request).await?;
        Ok(blobs.into_iter().map(|blob| blob.name).collect())
    }
}
