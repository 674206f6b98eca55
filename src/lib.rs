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

//! # Blob Facade
//!
//! A thin, uniform facade over Azure Blob Storage: read, write, copy, move,
//! delete and list blobs of any storage account by name.
//!
//! Every operation takes a [`BlobRequest`], checks the parameters it needs
//! before any network traffic, and returns a [`FacadeResult`]. Callers that
//! want the `{"data": ..}` / `{"err": ..}` shape convert it into an
//! [`Outcome`].
//!
//! ## Features
//!
//! - **Azure Blob Storage** through `object_store`, with access keys, SAS
//!   tokens or ambient identity (environment, managed identity, workload identity)
//! - **Local filesystem and in-memory backends** sharing the same code path
//! - **Container listing** paged by marker and flattened
//! - **Structured errors** carrying the remote status code (404, 403, ...)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use blob_facade::{BlobFacade, BlobRequest, Outcome, StorageConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! // Credentials are resolved from the environment when no key is configured
//! let facade = BlobFacade::from_config(StorageConfig::azure());
//!
//! let request = BlobRequest::blob("mystorageaccount", "packages", "pkg.json")
//!     .with_content("{\"name\":\"pkg\"}");
//! let request_id = facade.write(&request).await?;
//! println!("uploaded, request id {}", request_id);
//!
//! // Move it under archive/ in the same container
//! let moved = facade.move_blob(&request.clone().with_destination("archive")).await;
//! println!("{}", serde_json::to_string(&Outcome::from(moved))?);
//! # Ok(())
//! # }
//! ```
//!
//! ### Local Filesystem Example
//!
//! Each sub-directory of `path` is a container.
//!
//! ```rust,no_run
//! use blob_facade::{BlobFacade, BlobRequest, StorageConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let config = StorageConfig::local().with_option("path", "./data");
//! let facade = BlobFacade::from_config(config);
//!
//! let request = BlobRequest::default()
//!     .with_account("local")
//!     .with_container("packages");
//! for name in facade.list_files_by_name(&request).await? {
//!     println!("{}", name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Azure with an access key
//!
//! ```rust,no_run
//! use blob_facade::{BlobFacade, BlobRequest, StorageConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let config = StorageConfig::azure()
//!     .with_option("access_key", "base64-key")
//!     .with_option("max_page_size", "50");
//! let facade = BlobFacade::builder(config)
//!     .with_rollback_on_move_failure(true)
//!     .build();
//!
//! let request = BlobRequest::default()
//!     .with_account("mystorageaccount")
//!     .with_container("packages");
//! let containers = facade.list_containers(&request).await?;
//! println!("{} containers", containers.len());
//! # Ok(())
//! # }
//! ```

pub mod facade;
pub mod storage;

// Re-export commonly used types
pub use facade::error::{FacadeError, FacadeResult, Rollback};
pub use facade::outcome::{ErrorInfo, Outcome};
pub use facade::request::{BlobRequest, Field};
pub use facade::{BlobFacade, BlobFacadeBuilder, MoveOutcome};
pub use storage::{
    BlobItem, ContainerItem, CopyOutcome, CopyStatus, DeleteReceipt, StorageConfig, StorageError,
};
