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

//! Storage client layer
//!
//! This module wraps the object-storage SDK behind the [`StorageClient`]
//! trait. The production backend is Azure Blob Storage through the
//! `object_store` crate; local filesystem and in-memory backends share the
//! same code path and are used for development and tests.

pub mod client;
pub mod config;
pub(crate) mod containers;
pub mod error;
pub mod factory;
pub mod object_store;

// Public exports
pub use client::{
    BlobItem, ContainerItem, CopyOutcome, CopyStatus, DeleteReceipt, StorageClient,
    UploadReceipt,
};
pub use config::{StorageConfig, StorageType};
pub use error::{StorageError, StorageResult};
pub use factory::{ConfigConnector, StorageClientFactory, StorageConnector};
pub use self::object_store::ObjectStoreClient;
