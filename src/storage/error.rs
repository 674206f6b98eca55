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

use thiserror::Error;

/// Errors raised by the storage client layer
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Object store error: {0}")]
    ObjectStoreError(#[from] object_store::Error),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("Storage service returned status={status}, code={}: {message}", .code.as_deref().unwrap_or("none"))]
    HttpError {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Unexpected response from storage service: {0}")]
    ResponseError(String),

    #[error("Invalid copy source '{0}'")]
    InvalidSource(String),
}

impl StorageError {
    /// HTTP-like status code for the failure, when one can be attributed.
    ///
    /// The object_store SDK folds HTTP responses into typed variants, so those
    /// are mapped back to the status the service would have answered with.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            StorageError::HttpError { status, .. } => Some(*status),
            StorageError::ObjectStoreError(err) => match err {
                object_store::Error::NotFound { .. } => Some(404),
                object_store::Error::AlreadyExists { .. } => Some(409),
                object_store::Error::Precondition { .. } => Some(412),
                object_store::Error::NotModified { .. } => Some(304),
                object_store::Error::PermissionDenied { .. } => Some(403),
                object_store::Error::Unauthenticated { .. } => Some(401),
                _ => None,
            },
            StorageError::IoError(err) => match err.kind() {
                std::io::ErrorKind::NotFound => Some(404),
                std::io::ErrorKind::PermissionDenied => Some(403),
                _ => None,
            },
            _ => None,
        }
    }

    /// Whether the addressed blob or container does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Service error code (e.g. `ContainerNotFound`), if the service sent one.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            StorageError::HttpError { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
