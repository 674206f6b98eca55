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

use serde::Serialize;
use thiserror::Error;

use super::request::Field;
use crate::storage::StorageError;

/// What happened to the destination copy after a move failed to delete its source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state", content = "detail")]
pub enum Rollback {
    /// The copy was left in place
    NotAttempted,
    /// The copy was deleted again
    Completed,
    /// Deleting the copy failed too
    Failed(String),
}

/// Coarse classification of a facade failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Validation,
    Confirmation,
    Decode,
    Remote,
    PartialMove,
}

/// Errors returned by facade operations
#[derive(Error, Debug)]
pub enum FacadeError {
    /// A required parameter was missing or empty; nothing was sent
    #[error("{}", .0.missing_message())]
    Missing(Field),

    /// The service accepted an upload without returning a confirmation
    #[error(
        "Failed to confirm uploading of file, {filename} to blob storage. \
         No requestId was returned. Try again."
    )]
    Confirmation { filename: String },

    #[error("Blob {filename} is not valid UTF-8: {source}")]
    Decode {
        filename: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error(transparent)]
    Remote(#[from] StorageError),

    /// The copy step of a move succeeded but deleting the source failed
    #[error("Copied to {copied_to} but failed to delete the original: {source}")]
    MoveIncomplete {
        copied_to: String,
        #[source]
        source: StorageError,
        rollback: Rollback,
    },
}

impl FacadeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FacadeError::Missing(_) => ErrorKind::Validation,
            FacadeError::Confirmation { .. } => ErrorKind::Confirmation,
            FacadeError::Decode { .. } => ErrorKind::Decode,
            FacadeError::Remote(_) => ErrorKind::Remote,
            FacadeError::MoveIncomplete { .. } => ErrorKind::PartialMove,
        }
    }

    /// Status code reported by the storage service, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FacadeError::Remote(err) | FacadeError::MoveIncomplete { source: err, .. } => {
                err.status_code()
            }
            _ => None,
        }
    }

    /// Service error code such as `ContainerNotFound`, if any.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            FacadeError::Remote(err) | FacadeError::MoveIncomplete { source: err, .. } => {
                err.error_code()
            }
            _ => None,
        }
    }

    /// The missing parameter, for validation failures.
    pub fn missing_field(&self) -> Option<Field> {
        match self {
            FacadeError::Missing(field) => Some(*field),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

/// Result type for facade operations
pub type FacadeResult<T> = Result<T, FacadeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_uses_fixed_message() {
        let err = FacadeError::Missing(Field::Account);
        assert_eq!(err.to_string(), "Missing `account` parameter.");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.missing_field(), Some(Field::Account));
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_confirmation_message() {
        let err = FacadeError::Confirmation {
            filename: "pkg.json".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to confirm uploading of file, pkg.json to blob storage. \
             No requestId was returned. Try again."
        );
        assert_eq!(err.kind(), ErrorKind::Confirmation);
    }

    #[test]
    fn test_remote_is_transparent() {
        let err: FacadeError = StorageError::HttpError {
            status: 404,
            code: Some("BlobNotFound".to_string()),
            message: "The specified blob does not exist.".to_string(),
        }
        .into();

        assert_eq!(err.kind(), ErrorKind::Remote);
        assert!(err.is_not_found());
        assert_eq!(err.error_code(), Some("BlobNotFound"));
        assert!(err.to_string().starts_with("Storage service returned status=404"));
    }

    #[test]
    fn test_move_incomplete_reports_delete_status() {
        let err = FacadeError::MoveIncomplete {
            copied_to: "archive/x.json".to_string(),
            source: StorageError::HttpError {
                status: 403,
                code: Some("AuthorizationPermissionMismatch".to_string()),
                message: "denied".to_string(),
            },
            rollback: Rollback::NotAttempted,
        };

        assert_eq!(err.kind(), ErrorKind::PartialMove);
        assert_eq!(err.status_code(), Some(403));
        assert!(err.to_string().contains("archive/x.json"));
    }

    #[test]
    fn test_rollback_serialization() {
        assert_eq!(
            serde_json::to_value(Rollback::Completed).unwrap(),
            serde_json::json!({"state": "completed"})
        );
        assert_eq!(
            serde_json::to_value(Rollback::Failed("boom".to_string())).unwrap(),
            serde_json::json!({"state": "failed", "detail": "boom"})
        );
    }
}
