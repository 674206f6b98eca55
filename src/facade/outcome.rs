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

//! Serializable `{data}` / `{err}` view of a facade result.

use serde::Serialize;

use super::error::{ErrorKind, FacadeError, FacadeResult, Rollback};

/// Error details carried by [`Outcome::Err`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Missing parameter name, for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    /// Orphaned destination of an incomplete move
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copied_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollback: Option<Rollback>,
}

impl From<&FacadeError> for ErrorInfo {
    fn from(err: &FacadeError) -> Self {
        let (copied_to, rollback) = match err {
            FacadeError::MoveIncomplete {
                copied_to,
                rollback,
                ..
            } => (Some(copied_to.clone()), Some(rollback.clone())),
            _ => (None, None),
        };

        Self {
            kind: err.kind(),
            message: err.to_string(),
            status_code: err.status_code(),
            error_code: err.error_code().map(str::to_string),
            field: err.missing_field().map(|f| f.name()),
            copied_to,
            rollback,
        }
    }
}

/// Exactly one of `data` or `err`
///
/// Serializes as `{"data": ...}` or `{"err": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome<T> {
    Data(T),
    Err(ErrorInfo),
}

impl<T> Outcome<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            Outcome::Data(data) => Some(data),
            Outcome::Err(_) => None,
        }
    }

    pub fn err(&self) -> Option<&ErrorInfo> {
        match self {
            Outcome::Data(_) => None,
            Outcome::Err(err) => Some(err),
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Outcome::Data(_))
    }
}

impl<T> From<FacadeResult<T>> for Outcome<T> {
    fn from(result: FacadeResult<T>) -> Self {
        match result {
            Ok(data) => Outcome::Data(data),
            Err(err) => Outcome::Err(ErrorInfo::from(&err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::request::Field;
    use crate::storage::StorageError;
    use serde_json::json;

    #[test]
    fn test_data_shape() {
        let outcome: Outcome<String> = Ok("{}".to_string()).into();

        assert!(outcome.is_data());
        assert!(outcome.err().is_none());
        assert_eq!(serde_json::to_value(&outcome).unwrap(), json!({"data": "{}"}));
    }

    #[test]
    fn test_validation_shape() {
        let outcome: Outcome<String> = Err(FacadeError::Missing(Field::Container)).into();

        assert!(outcome.data().is_none());
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"err": {
                "kind": "validation",
                "message": "Missing `container` parameter.",
                "field": "container"
            }})
        );
    }

    #[test]
    fn test_remote_shape_carries_status() {
        let err = StorageError::HttpError {
            status: 404,
            code: Some("ContainerNotFound".to_string()),
            message: "missing".to_string(),
        };
        let outcome: Outcome<Vec<String>> = Err(FacadeError::Remote(err)).into();

        let info = outcome.err().unwrap();
        assert_eq!(info.kind, ErrorKind::Remote);
        assert_eq!(info.status_code, Some(404));
        assert_eq!(info.error_code.as_deref(), Some("ContainerNotFound"));
        assert!(info.field.is_none());
    }

    #[test]
    fn test_partial_move_shape() {
        let outcome: Outcome<()> = Err(FacadeError::MoveIncomplete {
            copied_to: "archive/x.json".to_string(),
            source: StorageError::ConnectionError("reset".to_string()),
            rollback: Rollback::Completed,
        })
        .into();

        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["err"]["kind"], "partialMove");
        assert_eq!(value["err"]["copiedTo"], "archive/x.json");
        assert_eq!(value["err"]["rollback"]["state"], "completed");
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_tuple_data_serializes_as_pair() {
        let outcome: Outcome<(u8, &str)> = Ok((1, "two")).into();
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"data": [1, "two"]})
        );
    }
}
