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
use std::fmt::{Display, Formatter, Result as FmtResult};

use super::error::FacadeError;

/// A named request parameter that can be missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Account,
    Container,
    Filename,
    Content,
    Destination,
}

impl Field {
    /// Parameter name as callers spell it.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Account => "account",
            Field::Container => "container",
            Field::Filename => "filename",
            Field::Content => "content",
            Field::Destination => "destination",
        }
    }

    /// Fixed message reported when the parameter is missing.
    pub fn missing_message(&self) -> &'static str {
        match self {
            Field::Account => "Missing `account` parameter.",
            Field::Container => "Missing `container` parameter.",
            Field::Filename => "Missing `filename` parameter",
            Field::Content => "Missing `content` parameter.",
            Field::Destination => "Missing `destination` parameter.",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

// Required fields per operation, in validation order.
pub(crate) const LOCATE_CONTAINER: &[Field] = &[Field::Account, Field::Container];
pub(crate) const LOCATE_BLOB: &[Field] = &[Field::Account, Field::Container, Field::Filename];
pub(crate) const WRITE_BLOB: &[Field] = &[
    Field::Account,
    Field::Container,
    Field::Filename,
    Field::Content,
];
pub(crate) const RELOCATE_BLOB: &[Field] = &[
    Field::Account,
    Field::Container,
    Field::Filename,
    Field::Destination,
];

/// Parameters of a facade call
///
/// Every field defaults to empty, and an empty field counts as missing. Which
/// fields are required depends on the operation.
///
/// ```
/// use blob_facade::BlobRequest;
///
/// let request = BlobRequest::default()
///     .with_account("acct")
///     .with_container("c1")
///     .with_filename("x.json")
///     .with_content("{}");
/// assert_eq!(request.filename, "x.json");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlobRequest {
    /// Storage account name
    pub account: String,
    /// Container within the account
    pub container: String,
    /// Blob name within the container, may contain `/`
    pub filename: String,
    /// UTF-8 text to upload (write only)
    pub content: String,
    /// Folder within the same container (copy and move only)
    pub destination: String,
    /// Containers requested per listing page; falls back to the facade default (20)
    pub max_page_size: Option<usize>,
}

impl BlobRequest {
    /// Request addressing a blob.
    pub fn blob(
        account: impl Into<String>,
        container: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self::default()
            .with_account(account)
            .with_container(container)
            .with_filename(filename)
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = account.into();
        self
    }

    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = container.into();
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = destination.into();
        self
    }

    pub fn with_max_page_size(mut self, max_page_size: usize) -> Self {
        self.max_page_size = Some(max_page_size);
        self
    }

    /// Destination folder without surrounding separators.
    pub fn destination_folder(&self) -> &str {
        self.destination.trim_matches('/')
    }

    fn value(&self, field: Field) -> &str {
        match field {
            Field::Account => &self.account,
            Field::Container => &self.container,
            Field::Filename => &self.filename,
            Field::Content => &self.content,
            Field::Destination => self.destination_folder(),
        }
    }

    /// Check `fields` in order; the first missing one is reported.
    pub(crate) fn require(&self, fields: &[Field]) -> Result<(), FacadeError> {
        match fields.iter().find(|f| self.value(**f).is_empty()) {
            Some(field) => Err(FacadeError::Missing(*field)),
            None => Ok(()),
        }
    }
}

/// Blob name of `filename` inside `folder`.
pub(crate) fn join_blob_path(folder: &str, filename: &str) -> String {
    [folder.trim_matches('/'), filename].join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing(request: &BlobRequest, fields: &[Field]) -> Option<Field> {
        match request.require(fields) {
            Err(FacadeError::Missing(field)) => Some(field),
            Err(other) => panic!("unexpected error {:?}", other),
            Ok(()) => None,
        }
    }

    #[test]
    fn test_missing_messages() {
        assert_eq!(Field::Account.missing_message(), "Missing `account` parameter.");
        assert_eq!(
            Field::Container.missing_message(),
            "Missing `container` parameter."
        );
        assert_eq!(Field::Filename.missing_message(), "Missing `filename` parameter");
        assert_eq!(Field::Content.missing_message(), "Missing `content` parameter.");
        assert_eq!(
            Field::Destination.missing_message(),
            "Missing `destination` parameter."
        );
    }

    #[test]
    fn test_first_missing_field_wins() {
        let request = BlobRequest::default();
        assert_eq!(missing(&request, WRITE_BLOB), Some(Field::Account));

        let request = request.with_account("acct");
        assert_eq!(missing(&request, WRITE_BLOB), Some(Field::Container));

        let request = request.with_container("c1");
        assert_eq!(missing(&request, WRITE_BLOB), Some(Field::Filename));

        let request = request.with_filename("x.json");
        assert_eq!(missing(&request, WRITE_BLOB), Some(Field::Content));
        assert_eq!(missing(&request, RELOCATE_BLOB), Some(Field::Destination));
        assert_eq!(missing(&request, LOCATE_BLOB), None);
    }

    #[test]
    fn test_listing_needs_only_account_and_container() {
        let request = BlobRequest::default().with_account("acct").with_container("c1");
        assert_eq!(missing(&request, LOCATE_CONTAINER), None);
    }

    #[test]
    fn test_separator_only_destination_is_missing() {
        let request = BlobRequest::blob("acct", "c1", "x.json").with_destination("//");
        assert_eq!(missing(&request, RELOCATE_BLOB), Some(Field::Destination));
    }

    #[test]
    fn test_destination_folder_trims_separators() {
        let request = BlobRequest::blob("acct", "c1", "x.json").with_destination("/archive/");
        assert_eq!(request.destination_folder(), "archive");
        assert_eq!(missing(&request, RELOCATE_BLOB), None);
    }

    #[test]
    fn test_join_blob_path() {
        assert_eq!(join_blob_path("archive", "x.json"), "archive/x.json");
        assert_eq!(join_blob_path("/archive/2024/", "x.json"), "archive/2024/x.json");
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let request: BlobRequest =
            serde_json::from_str(r#"{"account":"acct","container":"c1","maxPageSize":5}"#)
                .unwrap();

        assert_eq!(request.account, "acct");
        assert_eq!(request.container, "c1");
        assert!(request.filename.is_empty());
        assert_eq!(request.max_page_size, Some(5));
    }

    #[test]
    fn test_field_display() {
        assert_eq!(Field::Destination.to_string(), "destination");
    }
}
