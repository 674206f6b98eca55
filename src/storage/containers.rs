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

//! Account-level container enumeration for Azure Blob Storage.
//!
//! object_store binds a client to a single container, so listing the
//! containers of an account goes straight to the Blob service REST API
//! (`GET /?comp=list`). Pages are requested with `maxresults` and chained with
//! the `NextMarker` continuation token.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use object_store::azure::{AzureCredential, AzureCredentialProvider};
use serde::Deserialize;
use sha2::Sha256;
use tracing::{debug, info};
use url::Url;

use super::client::ContainerItem;
use super::config::StorageConfig;
use super::error::{StorageError, StorageResult};

/// REST API version sent with every request.
pub(crate) const AZURE_API_VERSION: &str = "2023-11-03";

/// How container listing requests are authorized
pub(crate) enum ListAuth {
    /// Shared Key signing with the decoded account key
    SharedKey { key: Vec<u8> },
    /// SAS query parameters appended to every request
    Sas { pairs: Vec<(String, String)> },
    /// Token (or key/SAS) resolved by the SDK credential chain
    Ambient { credentials: AzureCredentialProvider },
}

impl ListAuth {
    /// Pick the authorization scheme from configuration, falling back to the
    /// SDK's credential provider.
    ///
    /// `sdk_access_key` is the account key the SDK builder resolved, which
    /// covers keys that only come from the environment.
    pub(crate) fn from_config(
        config: &StorageConfig,
        sdk_access_key: Option<String>,
        credentials: AzureCredentialProvider,
    ) -> StorageResult<Self> {
        let access_key = config.access_key().cloned().or(sdk_access_key);
        if let Some(key) = access_key {
            let key = BASE64_STANDARD.decode(key).map_err(|e| {
                StorageError::ConfigError(format!("Invalid 'access_key' (not valid base64): {}", e))
            })?;
            return Ok(ListAuth::SharedKey { key });
        }
        if let Some(token) = config.get_option("sas_token") {
            return Ok(ListAuth::Sas {
                pairs: parse_sas_token(token),
            });
        }
        Ok(ListAuth::Ambient { credentials })
    }
}

/// Split a SAS token (`?sv=...&sig=...`) into query pairs.
pub(crate) fn parse_sas_token(token: &str) -> Vec<(String, String)> {
    token
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(k), Some(v)) if !k.is_empty() => Some((k.to_string(), v.to_string())),
                _ => None,
            }
        })
        .collect()
}

/// Pages through the containers of one account
pub(crate) struct ContainerLister {
    http: reqwest::Client,
    account: String,
    base_url: String,
    auth: ListAuth,
}

/// One page of a List Containers response
#[derive(Debug, Default)]
pub(crate) struct ContainerPage {
    pub containers: Vec<ContainerItem>,
    pub next_marker: Option<String>,
}

impl ContainerLister {
    pub(crate) fn new(
        account: impl Into<String>,
        base_url: impl Into<String>,
        auth: ListAuth,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            account: account.into(),
            base_url: base_url.into(),
            auth,
        }
    }

    /// Request every page and flatten the results.
    pub(crate) async fn list_all(&self, page_size: usize) -> StorageResult<Vec<ContainerItem>> {
        let mut containers = Vec::new();
        let mut marker: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self.list_page(page_size, marker.as_deref()).await?;
            pages += 1;
            debug!(
                "Listed container page={} count={} account={}",
                pages,
                page.containers.len(),
                self.account
            );
            containers.extend(page.containers);

            match page.next_marker {
                Some(next) => marker = Some(next),
                None => break,
            }
        }

        info!(
            "Listed count={} containers in pages={} account={}",
            containers.len(),
            pages,
            self.account
        );
        Ok(containers)
    }

    async fn list_page(
        &self,
        page_size: usize,
        marker: Option<&str>,
    ) -> StorageResult<ContainerPage> {
        let mut query = vec![
            ("comp".to_string(), "list".to_string()),
            ("maxresults".to_string(), page_size.to_string()),
        ];
        if let Some(m) = marker {
            query.push(("marker".to_string(), m.to_string()));
        }

        let mut url = Url::parse(&format!("{}/", self.base_url.trim_end_matches('/')))?;
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        let date = rfc1123_date(Utc::now());
        let mut authorization: Option<String> = None;

        match &self.auth {
            ListAuth::SharedKey { key } => {
                let resource = canonicalized_resource(&self.account, &url, &query);
                authorization = Some(sign_shared_key(&self.account, key, &date, &resource)?);
            }
            ListAuth::Sas { pairs } => {
                url.query_pairs_mut()
                    .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            }
            ListAuth::Ambient { credentials } => {
                let credential = credentials.get_credential().await?;
                match credential.as_ref() {
                    AzureCredential::BearerToken(token) => {
                        authorization = Some(format!("Bearer {}", token));
                    }
                    AzureCredential::SASToken(pairs) => {
                        url.query_pairs_mut()
                            .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
                    }
                    AzureCredential::AccessKey(_) => {
                        return Err(StorageError::ConfigError(
                            "Credential provider returned an account key that was not \
                             resolved for Shared Key signing"
                                .to_string(),
                        ));
                    }
                }
            }
        }

        let mut request = self
            .http
            .get(url.as_str())
            .header("x-ms-date", &date)
            .header("x-ms-version", AZURE_API_VERSION);
        if let Some(value) = authorization {
            request = request.header("Authorization", value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StorageError::ConnectionError(format!("List containers failed: {}", e)))?;

        let status = response.status();
        let code = response
            .headers()
            .get("x-ms-error-code")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| StorageError::ConnectionError(format!("List containers failed: {}", e)))?;

        if !status.is_success() {
            return Err(StorageError::HttpError {
                status: status.as_u16(),
                code,
                message: body,
            });
        }

        parse_page(&body)
    }
}

/// Format a timestamp for the `x-ms-date` header.
pub(crate) fn rfc1123_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// `/{account}{path}` followed by the sorted, lower-cased query parameters.
pub(crate) fn canonicalized_resource(
    account: &str,
    url: &Url,
    query: &[(String, String)],
) -> String {
    let mut resource = format!("/{}{}", account, url.path());
    let mut sorted = query.to_vec();
    sorted.sort_by(|a, b| a.0.to_lowercase().cmp(&b.0.to_lowercase()));
    for (k, v) in &sorted {
        resource.push_str(&format!("\n{}:{}", k.to_lowercase(), v));
    }
    resource
}

/// Shared Key signature for a body-less GET.
pub(crate) fn sign_shared_key(
    account: &str,
    key: &[u8],
    date: &str,
    canonicalized_resource: &str,
) -> StorageResult<String> {
    let ms_headers = format!("x-ms-date:{}\nx-ms-version:{}", date, AZURE_API_VERSION);
    let string_to_sign = format!(
        "GET\n\n\n\n\n\n\n\n\n\n\n\n{}\n{}",
        ms_headers, canonicalized_resource
    );

    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| StorageError::ConfigError(format!("HMAC key error: {}", e)))?;
    mac.update(string_to_sign.as_bytes());
    let signature = BASE64_STANDARD.encode(mac.finalize().into_bytes());

    Ok(format!("SharedKey {}:{}", account, signature))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct EnumerationResults {
    #[serde(default)]
    containers: Option<ContainersXml>,
    #[serde(default)]
    next_marker: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ContainersXml {
    #[serde(rename = "Container", default)]
    items: Vec<ContainerXml>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ContainerXml {
    name: String,
    #[serde(default)]
    properties: Option<PropertiesXml>,
}

#[derive(Debug, Default, Deserialize)]
struct PropertiesXml {
    #[serde(rename = "Last-Modified", default)]
    last_modified: Option<String>,
    #[serde(rename = "Etag", default)]
    etag: Option<String>,
    #[serde(rename = "LeaseStatus", default)]
    lease_status: Option<String>,
    #[serde(rename = "PublicAccess", default)]
    public_access: Option<String>,
}

pub(crate) fn parse_page(xml: &str) -> StorageResult<ContainerPage> {
    let parsed: EnumerationResults = quick_xml::de::from_str(xml).map_err(|e| {
        StorageError::ResponseError(format!("Failed to parse container listing: {}", e))
    })?;

    let containers = parsed
        .containers
        .map(|c| c.items)
        .unwrap_or_default()
        .into_iter()
        .map(|c| {
            let props = c.properties.unwrap_or_default();
            ContainerItem {
                name: c.name,
                last_modified: props
                    .last_modified
                    .as_deref()
                    .and_then(|s| DateTime::parse_from_rfc2822(s).ok())
                    .map(|dt| dt.with_timezone(&Utc)),
                e_tag: props.etag,
                lease_status: props.lease_status,
                public_access: props.public_access,
            }
        })
        .collect();

    Ok(ContainerPage {
        containers,
        next_marker: parsed.next_marker.filter(|m| !m.is_empty()),
    })
}
