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

use std::env;
use std::error::Error;
use std::time::SystemTime;
use tracing::info;

use blob_facade::{BlobFacade, BlobRequest, Outcome, StorageConfig};

/// Storage backend used by the smoke run: `azure` (default), `local` or `memory`.
const STORAGE_TYPE_VAR: &str = "BLOB_FACADE_STORAGE";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting Blob Facade smoke run");

    let account = env::var("BLOB_SERVICE_ACCOUNT_NAME").unwrap_or_default();
    let container = env::var("AZURE_STORAGE_CONTAINER").unwrap_or_default();
    let storage_type = env::var(STORAGE_TYPE_VAR).unwrap_or_else(|_| "azure".to_string());

    let mut storage_config = match storage_type.as_str() {
        "local" | "file" => StorageConfig::local(),
        "memory" => StorageConfig::memory(),
        _ => StorageConfig::azure(),
    };
    for (var, key) in [
        ("AZURE_STORAGE_ACCESS_KEY", "access_key"),
        ("AZURE_STORAGE_SAS_TOKEN", "sas_token"),
        ("AZURE_STORAGE_ENDPOINT", "endpoint"),
        ("BLOB_FACADE_PATH", "path"),
    ] {
        if let Ok(value) = env::var(var) {
            storage_config = storage_config.with_option(key, value);
        }
    }

    let start = SystemTime::now();
    let facade = BlobFacade::from_config(storage_config);
    let request = BlobRequest::default()
        .with_account(account)
        .with_container(container);

    let containers = Outcome::from(facade.list_containers(&request).await);
    println!("{}", serde_json::to_string_pretty(&containers)?);

    let names = Outcome::from(facade.list_files_by_name(&request).await);
    println!("{}", serde_json::to_string_pretty(&names)?);

    info!("Smoke run finished in {}ms", start.elapsed()?.as_millis());

    Ok(())
}
