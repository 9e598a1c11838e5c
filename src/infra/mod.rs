//! Observation store implementations.
//!
//! [`MemoryStore`] holds everything in memory and is what the CSV loader
//! produces. [`RemoteStore`] reads from an HTTP/JSON service, optionally
//! authenticating through the [`auth`](crate::fetch::auth) wrappers.

pub mod csv_store;
pub mod memory;
pub mod remote;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::fetch::BasicClient;
use crate::fetch::auth::{ApiKey, UrlParam};
use crate::services::observation_store::ObservationStore;

pub use memory::MemoryStore;
pub use remote::RemoteStore;

/// Where an API key for the remote store goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteAuth {
    None,
    /// `Authorization: Bearer <key>`
    Bearer(String),
    /// `?<param_name>=<key>` on every request
    UrlParam { param_name: String, key: String },
}

/// Loads a CSV file or directory into a shared in-memory store.
pub fn local_store(path: &Path) -> Result<Arc<dyn ObservationStore>> {
    Ok(Arc::new(csv_store::load_store(path)?))
}

/// Builds a remote store client for `base_url`.
pub fn remote_store(
    base_url: &str,
    auth: RemoteAuth,
    timeout: Duration,
) -> Result<Arc<dyn ObservationStore>> {
    let client = BasicClient::with_timeout(timeout)?;

    let store: Arc<dyn ObservationStore> = match auth {
        RemoteAuth::None => Arc::new(RemoteStore::new(base_url, client)?),
        RemoteAuth::Bearer(key) => {
            Arc::new(RemoteStore::new(base_url, ApiKey::bearer(client, &key)?)?)
        }
        RemoteAuth::UrlParam { param_name, key } => Arc::new(RemoteStore::new(
            base_url,
            UrlParam {
                inner: client,
                param_name,
                key,
            },
        )?),
    };

    Ok(store)
}
