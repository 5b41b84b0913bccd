//! Offline asset cache
//!
//! The service worker shell asks this manifest which assets to pre-cache on
//! install, where each fetch should be served from, and which caches to purge
//! on activate. The worker itself only performs the Cache API calls.

use serde::{Deserialize, Serialize};

pub const CACHE_NAME: &str = "tank-arena-cache";
const INDEX: &str = "index.html";

/// Where a fetch should be answered from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FetchRoute {
    Cache,
    Network,
}

/// Control messages posted to the worker
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum WorkerMessage {
    SkipWaiting,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetManifest {
    pub cache_name: String,
    pub assets: Vec<String>,
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self {
            cache_name: CACHE_NAME.to_string(),
            assets: [INDEX, "style.css", "tank_arena.js", "tank_arena_bg.wasm", "logo.png"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Strip origin-relative prefixes and map the site root to the index page
fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = path.trim_start_matches("./").trim_start_matches('/');
    if path.is_empty() { INDEX } else { path }
}

impl AssetManifest {
    pub fn contains(&self, path: &str) -> bool {
        let path = normalize(path);
        self.assets.iter().any(|a| a == path)
    }

    /// Serve bundled assets from the cache, everything else from the network
    pub fn route(&self, path: &str) -> FetchRoute {
        if self.contains(path) {
            FetchRoute::Cache
        } else {
            FetchRoute::Network
        }
    }

    /// Caches left behind by earlier versions of the shell
    pub fn stale_caches<'a>(&self, existing: &'a [String]) -> Vec<&'a str> {
        existing
            .iter()
            .filter(|name| **name != self.cache_name)
            .map(String::as_str)
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl WorkerMessage {
    /// Parse a posted message; unknown actions are ignored
    pub fn parse(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(msg) => Some(msg),
            Err(e) => {
                log::debug!("Ignoring worker message: {}", e);
                None
            }
        }
    }
}
