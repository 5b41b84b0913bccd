//! Platform abstraction layer
//!
//! Browser-facing pieces that do not touch the simulation directly:
//! - Input latch fed by key and pointer events
//! - Offline asset cache manifest for the service worker shell

pub mod asset_cache;
pub mod input;

pub use asset_cache::{AssetManifest, FetchRoute};
pub use input::{InputLatch, Key};
