//! Cache module for the version manifest
//!
//! `CacheManager` persists raw response bodies to the filesystem, one file per
//! key. `ManifestCache` sits on top of it and owns the refresh policy: the
//! manifest is re-fetched once it is older than the freshness window, and the
//! on-disk copy is served in between and whenever the upstream is unreachable.

mod manager;
mod manifest;

pub use manager::CacheManager;
pub use manifest::{CacheError, ManifestCache, FRESHNESS_WINDOW_SECS, MANIFEST_CACHE_KEY};
