//! Refresh policy for the version manifest
//!
//! The manifest is fetched when the cache has never been filled or when the
//! last refresh is older than the freshness window. Between refreshes the body
//! is served from the on-disk copy, or from the last parsed copy kept in
//! memory when the file is unusable. The id → release time map and the
//! in-memory manifest are replaced in one swap after a fetched body has been
//! fully parsed, so a failed refresh leaves the previous state intact.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::CacheManager;
use crate::clock::Clock;
use crate::data::{FetchError, Manifest, ManifestError, ManifestSource};

/// Cache key for the manifest body
pub const MANIFEST_CACHE_KEY: &str = "version_manifest_v2";

/// How long a fetched manifest is trusted (1 hour)
pub const FRESHNESS_WINDOW_SECS: i64 = 60 * 60;

/// Errors that can occur when obtaining the manifest
#[derive(Debug, Error)]
pub enum CacheError {
    /// The fetch failed and there is no usable copy on disk
    #[error("Version manifest unavailable: {0}")]
    UpstreamUnavailable(#[source] FetchError),

    /// A fetched manifest could not be interpreted
    #[error(transparent)]
    InvalidManifest(#[from] ManifestError),

    /// The manifest does not contain what was asked for
    #[error("Not found: {0}")]
    NotFound(&'static str),
}

/// Why the on-disk copy could not be used
#[derive(Debug, Error)]
enum StoredCopyError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ManifestError),

    #[error("Cache read task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Default)]
struct CacheState {
    last_refreshed: Option<DateTime<Utc>>,
    release_times: HashMap<String, DateTime<Utc>>,
    /// Last manifest that was fetched or read, served when the disk copy is unusable
    manifest: Option<Arc<Manifest>>,
}

/// Process-wide owner of the cached manifest
pub struct ManifestCache {
    source: Arc<dyn ManifestSource>,
    clock: Arc<dyn Clock>,
    store: CacheManager,
    freshness: Duration,
    state: RwLock<CacheState>,
}

impl ManifestCache {
    /// Creates an empty cache; nothing is fetched until the first request
    pub fn new(source: Arc<dyn ManifestSource>, clock: Arc<dyn Clock>, store: CacheManager) -> Self {
        Self {
            source,
            clock,
            store,
            freshness: Duration::seconds(FRESHNESS_WINDOW_SECS),
            state: RwLock::new(CacheState::default()),
        }
    }

    /// Time of the last successful refresh, if any
    pub async fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.state.read().await.last_refreshed
    }

    /// Returns the manifest, refreshing it first if it is stale
    ///
    /// Within the freshness window the on-disk copy is read. If the file is
    /// missing or corrupt, the copy held in memory since the last refresh is
    /// served instead, so an unwritable cache directory does not cause a fetch
    /// per request.
    pub async fn get_manifest(&self) -> Result<Arc<Manifest>, CacheError> {
        let now = self.clock.now();
        let Some(held) = self.fresh_copy(now).await else {
            return self.refresh(now).await;
        };

        match self.read_stored().await {
            Ok(manifest) => {
                debug!("Serving version manifest from {}", self.store.dir().display());
                Ok(Arc::new(manifest))
            }
            Err(e) => {
                debug!("Cached manifest unreadable ({}), serving copy from memory", e);
                Ok(held)
            }
        }
    }

    /// Returns the release time of `id`, or `None` for an unknown version
    pub async fn release_time(&self, id: &str) -> Result<Option<DateTime<Utc>>, CacheError> {
        self.get_manifest().await?;
        Ok(self.state.read().await.release_times.get(id).copied())
    }

    /// Id of the newest release, in upstream list order
    pub async fn latest_release_id(&self) -> Result<String, CacheError> {
        let manifest = self.get_manifest().await?;
        manifest
            .latest_release_id()
            .map(str::to_string)
            .ok_or(CacheError::NotFound("release version"))
    }

    /// Id of the newest snapshot, in upstream list order
    pub async fn latest_snapshot_id(&self) -> Result<String, CacheError> {
        let manifest = self.get_manifest().await?;
        manifest
            .latest_snapshot_id()
            .map(str::to_string)
            .ok_or(CacheError::NotFound("snapshot version"))
    }

    /// The in-memory manifest, if the last refresh is within the window
    async fn fresh_copy(&self, now: DateTime<Utc>) -> Option<Arc<Manifest>> {
        let state = self.state.read().await;
        match (state.last_refreshed, &state.manifest) {
            (Some(at), Some(manifest)) if now - at <= self.freshness => Some(manifest.clone()),
            _ => None,
        }
    }

    async fn in_memory(&self) -> Option<Arc<Manifest>> {
        self.state.read().await.manifest.clone()
    }

    async fn read_stored(&self) -> Result<Manifest, StoredCopyError> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || -> Result<Manifest, StoredCopyError> {
            let body = store.read(MANIFEST_CACHE_KEY)?;
            Ok(Manifest::from_json(&body)?)
        })
        .await?
    }

    async fn refresh(&self, now: DateTime<Utc>) -> Result<Arc<Manifest>, CacheError> {
        let body = match self.source.fetch().await {
            Ok(body) => body,
            Err(e) => return self.fall_back_to_stored(e).await,
        };

        let manifest = Arc::new(Manifest::from_json(&body)?);
        let release_times = manifest.release_times();

        let store = self.store.clone();
        let written =
            tokio::task::spawn_blocking(move || store.write(MANIFEST_CACHE_KEY, &body)).await;
        match written {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to persist version manifest: {}", e),
            Err(e) => warn!("Failed to persist version manifest: {}", e),
        }

        let mut state = self.state.write().await;
        state.release_times = release_times;
        state.manifest = Some(manifest.clone());
        state.last_refreshed = Some(now);
        info!("Version manifest refreshed ({} versions)", manifest.versions.len());

        Ok(manifest)
    }

    async fn fall_back_to_stored(
        &self,
        fetch_error: FetchError,
    ) -> Result<Arc<Manifest>, CacheError> {
        let manifest = match self.read_stored().await {
            Ok(manifest) => Arc::new(manifest),
            Err(_) => match self.in_memory().await {
                Some(manifest) => manifest,
                None => return Err(CacheError::UpstreamUnavailable(fetch_error)),
            },
        };

        warn!("Manifest fetch failed ({}), serving cached copy", fetch_error);

        let mut state = self.state.write().await;
        if state.manifest.is_none() {
            state.release_times = manifest.release_times();
            state.manifest = Some(manifest.clone());
        }

        Ok(manifest)
    }
}
