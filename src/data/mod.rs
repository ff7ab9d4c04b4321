//! Core data models for the Minecraft version manifest
//!
//! This module contains the types parsed from Mojang's `version_manifest_v2.json`
//! document and the client used to download it.

pub mod mojang;

pub use mojang::{FetchError, ManifestSource, MojangClient, MOJANG_MANIFEST_URL};

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while interpreting a manifest document
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The body is not a valid manifest (bad JSON, missing field, malformed timestamp)
    #[error("Failed to parse version manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Kind of a game version as labelled by Mojang
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionType {
    Release,
    Snapshot,
    OldBeta,
    OldAlpha,
    /// Any label this crate does not know about
    #[serde(other)]
    Other,
}

/// A single entry of the manifest's `versions` list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    /// Version id, e.g. `1.20.4` or `24w14a`
    pub id: String,
    /// Release, snapshot, ...
    #[serde(rename = "type")]
    pub kind: VersionType,
    /// When the version was released
    pub release_time: DateTime<Utc>,
}

/// The upstream version manifest
///
/// Versions are kept in the order Mojang lists them, which is newest first.
/// The upstream `latest` pointers are ignored; the list order is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    pub versions: Vec<VersionEntry>,
}

impl Manifest {
    /// Parses a raw manifest body
    ///
    /// Every release timestamp is parsed here, so a single malformed entry
    /// rejects the whole document.
    pub fn from_json(body: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Returns the id of the first `release` entry in upstream order
    pub fn latest_release_id(&self) -> Option<&str> {
        self.first_of(VersionType::Release)
    }

    /// Returns the id of the first `snapshot` entry in upstream order
    pub fn latest_snapshot_id(&self) -> Option<&str> {
        self.first_of(VersionType::Snapshot)
    }

    /// Builds the id → release time map held by the cache
    pub fn release_times(&self) -> HashMap<String, DateTime<Utc>> {
        self.versions
            .iter()
            .map(|v| (v.id.clone(), v.release_time))
            .collect()
    }

    fn first_of(&self, kind: VersionType) -> Option<&str> {
        self.versions
            .iter()
            .find(|v| v.kind == kind)
            .map(|v| v.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE: &str = r#"{
        "latest": {"release": "1.20.4", "snapshot": "24w14a"},
        "versions": [
            {"id": "24w14a", "type": "snapshot", "url": "https://example.invalid/24w14a.json",
             "time": "2024-04-03T12:48:52+00:00", "releaseTime": "2024-04-03T12:40:23+00:00",
             "sha1": "abc", "complianceLevel": 1},
            {"id": "1.20.4", "type": "release", "releaseTime": "2023-12-07T12:56:20+00:00"},
            {"id": "1.20.3", "type": "release", "releaseTime": "2023-12-05T12:11:38+00:00"},
            {"id": "b1.7.3", "type": "old_beta", "releaseTime": "2011-07-07T22:00:00+00:00"},
            {"id": "experimental", "type": "pending", "releaseTime": "2011-01-01T00:00:00+00:00"}
        ]
    }"#;

    #[test]
    fn test_parse_sample_manifest() {
        let manifest = Manifest::from_json(SAMPLE).expect("sample should parse");

        assert_eq!(manifest.versions.len(), 5);
        assert_eq!(manifest.versions[0].id, "24w14a");
        assert_eq!(manifest.versions[0].kind, VersionType::Snapshot);
        assert_eq!(manifest.versions[3].kind, VersionType::OldBeta);
        assert_eq!(manifest.versions[4].kind, VersionType::Other);
        assert_eq!(
            manifest.versions[1].release_time,
            Utc.with_ymd_and_hms(2023, 12, 7, 12, 56, 20).unwrap()
        );
    }

    #[test]
    fn test_latest_release_id_skips_snapshots() {
        let manifest = Manifest::from_json(SAMPLE).unwrap();
        assert_eq!(manifest.latest_release_id().unwrap(), "1.20.4");
    }

    #[test]
    fn test_latest_release_id_uses_list_order_not_latest_field() {
        let body = r#"{
            "latest": {"release": "1.0", "snapshot": "s1"},
            "versions": [
                {"id": "s1", "type": "snapshot", "releaseTime": "2024-01-01T00:00:00+00:00"},
                {"id": "old", "type": "release", "releaseTime": "2010-01-01T00:00:00+00:00"},
                {"id": "1.0", "type": "release", "releaseTime": "2023-01-01T00:00:00+00:00"}
            ]
        }"#;
        let manifest = Manifest::from_json(body).unwrap();
        assert_eq!(manifest.latest_release_id().unwrap(), "old");
    }

    #[test]
    fn test_latest_release_id_without_release() {
        let body = r#"{"versions": [
            {"id": "s1", "type": "snapshot", "releaseTime": "2024-01-01T00:00:00+00:00"}
        ]}"#;
        let manifest = Manifest::from_json(body).unwrap();
        assert_eq!(manifest.latest_release_id(), None);
        assert_eq!(manifest.latest_snapshot_id().unwrap(), "s1");
    }

    #[test]
    fn test_empty_manifest_has_no_snapshot() {
        let manifest = Manifest::from_json(r#"{"versions": []}"#).unwrap();
        assert_eq!(manifest.latest_snapshot_id(), None);
    }

    #[test]
    fn test_malformed_timestamp_rejects_document() {
        let body = r#"{"versions": [
            {"id": "ok", "type": "release", "releaseTime": "2024-01-01T00:00:00+00:00"},
            {"id": "bad", "type": "release", "releaseTime": "yesterday"}
        ]}"#;
        let err = Manifest::from_json(body).unwrap_err();
        assert!(err.to_string().contains("Failed to parse version manifest"));
    }

    #[test]
    fn test_release_times_map_and_lookup() {
        let manifest = Manifest::from_json(SAMPLE).unwrap();
        let times = manifest.release_times();

        assert_eq!(times.len(), 5);
        assert_eq!(
            times.get("1.20.3").copied(),
            Some(Utc.with_ymd_and_hms(2023, 12, 5, 12, 11, 38).unwrap())
        );
        assert!(!times.contains_key("2.0"));
    }
}
