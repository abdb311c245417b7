//! File-backed bioassay count cache.
//!
//! The whole mapping (gene symbol -> assay count) lives in one JSON file.
//! It is read once per run and rewritten in full at the end.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::Result;

pub type BioassayCounts = BTreeMap<String, u64>;

#[derive(Debug, Clone)]
pub struct BioassayCache {
    path: PathBuf,
}

impl BioassayCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot. A missing or unreadable file is an empty cache.
    pub fn load(&self) -> BioassayCounts {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No bioassay cache yet");
            return BioassayCounts::new();
        }
        let parsed = std::fs::read_to_string(&self.path)
            .map_err(|e| e.to_string())
            .and_then(|content| {
                serde_json::from_str::<BioassayCounts>(&content).map_err(|e| e.to_string())
            });
        match parsed {
            Ok(counts) => {
                debug!(entries = counts.len(), "Loaded bioassay cache");
                counts
            }
            Err(error) => {
                warn!(path = %self.path.display(), %error, "Ignoring unreadable bioassay cache");
                BioassayCounts::new()
            }
        }
    }

    /// Replace the snapshot on disk.
    pub fn save(&self, counts: &BioassayCounts) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(counts)?;
        std::fs::write(&self.path, json)?;
        info!(entries = counts.len(), path = %self.path.display(), "Saved bioassay cache");
        Ok(())
    }
}
