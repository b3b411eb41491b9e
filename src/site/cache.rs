// ABOUTME: Incremental build cache for the site builder
// ABOUTME: Stores a content hash per source file so unchanged files are skipped

use crate::errors::Result;
use crate::utils;
use log::debug;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Lowercase hex SHA-256 of a file's content.
pub fn file_hash(path: &Path) -> Result<String> {
    let digest = Sha256::digest(fs::read(path)?);
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest.iter() {
        let _ = write!(hex, "{:02x}", byte);
    }
    Ok(hex)
}

/// Source path to content hash, one `path:hash` line per file on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildCache {
    entries: BTreeMap<String, String>,
}

impl BuildCache {
    /// Load the cache. A missing file is an empty cache; lines without a
    /// `:` are ignored.
    pub fn load(path: &Path) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for line in utils::read_optional(path)?.lines() {
            let line = line.trim();
            if let Some((source, hash)) = line.rsplit_once(':') {
                entries.insert(source.to_string(), hash.to_string());
            }
        }
        debug!("Loaded {} cache entries from {:?}", entries.len(), path);
        Ok(Self { entries })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        utils::ensure_parent_directory_exists(path)?;
        let mut content = String::new();
        for (source, hash) in &self.entries {
            content.push_str(source);
            content.push(':');
            content.push_str(hash);
            content.push('\n');
        }
        fs::write(path, content)?;
        Ok(())
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries.get(source).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the file is new or its content changed since it was recorded
    /// under `key`.
    pub fn needs_rebuild(&self, key: &str, source: &Path) -> Result<bool> {
        match self.entries.get(key) {
            Some(hash) => Ok(*hash != file_hash(source)?),
            None => Ok(true),
        }
    }

    /// Remember the current content hash of a file under `key`.
    pub fn record(&mut self, key: &str, source: &Path) -> Result<()> {
        let hash = file_hash(source)?;
        self.entries.insert(key.to_string(), hash);
        Ok(())
    }
}
