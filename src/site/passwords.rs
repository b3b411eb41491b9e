// ABOUTME: Password book for encrypted pages
// ABOUTME: Generates one random password per source file and persists them as JSON

use crate::errors::Result;
use crate::utils;
use chrono::Local;
use log::{debug, info};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Random password of ASCII letters and digits.
pub fn generate_password(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

fn timestamp() -> String {
    Local::now().to_rfc3339()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordEntry {
    /// Display name of the document
    pub name: String,
    pub password: String,
    pub created_at: String,
}

/// Passwords keyed by source path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordBook {
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub files: BTreeMap<String, PasswordEntry>,
}

impl Default for PasswordBook {
    fn default() -> Self {
        Self {
            created_at: timestamp(),
            updated_at: None,
            files: BTreeMap::new(),
        }
    }
}

impl PasswordBook {
    /// Load the book, or start a new one when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No password book at {:?}, starting a new one", path);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let book: Self = serde_json::from_str(&content)?;
        debug!("Loaded {} passwords from {:?}", book.files.len(), path);
        Ok(book)
    }

    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.updated_at = Some(timestamp());
        utils::ensure_parent_directory_exists(path)?;
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("Saved password book: {:?}", path);
        Ok(())
    }

    pub fn get(&self, source: &str) -> Option<&PasswordEntry> {
        self.files.get(source)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Existing password for a source file, or a newly generated one.
    pub fn password_for(&mut self, source: &str, name: &str, length: usize) -> String {
        self.files
            .entry(source.to_string())
            .or_insert_with(|| {
                debug!("Generating password for {}", source);
                PasswordEntry {
                    name: name.to_string(),
                    password: generate_password(length),
                    created_at: timestamp(),
                }
            })
            .password
            .clone()
    }
}
