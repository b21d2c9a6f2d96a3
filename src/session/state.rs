//! Copied-index persistence for a single address

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::{DotifyError, Result};
use crate::types::ParsedEmail;
use crate::variations::count_variations;

/// Persistent session state.
///
/// Only indices are stored; addresses are regenerated on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Canonical `username@domain`
    pub address: String,
    pub username: String,
    pub domain: String,
    /// Size of the variation space when the session was created
    pub total: u64,
    /// Indices already copied
    #[serde(default)]
    pub copied: BTreeSet<u64>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionState {
    /// Create a new session for a parsed address
    pub fn new(parsed: &ParsedEmail) -> Result<Self> {
        let address = parsed.canonical_address().ok_or_else(|| {
            DotifyError::validation(parsed.reason().unwrap_or("Invalid email address"))
        })?;
        let total = count_variations(parsed.username())?;
        let now = Utc::now();

        Ok(Self {
            address,
            username: parsed.username().to_string(),
            domain: parsed.domain().to_string(),
            total,
            copied: BTreeSet::new(),
            started_at: now,
            updated_at: now,
        })
    }

    /// Load state from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DotifyError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
        })?;

        serde_json::from_str(&content).map_err(|e| DotifyError::parse(e.to_string(), Some(content)))
    }

    /// Load state for `parsed`, or start a fresh one when no file exists
    /// or the stored file cannot be parsed
    pub fn load_or_new(path: &Path, parsed: &ParsedEmail) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No session file, starting fresh");
            return Self::new(parsed);
        }

        let state = match Self::load(path) {
            Ok(state) => state,
            Err(DotifyError::Parse { message, .. }) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %message,
                    "Session file is corrupted, starting fresh"
                );
                return Self::new(parsed);
            }
            Err(e) => return Err(e),
        };
        if Some(&state.address) != parsed.canonical_address().as_ref() {
            tracing::warn!(
                path = %path.display(),
                stored = %state.address,
                requested = %parsed,
                "Session file belongs to another address, starting fresh"
            );
            return Self::new(parsed);
        }

        tracing::debug!(path = %path.display(), copied = state.copied.len(), "Loaded session");
        Ok(state)
    }

    /// Save state to file
    pub fn save(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DotifyError::io(e.to_string(), Some(parent.to_string_lossy().to_string()))
                })?;
            }
        }

        let content = serde_json::to_string_pretty(self).map_err(|e| {
            DotifyError::internal(format!("Failed to serialize session: {}", e))
        })?;

        std::fs::write(path, content).map_err(|e| {
            DotifyError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
        })?;

        tracing::debug!(path = %path.display(), copied = self.copied.len(), "Saved session");
        Ok(())
    }

    /// Get default session file path for an address
    pub fn default_path(state_dir: &Path, parsed: &ParsedEmail) -> PathBuf {
        let name: String = parsed
            .to_string()
            .chars()
            .map(|c| if c.is_alphanumeric() || matches!(c, '@' | '.' | '-' | '_') { c } else { '_' })
            .collect();
        state_dir.join(format!("session_{}.json", name))
    }

    /// Record a copied index
    pub fn mark_copied(&mut self, index: u64) -> Result<bool> {
        if index >= self.total {
            return Err(DotifyError::index_out_of_range(index, self.total));
        }
        let inserted = self.copied.insert(index);
        self.updated_at = Utc::now();
        Ok(inserted)
    }

    pub fn is_copied(&self, index: u64) -> bool {
        self.copied.contains(&index)
    }

    pub fn copied_count(&self) -> usize {
        self.copied.len()
    }

    /// Indices not copied yet
    pub fn remaining(&self) -> u64 {
        self.total.saturating_sub(self.copied.len() as u64)
    }

    /// Forget all copied indices
    pub fn clear(&mut self) {
        self.copied.clear();
        self.updated_at = Utc::now();
    }
}
