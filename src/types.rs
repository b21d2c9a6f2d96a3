//! Core types and structures for dotify

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{DotifyError, Result};

/// Result of parsing a raw email address.
///
/// `Valid` holds the canonical, dot-stripped username. `Invalid` carries the
/// reason the input was rejected. The accessors return empty strings for the
/// invalid case so callers that only branch on [`ParsedEmail::is_valid`] see
/// the same sentinel values either way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ParsedEmail {
    Valid { username: String, domain: String },
    Invalid { reason: String },
}

impl ParsedEmail {
    pub fn is_valid(&self) -> bool {
        matches!(self, ParsedEmail::Valid { .. })
    }

    /// Dot-stripped username, empty when invalid
    pub fn username(&self) -> &str {
        match self {
            ParsedEmail::Valid { username, .. } => username,
            ParsedEmail::Invalid { .. } => "",
        }
    }

    /// Domain part, empty when invalid
    pub fn domain(&self) -> &str {
        match self {
            ParsedEmail::Valid { domain, .. } => domain,
            ParsedEmail::Invalid { .. } => "",
        }
    }

    /// Rejection reason, if any
    pub fn reason(&self) -> Option<&str> {
        match self {
            ParsedEmail::Valid { .. } => None,
            ParsedEmail::Invalid { reason } => Some(reason),
        }
    }

    /// The undotted address, `username@domain`
    pub fn canonical_address(&self) -> Option<String> {
        match self {
            ParsedEmail::Valid { username, domain } => Some(format!("{}@{}", username, domain)),
            ParsedEmail::Invalid { .. } => None,
        }
    }

    /// Turn an invalid parse into a validation error
    pub fn into_valid(self) -> Result<Self> {
        match self {
            ParsedEmail::Invalid { reason } => Err(DotifyError::validation(reason)),
            valid => Ok(valid),
        }
    }
}

impl std::fmt::Display for ParsedEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParsedEmail::Valid { username, domain } => write!(f, "{}@{}", username, domain),
            ParsedEmail::Invalid { reason } => write!(f, "<invalid: {}>", reason),
        }
    }
}

/// A generated variation together with its index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variation {
    pub index: u64,
    pub address: String,
}

/// One page of variations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// 1-indexed page number
    pub number: u64,
    pub page_size: u64,
    pub total_pages: u64,
    pub total: u64,
    pub items: Vec<Variation>,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.number > 1
    }
}

/// Runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub page_size: u64,
    pub state_dir: PathBuf,
}

pub const DEFAULT_PAGE_SIZE: u64 = 50;
pub const DEFAULT_STATE_DIR: &str = "output";

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
        }
    }
}

impl Config {
    /// Build configuration from `DOTIFY_PAGE_SIZE` and `DOTIFY_STATE_DIR`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("DOTIFY_PAGE_SIZE") {
            let page_size = raw.trim().parse::<u64>().map_err(|_| {
                DotifyError::config(format!("DOTIFY_PAGE_SIZE must be a positive integer, got '{}'", raw))
            })?;
            if page_size == 0 {
                return Err(DotifyError::config("DOTIFY_PAGE_SIZE must be greater than 0"));
            }
            config.page_size = page_size;
        }

        if let Some(dir) = lookup("DOTIFY_STATE_DIR") {
            if !dir.trim().is_empty() {
                config.state_dir = PathBuf::from(dir.trim());
            }
        }

        tracing::debug!(page_size = config.page_size, state_dir = %config.state_dir.display(), "Loaded configuration");
        Ok(config)
    }
}
