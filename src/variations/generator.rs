//! Index-addressed dot-variation generator

use super::count_variations;
use crate::error::{DotifyError, Result};
use crate::types::ParsedEmail;

/// Build the variation at `index`.
///
/// Bit `k` of `index` places a dot between characters `k` and `k + 1` of
/// `username`. Runs in O(len) and allocates only the returned string.
pub fn generate_at(username: &str, domain: &str, index: u64) -> Result<String> {
    if username.is_empty() {
        return Err(DotifyError::validation("Username cannot be empty"));
    }

    let total = count_variations(username)?;
    if index >= total {
        return Err(DotifyError::index_out_of_range(index, total));
    }

    let mut address = String::with_capacity(username.len() * 2 + domain.len() + 1);
    for (position, ch) in username.chars().enumerate() {
        if position > 0 && (index >> (position - 1)) & 1 == 1 {
            address.push('.');
        }
        address.push(ch);
    }
    address.push('@');
    address.push_str(domain);

    Ok(address)
}

/// Cursor over every variation of one address
#[derive(Debug, Clone)]
pub struct DotVariations {
    username: String,
    domain: String,
    current_index: u64,
    total: u64,
}

impl DotVariations {
    /// Create a cursor for a parsed address
    pub fn new(parsed: &ParsedEmail) -> Result<Self> {
        if !parsed.is_valid() {
            return Err(DotifyError::validation(
                parsed.reason().unwrap_or("Invalid email address"),
            ));
        }
        Self::from_parts(parsed.username(), parsed.domain())
    }

    /// Create a cursor from a canonical username and domain
    pub fn from_parts(username: &str, domain: &str) -> Result<Self> {
        let total = count_variations(username)?;
        Ok(Self {
            username: username.to_string(),
            domain: domain.to_string(),
            current_index: 0,
            total,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Get total number of variations
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Get current progress index
    pub fn current_index(&self) -> u64 {
        self.current_index
    }

    /// Set current index (for resume)
    pub fn set_index(&mut self, index: u64) {
        self.current_index = index.min(self.total);
    }

    /// Generate variation at specific index
    pub fn variation_at(&self, index: u64) -> Option<String> {
        if index >= self.total {
            return None;
        }
        generate_at(&self.username, &self.domain, index).ok()
    }

    /// Generate next batch of variations
    pub fn next_batch(&mut self, count: usize) -> Vec<String> {
        let mut batch = Vec::with_capacity(count.min(self.remaining() as usize));

        for _ in 0..count {
            if let Some(address) = self.variation_at(self.current_index) {
                batch.push(address);
                self.current_index += 1;
            } else {
                break;
            }
        }

        batch
    }

    /// Check if the cursor is exhausted
    pub fn is_exhausted(&self) -> bool {
        self.current_index >= self.total
    }

    /// Remaining count
    pub fn remaining(&self) -> u64 {
        self.total.saturating_sub(self.current_index)
    }
}

impl Iterator for DotVariations {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let address = self.variation_at(self.current_index)?;
        self.current_index += 1;
        Some(address)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining()) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}
