//! Dot-variation space
//!
//! A username of `n` characters has `n - 1` gaps. Every subset of gaps is one
//! variation, so the space holds `2^(n-1)` addresses. Each variation is
//! addressed by an integer whose bits select the gaps that receive a dot,
//! which lets callers jump to any index without enumerating the ones before it.

mod generator;
mod pager;

pub use generator::{generate_at, DotVariations};
pub use pager::{page_window, PageMarker, Pager};

use crate::error::{DotifyError, Result};

/// Longest supported username, the RFC 5321 local-part limit.
///
/// Keeps `2^(n-1)` within `u64`.
pub const MAX_USERNAME_LEN: usize = 64;

/// Number of dot variations for a canonical username.
///
/// Usernames of zero or one character report 0. Usernames longer than
/// [`MAX_USERNAME_LEN`] are rejected rather than wrapped.
pub fn count_variations(username: &str) -> Result<u64> {
    let length = username.chars().count();
    if length <= 1 {
        return Ok(0);
    }
    if length > MAX_USERNAME_LEN {
        return Err(DotifyError::username_too_long(length, MAX_USERNAME_LEN));
    }
    Ok(1u64 << (length - 1))
}

/// Number of pages needed to show `total` items
pub fn total_pages(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}
