//! Dotify - Gmail dot-variation generator
//!
//! Gmail ignores dots in the local-part, so every way of inserting dots
//! between the characters of a username reaches the same inbox. This crate
//! parses an address into its undotted form, counts its variations and builds
//! any single variation straight from its index, so huge spaces can be paged
//! through without ever being materialised.

pub mod clipboard;
pub mod email;
pub mod error;
pub mod session;
pub mod types;
pub mod variations;

// Re-export commonly used types
pub use error::{DotifyError, Result};
pub use types::{Config, Page, ParsedEmail, Variation};

// Re-export main functionality
pub use email::parse;
pub use session::SessionState;
pub use variations::{count_variations, generate_at, DotVariations, Pager};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
