//! Email address parsing
//!
//! Turns raw input into a canonical, dot-stripped [`ParsedEmail`].

pub mod parser;

pub use parser::{parse, EmailParser};
