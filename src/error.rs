//! Error handling for dotify

use thiserror::Error;

/// Main error type for dotify
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DotifyError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Username too long: {length} characters (max {max})")]
    UsernameTooLong { length: usize, max: usize },

    #[error("Variation index {index} out of range (total {total})")]
    IndexOutOfRange { index: u64, total: u64 },

    #[error("Page {page} out of range (total pages {total_pages})")]
    PageOutOfRange { page: u64, total_pages: u64 },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        content: Option<String>,
    },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    #[error("Clipboard error: {message}")]
    Clipboard { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("CLI error: {message}")]
    Cli { message: String },
}

impl DotifyError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn username_too_long(length: usize, max: usize) -> Self {
        Self::UsernameTooLong { length, max }
    }

    pub fn index_out_of_range(index: u64, total: u64) -> Self {
        Self::IndexOutOfRange { index, total }
    }

    pub fn page_out_of_range(page: u64, total_pages: u64) -> Self {
        Self::PageOutOfRange { page, total_pages }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>, content: Option<String>) -> Self {
        Self::Parse {
            message: message.into(),
            content,
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Io {
            message: message.into(),
            path,
        }
    }

    /// Create a clipboard error
    pub fn clipboard(message: impl Into<String>) -> Self {
        Self::Clipboard {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a CLI error
    pub fn cli(message: impl Into<String>) -> Self {
        Self::Cli {
            message: message.into(),
        }
    }

    /// True when the caller passed something outside the variation space
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            Self::IndexOutOfRange { .. } | Self::PageOutOfRange { .. }
        )
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check your .env file or DOTIFY_* variables", message)
            }
            Self::Validation { message } => {
                format!("❌ Validation error: {}\n💡 Use an address like yourname@gmail.com", message)
            }
            Self::UsernameTooLong { length, max } => {
                format!("❌ Username has {} characters, at most {} are supported\n💡 Email local-parts are limited to {} characters", length, max, max)
            }
            Self::IndexOutOfRange { index, total } => {
                if *total == 0 {
                    format!("❌ Index {} is out of range: this username has no variations\n💡 Try a longer username", index)
                } else {
                    format!("❌ Index {} is out of range\n💡 Valid indices are 0..={}", index, total - 1)
                }
            }
            Self::PageOutOfRange { page, total_pages } => {
                if *total_pages == 0 {
                    format!("❌ Page {} does not exist: this username has no variations\n💡 Try a longer username", page)
                } else {
                    format!("❌ Page {} does not exist\n💡 Valid pages are 1..={}", page, total_pages)
                }
            }
            Self::Parse { message, .. } => {
                format!("❌ Parse error: {}\n💡 The session file may be corrupted, try `dotify reset`", message)
            }
            Self::Io { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                format!("❌ File error{}: {}\n💡 Check file permissions and paths", path_info, message)
            }
            Self::Clipboard { message } => {
                format!("❌ Clipboard error: {}\n💡 Install xclip or xsel, or copy the address manually", message)
            }
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
            Self::Cli { message } => {
                format!("❌ Command error: {}\n💡 Use --help for usage information", message)
            }
        }
    }
}

/// Convert from common error types
impl From<serde_json::Error> for DotifyError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string(), None)
    }
}

impl From<std::io::Error> for DotifyError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string(), None)
    }
}

impl From<inquire::InquireError> for DotifyError {
    fn from(err: inquire::InquireError) -> Self {
        Self::cli(err.to_string())
    }
}

impl From<tokio::task::JoinError> for DotifyError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(format!("Generation task failed: {}", err))
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, DotifyError>;

/// Helper macros for common error patterns
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::DotifyError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::DotifyError::config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr) => {
        $crate::error::DotifyError::validation($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::DotifyError::validation(format!($fmt, $($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = DotifyError::index_out_of_range(9, 8);
        assert_eq!(err.to_string(), "Variation index 9 out of range (total 8)");
        assert!(err.is_out_of_range());
        assert!(!DotifyError::validation("x").is_out_of_range());
    }

    #[test]
    fn test_user_message_hints() {
        let msg = DotifyError::index_out_of_range(3, 0).user_message();
        assert!(msg.contains("no variations"));

        let msg = DotifyError::index_out_of_range(9, 8).user_message();
        assert!(msg.contains("0..=7"));

        let msg = DotifyError::page_out_of_range(2, 0).user_message();
        assert!(msg.contains("no variations"));
        assert!(!msg.contains("1..=0"));

        let msg = DotifyError::page_out_of_range(5, 3).user_message();
        assert!(msg.contains("1..=3"));
    }

    #[test]
    fn test_macros() {
        let err = validation_error!("bad {}", "input");
        assert_eq!(err, DotifyError::validation("bad input"));

        let err = config_error!("missing");
        assert!(err.to_string().contains("missing"));
    }
}
