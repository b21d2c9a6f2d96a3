//! Email address parsing and normalization

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::ParsedEmail;

/// `<local>@<domain>.<tld>`, no whitespace and no extra '@' anywhere
static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email shape regex is valid")
});

/// Parse a raw address into its canonical form.
///
/// Never fails: a malformed address comes back as [`ParsedEmail::Invalid`].
pub fn parse(raw: &str) -> ParsedEmail {
    EmailParser::new().parse(raw)
}

/// Email parser
#[derive(Debug, Clone, Default)]
pub struct EmailParser {
    trim: bool,
}

impl EmailParser {
    /// Create a parser that takes input verbatim
    pub fn new() -> Self {
        Self { trim: false }
    }

    /// Strip surrounding whitespace before validating
    pub fn trimming(mut self) -> Self {
        self.trim = true;
        self
    }

    /// Parse an email address
    pub fn parse(&self, raw: &str) -> ParsedEmail {
        let input = if self.trim { raw.trim() } else { raw };

        if !EMAIL_SHAPE.is_match(input) {
            let reason = rejection_reason(input);
            tracing::debug!(input = %input, reason = %reason, "Rejected email address");
            return ParsedEmail::Invalid { reason };
        }

        // The shape guarantees exactly one '@'
        let (local, domain) = match input.split_once('@') {
            Some(parts) => parts,
            None => {
                return ParsedEmail::Invalid {
                    reason: "Email address must contain '@'".to_string(),
                }
            }
        };

        let username = strip_dots(local);
        if username.is_empty() {
            return ParsedEmail::Invalid {
                reason: "Local-part must contain at least one character other than '.'".to_string(),
            };
        }

        ParsedEmail::Valid {
            username,
            domain: domain.to_string(),
        }
    }

    /// Check whether input has a valid email shape
    pub fn is_valid_format(&self, raw: &str) -> bool {
        self.parse(raw).is_valid()
    }
}

/// Remove every '.' from a local-part
pub fn strip_dots(local: &str) -> String {
    local.chars().filter(|c| *c != '.').collect()
}

/// Explain why input failed the shape check
fn rejection_reason(input: &str) -> String {
    if input.is_empty() {
        return "Email address cannot be empty".to_string();
    }

    if input.chars().any(char::is_whitespace) {
        return "Email address cannot contain whitespace".to_string();
    }

    match input.matches('@').count() {
        0 => return "Email address must contain '@'".to_string(),
        1 => {}
        _ => return "Email address must contain exactly one '@'".to_string(),
    }

    let (local, domain) = input.split_once('@').unwrap_or((input, ""));
    if local.is_empty() {
        return "Local-part cannot be empty".to_string();
    }
    if domain.is_empty() {
        return "Domain cannot be empty".to_string();
    }

    "Domain must contain a '.' between non-empty labels".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(username: &str, domain: &str) -> ParsedEmail {
        ParsedEmail::Valid {
            username: username.to_string(),
            domain: domain.to_string(),
        }
    }

    #[test]
    fn test_basic_parsing() {
        assert_eq!(parse("a.b.c@example.com"), valid("abc", "example.com"));
        assert_eq!(parse("jo@gmail.com"), valid("jo", "gmail.com"));
        assert_eq!(parse("first.last@mail.co.uk"), valid("firstlast", "mail.co.uk"));
    }

    #[test]
    fn test_dots_collapse_to_same_base() {
        assert_eq!(parse("j.o.h.n@gmail.com"), parse("john@gmail.com"));
        assert_eq!(parse("jo..hn.@gmail.com"), parse("john@gmail.com"));
    }

    #[test]
    fn test_domain_is_kept_verbatim() {
        let parsed = parse("john@Sub.Example.COM");
        assert_eq!(parsed.domain(), "Sub.Example.COM");
    }

    #[test]
    fn test_rejection() {
        let parsed = parse("not-an-email");
        assert!(!parsed.is_valid());
        assert_eq!(parsed.username(), "");
        assert_eq!(parsed.domain(), "");

        for raw in [
            "",
            "@gmail.com",
            "john@",
            "john@gmail",
            "john@.com",
            "john@gmail.",
            "jo hn@gmail.com",
            "john@gm ail.com",
            " john@gmail.com",
            "john@@gmail.com",
            "a@b@c.com",
        ] {
            assert!(!parse(raw).is_valid(), "expected '{}' to be rejected", raw);
        }
    }

    #[test]
    fn test_rejection_reasons() {
        assert_eq!(parse("").reason(), Some("Email address cannot be empty"));
        assert_eq!(
            parse("jo hn@gmail.com").reason(),
            Some("Email address cannot contain whitespace")
        );
        assert_eq!(parse("john").reason(), Some("Email address must contain '@'"));
        assert_eq!(
            parse("a@b@c.com").reason(),
            Some("Email address must contain exactly one '@'")
        );
        assert_eq!(parse("@gmail.com").reason(), Some("Local-part cannot be empty"));
        assert_eq!(parse("john@").reason(), Some("Domain cannot be empty"));
        assert_eq!(
            parse("john@gmail").reason(),
            Some("Domain must contain a '.' between non-empty labels")
        );
    }

    #[test]
    fn test_all_dots_local_part() {
        let parsed = parse("...@gmail.com");
        assert!(!parsed.is_valid());
        assert_eq!(parsed.username(), "");
    }

    #[test]
    fn test_trimming_parser() {
        let parser = EmailParser::new().trimming();
        assert_eq!(parser.parse("  jo@gmail.com\n"), valid("jo", "gmail.com"));
        assert!(!EmailParser::new().is_valid_format("  jo@gmail.com"));
    }

    #[test]
    fn test_unicode_local_part() {
        assert_eq!(parse("jó.se@example.com"), valid("jóse", "example.com"));
    }
}
