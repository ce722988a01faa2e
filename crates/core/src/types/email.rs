//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input does not contain exactly one @ symbol.
    #[error("email must contain exactly one @ symbol")]
    MissingAtSymbol,
    /// The local part (before @) is empty or malformed.
    #[error("email local part is invalid")]
    InvalidLocalPart,
    /// The domain part (after @) is empty or malformed.
    #[error("email domain is invalid")]
    InvalidDomain,
}

/// An email address.
///
/// Validation is syntactic only: it rejects what a checkout form should
/// reject, without trying to implement all of RFC 5322.
///
/// ## Constraints
///
/// - Length: 1-255 characters
/// - Exactly one @ symbol
/// - Local part: `A-Z a-z 0-9` plus `. _ ' + -`, no leading, trailing or
///   consecutive dots
/// - Domain: at least two labels of `A-Z a-z 0-9 -` (labels don't start or end
///   with `-`), the last one at least two letters
///
/// ## Examples
///
/// ```
/// use artesania_core::Email;
///
/// // Valid emails
/// assert!(Email::parse("user@example.com").is_ok());
/// assert!(Email::parse("user.name+tag@domain.com.ar").is_ok());
///
/// // Invalid emails
/// assert!(Email::parse("").is_err());             // empty
/// assert!(Email::parse("not-an-email").is_err()); // missing @
/// assert!(Email::parse("@domain.com").is_err());  // empty local part
/// assert!(Email::parse("user@domain").is_err());  // no top-level domain
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address accepted at checkout.
    pub const MAX_LENGTH: usize = 255;

    /// Parse an `Email` from a string.
    ///
    /// The input is not trimmed; callers normalize whitespace first.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Does not contain exactly one @ symbol
    /// - Has a malformed local part or domain
    /// - Is well formed but longer than 255 characters
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::MissingAtSymbol)?;
        if domain.contains('@') {
            return Err(EmailError::MissingAtSymbol);
        }

        if !is_valid_local_part(local) {
            return Err(EmailError::InvalidLocalPart);
        }

        if !is_valid_domain(domain) {
            return Err(EmailError::InvalidDomain);
        }

        // Length is only reported for addresses that are otherwise well formed
        if s.chars().count() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the local part of the email (before the @).
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or("")
    }

    /// Returns the domain part of the email (after the @).
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split('@').nth(1).unwrap_or("")
    }
}

fn is_valid_local_part(local: &str) -> bool {
    !local.is_empty()
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '\'' | '+' | '-'))
}

fn is_valid_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });

    let tld_ok = labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));

    labels_ok && tld_ok
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_emails() {
        assert!(Email::parse("user@example.com").is_ok());
        assert!(Email::parse("user.name@example.com").is_ok());
        assert!(Email::parse("user+tag@example.com").is_ok());
        assert!(Email::parse("o'neil@example.com").is_ok());
        assert!(Email::parse("user@sub-domain.example.com.ar").is_ok());
        assert!(Email::parse("a@b.co").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { max: 255 })
        ));
    }

    #[test]
    fn test_parse_long_malformed_reports_syntax() {
        assert_eq!(
            Email::parse(&"x".repeat(300)),
            Err(EmailError::MissingAtSymbol)
        );
    }

    #[test]
    fn test_parse_at_boundary_length() {
        // 243 + "@example.com" (12) = 255
        let exact = format!("{}@example.com", "a".repeat(243));
        assert!(Email::parse(&exact).is_ok());
    }

    #[test]
    fn test_parse_missing_at() {
        assert_eq!(
            Email::parse("not-an-email"),
            Err(EmailError::MissingAtSymbol)
        );
        assert_eq!(
            Email::parse("a@b@example.com"),
            Err(EmailError::MissingAtSymbol)
        );
    }

    #[test]
    fn test_parse_invalid_local_part() {
        assert_eq!(
            Email::parse("@domain.com"),
            Err(EmailError::InvalidLocalPart)
        );
        assert_eq!(
            Email::parse(".user@domain.com"),
            Err(EmailError::InvalidLocalPart)
        );
        assert_eq!(
            Email::parse("us..er@domain.com"),
            Err(EmailError::InvalidLocalPart)
        );
        assert_eq!(
            Email::parse("us er@domain.com"),
            Err(EmailError::InvalidLocalPart)
        );
    }

    #[test]
    fn test_parse_invalid_domain() {
        assert_eq!(Email::parse("user@"), Err(EmailError::InvalidDomain));
        assert_eq!(Email::parse("user@domain"), Err(EmailError::InvalidDomain));
        assert_eq!(
            Email::parse("user@domain.c"),
            Err(EmailError::InvalidDomain)
        );
        assert_eq!(
            Email::parse("user@-domain.com"),
            Err(EmailError::InvalidDomain)
        );
        assert_eq!(
            Email::parse("user@domain..com"),
            Err(EmailError::InvalidDomain)
        );
        assert_eq!(
            Email::parse("user@domain.c0m"),
            Err(EmailError::InvalidDomain)
        );
    }

    #[test]
    fn test_local_part_and_domain() {
        let email = Email::parse("taller@artesaniamadera.ar").unwrap();
        assert_eq!(email.local_part(), "taller");
        assert_eq!(email.domain(), "artesaniamadera.ar");
    }

    #[test]
    fn test_serde_is_transparent() {
        let email = Email::parse("user@example.com").unwrap();
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, "\"user@example.com\"");
    }

    #[test]
    fn test_from_str() {
        let email: Email = "user@example.com".parse().unwrap();
        assert_eq!(email.as_str(), "user@example.com");
    }
}
