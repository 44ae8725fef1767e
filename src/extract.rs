//! Sender address extraction
//!
//! Turns a free-form `From` header value such as
//! `"John Doe" <JOHN@EXAMPLE.COM>` into a normalized lowercase
//! address. Values with no recognizable address are kept verbatim so
//! the message still counts, under its raw header text.

use regex::Regex;
use std::sync::LazyLock;

/// ASCII case-insensitive; the top-level label is 2 to 6 letters.
static ADDRESS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i-u)(?P<email>[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,6})")
        .expect("address pattern is valid")
});

/// Outcome of looking for an address in a header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// First address found, lowercased.
    Address(String),
    /// No address found; the input, unchanged.
    Fallback(String),
}

impl Extraction {
    /// The tally key for this outcome.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Address(s) | Self::Fallback(s) => s,
        }
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        match self {
            Self::Address(s) | Self::Fallback(s) => s,
        }
    }

    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Find the first address in `raw`.
#[must_use]
pub fn extract_address(raw: &str) -> Extraction {
    ADDRESS_PATTERN
        .captures(raw)
        .and_then(|caps| caps.name("email"))
        .map_or_else(
            || Extraction::Fallback(raw.to_string()),
            |m| Extraction::Address(m.as_str().to_ascii_lowercase()),
        )
}

/// The normalized address in `raw`, or `raw` itself if there is none.
///
/// ```
/// use gmail_inbox_stats::extract;
///
/// assert_eq!(extract("John Doe <JOHN@EXAMPLE.COM>"), "john@example.com");
/// assert_eq!(extract("undisclosed"), "undisclosed");
/// ```
#[must_use]
pub fn extract(raw: &str) -> String {
    extract_address(raw).into_inner()
}
