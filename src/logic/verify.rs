//! Website verification outcome.

use std::fmt;

/// What the verification request found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// The body contains the expected content.
    Accessible,
    /// The body is missing the expected content, or no body came back.
    Mismatch,
}

impl VerifyOutcome {
    /// Check a response body for the expected substring.
    pub fn from_body(body: &str, expected: &str) -> Self {
        if body.contains(expected) {
            Self::Accessible
        } else {
            Self::Mismatch
        }
    }

    pub fn is_accessible(&self) -> bool {
        matches!(self, Self::Accessible)
    }

    /// Line printed to the console.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Accessible => "Website is accessible and content is correct.",
            Self::Mismatch => "Website is not accessible or content mismatch.",
        }
    }
}

impl fmt::Display for VerifyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
