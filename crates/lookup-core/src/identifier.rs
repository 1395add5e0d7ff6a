//! Inbound identifier validation.

use derive_more::Display;
use regex::Regex;
use std::sync::LazyLock;

use crate::PipelineError;

/// Number of digits in a CEP.
pub const CEP_DIGITS: usize = 8;

// ASCII only: `\d` would also accept other Unicode digit classes.
static CEP_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{8}$").unwrap());

/// A validated CEP. Only constructible through [`Identifier::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{_0}")]
pub struct Identifier(String);

impl Identifier {
    /// Trim `raw` and accept it only if exactly [`CEP_DIGITS`] ASCII digits remain.
    pub fn parse(raw: &str) -> Result<Self, PipelineError> {
        let trimmed = raw.trim();
        if CEP_REGEX.is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(PipelineError::InvalidIdentifier)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Syntactic check with no side effects.
pub fn is_valid_cep(raw: &str) -> bool {
    Identifier::parse(raw).is_ok()
}
