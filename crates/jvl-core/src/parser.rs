//! Conversion between locator strings and their `{protocol, target}` parts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FormatError, JvlError, Result, ValidationError};
use crate::settings::SEPARATOR;

/// The two halves of a locator string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocatorParts {
    pub protocol: String,
    pub target: String,
}

impl LocatorParts {
    pub fn new(protocol: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            target: target.into(),
        }
    }
}

impl FromStr for LocatorParts {
    type Err = JvlError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

impl fmt::Display for LocatorParts {
    /// Raw `protocol:target` join, without the validation `stringify` performs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.protocol, SEPARATOR, self.target)
    }
}

/// Parse a locator string such as `require:./config.json`.
///
/// The first separator marks the boundary, so the target may itself contain
/// separators (`p:a:b` has target `a:b`).
pub fn parse(input: &str) -> Result<LocatorParts> {
    let index = match input.find(SEPARATOR) {
        Some(index) if input.chars().count() >= 2 + SEPARATOR.chars().count() => index,
        _ => {
            return Err(FormatError::MissingSeparator {
                input: input.to_string(),
            }
            .into());
        }
    };

    let (protocol, rest) = input.split_at(index);
    let target = &rest[SEPARATOR.len()..];

    if protocol.is_empty() {
        return Err(FormatError::MissingProtocol {
            input: input.to_string(),
        }
        .into());
    }

    if target.is_empty() {
        return Err(FormatError::MissingTarget {
            input: input.to_string(),
        }
        .into());
    }

    tracing::trace!(%input, "parsed locator string");

    Ok(LocatorParts::new(protocol, target))
}

/// Join a protocol and a target into a locator string.
///
/// Both halves are trimmed first; a half that is empty after trimming is
/// rejected so the result always parses back.
pub fn stringify(parts: &LocatorParts) -> Result<String> {
    let protocol = parts.protocol.trim();
    let target = parts.target.trim();

    if protocol.is_empty() {
        return Err(ValidationError::EmptyField { field: "protocol" }.into());
    }
    if target.is_empty() {
        return Err(ValidationError::EmptyField { field: "target" }.into());
    }

    if parts.protocol.contains(SEPARATOR) {
        return Err(FormatError::SeparatorInProtocol {
            protocol: parts.protocol.clone(),
        }
        .into());
    }

    Ok(format!("{}{}{}", protocol, SEPARATOR, target))
}
