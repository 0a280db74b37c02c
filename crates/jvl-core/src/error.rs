//! Error types for locator parsing, validation, protocol resolution and execution.

use thiserror::Error;

use crate::settings::SEPARATOR;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, JvlError>;

/// Umbrella error returned by every public operation.
#[derive(Debug, Error)]
pub enum JvlError {
    /// The locator string grammar was violated.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// An argument had the wrong type or shape.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The referenced protocol could not be resolved to a callable.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// The protocol ran and reported a failure through `fail`.
    #[error(transparent)]
    Execution(anyhow::Error),

    /// The protocol dropped both settlement handles without settling.
    #[error("the protocol loading \"{target}\" finished without settling the load")]
    Abandoned { target: String },
}

impl JvlError {
    /// Whether this error was raised while parsing a string with an empty target.
    pub fn is_missing_target(&self) -> bool {
        matches!(self, Self::Format(FormatError::MissingTarget { .. }))
    }
}

/// Locator string grammar violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error(
        "\"{input}\" is not a valid Javascript Value Locator string. It must contains the seperator sign \"{}\" between a protocol name and a target name",
        SEPARATOR
    )]
    MissingSeparator { input: String },

    #[error("\"{input}\" is not a valid Javascript Value Locator string. The protocol is missing.")]
    MissingProtocol { input: String },

    #[error("\"{input}\" is not a valid Javascript Value Locator string. The target is missing.")]
    MissingTarget { input: String },

    #[error("The protocol name \"{protocol}\" is not valid. It shouldn't contains the sign \"{}\"", SEPARATOR)]
    SeparatorInProtocol { protocol: String },
}

/// Type and shape contract violations, raised before any protocol runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{found} is not a valid type for a locator. Valid types are string or object")]
    LocatorType { found: String },

    #[error("{found} is not a valid type for a locator.protocol. Valid types are function or string")]
    ProtocolType { found: String },

    #[error("{found} is not a valid type for {field}. It must be an object")]
    NotAnObject { field: &'static str, found: String },

    #[error("{found} is not a valid type for {field}. It must be a string")]
    NotAString { field: &'static str, found: String },

    #[error("The locator {field} must be a non-empty string")]
    EmptyField { field: &'static str },

    #[error(
        "Unable to load {locators} locator(s) with {options} options objects. The options array must have the same length as the locators array"
    )]
    LengthMismatch { locators: usize, options: usize },
}

/// The protocol name did not resolve to a callable protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("\"{name}\" is not a defined protocol. {}", describe_available(.available))]
    Undefined { name: String, available: Vec<String> },

    #[error(
        "\"{name}\" is of type \"{found}\" and is not a valid protocol. A valid protocol must be a function"
    )]
    NotCallable { name: String, found: String },
}

fn describe_available(available: &[String]) -> String {
    let quoted = available
        .iter()
        .map(|name| format!("\"{}\"", name))
        .collect::<Vec<_>>()
        .join(", ");

    match available.len() {
        0 => "No protocol is defined".to_string(),
        1 => format!("Existing protocol is {}", quoted),
        _ => format!("Existing protocols are {}", quoted),
    }
}

/// Type name of a dynamic value, as used in validation messages.
pub fn type_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
