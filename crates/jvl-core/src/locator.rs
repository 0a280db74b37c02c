//! Locator types.
//!
//! A locator says where a value lives (`target`) and how to load it
//! (`protocol`). It is written either as a `protocol:target` string or as an
//! object that may also carry options and extra protocols.

use std::fmt;

use crate::error::{JvlError, ValidationError, type_name};
use crate::parser::LocatorParts;
use crate::protocol::{Protocol, ProtocolFn, protocol_fn};
use crate::registry::ProtocolRegistry;

/// Any value a protocol can produce.
pub type Value = serde_json::Value;

/// Options passed to a protocol.
pub type Options = serde_json::Map<String, Value>;

/// The protocol half of a locator object.
#[derive(Clone)]
pub enum ProtocolRef {
    /// Looked up by name in the active registry.
    Named(String),
    /// Invoked directly.
    Inline(ProtocolFn),
}

impl ProtocolRef {
    pub fn inline<P: Protocol + 'static>(protocol: P) -> Self {
        Self::Inline(protocol_fn(protocol))
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name.as_str()),
            Self::Inline(_) => None,
        }
    }
}

impl fmt::Debug for ProtocolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Inline(_) => f.write_str("Inline(..)"),
        }
    }
}

impl From<&str> for ProtocolRef {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for ProtocolRef {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<ProtocolFn> for ProtocolRef {
    fn from(protocol: ProtocolFn) -> Self {
        Self::Inline(protocol)
    }
}

/// Object form of a locator.
///
/// Every field is optional so partially specified locators can be
/// normalized; the loader rejects a missing protocol or target.
#[derive(Debug, Clone, Default)]
pub struct LocatorObject {
    pub protocol: Option<ProtocolRef>,
    pub target: Option<String>,
    /// Base options, shadowed by options passed at load time.
    pub options: Option<Options>,
    /// Extra protocols, shadowing the injected registry.
    pub protocols: Option<ProtocolRegistry>,
}

impl LocatorObject {
    pub fn new(protocol: impl Into<ProtocolRef>, target: impl Into<String>) -> Self {
        Self {
            protocol: Some(protocol.into()),
            target: Some(target.into()),
            options: None,
            protocols: None,
        }
    }

    /// Locator with an inline protocol.
    pub fn inline<P: Protocol + 'static>(protocol: P, target: impl Into<String>) -> Self {
        Self::new(ProtocolRef::inline(protocol), target)
    }

    /// Locator carrying only a target.
    pub fn target_only(target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            ..Self::default()
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_protocols(mut self, protocols: ProtocolRegistry) -> Self {
        self.protocols = Some(protocols);
        self
    }
}

impl From<LocatorParts> for LocatorObject {
    fn from(parts: LocatorParts) -> Self {
        Self::new(parts.protocol, parts.target)
    }
}

/// A locator in string or object form.
#[derive(Debug, Clone)]
pub enum Locator {
    Text(String),
    Object(LocatorObject),
}

impl Locator {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Object(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&LocatorObject> {
        match self {
            Self::Text(_) => None,
            Self::Object(object) => Some(object),
        }
    }
}

impl From<&str> for Locator {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Locator {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<LocatorObject> for Locator {
    fn from(object: LocatorObject) -> Self {
        Self::Object(object)
    }
}

impl From<LocatorParts> for Locator {
    fn from(parts: LocatorParts) -> Self {
        Self::Object(parts.into())
    }
}

impl TryFrom<&Value> for Locator {
    type Error = JvlError;

    /// Read a locator from document data.
    ///
    /// Entries of a `protocols` object are declared by name only, since data
    /// cannot hold a callable.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let fields = match value {
            Value::String(text) => return Ok(Self::Text(text.clone())),
            Value::Object(fields) => fields,
            other => {
                return Err(ValidationError::LocatorType {
                    found: type_name(other).to_string(),
                }
                .into());
            }
        };

        let protocol = match fields.get("protocol") {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) => Some(ProtocolRef::Named(name.clone())),
            Some(other) => {
                return Err(ValidationError::ProtocolType {
                    found: type_name(other).to_string(),
                }
                .into());
            }
        };

        let target = match fields.get("target") {
            None | Some(Value::Null) => None,
            Some(Value::String(target)) => Some(target.clone()),
            Some(other) => {
                return Err(ValidationError::NotAString {
                    field: "locator.target",
                    found: type_name(other).to_string(),
                }
                .into());
            }
        };

        let options = match fields.get("options") {
            None | Some(Value::Null) => None,
            Some(Value::Object(options)) => Some(options.clone()),
            Some(other) => {
                return Err(ValidationError::NotAnObject {
                    field: "locator.options",
                    found: type_name(other).to_string(),
                }
                .into());
            }
        };

        let protocols = match fields.get("protocols") {
            None | Some(Value::Null) => None,
            Some(Value::Object(entries)) => {
                let mut registry = ProtocolRegistry::new();
                for (name, entry) in entries {
                    registry.declare(name.clone(), entry.clone());
                }
                Some(registry)
            }
            Some(other) => {
                return Err(ValidationError::NotAnObject {
                    field: "locator.protocols",
                    found: type_name(other).to_string(),
                }
                .into());
            }
        };

        Ok(Self::Object(LocatorObject {
            protocol,
            target,
            options,
            protocols,
        }))
    }
}

impl TryFrom<Value> for Locator {
    type Error = JvlError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::try_from(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_value_becomes_text_locator() {
        let locator = Locator::try_from(json!("require:./a.json")).unwrap();
        assert_eq!(locator.as_text(), Some("require:./a.json"));
    }

    #[test]
    fn test_object_value_becomes_object_locator() {
        let locator = Locator::try_from(json!({
            "protocol": "require",
            "target": "./a.json",
            "options": {"cwd": "/tmp"}
        }))
        .unwrap();

        let object = locator.as_object().unwrap();
        assert_eq!(object.protocol.as_ref().and_then(ProtocolRef::as_name), Some("require"));
        assert_eq!(object.target.as_deref(), Some("./a.json"));
        assert_eq!(object.options.as_ref().unwrap()["cwd"], json!("/tmp"));
        assert!(object.protocols.is_none());
    }

    #[test]
    fn test_wrong_protocol_types_are_rejected() {
        let cases = [
            (json!([]), "array"),
            (json!(7), "number"),
            (json!({}), "object"),
            (json!(false), "boolean"),
        ];
        for (protocol, found) in cases {
            let err = Locator::try_from(json!({"protocol": protocol, "target": "fake-module"}))
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                format!(
                    "{} is not a valid type for a locator.protocol. Valid types are function or string",
                    found
                )
            );
        }
    }

    #[test]
    fn test_non_locator_values_are_rejected() {
        for value in [json!(null), json!(4), json!(true), json!([])] {
            let err = Locator::try_from(&value).unwrap_err();
            assert!(matches!(
                err,
                JvlError::Validation(ValidationError::LocatorType { .. })
            ));
        }
    }

    #[test]
    fn test_non_object_options_are_rejected() {
        let err = Locator::try_from(json!({"protocol": "p", "target": "t", "options": "x"}))
            .unwrap_err();
        assert!(matches!(
            err,
            JvlError::Validation(ValidationError::NotAnObject { field: "locator.options", .. })
        ));
    }

    #[test]
    fn test_declared_protocols_are_registered_by_name() {
        let locator = Locator::try_from(json!({
            "protocol": "p",
            "target": "t",
            "protocols": {"p": "not-a-function"}
        }))
        .unwrap();

        let registry = locator.as_object().unwrap().protocols.as_ref().unwrap();
        assert!(registry.contains("p"));
        assert!(registry.get("p").is_none());
    }
}
