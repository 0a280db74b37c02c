//! Applying a default protocol to locators that lack one.

use crate::error::{Result, ValidationError};
use crate::locator::{Locator, LocatorObject, ProtocolRef};
use crate::parser::{LocatorParts, parse, stringify};

/// Return `locator` with `default_protocol` applied when it names no protocol.
///
/// A string that parses is returned unchanged. A string that fails to parse
/// becomes `default_protocol:<string>`, unless it failed because its target is
/// empty. Objects keep their options and protocols; inline protocols are kept
/// as they are.
pub fn set_locator_default_protocol(locator: &Locator, default_protocol: &str) -> Result<Locator> {
    match locator {
        Locator::Text(text) => default_text(text, default_protocol).map(Locator::Text),
        Locator::Object(object) => default_object(object, default_protocol).map(Locator::Object),
    }
}

/// Apply [`set_locator_default_protocol`] to every locator, keeping order.
pub fn set_locators_default_protocol(
    locators: &[Locator],
    default_protocol: &str,
) -> Result<Vec<Locator>> {
    locators
        .iter()
        .map(|locator| set_locator_default_protocol(locator, default_protocol))
        .collect()
}

fn default_text(text: &str, default_protocol: &str) -> Result<String> {
    match parse(text) {
        Ok(_) => Ok(text.to_string()),
        Err(err) if err.is_missing_target() => Err(err),
        Err(_) => stringify(&LocatorParts::new(default_protocol, text)),
    }
}

fn default_object(object: &LocatorObject, default_protocol: &str) -> Result<LocatorObject> {
    let target = object.target.clone().unwrap_or_default();

    let protocol = match &object.protocol {
        Some(ProtocolRef::Inline(protocol)) => {
            if target.trim().is_empty() {
                return Err(ValidationError::EmptyField { field: "target" }.into());
            }
            return Ok(LocatorObject {
                protocol: Some(ProtocolRef::Inline(protocol.clone())),
                ..object.clone()
            });
        }
        Some(ProtocolRef::Named(name)) if !name.is_empty() => name.as_str(),
        _ => default_protocol,
    };

    let text = stringify(&LocatorParts::new(protocol, target))?;
    let parts = parse(&default_text(&text, default_protocol)?)?;

    Ok(LocatorObject {
        protocol: Some(ProtocolRef::Named(parts.protocol)),
        target: Some(parts.target),
        options: object.options.clone(),
        protocols: object.protocols.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JvlError;

    fn text(locator: Locator) -> String {
        locator.as_text().unwrap().to_string()
    }

    fn parts(locator: Locator) -> (String, String) {
        let object = locator.as_object().unwrap().clone();
        let protocol = object.protocol.as_ref().and_then(ProtocolRef::as_name).unwrap().to_string();
        (protocol, object.target.unwrap())
    }

    #[test]
    fn test_valid_string_is_unchanged() {
        let out = set_locator_default_protocol(&"protocol:target".into(), "default-protocol").unwrap();
        assert_eq!(text(out), "protocol:target");
    }

    #[test]
    fn test_string_without_protocol_gets_default() {
        let out = set_locator_default_protocol(&"target-only".into(), "def").unwrap();
        assert_eq!(text(out), "def:target-only");
    }

    #[test]
    fn test_string_with_empty_protocol_keeps_separator_in_target() {
        let out = set_locator_default_protocol(&":target".into(), "def").unwrap();
        assert_eq!(text(out), "def::target");
    }

    #[test]
    fn test_string_without_target_is_rejected() {
        let err = set_locator_default_protocol(&"protocol:".into(), "def").unwrap_err();
        assert!(err.is_missing_target());
    }

    #[test]
    fn test_object_without_protocol_gets_default() {
        let locator = Locator::Object(LocatorObject::target_only("t"));
        let out = set_locator_default_protocol(&locator, "def").unwrap();
        assert_eq!(parts(out), ("def".to_string(), "t".to_string()));
    }

    #[test]
    fn test_object_with_protocol_is_kept() {
        let locator = Locator::Object(LocatorObject::new("p", " t "));
        let out = set_locator_default_protocol(&locator, "def").unwrap();
        assert_eq!(parts(out), ("p".to_string(), "t".to_string()));
    }

    #[test]
    fn test_object_without_target_is_rejected() {
        let locator = Locator::Object(LocatorObject {
            protocol: Some("p".into()),
            ..LocatorObject::default()
        });
        let err = set_locator_default_protocol(&locator, "def").unwrap_err();
        assert!(matches!(err, JvlError::Validation(_)));
    }

    #[test]
    fn test_object_keeps_options() {
        let mut options = crate::locator::Options::new();
        options.insert("k".into(), "v".into());
        let locator = Locator::Object(LocatorObject::target_only("t").with_options(options.clone()));

        let out = set_locator_default_protocol(&locator, "def").unwrap();
        assert_eq!(out.as_object().unwrap().options, Some(options));
    }

    #[test]
    fn test_arrays_are_mapped_in_order() {
        let locators = vec![
            Locator::from("a"),
            Locator::from("p:b"),
            Locator::Object(LocatorObject::target_only("c")),
        ];

        let out = set_locators_default_protocol(&locators, "def").unwrap();

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].as_text(), Some("def:a"));
        assert_eq!(out[1].as_text(), Some("p:b"));
        assert_eq!(parts(out[2].clone()), ("def".to_string(), "c".to_string()));
    }

    #[test]
    fn test_arrays_fail_on_first_invalid_entry() {
        let locators = vec![Locator::from("a"), Locator::from("protocol:")];
        assert!(set_locators_default_protocol(&locators, "def").is_err());
    }

    #[test]
    fn test_too_short_string_is_treated_as_target() {
        let out = set_locator_default_protocol(&"p:".into(), "def").unwrap();
        assert_eq!(text(out), "def:p:");
    }

    #[test]
    fn test_too_short_non_ascii_string_is_treated_as_target() {
        let out = set_locator_default_protocol(&"é:".into(), "def").unwrap();
        assert_eq!(text(out), "def:é:");
    }
}
