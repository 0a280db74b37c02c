//! Checking locators without loading them.

use crate::locator::{Locator, LocatorObject, ProtocolRef, Value};
use crate::parser::parse;
use crate::settings::SEPARATOR;

/// Whether `locator` names a protocol and a target in a loadable shape.
///
/// Strings must parse. Objects need an inline protocol or a non-empty name
/// free of the separator, and a non-empty target. Nothing is looked up in a
/// registry and no protocol runs.
pub fn is_valid(locator: &Locator) -> bool {
    match locator {
        Locator::Text(text) => parse(text).is_ok(),
        Locator::Object(object) => is_valid_object(object),
    }
}

/// [`is_valid`] for document data; values that are not locators are invalid.
pub fn is_valid_value(value: &Value) -> bool {
    Locator::try_from(value).is_ok_and(|locator| is_valid(&locator))
}

fn is_valid_object(object: &LocatorObject) -> bool {
    let protocol_ok = match &object.protocol {
        Some(ProtocolRef::Inline(_)) => true,
        Some(ProtocolRef::Named(name)) => !name.trim().is_empty() && !name.contains(SEPARATOR),
        None => false,
    };

    let target_ok = object
        .target
        .as_deref()
        .is_some_and(|target| !target.trim().is_empty());

    protocol_ok && target_ok
}
