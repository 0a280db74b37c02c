//! Grammar settings for locator strings.

/// Separator between the protocol name and the target in a locator string.
pub const SEPARATOR: &str = ":";
