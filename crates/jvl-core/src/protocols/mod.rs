//! Built-in protocols.

mod require;

use std::sync::LazyLock;

use crate::registry::ProtocolRegistry;

pub use require::{MODULE_EXTENSIONS, RequireProtocol, resolve_module};

static DEFAULT_PROTOCOLS: LazyLock<ProtocolRegistry> =
    LazyLock::new(|| ProtocolRegistry::new().with("require", RequireProtocol));

/// The built-in registry: `require`.
///
/// Custom registries are built by cloning it and inserting more protocols.
pub fn default_protocols() -> &'static ProtocolRegistry {
    &DEFAULT_PROTOCOLS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_holds_require_only() {
        let names: Vec<_> = default_protocols().names().collect();
        assert_eq!(names, vec!["require"]);
        assert!(default_protocols().resolve("require").is_ok());
    }

    #[test]
    fn test_default_registry_is_shared() {
        assert!(std::ptr::eq(default_protocols(), default_protocols()));
    }
}
