//! Protocol registries.
//!
//! A registry maps protocol names to protocol implementations. Registries are
//! plain values: the loader layers the injected registry under the one carried
//! by a locator and never mutates either.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ResolutionError, Result, type_name};
use crate::locator::Value;
use crate::merge::shallow_merge;
use crate::protocol::{Protocol, ProtocolFn, protocol_fn};

#[derive(Clone)]
enum Entry {
    Callable(ProtocolFn),
    /// A name declared by locator data that does not hold a protocol.
    Declared(Value),
}

/// Mapping from protocol name to protocol.
#[derive(Clone, Default)]
pub struct ProtocolRegistry {
    entries: BTreeMap<String, Entry>,
}

impl ProtocolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with<P: Protocol + 'static>(mut self, name: impl Into<String>, protocol: P) -> Self {
        self.insert(name, protocol_fn(protocol));
        self
    }

    /// Insert or replace the protocol registered under `name`.
    pub fn insert(&mut self, name: impl Into<String>, protocol: ProtocolFn) {
        self.entries.insert(name.into(), Entry::Callable(protocol));
    }

    /// Record a name bound to a plain value, as found in locator documents.
    ///
    /// The name counts as defined, but resolving it fails because the value
    /// cannot be invoked.
    pub fn declare(&mut self, name: impl Into<String>, value: Value) {
        self.entries.insert(name.into(), Entry::Declared(value));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ProtocolFn> {
        match self.entries.get(name)? {
            Entry::Callable(protocol) => Some(protocol),
            Entry::Declared(_) => None,
        }
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy every entry of `other` into this registry, replacing collisions.
    pub fn extend(&mut self, other: &ProtocolRegistry) {
        for (name, entry) in &other.entries {
            self.entries.insert(name.clone(), entry.clone());
        }
    }

    /// Combine registries, later layers winning on name collisions.
    pub fn layered<'a>(layers: impl IntoIterator<Item = &'a ProtocolRegistry>) -> Self {
        Self {
            entries: shallow_merge(layers.into_iter().map(|layer| &layer.entries)),
        }
    }

    /// Look up `name` and return a callable protocol.
    pub fn resolve(&self, name: &str) -> Result<ProtocolFn> {
        match self.entries.get(name) {
            Some(Entry::Callable(protocol)) => Ok(protocol.clone()),
            Some(Entry::Declared(value)) => Err(ResolutionError::NotCallable {
                name: name.to_string(),
                found: type_name(value).to_string(),
            }
            .into()),
            None => Err(ResolutionError::Undefined {
                name: name.to_string(),
                available: self.names().map(str::to_string).collect(),
            }
            .into()),
        }
    }
}

impl fmt::Debug for ProtocolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
