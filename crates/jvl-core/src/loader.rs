//! The loader: turns locators into values by dispatching to protocols.
//!
//! Loading happens in two phases. Preparing a load validates the locator,
//! merges option and protocol layers, and resolves the protocol; every error
//! in this phase is returned synchronously. Dispatching then invokes the
//! protocol, whose settlement completes the returned future.

use futures::FutureExt;
use futures::future::try_join_all;

use crate::error::{Result, ValidationError, type_name};
use crate::locator::{Locator, LocatorObject, Options, ProtocolRef, Value};
use crate::merge::merge_options;
use crate::parser::parse;
use crate::protocol::{LoadFuture, ProtocolFn, settlement};
use crate::protocols::default_protocols;
use crate::registry::ProtocolRegistry;

/// Options for a batch load.
#[derive(Debug, Clone)]
pub enum BatchOptions {
    /// The same options for every locator.
    Shared(Options),
    /// One entry per locator; `None` means no options.
    PerLocator(Vec<Option<Options>>),
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self::Shared(Options::new())
    }
}

impl From<Options> for BatchOptions {
    fn from(options: Options) -> Self {
        Self::Shared(options)
    }
}

impl From<Vec<Option<Options>>> for BatchOptions {
    fn from(options: Vec<Option<Options>>) -> Self {
        Self::PerLocator(options)
    }
}

impl From<Vec<Options>> for BatchOptions {
    fn from(options: Vec<Options>) -> Self {
        Self::PerLocator(options.into_iter().map(Some).collect())
    }
}

/// Loads locators against an injected protocol registry.
#[derive(Debug, Clone)]
pub struct Loader {
    protocols: ProtocolRegistry,
}

impl Default for Loader {
    /// A loader using [`default_protocols`].
    fn default() -> Self {
        Self::new(default_protocols().clone())
    }
}

/// A load that passed validation and is ready to invoke its protocol.
struct Dispatch {
    protocol: ProtocolFn,
    target: String,
    options: Options,
}

impl Dispatch {
    fn start(self) -> Result<LoadFuture<Value>> {
        let (succeed, fail, future) = settlement(&self.target);

        tracing::debug!(target_name = %self.target, "dispatching protocol");
        self.protocol.call(succeed, fail, &self.target, &self.options)?;

        Ok(future)
    }
}

impl Loader {
    pub fn new(protocols: ProtocolRegistry) -> Self {
        Self { protocols }
    }

    /// The registry every load starts from.
    pub fn protocols(&self) -> &ProtocolRegistry {
        &self.protocols
    }

    /// Load a single locator.
    ///
    /// `options` take precedence over options embedded in the locator, while
    /// protocols embedded in the locator take precedence over this loader's
    /// registry.
    pub fn load(
        &self,
        locator: impl Into<Locator>,
        options: Option<Options>,
    ) -> Result<LoadFuture<Value>> {
        self.prepare(locator.into(), options.as_ref())?.start()
    }

    /// Load several locators concurrently.
    ///
    /// The result keeps input order. Every locator is validated before any
    /// protocol runs. The first failure rejects the whole batch; protocols
    /// already running are not interrupted.
    pub fn load_all(
        &self,
        locators: impl IntoIterator<Item = Locator>,
        options: impl Into<BatchOptions>,
    ) -> Result<LoadFuture<Vec<Value>>> {
        let locators: Vec<Locator> = locators.into_iter().collect();

        let dispatches = match options.into() {
            BatchOptions::Shared(options) => locators
                .into_iter()
                .map(|locator| self.prepare(locator, Some(&options)))
                .collect::<Result<Vec<_>>>()?,
            BatchOptions::PerLocator(options) => {
                if options.len() != locators.len() {
                    return Err(ValidationError::LengthMismatch {
                        locators: locators.len(),
                        options: options.len(),
                    }
                    .into());
                }
                locators
                    .into_iter()
                    .zip(options)
                    .map(|(locator, options)| self.prepare(locator, options.as_ref()))
                    .collect::<Result<Vec<_>>>()?
            }
        };

        tracing::debug!(count = dispatches.len(), "dispatching batch load");

        let futures = dispatches
            .into_iter()
            .map(Dispatch::start)
            .collect::<Result<Vec<_>>>()?;

        Ok(try_join_all(futures).boxed())
    }

    /// Load from dynamic data: a string, an object or an array of them.
    ///
    /// `options` may be `null`, an object, or (for an array of locators) an
    /// array of objects or nulls of the same length.
    pub fn load_value(&self, locator: &Value, options: &Value) -> Result<LoadFuture<Value>> {
        if let Value::Array(items) = locator {
            let locators = items
                .iter()
                .map(Locator::try_from)
                .collect::<Result<Vec<_>>>()?;

            let options = match options {
                Value::Array(entries) => BatchOptions::PerLocator(
                    entries
                        .iter()
                        .map(|entry| optional_object(entry, "options"))
                        .collect::<Result<Vec<_>>>()?,
                ),
                other => {
                    BatchOptions::Shared(optional_object(other, "options")?.unwrap_or_default())
                }
            };

            let future = self.load_all(locators, options)?;
            return Ok(future.map(|values| values.map(Value::Array)).boxed());
        }

        let locator = Locator::try_from(locator)?;
        self.load(locator, optional_object(options, "options")?)
    }

    fn prepare(&self, locator: Locator, options: Option<&Options>) -> Result<Dispatch> {
        let object = match locator {
            Locator::Text(text) => LocatorObject::from(parse(&text)?),
            Locator::Object(object) => object,
        };

        let empty = Options::new();
        let options = merge_options([
            object.options.as_ref().unwrap_or(&empty),
            options.unwrap_or(&empty),
        ]);

        let protocol = match &object.protocol {
            Some(ProtocolRef::Inline(protocol)) => protocol.clone(),
            Some(ProtocolRef::Named(name)) => match &object.protocols {
                Some(embedded) => ProtocolRegistry::layered([&self.protocols, embedded]).resolve(name)?,
                None => self.protocols.resolve(name)?,
            },
            None => {
                return Err(ValidationError::ProtocolType {
                    found: "undefined".to_string(),
                }
                .into());
            }
        };

        let target = match object.target {
            Some(target) if !target.is_empty() => target,
            _ => return Err(ValidationError::EmptyField { field: "target" }.into()),
        };

        Ok(Dispatch {
            protocol,
            target,
            options,
        })
    }
}

fn optional_object(value: &Value, field: &'static str) -> Result<Option<Options>> {
    match value {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map.clone())),
        other => Err(ValidationError::NotAnObject {
            field,
            found: type_name(other).to_string(),
        }
        .into()),
    }
}
