//! JVL Core Library
//!
//! Resolves value locators (`protocol:target` strings or locator objects) to
//! values by dispatching to pluggable protocols.
//!
//! ```no_run
//! # async fn demo() -> jvl_core::Result<()> {
//! let value = jvl_core::load("require:./settings.json", None)?.await?;
//! # let _ = value;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;
pub mod locator;
pub mod merge;
pub mod normalize;
pub mod parser;
pub mod protocol;
pub mod protocols;
pub mod registry;
pub mod settings;
pub mod valid;

pub use error::{JvlError, Result};
pub use loader::{BatchOptions, Loader};
pub use locator::{Locator, LocatorObject, Options, ProtocolRef, Value};
pub use normalize::{set_locator_default_protocol, set_locators_default_protocol};
pub use parser::{LocatorParts, parse, stringify};
pub use protocol::{Fail, LoadFuture, Protocol, Succeed};
pub use protocols::default_protocols;
pub use registry::ProtocolRegistry;
pub use valid::{is_valid, is_valid_value};

/// Load a locator with the default protocols.
pub fn load(locator: impl Into<Locator>, options: Option<Options>) -> Result<LoadFuture<Value>> {
    Loader::default().load(locator, options)
}

/// Load several locators with the default protocols.
pub fn load_all(
    locators: impl IntoIterator<Item = Locator>,
    options: impl Into<BatchOptions>,
) -> Result<LoadFuture<Vec<Value>>> {
    Loader::default().load_all(locators, options)
}

/// Re-exports of commonly used types
pub mod prelude {
    // Locators
    pub use crate::locator::{Locator, LocatorObject, Options, ProtocolRef, Value};
    pub use crate::parser::{LocatorParts, parse, stringify};
    pub use crate::valid::{is_valid, is_valid_value};

    // Loading
    pub use crate::loader::{BatchOptions, Loader};
    pub use crate::normalize::{set_locator_default_protocol, set_locators_default_protocol};

    // Protocols
    pub use crate::protocol::{Fail, LoadFuture, Protocol, Succeed};
    pub use crate::protocols::{RequireProtocol, default_protocols};
    pub use crate::registry::ProtocolRegistry;

    // Errors
    pub use crate::error::{FormatError, JvlError, ResolutionError, ValidationError};
}
