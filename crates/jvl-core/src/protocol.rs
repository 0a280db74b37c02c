//! The protocol contract and its settlement handles.
//!
//! A protocol receives a [`Succeed`] and a [`Fail`] handle, the target and the
//! merged options. It must settle the load through exactly one of the handles,
//! either before returning or later from another task. Returning `Err` signals
//! a precondition violation and aborts the load synchronously.

use std::fmt;
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use tokio::sync::oneshot;

use crate::error::{JvlError, Result};
use crate::locator::{Options, Value};

/// A value resolution function.
pub trait Protocol: Send + Sync {
    fn call(&self, succeed: Succeed, fail: Fail, target: &str, options: &Options) -> Result<()>;
}

impl<F> Protocol for F
where
    F: Fn(Succeed, Fail, &str, &Options) -> Result<()> + Send + Sync,
{
    fn call(&self, succeed: Succeed, fail: Fail, target: &str, options: &Options) -> Result<()> {
        self(succeed, fail, target, options)
    }
}

/// Shared handle to a protocol implementation.
pub type ProtocolFn = Arc<dyn Protocol>;

/// Wrap a closure or protocol type into a shareable handle.
pub fn protocol_fn<P: Protocol + 'static>(protocol: P) -> ProtocolFn {
    Arc::new(protocol)
}

type Outcome = std::result::Result<Value, JvlError>;

/// Single-settlement slot shared by a `Succeed`/`Fail` pair.
#[derive(Clone)]
struct Settlement {
    sender: Arc<Mutex<Option<oneshot::Sender<Outcome>>>>,
    target: Arc<str>,
}

impl Settlement {
    fn settle(&self, outcome: Outcome) {
        let sender = match self.sender.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        match sender {
            // The receiver may already be gone when a sibling in a batch failed.
            Some(sender) => {
                let _ = sender.send(outcome);
            }
            None => tracing::debug!(
                locator_target = %self.target,
                "ignoring second settlement of an already settled load"
            ),
        }
    }
}

/// Handle used by a protocol to deliver the loaded value.
#[derive(Clone)]
pub struct Succeed(Settlement);

impl Succeed {
    /// Settle the load with `value`. Ignored if the load is already settled.
    pub fn call(self, value: impl Into<Value>) {
        self.0.settle(Ok(value.into()));
    }
}

/// Handle used by a protocol to report a failure.
#[derive(Clone)]
pub struct Fail(Settlement);

impl Fail {
    /// Settle the load with `error`. Ignored if the load is already settled.
    pub fn call(self, error: impl Into<anyhow::Error>) {
        self.0.settle(Err(JvlError::Execution(error.into())));
    }
}

impl fmt::Debug for Succeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Succeed").field(&self.0.target).finish()
    }
}

impl fmt::Debug for Fail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Fail").field(&self.0.target).finish()
    }
}

/// Future returned by the loader.
pub type LoadFuture<T> = BoxFuture<'static, Result<T>>;

/// Create a settlement pair for `target` and the future it settles.
pub(crate) fn settlement(target: &str) -> (Succeed, Fail, LoadFuture<Value>) {
    let (sender, receiver) = oneshot::channel();
    let settlement = Settlement {
        sender: Arc::new(Mutex::new(Some(sender))),
        target: Arc::from(target),
    };

    let target = target.to_string();
    let future: LoadFuture<Value> = Box::pin(async move {
        receiver
            .await
            .unwrap_or(Err(JvlError::Abandoned { target }))
    });

    (Succeed(settlement.clone()), Fail(settlement), future)
}
