//! Mock Handler: intercepts every call made on one mock.
//!
//! Each intercepted call is either recorded (a behavior is armed in
//! [`RecordingState`]) or replayed against the stubs recorded so far.
//! Matching is exact structural equality of the [`Call`]; recording the same
//! call twice makes every later replay of it ambiguous.

use crate::call::{Argument, Call, MethodId};
use crate::object;
use crate::proxy::{Proxy, ProxyId};
use crate::recording::RecordingState;
use crate::report::RegistryReport;
use crate::result::{MockError, MockResult};
use crate::stub::Stub;
use std::any::Any;
use std::cell::{OnceCell, RefCell};
use std::fmt;
use std::rc::Rc;

/// What an intercepted call answers with.
pub enum Response {
    /// The call was recorded; the proxy returns its placeholder value
    Placeholder,
    /// The call was answered with a value
    Value {
        /// Produced value
        value: Box<dyn Any>,
        /// Type name of `value`
        type_name: &'static str,
    },
}

impl Response {
    pub(crate) fn value<T: Any>(value: T) -> Self {
        Self::Value {
            value: Box::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder => f.write_str("Placeholder"),
            Self::Value { type_name, .. } => write!(f, "Value({type_name})"),
        }
    }
}

/// Stub registry and dispatch logic for a single mock.
#[derive(Debug, Default)]
pub struct MockHandler {
    proxy: OnceCell<ProxyId>,
    stubs: RefCell<Vec<Rc<Stub>>>,
}

impl MockHandler {
    /// Create an unbound handler with no stubs
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle one call made on `proxy`.
    ///
    /// # Errors
    ///
    /// - [`MockError::MisboundHandler`] if `proxy` is not the proxy this handler first served
    /// - [`MockError::NoMatchingStub`] / [`MockError::AmbiguousStub`] on replay
    /// - [`MockError::UnhandledBaseMethod`] for unknown base-object methods
    pub fn intercept(&self, proxy: &Proxy, method: &MethodId, args: Vec<Argument>) -> MockResult<Response> {
        self.bind(proxy.id())?;
        let call = Call::new(*method, args);

        if method.is_object_method() {
            tracing::trace!(target: "mockar::handler", handler = %self, %call, "object method");
            return object::invoke(proxy, &call);
        }

        if let Some(behavior) = RecordingState::consume_armed() {
            tracing::debug!(target: "mockar::handler", handler = %self, %call, %behavior, "recording");
            self.stubs.borrow_mut().push(Rc::new(Stub::new(call, behavior)));
            RecordingState::disarm();
            return Ok(Response::Placeholder);
        }

        tracing::debug!(target: "mockar::handler", handler = %self, %call, "replaying");
        self.replay(call)
    }

    fn bind(&self, actual: ProxyId) -> MockResult<()> {
        let bound = *self.proxy.get_or_init(|| actual);
        if bound == actual {
            Ok(())
        } else {
            Err(MockError::MisboundHandler { bound, actual })
        }
    }

    fn replay(&self, call: Call) -> MockResult<Response> {
        // Clone matches out so the registry is not borrowed while a behavior
        // runs; behaviors may call back into this mock.
        let matching: Vec<Rc<Stub>> = self
            .stubs
            .borrow()
            .iter()
            .filter(|stub| stub.matches(&call))
            .cloned()
            .collect();

        match matching.as_slice() {
            [] => {
                let stubs = self.describe(&call);
                Err(MockError::NoMatchingStub { call, stubs })
            }
            [stub] => {
                let behavior = stub.behavior();
                Ok(Response::Value {
                    value: behavior.respond(),
                    type_name: behavior.produces(),
                })
            }
            _ => {
                let stubs =
                    RegistryReport::new(self.to_string(), Some(&call), matching.iter().map(|stub| &**stub)).render();
                Err(MockError::AmbiguousStub { call, stubs })
            }
        }
    }

    /// Proxy this handler is bound to, once it has served a call
    #[must_use]
    pub fn bound_proxy(&self) -> Option<ProxyId> {
        self.proxy.get().copied()
    }

    /// Number of recorded stubs
    #[must_use]
    pub fn stub_count(&self) -> usize {
        self.stubs.borrow().len()
    }

    /// Recorded calls, in recording order
    #[must_use]
    pub fn recorded_calls(&self) -> Vec<Call> {
        self.stubs.borrow().iter().map(|stub| stub.call().clone()).collect()
    }

    /// Snapshot of the registry, annotating stubs that match `call`
    #[must_use]
    pub fn report(&self, call: Option<&Call>) -> RegistryReport {
        RegistryReport::new(self.to_string(), call, self.stubs.borrow().iter().map(|stub| &**stub))
    }

    /// Text dump of every stub, marking those that match `call`
    #[must_use]
    pub fn describe(&self, call: &Call) -> String {
        self.report(Some(call)).render()
    }
}

impl fmt::Display for MockHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.proxy.get() {
            Some(id) => write!(f, "MockHandler+{id}"),
            None => f.write_str("MockHandler+unbound"),
        }
    }
}
