//! Proxy Factory: binds a mock object to its handler.
//!
//! A mock is any type implementing [`Mock`]: it owns a [`Proxy`] and forwards
//! every trait method to [`Proxy::invoke`]. `#[mockable]` generates such
//! types; a hand-written forwarding shim works the same way.
//!
//! ```rust,ignore
//! #[mockable]
//! trait Clock {
//!     fn now(&self) -> u64;
//! }
//!
//! let clock: MockClock = mockar::mock();
//! ```

use crate::call::{Arguments, MethodId};
use crate::handler::{MockHandler, Response};
use crate::placeholder::Placeholder;
use crate::result::{MockError, MockResult};
use serde::{Deserialize, Serialize};
use std::any::type_name;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_PROXY_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of one proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProxyId(u64);

impl ProxyId {
    /// Allocate a fresh identity
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_PROXY_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProxyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

/// Routes the method calls of one mock object to a [`MockHandler`].
#[derive(Debug)]
pub struct Proxy {
    id: ProxyId,
    type_name: &'static str,
    handler: Rc<MockHandler>,
}

impl Proxy {
    /// Proxy with a fresh identity and a fresh handler
    #[must_use]
    pub fn new(type_name: &'static str) -> Self {
        Self::with_handler(type_name, Rc::new(MockHandler::new()))
    }

    /// Proxy with a fresh identity served by an existing handler.
    ///
    /// A handler only ever serves the first proxy that calls it; sharing one
    /// between proxies makes the second proxy's calls fail.
    #[must_use]
    pub fn with_handler(type_name: &'static str, handler: Rc<MockHandler>) -> Self {
        Self {
            id: ProxyId::next(),
            type_name,
            handler,
        }
    }

    /// Identity of this proxy
    #[must_use]
    pub const fn id(&self) -> ProxyId {
        self.id
    }

    /// Declared type name used in the identity string
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Handler serving this proxy
    #[must_use]
    pub fn handler(&self) -> &Rc<MockHandler> {
        &self.handler
    }

    /// Route one call to the handler and convert its response to `R`.
    ///
    /// # Errors
    ///
    /// Any [`MockError`] raised by argument capture or by the handler, and
    /// [`MockError::ReturnTypeMismatch`] if the recorded behavior produced
    /// something other than `R`.
    pub fn try_invoke<R>(&self, method: &MethodId, args: Arguments) -> MockResult<R>
    where
        R: Placeholder + 'static,
    {
        let args = args.finish()?;
        match self.handler.intercept(self, method, args)? {
            Response::Placeholder => Ok(R::placeholder()),
            Response::Value { value, type_name: actual } => {
                value
                    .downcast::<R>()
                    .map(|value| *value)
                    .map_err(|_| MockError::ReturnTypeMismatch {
                        method: *method,
                        expected: type_name::<R>(),
                        actual,
                    })
            }
        }
    }

    /// [`Self::try_invoke`], failing the calling test on error.
    ///
    /// # Panics
    ///
    /// Panics with the rendered [`MockError`].
    pub fn invoke<R>(&self, method: &MethodId, args: Arguments) -> R
    where
        R: Placeholder + 'static,
    {
        self.try_invoke(method, args).unwrap_or_else(|err| err.raise())
    }
}

/// A synthesized stand-in for a trait.
pub trait Mock: Sized {
    /// Declared type name, shown in the identity string
    const TYPE_NAME: &'static str;

    /// Wrap a proxy
    fn from_proxy(proxy: Proxy) -> Self;

    /// The proxy every method forwards to
    fn proxy(&self) -> &Proxy;
}

/// Create a mock backed by a fresh handler.
#[must_use]
pub fn mock<M: Mock>() -> M {
    let proxy = Proxy::new(M::TYPE_NAME);
    tracing::trace!(target: "mockar::proxy", mock = M::TYPE_NAME, id = %proxy.id(), "created mock");
    M::from_proxy(proxy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::Owner;
    use crate::recording::set_body;
    use crate::testing::{Calculator, MockCalculator};

    const TOTAL: MethodId = MethodId::new(Owner::Trait("Calculator"), "total", "fn(&self) -> i64");

    #[test]
    fn test_ids_are_unique() {
        let a = ProxyId::next();
        let b = ProxyId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_mock_uses_fresh_handler() {
        let a: MockCalculator = mock();
        let b: MockCalculator = mock();
        assert!(!Rc::ptr_eq(a.proxy().handler(), b.proxy().handler()));
        assert_eq!(a.proxy().type_name(), MockCalculator::TYPE_NAME);
    }

    #[test]
    fn test_stubs_are_not_shared_between_mocks() {
        let a = MockCalculator::new();
        let b = MockCalculator::new();
        crate::set_return_value(|| a.add(2, 3), 5).unwrap();
        assert_eq!(a.add(2, 3), 5);
        assert!(matches!(b.try_add(2, 3), Err(MockError::NoMatchingStub { .. })));
    }

    #[test]
    fn test_return_type_mismatch() {
        let proxy = Proxy::new("MockCalculator");
        // Trigger returns i64 placeholder, behavior yields a &str.
        set_body(
            || {
                let _ = proxy.invoke::<i64>(&TOTAL, Arguments::new());
                "not a number"
            },
            || "not a number",
        )
        .unwrap();

        let err = proxy.try_invoke::<i64>(&TOTAL, Arguments::new()).unwrap_err();
        assert!(matches!(
            err,
            MockError::ReturnTypeMismatch { expected: "i64", actual: "&str", .. }
        ));
    }

    #[test]
    fn test_invoke_panics_with_diagnostic() {
        let proxy = Proxy::new("MockCalculator");
        let payload = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            proxy.invoke::<i64>(&TOTAL, Arguments::new())
        }))
        .unwrap_err();
        let err = payload.downcast_ref::<MockError>().expect("payload is a MockError");
        assert!(matches!(err, MockError::NoMatchingStub { .. }));
        assert!(err.to_string().starts_with("No matching stub found for total()"), "{err}");
    }
}
