//! Base-object methods answered by every mock without stubs.
//!
//! Identity is the proxy's [`ProxyId`], never the recorded stubs, so two
//! mocks of the same trait are always distinct in sets, maps and logs.

use crate::call::{Call, MethodId};
use crate::handler::Response;
use crate::proxy::{Proxy, ProxyId};
use crate::result::{MockError, MockResult};

/// Answer a base-object call made on `proxy`.
pub(crate) fn invoke(proxy: &Proxy, call: &Call) -> MockResult<Response> {
    let method = *call.method();
    if method == MethodId::OBJECT_TO_STRING {
        Ok(Response::value(identity_string(proxy.type_name(), proxy.id())))
    } else if method == MethodId::OBJECT_HASH {
        Ok(Response::value(identity_hash(proxy.id())))
    } else if method == MethodId::OBJECT_EQ {
        let other = call.args().first().and_then(|arg| arg.decode::<ProxyId>());
        Ok(Response::value(other == Some(proxy.id())))
    } else {
        Err(MockError::UnhandledBaseMethod { method })
    }
}

/// `<TypeName>@<hex identity hash>`
#[must_use]
pub fn identity_string(type_name: &str, id: ProxyId) -> String {
    format!("{type_name}@{:x}", identity_hash(id))
}

/// Process-unique hash of a proxy, derived from its identity alone
#[must_use]
pub const fn identity_hash(id: ProxyId) -> u64 {
    id.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::{Arguments, Owner};
    use crate::proxy::Mock;
    use crate::testing::MockCalculator;

    #[test]
    fn test_identity_string_format() {
        let calc = MockCalculator::new();
        let expected = format!("MockCalculator@{:x}", calc.proxy_id().get());
        assert_eq!(calc.to_string(), expected);
        assert_eq!(format!("{calc:?}"), expected);
    }

    #[test]
    fn test_identity_equality() {
        let a = MockCalculator::new();
        let b = MockCalculator::new();
        assert_eq!(a, a);
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_differs_per_proxy() {
        let a = MockCalculator::new();
        let b = MockCalculator::new();
        let hash_a = a.proxy().invoke::<u64>(&MethodId::OBJECT_HASH, Arguments::new());
        let hash_b = b.proxy().invoke::<u64>(&MethodId::OBJECT_HASH, Arguments::new());
        assert_eq!(hash_a, a.proxy_id().get());
        assert_ne!(hash_a, hash_b);
    }

    #[test]
    fn test_unknown_object_method() {
        const CLONE: MethodId = MethodId::new(Owner::Object, "clone", "fn(&self) -> Self");
        let calc = MockCalculator::new();
        let err = calc.proxy().try_invoke::<u64>(&CLONE, Arguments::new()).unwrap_err();
        assert!(matches!(err, MockError::UnhandledBaseMethod { method } if method == CLONE));
        assert_eq!(err.to_string(), "Unhandled Object method: Object::clone");
    }

    #[test]
    fn test_object_methods_bypass_recording() {
        let calc = MockCalculator::new();
        let result = crate::set_return_value(|| calc.to_string(), String::new());
        assert!(matches!(result, Err(MockError::NoStubbingCall)));
        assert_eq!(calc.handler().stub_count(), 0);
    }
}
