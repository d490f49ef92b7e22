//! Hand-written forwarding shim used by the unit tests.
//!
//! Mirrors what `#[mockable]` generates, without depending on the macro.

use crate::call::{Arguments, MethodId, Owner};
use crate::handler::MockHandler;
use crate::proxy::{Mock, Proxy, ProxyId};
use crate::result::MockResult;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

pub(crate) trait Calculator {
    fn add(&self, a: i64, b: i64) -> i64;
    fn label(&self, n: u32) -> String;
}

const ADD: MethodId = MethodId::new(Owner::Trait("Calculator"), "add", "fn(&self, a: i64, b: i64) -> i64");
const LABEL: MethodId = MethodId::new(Owner::Trait("Calculator"), "label", "fn(&self, n: u32) -> String");

pub(crate) struct MockCalculator {
    proxy: Proxy,
}

impl MockCalculator {
    pub(crate) fn new() -> Self {
        crate::mock()
    }

    pub(crate) fn try_add(&self, a: i64, b: i64) -> MockResult<i64> {
        self.proxy.try_invoke(&ADD, Arguments::new().with(&a).with(&b))
    }

    pub(crate) fn handler(&self) -> &Rc<MockHandler> {
        self.proxy.handler()
    }

    pub(crate) fn proxy_id(&self) -> ProxyId {
        self.proxy.id()
    }
}

impl Mock for MockCalculator {
    const TYPE_NAME: &'static str = "MockCalculator";

    fn from_proxy(proxy: Proxy) -> Self {
        Self { proxy }
    }

    fn proxy(&self) -> &Proxy {
        &self.proxy
    }
}

impl Calculator for MockCalculator {
    fn add(&self, a: i64, b: i64) -> i64 {
        self.proxy.invoke(&ADD, Arguments::new().with(&a).with(&b))
    }

    fn label(&self, n: u32) -> String {
        self.proxy.invoke(&LABEL, Arguments::new().with(&n))
    }
}

impl fmt::Display for MockCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.proxy.invoke::<String>(&MethodId::OBJECT_TO_STRING, Arguments::new()))
    }
}

impl fmt::Debug for MockCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Hash for MockCalculator {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.proxy.invoke::<u64>(&MethodId::OBJECT_HASH, Arguments::new()).hash(state);
    }
}

impl PartialEq for MockCalculator {
    fn eq(&self, other: &Self) -> bool {
        self.proxy.invoke(&MethodId::OBJECT_EQ, Arguments::new().with(&other.proxy.id()))
    }
}

impl Eq for MockCalculator {}
