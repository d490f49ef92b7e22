//! Call identity: which method was invoked, with which arguments.
//!
//! Arguments are captured through `bincode` so that two calls compare equal
//! exactly when their argument values serialize identically. The `Debug`
//! rendering of each argument is kept alongside for diagnostics.

use crate::result::{MockError, MockResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// Capability a method is declared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    /// Universal base-object methods every mock answers (`to_string`, `hash`, `eq`)
    Object,
    /// The mocked trait, by name
    Trait(&'static str),
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object => f.write_str("Object"),
            Self::Trait(name) => f.write_str(name),
        }
    }
}

/// Stable key distinguishing one declared method from another.
///
/// Generated mocks keep one `static MethodId` per trait method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodId {
    owner: Owner,
    name: &'static str,
    signature: &'static str,
}

impl MethodId {
    /// `Object::to_string`, answered with the proxy's identity string
    pub const OBJECT_TO_STRING: Self = Self::new(Owner::Object, "to_string", "fn(&self) -> String");
    /// `Object::hash`, answered with the proxy's identity hash
    pub const OBJECT_HASH: Self = Self::new(Owner::Object, "hash", "fn(&self) -> u64");
    /// `Object::eq`, answered with proxy reference equality
    pub const OBJECT_EQ: Self = Self::new(Owner::Object, "eq", "fn(&self, other: &Self) -> bool");

    /// Create a method identity
    #[must_use]
    pub const fn new(owner: Owner, name: &'static str, signature: &'static str) -> Self {
        Self {
            owner,
            name,
            signature,
        }
    }

    /// Declaring capability
    #[must_use]
    pub const fn owner(&self) -> Owner {
        self.owner
    }

    /// Method name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Rendered signature
    #[must_use]
    pub const fn signature(&self) -> &'static str {
        self.signature
    }

    /// Whether this is one of the base-object methods rather than a trait method
    #[must_use]
    pub const fn is_object_method(&self) -> bool {
        matches!(self.owner, Owner::Object)
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.owner, self.name)
    }
}

/// One captured argument value.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Argument {
    type_name: &'static str,
    encoded: Vec<u8>,
    rendered: String,
}

impl Argument {
    /// Capture a value.
    ///
    /// # Errors
    ///
    /// Returns [`MockError::ArgumentEncoding`] if the value cannot be serialized.
    pub fn capture<T>(value: &T) -> MockResult<Self>
    where
        T: Serialize + fmt::Debug + ?Sized,
    {
        Ok(Self {
            type_name: std::any::type_name::<T>(),
            encoded: bincode::serialize(value)?,
            rendered: format!("{value:?}"),
        })
    }

    /// Decode the captured value back into `T`, if it was captured from one
    #[must_use]
    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        bincode::deserialize(&self.encoded).ok()
    }

    /// Type name of the captured value
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Debug rendering of the captured value
    #[must_use]
    pub fn rendered(&self) -> &str {
        &self.rendered
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

/// Accumulates the arguments of one invocation.
///
/// The first capture failure is kept and reported by [`Arguments::finish`];
/// later values are ignored once a capture has failed.
#[derive(Debug, Default)]
pub struct Arguments {
    captured: Vec<Argument>,
    failure: Option<MockError>,
}

impl Arguments {
    /// Start an empty argument list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one argument
    #[must_use]
    pub fn with<T>(mut self, value: &T) -> Self
    where
        T: Serialize + fmt::Debug + ?Sized,
    {
        if self.failure.is_none() {
            match Argument::capture(value) {
                Ok(argument) => self.captured.push(argument),
                Err(err) => self.failure = Some(err),
            }
        }
        self
    }

    /// Number of arguments captured so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.captured.len()
    }

    /// Whether no argument has been captured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.captured.is_empty()
    }

    /// Finish the list.
    ///
    /// # Errors
    ///
    /// Returns the first capture failure, if any.
    pub fn finish(self) -> MockResult<Vec<Argument>> {
        match self.failure {
            Some(err) => Err(err),
            None => Ok(self.captured),
        }
    }
}

/// One method invocation: method identity plus ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Call {
    method: MethodId,
    args: Vec<Argument>,
}

impl Call {
    /// Create a call
    #[must_use]
    pub const fn new(method: MethodId, args: Vec<Argument>) -> Self {
        Self { method, args }
    }

    /// Invoked method
    #[must_use]
    pub const fn method(&self) -> &MethodId {
        &self.method
    }

    /// Ordered arguments
    #[must_use]
    pub fn args(&self) -> &[Argument] {
        &self.args
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.method.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(arg.rendered())?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    const GREET: MethodId = MethodId::new(Owner::Trait("Greeter"), "greet", "fn(&self, name: &str) -> String");
    const WAVE: MethodId = MethodId::new(Owner::Trait("Greeter"), "wave", "fn(&self, times: u32)");

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn call(method: MethodId, args: Arguments) -> Call {
        Call::new(method, args.finish().unwrap())
    }

    #[test]
    fn test_display_lists_arguments() {
        let c = call(GREET, Arguments::new().with("ana").with(&3_u8));
        assert_eq!(c.to_string(), "greet(\"ana\", 3)");
        assert_eq!(call(WAVE, Arguments::new()).to_string(), "wave()");
    }

    #[test]
    fn test_none_is_an_argument() {
        let none: Option<u32> = None;
        let c = call(WAVE, Arguments::new().with(&none));
        assert_eq!(c.args().len(), 1);
        assert_eq!(c.to_string(), "wave(None)");
        assert_ne!(c, call(WAVE, Arguments::new().with(&Some(0_u32))));
    }

    #[test]
    fn test_method_identity_distinguishes_calls() {
        let a = call(GREET, Arguments::new().with(&1_u32));
        let b = call(WAVE, Arguments::new().with(&1_u32));
        assert_ne!(a, b);

        let other_trait = MethodId::new(Owner::Trait("Farewell"), "greet", GREET.signature());
        assert_ne!(a, call(other_trait, Arguments::new().with(&1_u32)));
    }

    #[test]
    fn test_argument_decode() {
        let arg = Argument::capture(&42_u64).unwrap();
        assert_eq!(arg.decode::<u64>(), Some(42));
        assert_eq!(arg.rendered(), "42");
        assert_eq!(arg.type_name(), "u64");
    }

    #[derive(Debug)]
    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("socket handles cannot be captured"))
        }
    }

    #[test]
    fn test_first_capture_failure_is_kept() {
        let args = Arguments::new()
            .with(&1_u8)
            .with(&Unencodable)
            .with(&2_u8)
            .with("ignored");
        assert_eq!(args.len(), 1);

        match args.finish() {
            Err(MockError::ArgumentEncoding(err)) => {
                assert!(err.to_string().contains("socket handles cannot be captured"), "{err}");
            }
            other => panic!("expected an encoding failure, got {other:?}"),
        }
    }

    #[test]
    fn test_object_methods_are_flagged() {
        assert!(MethodId::OBJECT_EQ.is_object_method());
        assert!(!GREET.is_object_method());
        assert_eq!(MethodId::OBJECT_HASH.to_string(), "Object::hash");
        assert_eq!(GREET.to_string(), "Greeter::greet");
    }

    proptest! {
        #[test]
        fn prop_equal_arguments_give_equal_calls(
            name in ".*",
            count in any::<u32>(),
            flag in any::<Option<bool>>(),
        ) {
            let a = call(GREET, Arguments::new().with(name.as_str()).with(&count).with(&flag));
            let b = call(GREET, Arguments::new().with(name.as_str()).with(&count).with(&flag));
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(hash_of(&a), hash_of(&b));
        }

        #[test]
        fn prop_different_arguments_give_different_calls(x in any::<i64>(), y in any::<i64>()) {
            prop_assume!(x != y);
            let a = call(WAVE, Arguments::new().with(&x));
            let b = call(WAVE, Arguments::new().with(&y));
            prop_assert_ne!(a, b);
        }
    }
}
