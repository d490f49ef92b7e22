//! Recorded behaviors and the stubs that pair them with a call.

use crate::call::Call;
use std::any::{type_name, Any};
use std::fmt;
use std::rc::Rc;

type Respond = dyn Fn() -> Box<dyn Any>;

/// A zero-argument response function, with its result type erased.
///
/// The function is run again on every replay; results are never cached.
#[derive(Clone)]
pub struct Behavior {
    label: String,
    produces: &'static str,
    respond: Rc<Respond>,
}

impl Behavior {
    /// Behavior that returns a clone of `value` on every replay
    #[must_use]
    pub fn returning<R: Clone + 'static>(value: R) -> Self {
        Self::erase(format!("returns {}", type_name::<R>()), move || value.clone())
    }

    /// Behavior that runs `body` on every replay
    #[must_use]
    pub fn body<R, F>(body: F) -> Self
    where
        R: 'static,
        F: Fn() -> R + 'static,
    {
        Self::erase(format!("body -> {}", type_name::<R>()), body)
    }

    fn erase<R, F>(label: String, f: F) -> Self
    where
        R: 'static,
        F: Fn() -> R + 'static,
    {
        Self {
            label,
            produces: type_name::<R>(),
            respond: Rc::new(move || Box::new(f()) as Box<dyn Any>),
        }
    }

    /// Run the response function
    #[must_use]
    pub fn respond(&self) -> Box<dyn Any> {
        (self.respond)()
    }

    /// Name of the type the response function produces
    #[must_use]
    pub const fn produces(&self) -> &'static str {
        self.produces
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behavior")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// A recorded call and the behavior that answers it.
#[derive(Debug)]
pub struct Stub {
    call: Call,
    behavior: Behavior,
}

impl Stub {
    /// Pair a call with a behavior
    #[must_use]
    pub const fn new(call: Call, behavior: Behavior) -> Self {
        Self { call, behavior }
    }

    /// The call this stub answers
    #[must_use]
    pub const fn call(&self) -> &Call {
        &self.call
    }

    /// The recorded behavior
    #[must_use]
    pub const fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    /// Whether `call` is structurally equal to the recorded call
    #[must_use]
    pub fn matches(&self, call: &Call) -> bool {
        self.call == *call
    }
}

impl fmt::Display for Stub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.call, self.behavior)
    }
}
