//! Mockar: Record-then-Replay Trait Mocks
//!
//! Mockar synthesizes stand-in implementations of traits. A test records
//! what a mock should answer by making the call once inside
//! [`set_return_value`] or [`set_body`]; later calls with equal arguments
//! replay the recorded behavior.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                      MOCKAR Architecture                         │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  set_body ──► RecordingState (per thread, one slot)              │
//! │                     │ armed                                      │
//! │                     ▼                                            │
//! │  MockT::method ──► Proxy ──► MockHandler ──► Stub registry       │
//! │                                  │                               │
//! │                                  └──► Object shim (eq/hash/str)  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use mockar::{mockable, set_body, set_return_value};
//!
//! #[mockable]
//! trait Greeter {
//!     fn greet(&self, name: &str) -> String;
//! }
//!
//! let greeter = MockGreeter::new();
//! set_return_value(|| greeter.greet("ana"), "hi ana".to_string())?;
//! assert_eq!(greeter.greet("ana"), "hi ana");
//! ```

#![warn(missing_docs)]

mod call;
mod handler;
mod object;
mod placeholder;
mod proxy;
mod recording;
mod report;
mod result;
mod stub;

/// Tracing subscriber setup for test runs
pub mod logging;

#[cfg(test)]
mod testing;

pub use call::{Argument, Arguments, Call, MethodId, Owner};
pub use handler::{MockHandler, Response};
pub use object::{identity_hash, identity_string};
pub use placeholder::Placeholder;
pub use proxy::{mock, Mock, Proxy, ProxyId};
pub use recording::{set_body, set_return_value, RecordingState};
pub use report::{RegistryReport, StubEntry};
pub use result::{MockError, MockResult};
pub use stub::{Behavior, Stub};

/// Generate a `Mock<Trait>` type for a trait
#[cfg(feature = "derive")]
pub use mockar_derive::mockable;
