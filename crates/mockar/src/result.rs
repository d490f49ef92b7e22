//! Result and error types for Mockar.

use crate::call::{Call, MethodId};
use crate::proxy::ProxyId;
use thiserror::Error;

/// Result type for Mockar operations
pub type MockResult<T> = Result<T, MockError>;

/// Errors that can occur while recording or replaying mock calls
#[derive(Debug, Error)]
pub enum MockError {
    /// A recording session was started while another one is still armed
    #[error(
        "Already recording, make sure you don't call set_return_value and set_body nested or in one another"
    )]
    AlreadyRecording,

    /// The trigger call finished without reaching any mock
    #[error("No stubbing call was issued inside set_return_value or set_body")]
    NoStubbingCall,

    /// A handler was invoked for a proxy other than the one it is bound to
    #[error("Each MockHandler handles a single mock target only (bound to {bound}, called from {actual})")]
    MisboundHandler {
        /// Proxy the handler was bound to on first use
        bound: ProxyId,
        /// Proxy that issued the offending call
        actual: ProxyId,
    },

    /// Replayed call matched no stub
    #[error("No matching stub found for {call}\n{stubs}")]
    NoMatchingStub {
        /// The offending call
        call: Call,
        /// Dump of every registered stub
        stubs: String,
    },

    /// Replayed call matched more than one stub
    #[error("Multiple matching stubs found for {call}\n{stubs}")]
    AmbiguousStub {
        /// The offending call
        call: Call,
        /// Dump of the matching stubs
        stubs: String,
    },

    /// A base object method other than to_string/hash/eq reached the shim
    #[error("Unhandled Object method: {method}")]
    UnhandledBaseMethod {
        /// The unrecognized method
        method: MethodId,
    },

    /// A recorded behavior produced a value of another type than the method returns
    #[error("Stub for {method} produced {actual}, but the method returns {expected}")]
    ReturnTypeMismatch {
        /// Method being replayed
        method: MethodId,
        /// Declared return type
        expected: &'static str,
        /// Type produced by the recorded behavior
        actual: &'static str,
    },

    /// An argument could not be captured
    #[error("Failed to capture argument: {0}")]
    ArgumentEncoding(#[from] bincode::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MockError {
    /// Abort the current mocked call with this error.
    ///
    /// Mocked trait methods cannot return a `MockResult`, so failures inside
    /// them panic with the error itself as payload. The rendered diagnostic
    /// goes to the `mockar::handler` error event; `catch_unwind` callers can
    /// `downcast_ref::<MockError>()` the payload to tell the variants apart.
    pub fn raise(self) -> ! {
        tracing::error!(target: "mockar::handler", error = %self, "mock invocation failed");
        std::panic::panic_any(self)
    }
}
