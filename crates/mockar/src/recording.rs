//! Recording State: the slot that carries a behavior from
//! `set_return_value`/`set_body` to the next intercepted mock call.
//!
//! The slot is per thread. Test harnesses run tests on parallel threads,
//! and each recording session (arm, trigger call, stub creation, disarm)
//! completes on the thread that started it. Nesting a session inside the
//! trigger call of another is rejected with [`MockError::AlreadyRecording`].
//!
//! ```rust,ignore
//! let greeter = MockGreeter::new();
//! set_return_value(|| greeter.greet("ana"), "hi ana".to_string())?;
//! assert_eq!(greeter.greet("ana"), "hi ana");
//! ```

use crate::result::{MockError, MockResult};
use crate::stub::Behavior;
use std::cell::RefCell;
use std::marker::PhantomData;

thread_local! {
    static BEHAVIOR_TO_RECORD: RefCell<Option<Behavior>> = const { RefCell::new(None) };
}

/// Handle to the current thread's recording slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordingState;

impl RecordingState {
    /// Arm the slot with `behavior`.
    ///
    /// # Errors
    ///
    /// Returns [`MockError::AlreadyRecording`] if a behavior is already armed.
    pub fn arm(behavior: Behavior) -> MockResult<()> {
        BEHAVIOR_TO_RECORD.with(|slot| {
            let mut slot = slot.borrow_mut();
            if slot.is_some() {
                return Err(MockError::AlreadyRecording);
            }
            *slot = Some(behavior);
            Ok(())
        })
    }

    /// Reset the slot to "not recording"
    pub fn disarm() {
        BEHAVIOR_TO_RECORD.with(|slot| slot.borrow_mut().take());
    }

    /// Whether a behavior is waiting to be recorded
    #[must_use]
    pub fn is_armed() -> bool {
        BEHAVIOR_TO_RECORD.with(|slot| slot.borrow().is_some())
    }

    /// The armed behavior, if any. The slot stays armed until [`Self::disarm`].
    #[must_use]
    pub fn consume_armed() -> Option<Behavior> {
        BEHAVIOR_TO_RECORD.with(|slot| slot.borrow().clone())
    }
}

/// Keeps the slot armed for one recording session and disarms it on drop,
/// including when the trigger call unwinds.
#[must_use = "the slot is disarmed as soon as the guard is dropped"]
struct RecordingGuard {
    _thread_bound: PhantomData<*const ()>,
}

impl RecordingGuard {
    fn arm(behavior: Behavior) -> MockResult<Self> {
        RecordingState::arm(behavior)?;
        Ok(Self {
            _thread_bound: PhantomData,
        })
    }
}

impl Drop for RecordingGuard {
    fn drop(&mut self) {
        RecordingState::disarm();
    }
}

/// Record `value` as the response to the single mock call made by `trigger`.
///
/// # Errors
///
/// See [`set_body`].
pub fn set_return_value<R, T>(trigger: T, value: R) -> MockResult<()>
where
    R: Clone + 'static,
    T: FnOnce() -> R,
{
    record(trigger, Behavior::returning(value))
}

/// Record `behavior` as the response to the single mock call made by `trigger`.
///
/// `behavior` runs again on every matching replay.
///
/// # Errors
///
/// - [`MockError::AlreadyRecording`] if called while another session is armed
/// - [`MockError::NoStubbingCall`] if `trigger` never reached a mock
pub fn set_body<R, T, B>(trigger: T, behavior: B) -> MockResult<()>
where
    R: 'static,
    T: FnOnce() -> R,
    B: Fn() -> R + 'static,
{
    record(trigger, Behavior::body(behavior))
}

fn record<R>(trigger: impl FnOnce() -> R, behavior: Behavior) -> MockResult<()> {
    if RecordingState::is_armed() {
        return Err(MockError::AlreadyRecording);
    }
    tracing::trace!(target: "mockar::recording", behavior = %behavior, "armed");
    let _guard = RecordingGuard::arm(behavior)?;

    // The trigger's result is the handler's placeholder; nobody observes it.
    let _ = trigger();

    if RecordingState::is_armed() {
        return Err(MockError::NoStubbingCall);
    }
    Ok(())
}
