use std::sync::Arc;

use shared::protocol::ClientAction;
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, Duration, Instant},
};
use tracing::debug;

use crate::dispatch::ActionDispatcher;

/// Hold time confirming a reduce-quantity press on a line item.
pub const REDUCE_QUANTITY_DELAY: Duration = Duration::from_millis(1000);
/// Hold time confirming the bulk remove-all / remove-taken controls.
pub const BULK_REMOVE_DELAY: Duration = Duration::from_millis(3000);
/// Tolerance absorbing scheduler jitter between the timer firing and the
/// elapsed-time check.
pub const CONFIRM_SLACK: Duration = Duration::from_millis(5);

#[derive(Default)]
struct PressState {
    /// `Some` while a press is live; cleared on release, pointer exit, or
    /// once the confirmed action has fired.
    pressed_at: Option<Instant>,
    timer: Option<JoinHandle<()>>,
}

/// Per-target long-press state machine gating a destructive action behind a
/// deliberate sustained press.
///
/// A press starts a confirmation timer; releasing or leaving the target
/// before it fires aborts the timer and clears the recorded press, so a
/// timer callback that slips through anyway finds no live press and is a
/// no-op rather than an error. On expiry the action fires at most once per
/// press, and only if the press has been held for at least the configured
/// delay (minus [`CONFIRM_SLACK`]).
pub struct LongPressDetector {
    delay: Duration,
    action: ClientAction,
    dispatcher: ActionDispatcher,
    state: Arc<Mutex<PressState>>,
}

impl LongPressDetector {
    pub fn new(delay: Duration, action: ClientAction, dispatcher: ActionDispatcher) -> Self {
        Self {
            delay,
            action,
            dispatcher,
            state: Arc::new(Mutex::new(PressState::default())),
        }
    }

    /// Pointer-down on the target: arms the confirmation timer.
    pub async fn press(&self) {
        let timer = self.spawn_confirmation_timer();
        let mut state = self.state.lock().await;
        if let Some(stale) = state.timer.take() {
            stale.abort();
        }
        state.pressed_at = Some(Instant::now());
        state.timer = Some(timer);
    }

    /// Pointer-up before the timer fires: the action does not fire.
    pub async fn release(&self) {
        let mut state = self.state.lock().await;
        state.pressed_at = None;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
    }

    /// Pointer leaving the target cancels the press like a release.
    pub async fn pointer_left(&self) {
        self.release().await;
    }

    fn spawn_confirmation_timer(&self) -> JoinHandle<()> {
        let delay = self.delay;
        let action = self.action.clone();
        let dispatcher = self.dispatcher.clone();
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            time::sleep(delay).await;
            let mut state = state.lock().await;
            let Some(pressed_at) = state.pressed_at else {
                // Cancelled press; the late timer is a no-op.
                return;
            };
            if pressed_at.elapsed() + CONFIRM_SLACK < delay {
                debug!(?delay, "long press timer fired early; not confirming");
                return;
            }
            state.pressed_at = None;
            dispatcher.dispatch(action);
        })
    }
}

#[cfg(test)]
#[path = "tests/gesture_tests.rs"]
mod tests;
