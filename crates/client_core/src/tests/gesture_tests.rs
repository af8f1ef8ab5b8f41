use super::*;

use shared::domain::Unit;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver};

use crate::dispatch::ActionDispatcher;

const DELAY: Duration = Duration::from_millis(1000);

fn detector(action: ClientAction) -> (LongPressDetector, UnboundedReceiver<ClientAction>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        LongPressDetector::new(DELAY, action, ActionDispatcher::new(tx)),
        rx,
    )
}

async fn settle() {
    // Give aborted/fired timer tasks a chance to run to completion under the
    // paused clock before asserting.
    time::sleep(Duration::from_millis(1)).await;
}

#[tokio::test(start_paused = true)]
async fn held_press_fires_the_action_exactly_once() {
    let (detector, mut rx) = detector(ClientAction::RemoveAll);

    detector.press().await;
    time::sleep(DELAY + Duration::from_millis(50)).await;

    assert_eq!(rx.try_recv(), Ok(ClientAction::RemoveAll));
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

    // Holding long past the delay never re-fires.
    time::sleep(DELAY * 3).await;
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test(start_paused = true)]
async fn early_release_fires_nothing() {
    let (detector, mut rx) = detector(ClientAction::RemoveAll);

    detector.press().await;
    time::sleep(DELAY - Duration::from_millis(200)).await;
    detector.release().await;

    time::sleep(DELAY * 2).await;
    settle().await;
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test(start_paused = true)]
async fn pointer_leaving_the_target_cancels_like_a_release() {
    let (detector, mut rx) = detector(ClientAction::RemoveTaken);

    detector.press().await;
    time::sleep(Duration::from_millis(100)).await;
    detector.pointer_left().await;

    time::sleep(DELAY * 2).await;
    settle().await;
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test(start_paused = true)]
async fn released_press_can_be_rearmed() {
    let (detector, mut rx) = detector(ClientAction::ReduceQuantity {
        name: "Milk".into(),
        unit: Unit::Kg,
    });

    detector.press().await;
    time::sleep(Duration::from_millis(300)).await;
    detector.release().await;

    detector.press().await;
    time::sleep(DELAY + Duration::from_millis(50)).await;

    assert_eq!(
        rx.try_recv(),
        Ok(ClientAction::ReduceQuantity {
            name: "Milk".into(),
            unit: Unit::Kg,
        })
    );
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test(start_paused = true)]
async fn rapid_repress_restarts_the_confirmation_window() {
    let (detector, mut rx) = detector(ClientAction::RemoveAll);

    detector.press().await;
    time::sleep(DELAY - Duration::from_millis(100)).await;
    // Second press replaces the first; the old timer must not confirm it.
    detector.press().await;
    time::sleep(Duration::from_millis(200)).await;
    settle().await;
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

    time::sleep(DELAY).await;
    assert_eq!(rx.try_recv(), Ok(ClientAction::RemoveAll));
}

#[tokio::test(start_paused = true)]
async fn release_after_a_confirmed_fire_is_a_noop() {
    let (detector, mut rx) = detector(ClientAction::RemoveAll);

    detector.press().await;
    time::sleep(DELAY + Duration::from_millis(50)).await;
    detector.release().await;

    assert_eq!(rx.try_recv(), Ok(ClientAction::RemoveAll));
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
}
