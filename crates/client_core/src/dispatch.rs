use shared::{domain::Unit, protocol::ClientAction};
use tokio::sync::mpsc;
use tracing::warn;

/// Translates confirmed gestures and plain taps into outbound action
/// requests.
///
/// Dispatch is fire-and-forget and performs no local mutation: the visible
/// list only changes when the authority's corresponding mutation event comes
/// back, which keeps the registry a single source of truth even when the
/// authority rejects or delays an action.
#[derive(Clone)]
pub struct ActionDispatcher {
    outbound: mpsc::UnboundedSender<ClientAction>,
}

impl ActionDispatcher {
    pub fn new(outbound: mpsc::UnboundedSender<ClientAction>) -> Self {
        Self { outbound }
    }

    /// Ordinary click on a line item. Unguarded: toggling taken state is
    /// freely reversible.
    pub fn toggle_taken(&self, name: &str, unit: Unit) {
        self.dispatch(ClientAction::ToggleTaken {
            name: name.to_string(),
            unit,
        });
    }

    pub fn reduce_quantity(&self, name: &str, unit: Unit) {
        self.dispatch(ClientAction::ReduceQuantity {
            name: name.to_string(),
            unit,
        });
    }

    pub fn remove_all(&self) {
        self.dispatch(ClientAction::RemoveAll);
    }

    pub fn remove_taken(&self) {
        self.dispatch(ClientAction::RemoveTaken);
    }

    pub(crate) fn dispatch(&self, action: ClientAction) {
        if self.outbound.send(action).is_err() {
            warn!("outbound action dropped: transport channel closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn item_actions_carry_name_and_unit() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let dispatcher = ActionDispatcher::new(tx);

        dispatcher.toggle_taken("Milk", Unit::Kg);
        dispatcher.reduce_quantity("Eggs", Unit::None);

        assert_eq!(
            rx.recv().await,
            Some(ClientAction::ToggleTaken {
                name: "Milk".into(),
                unit: Unit::Kg,
            })
        );
        assert_eq!(
            rx.recv().await,
            Some(ClientAction::ReduceQuantity {
                name: "Eggs".into(),
                unit: Unit::None,
            })
        );
    }

    #[tokio::test]
    async fn bulk_actions_carry_no_payload() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let dispatcher = ActionDispatcher::new(tx);

        dispatcher.remove_all();
        dispatcher.remove_taken();

        assert_eq!(rx.recv().await, Some(ClientAction::RemoveAll));
        assert_eq!(rx.recv().await, Some(ClientAction::RemoveTaken));
    }

    #[tokio::test]
    async fn closed_channel_is_tolerated() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let dispatcher = ActionDispatcher::new(tx);

        // Must log and move on, never panic.
        dispatcher.remove_all();
    }
}
