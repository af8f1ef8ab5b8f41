//! Client-side synchronization and gesture-confirmation engine for a shared
//! shopping list.
//!
//! The authority owns the canonical list and pushes mutation events over a
//! websocket; this crate applies them to a local [`ProductRegistry`], derives
//! render operations for a [`ListView`], and gates destructive user actions
//! behind a long-press confirmation before dispatching them back. Nothing is
//! mutated optimistically: the authority's push events are the only source of
//! truth. The transport is assumed to deliver events ordered and at most
//! once; the engine performs no reordering, deduplication or retries.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use futures::{SinkExt, StreamExt};
use shared::{
    domain::Product,
    error::SyncError,
    protocol::{decode_event, encode_action, ClientAction, ListEvent},
};
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{info, warn};

pub mod dispatch;
pub mod gesture;
pub mod registry;
pub mod sync;
pub mod view;

pub use dispatch::ActionDispatcher;
pub use gesture::{LongPressDetector, BULK_REMOVE_DELAY, CONFIRM_SLACK, REDUCE_QUANTITY_DELAY};
pub use registry::{ProductRegistry, RenderOp};
pub use sync::ListSynchronizer;
pub use view::{ListView, NullView};

/// Notifications for observers (UI shells, diagnostics) about how inbound
/// traffic was handled. Failed events are skipped, never fatal.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    EventApplied(ListEvent),
    EventRejected { event: ListEvent, error: SyncError },
    FrameRejected { error: SyncError },
    Disconnected,
}

/// Connected list client: owns the synchronizer, the outbound action queue
/// and the websocket tasks feeding both.
pub struct ListClient<V: ListView> {
    sync: Mutex<ListSynchronizer<V>>,
    actions_tx: mpsc::UnboundedSender<ClientAction>,
    actions_rx: Mutex<Option<mpsc::UnboundedReceiver<ClientAction>>>,
    events: broadcast::Sender<ClientEvent>,
}

impl<V> ListClient<V>
where
    V: ListView + Send + 'static,
    V::Handle: Send,
{
    pub fn new(view: V) -> Arc<Self> {
        let (actions_tx, actions_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            sync: Mutex::new(ListSynchronizer::new(view)),
            actions_tx,
            actions_rx: Mutex::new(Some(actions_rx)),
            events,
        })
    }

    /// Cloneable dispatcher feeding the outbound action queue.
    pub fn dispatcher(&self) -> ActionDispatcher {
        ActionDispatcher::new(self.actions_tx.clone())
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    /// Current registry contents in list order.
    pub async fn snapshot(&self) -> Vec<Product> {
        self.sync.lock().await.registry().snapshot()
    }

    /// Applies one inbound event and broadcasts the outcome. Public so
    /// alternative transports and tests can feed events directly.
    pub async fn apply(&self, event: ListEvent) -> Result<(), SyncError> {
        let result = self.sync.lock().await.apply(&event);
        match &result {
            Ok(()) => {
                let _ = self.events.send(ClientEvent::EventApplied(event));
            }
            Err(error) => {
                warn!(%error, "skipping event the registry cannot apply");
                let _ = self.events.send(ClientEvent::EventRejected {
                    event,
                    error: error.clone(),
                });
            }
        }
        result
    }

    /// Connects to the authority and spawns the reader and writer tasks.
    /// An `http(s)://` base URL is mapped to `ws(s)://` with `/ws` appended;
    /// a `ws(s)://` URL is used exactly as given.
    pub async fn connect(self: &Arc<Self>, server_url: &str) -> Result<()> {
        let ws_url = if let Some(rest) = server_url.strip_prefix("https://") {
            format!("wss://{rest}/ws")
        } else if let Some(rest) = server_url.strip_prefix("http://") {
            format!("ws://{rest}/ws")
        } else if server_url.starts_with("ws://") || server_url.starts_with("wss://") {
            server_url.to_string()
        } else {
            return Err(anyhow!(
                "server_url must start with http://, https://, ws:// or wss://"
            ));
        };

        let mut actions_guard = self.actions_rx.lock().await;
        if actions_guard.is_none() {
            return Err(anyhow!("client is already connected"));
        }

        let (ws_stream, _) = connect_async(&ws_url)
            .await
            .with_context(|| format!("failed to connect websocket: {ws_url}"))?;
        let (mut ws_writer, mut ws_reader) = ws_stream.split();
        info!(url = %ws_url, "connected to list authority");

        let mut actions_rx = actions_guard
            .take()
            .ok_or_else(|| anyhow!("client is already connected"))?;
        drop(actions_guard);

        tokio::spawn(async move {
            while let Some(action) = actions_rx.recv().await {
                let text = match encode_action(&action) {
                    Ok(text) => text,
                    Err(error) => {
                        warn!(%error, ?action, "skipping action that failed to encode");
                        continue;
                    }
                };
                if ws_writer.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
        });

        let client = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(msg) = ws_reader.next().await {
                match msg {
                    Ok(Message::Text(text)) => client.handle_frame(&text).await,
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(err) => {
                        warn!("websocket receive failed: {err}");
                        break;
                    }
                }
            }
            let _ = client.events.send(ClientEvent::Disconnected);
        });

        Ok(())
    }

    async fn handle_frame(&self, text: &str) {
        match decode_event(text) {
            Ok(event) => {
                let _ = self.apply(event).await;
            }
            Err(error) => {
                warn!(%error, "skipping undecodable frame");
                let _ = self.events.send(ClientEvent::FrameRejected { error });
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
