use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Domain events emitted by the catalog workflows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    MachineCreated(Uuid),
    MachineUpdated(Uuid),
    MachineDeleted(Uuid),
    MachineCloned { source_id: Uuid, clone_id: Uuid },
    CategoryCreated(Uuid),
    CategoryDeleted(Uuid),
    QuoteSubmitted(Uuid),
    UserRegistered(Uuid),
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Deliver the event, logging instead of failing when the channel is
    /// closed or full. Workflows never fail because of event delivery.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.sender.try_send(event) {
            warn!("event delivery skipped: {e}");
        }
    }
}

/// Background consumer; currently events only feed the log stream.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        info!(?event, "domain event");
    }
}

/// Convenience constructor wiring a channel and its logging consumer.
pub fn channel(capacity: usize) -> (EventSender, tokio::task::JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(capacity);
    let handle = tokio::spawn(process_events(rx));
    (EventSender::new(tx), handle)
}
