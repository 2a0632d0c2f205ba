use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info};
use uuid::Uuid;

/// Sender half of the in-process event channel
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing when the channel is closed.
    /// Domain operations must not fail because the event consumer is gone.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            error!("Event delivery failed: {}", e);
        }
    }
}

// The events that can occur in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Inventory events
    StockAdjusted {
        product_id: Uuid,
        warehouse_id: Uuid,
        delta: i32,
        stock_before: i32,
        stock_after: i32,
        reason: String,
        movement_id: Uuid,
    },
    StockEntryApplied {
        product_id: Uuid,
        warehouse_id: Uuid,
        quantity: i32,
        reference: Option<String>,
        movement_id: Uuid,
    },

    // Purchase events
    PurchaseCreated(Uuid),
    PurchaseUpdated(Uuid),
    PurchaseCancelled(Uuid),
    PurchaseReceived {
        purchase_id: Uuid,
        warehouse_id: Uuid,
        item_count: usize,
    },
    PurchaseDeleted(Uuid),

    // Catalog events
    ProductCreated(Uuid),
    ProductUpdated(Uuid),
    ProductDeactivated(Uuid),
    WarehouseCreated(Uuid),
    WarehouseUpdated(Uuid),

    // Business entity events
    BusinessEntityCreated(Uuid),
    BusinessEntityUpdated(Uuid),
    BusinessEntityDeactivated(Uuid),

    // User events
    UserCreated(Uuid),
    UserUpdated(Uuid),
    UserDeactivated(Uuid),

    // Generic event for custom messages
    Generic {
        message: String,
        timestamp: DateTime<Utc>,
        metadata: serde_json::Value,
    },
}

impl Event {
    /// Short machine-readable name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Event::StockAdjusted { .. } => "stock.adjusted",
            Event::StockEntryApplied { .. } => "stock.entry_applied",
            Event::PurchaseCreated(_) => "purchase.created",
            Event::PurchaseUpdated(_) => "purchase.updated",
            Event::PurchaseCancelled(_) => "purchase.cancelled",
            Event::PurchaseReceived { .. } => "purchase.received",
            Event::PurchaseDeleted(_) => "purchase.deleted",
            Event::ProductCreated(_) => "product.created",
            Event::ProductUpdated(_) => "product.updated",
            Event::ProductDeactivated(_) => "product.deactivated",
            Event::WarehouseCreated(_) => "warehouse.created",
            Event::WarehouseUpdated(_) => "warehouse.updated",
            Event::BusinessEntityCreated(_) => "entity.created",
            Event::BusinessEntityUpdated(_) => "entity.updated",
            Event::BusinessEntityDeactivated(_) => "entity.deactivated",
            Event::UserCreated(_) => "user.created",
            Event::UserUpdated(_) => "user.updated",
            Event::UserDeactivated(_) => "user.deactivated",
            Event::Generic { .. } => "generic",
        }
    }
}

/// Consumes the event channel until it closes, logging each event.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    info!("Event processor started");
    while let Some(event) = receiver.recv().await {
        match serde_json::to_string(&event) {
            Ok(payload) => info!(kind = event.kind(), payload = %payload, "domain event"),
            Err(e) => error!(kind = event.kind(), "failed to serialize event: {}", e),
        }
    }
    info!("Event processor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);

        sender
            .send(Event::ProductCreated(Uuid::new_v4()))
            .await
            .unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.kind(), "product.created");
    }

    #[tokio::test]
    async fn send_or_log_swallows_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);

        // Must not panic or error out
        sender.send_or_log(Event::PurchaseDeleted(Uuid::new_v4())).await;
    }
}
