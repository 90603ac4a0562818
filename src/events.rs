use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

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
}

// The domain events emitted by mutating services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Inventory events
    ItemCreated(i32),
    ItemUpdated(i32),
    ItemDeactivated(i32),
    StockMovementRecorded {
        movement_id: i32,
        item_id: i32,
        movement_type: String,
        quantity: i32,
    },
    ItemRevalued {
        item_id: i32,
        method: String,
        total_value: rust_decimal::Decimal,
    },

    // Alert events
    AlertRaised {
        alert_id: i32,
        item_id: i32,
        alert_type: String,
    },
    AlertAcknowledged {
        alert_id: i32,
        acknowledged_by: i32,
    },

    // Booking events
    BookingCreated(i32),
    BookingApproved(i32),
    BookingDeclined(i32),
    BookingCheckedOut(i32),
    BookingReturned(i32),
    BookingCancelled(i32),

    // Transfer events
    TransferRequested(i32),
    TransferApproved(i32),
    TransferCompleted(i32),
    TransferCancelled(i32),

    // Purchasing events
    PurchaseOrderCreated(i32),
    PurchaseOrderStatusChanged {
        po_id: i32,
        old_status: String,
        new_status: String,
    },
    GoodsReceived {
        grn_id: i32,
        po_id: i32,
    },

    // User events
    UserRegistered(i32),
}

// Drains the event channel and logs each event. Runs as a spawned task
// for the lifetime of the server.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match serde_json::to_string(&event) {
            Ok(payload) => info!(event = %payload, "Domain event"),
            Err(e) => warn!("Failed to serialize event {:?}: {}", event, e),
        }
    }

    info!("Event channel closed; stopping event processing loop");
}
