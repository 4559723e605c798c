use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::services::room_locks::RoomLocks;
use crate::ws::broker::RealtimeBroker;
use crate::ws::hub::WsRegistry;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    db: Option<DatabaseConnection>,
    /// Realtime broker (None when Redis is not configured, e.g. in tests)
    broker: Option<Arc<RealtimeBroker>>,
    /// Per-room mutation locks
    room_locks: Arc<RoomLocks>,
}

impl AppState {
    /// Create a new AppState with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db: Some(db),
            broker: None,
            room_locks: Arc::new(RoomLocks::new()),
        }
    }

    /// Create a new AppState without a database connection (for testing)
    pub fn new_without_db() -> Self {
        Self {
            db: None,
            broker: None,
            room_locks: Arc::new(RoomLocks::new()),
        }
    }

    /// Attach a realtime broker.
    pub fn with_broker(mut self, broker: Arc<RealtimeBroker>) -> Self {
        self.broker = Some(broker);
        self
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    pub fn broker(&self) -> Option<Arc<RealtimeBroker>> {
        self.broker.clone()
    }

    pub fn room_locks(&self) -> Arc<RoomLocks> {
        self.room_locks.clone()
    }

    /// Registry used by WebSocket sessions; present only with a broker.
    pub fn websocket_registry(&self) -> Option<Arc<WsRegistry>> {
        self.broker.as_ref().map(|b| b.registry())
    }
}
