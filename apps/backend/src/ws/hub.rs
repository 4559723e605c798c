//! In-process registry of WebSocket sessions, keyed by room.

use actix::prelude::*;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::snapshot::{RoomSnapshot, RoundView};

/// Event fanned out to sessions subscribed to a room topic.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub enum HubEvent {
    RoomChanged { room: RoomSnapshot },
    RoundAdded { round: RoundView },
}

impl HubEvent {
    pub fn room_id(&self) -> i64 {
        match self {
            HubEvent::RoomChanged { room } => room.id,
            HubEvent::RoundAdded { round } => round.room_id,
        }
    }
}

#[derive(Default)]
pub struct WsRegistry {
    sessions: DashMap<i64, DashMap<Uuid, Recipient<HubEvent>>>,
}

impl WsRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn register(&self, room_id: i64, recipient: Recipient<HubEvent>) -> Uuid {
        let token = Uuid::new_v4();
        let entry = self.sessions.entry(room_id).or_default();
        entry.insert(token, recipient);
        token
    }

    pub fn unregister(&self, room_id: i64, token: Uuid) {
        if let Some(entry) = self.sessions.get(&room_id) {
            entry.remove(&token);
            if entry.is_empty() {
                drop(entry);
                self.sessions.remove_if(&room_id, |_, v| v.is_empty());
            }
        }
    }

    pub fn broadcast(&self, room_id: i64, event: HubEvent) {
        if let Some(entry) = self.sessions.get(&room_id) {
            for recipient in entry.iter() {
                let _ = recipient.value().do_send(event.clone());
            }
        }
    }

    pub fn subscriber_count(&self, room_id: i64) -> usize {
        self.sessions.get(&room_id).map(|e| e.len()).unwrap_or(0)
    }
}
