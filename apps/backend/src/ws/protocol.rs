use serde::{Deserialize, Serialize};

use crate::domain::snapshot::{RoomSnapshot, RoundView};

pub const PROTOCOL_VERSION: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Topic {
    #[serde(rename_all = "snake_case")]
    Room { id: i64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    Hello { protocol: i32 },
    Subscribe { topic: Topic },
    Unsubscribe { topic: Topic },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    HelloAck {
        protocol: i32,
        player_id: i64,
    },

    Ack {
        message: String,
    },

    /// Post-state snapshot of a room; clients replace their local copy.
    /// Duplicates are possible (at-least-once delivery); apply by comparing
    /// `updated_at`/`lock_version`.
    RoomChanged {
        topic: Topic,
        room: RoomSnapshot,
    },

    /// One newly scored guess; `round.id` makes re-delivery idempotent.
    RoundAdded {
        topic: Topic,
        round: RoundView,
    },

    Error {
        code: ErrorCode,
        message: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadProtocol,
    BadTopic,
    BadRequest,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BadProtocol => "bad_protocol",
            ErrorCode::BadTopic => "bad_topic",
            ErrorCode::BadRequest => "bad_request",
        }
    }
}
