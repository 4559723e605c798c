//! Realtime change notification: Redis-backed broker, in-process session
//! registry, and the WebSocket sessions that deliver events to clients.

pub mod broker;
pub mod hub;
pub mod protocol;
pub mod session;
