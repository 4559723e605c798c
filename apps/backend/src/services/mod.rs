pub mod game_flow;
pub mod room_locks;
pub mod stats;
