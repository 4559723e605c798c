pub mod player_id;
pub mod room_id;
