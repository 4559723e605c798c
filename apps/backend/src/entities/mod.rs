//! SeaORM entity models for the Codebreak schema.

pub mod game_rounds;
pub mod rooms;
pub mod users;
