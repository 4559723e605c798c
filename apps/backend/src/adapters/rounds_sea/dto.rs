//! DTOs for rounds_sea adapter.

/// DTO for recording one guess.
#[derive(Debug, Clone)]
pub struct RoundCreate {
    pub room_id: i64,
    pub instance_no: i32,
    pub player_id: i64,
    pub guess_digits: String,
    pub match_count: i16,
    pub round_number: i16,
}
