//! Game flow orchestration service - bridges pure domain logic with DB persistence.
//!
//! Every method runs inside one transaction handed in by the caller, which
//! holds the room's mutation lock for the whole operation. Methods return a
//! [`RoomFlowOutcome`] describing the post-state and the derived
//! transitions; the caller publishes events from it after commit.

mod lifecycle;
mod mutation;
mod player_actions;

/// Game flow service - generic over ConnectionTrait for transaction support.
#[derive(Default)]
pub struct GameFlowService;

impl GameFlowService {
    pub fn new() -> Self {
        Self
    }
}

pub use mutation::RoomFlowOutcome;
