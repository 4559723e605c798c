use crate::domain::room_transition::{derive_room_transitions, RoomTransition};
use crate::repos::rooms::Room;
use crate::repos::rounds::Round;

/// Result of one accepted mutation: the authoritative post-state plus the
/// edge-triggered transitions derived from the before/after views.
#[derive(Debug)]
pub struct RoomFlowOutcome {
    pub room: Room,
    /// Present only for `submit_guess`: the round that was just recorded.
    pub new_round: Option<Round>,
    pub transitions: Vec<RoomTransition>,
}

impl RoomFlowOutcome {
    pub(super) fn from_change(before: Option<&Room>, after: Room, new_round: Option<Round>) -> Self {
        let transitions = match before {
            Some(before) => {
                derive_room_transitions(&before.lifecycle_view(), &after.lifecycle_view())
            }
            // Room creation has no before-state and no edges.
            None => Vec::new(),
        };
        Self {
            room: after,
            new_round,
            transitions,
        }
    }

    /// No-op outcome: state unchanged, nothing to derive.
    pub(super) fn unchanged(room: Room) -> Self {
        Self {
            room,
            new_round: None,
            transitions: Vec::new(),
        }
    }

    /// Winner id if this mutation completed the game.
    pub fn completed_winner(&self) -> Option<i64> {
        self.transitions.iter().find_map(|t| match t {
            RoomTransition::GameCompleted { winner_id } => Some(*winner_id),
            _ => None,
        })
    }

    /// True if this mutation cancelled the room.
    pub fn cancelled(&self) -> bool {
        self.transitions
            .iter()
            .any(|t| matches!(t, RoomTransition::RoomCancelled))
    }
}
