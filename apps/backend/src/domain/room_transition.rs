use crate::entities::rooms::RoomStatus;

/// The slice of room state that transition derivation looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomLifecycleView {
    pub lock_version: i32,
    pub status: RoomStatus,
    pub guest_id: Option<i64>,
    pub turn: Option<i64>,
    pub winner_id: Option<i64>,
    pub instance_no: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomTransition {
    /// Explicit: a guest took the second seat.
    GuestJoined { player_id: i64 },

    /// Edge-triggered: both secrets landed, room moved to Playing.
    GameStarted,

    /// Edge-triggered: the turn became a specific player.
    TurnBecame { player_id: i64 },

    /// Edge-triggered: a winning guess moved the room to Completed.
    GameCompleted { winner_id: i64 },

    /// Edge-triggered: the guest seat was vacated.
    GuestLeft { player_id: i64 },

    /// Edge-triggered: room moved to Cancelled.
    RoomCancelled,

    /// Edge-triggered: a restart or departure opened a new instance.
    InstanceReset,
}

/// Derive domain transitions from before/after lifecycle state.
pub fn derive_room_transitions(
    before: &RoomLifecycleView,
    after: &RoomLifecycleView,
) -> Vec<RoomTransition> {
    let mut transitions = Vec::new();

    // 1. Guest seat changes
    match (before.guest_id, after.guest_id) {
        (None, Some(player_id)) => transitions.push(RoomTransition::GuestJoined { player_id }),
        (Some(player_id), None) => transitions.push(RoomTransition::GuestLeft { player_id }),
        _ => {}
    }

    // 2. Game start (-> Playing)
    if before.status != RoomStatus::Playing && after.status == RoomStatus::Playing {
        transitions.push(RoomTransition::GameStarted);
    }

    // 3. Turn change
    if let Some(player_id) = after.turn {
        if before.turn != Some(player_id) {
            transitions.push(RoomTransition::TurnBecame { player_id });
        }
    }

    // 4. Game end (-> Completed)
    if before.status != RoomStatus::Completed && after.status == RoomStatus::Completed {
        if let Some(winner_id) = after.winner_id {
            transitions.push(RoomTransition::GameCompleted { winner_id });
        }
    }

    // 5. Cancellation (-> Cancelled)
    if before.status != RoomStatus::Cancelled && after.status == RoomStatus::Cancelled {
        transitions.push(RoomTransition::RoomCancelled);
    }

    // 6. New instance
    if after.instance_no > before.instance_no {
        transitions.push(RoomTransition::InstanceReset);
    }

    transitions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(status: RoomStatus, guest: Option<i64>, turn: Option<i64>) -> RoomLifecycleView {
        RoomLifecycleView {
            lock_version: 1,
            status,
            guest_id: guest,
            turn,
            winner_id: None,
            instance_no: 1,
        }
    }

    #[test]
    fn test_derive_guest_joined() {
        let before = view(RoomStatus::Waiting, None, None);
        let after = view(RoomStatus::Preparing, Some(7), None);
        let transitions = derive_room_transitions(&before, &after);
        assert!(transitions.contains(&RoomTransition::GuestJoined { player_id: 7 }));
    }

    #[test]
    fn test_derive_game_started_and_first_turn() {
        let before = view(RoomStatus::Preparing, Some(7), None);
        let after = view(RoomStatus::Playing, Some(7), Some(7));
        let transitions = derive_room_transitions(&before, &after);
        assert!(transitions.contains(&RoomTransition::GameStarted));
        assert!(transitions.contains(&RoomTransition::TurnBecame { player_id: 7 }));
    }

    #[test]
    fn test_derive_game_completed() {
        let before = view(RoomStatus::Playing, Some(7), Some(7));
        let mut after = view(RoomStatus::Completed, Some(7), None);
        after.winner_id = Some(7);
        let transitions = derive_room_transitions(&before, &after);
        assert!(transitions.contains(&RoomTransition::GameCompleted { winner_id: 7 }));
    }

    #[test]
    fn test_derive_cancel_with_guest_clear() {
        let before = view(RoomStatus::Playing, Some(7), Some(3));
        let mut after = view(RoomStatus::Cancelled, None, None);
        after.instance_no = 2;
        let transitions = derive_room_transitions(&before, &after);
        assert!(transitions.contains(&RoomTransition::RoomCancelled));
        assert!(transitions.contains(&RoomTransition::GuestLeft { player_id: 7 }));
        assert!(transitions.contains(&RoomTransition::InstanceReset));
    }

    #[test]
    fn test_turn_flip() {
        let before = view(RoomStatus::Playing, Some(7), Some(3));
        let after = view(RoomStatus::Playing, Some(7), Some(7));
        let transitions = derive_room_transitions(&before, &after);
        assert_eq!(
            transitions,
            vec![RoomTransition::TurnBecame { player_id: 7 }]
        );
    }
}
