//! Round State Machine
//!
//! Tracks a room's round lifecycle. Both roles own one, but only the host
//! drives the scoring transitions; a guest just follows joins and leaves.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Round states
#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    /// No room yet
    Lobby,
    WaitingForOpponent,
    /// Host is waiting and may add a robot for the empty side
    AwaitingAiChoice,
    InRound,
    RoundEnded,
    MatchEnded,
    /// Peer dropped; ball parked until someone takes the seat again
    OpponentLeft,
}

/// Actions that trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundAction {
    SeatAsHost,
    SeatAsGuest,
    OpponentJoined,
    AddAi,
    BallOut,
    Relaunch,
    MatchWon,
    OpponentLeft,
    Leave,
}

/// Result of a state transition
#[derive(Debug, Clone)]
pub struct TransitionResult {
    success: bool,
    from_state: RoundState,
    to_state: RoundState,
    action: RoundAction,
}

impl TransitionResult {
    pub fn success(&self) -> bool {
        self.success
    }

    #[allow(clippy::wrong_self_convention)]
    pub fn from_state(&self) -> RoundState {
        self.from_state
    }

    pub fn to_state(&self) -> RoundState {
        self.to_state
    }

    pub fn action(&self) -> RoundAction {
        self.action
    }
}

/// Round Finite State Machine
#[derive(Debug, Clone)]
pub struct RoundFsm {
    state: RoundState,
}

impl RoundFsm {
    pub fn new() -> Self {
        Self {
            state: RoundState::Lobby,
        }
    }

    /// Get current state
    pub fn state(&self) -> RoundState {
        self.state
    }

    /// Check if a transition is valid
    pub fn can_transition(&self, action: RoundAction) -> bool {
        self.get_next_state(action).is_some()
    }

    /// Attempt a transition
    pub fn transition(&mut self, action: RoundAction) -> TransitionResult {
        let from_state = self.state;

        if let Some(next_state) = self.get_next_state(action) {
            self.state = next_state;
            tracing::debug!(?from_state, ?action, to_state = ?next_state, "round transition");
            TransitionResult {
                success: true,
                from_state,
                to_state: next_state,
                action,
            }
        } else {
            TransitionResult {
                success: false,
                from_state,
                to_state: from_state,
                action,
            }
        }
    }

    /// Get next state for a given action (if valid)
    fn get_next_state(&self, action: RoundAction) -> Option<RoundState> {
        use RoundAction as A;
        use RoundState as S;

        match (self.state, action) {
            // Seating
            (S::Lobby, A::SeatAsHost) => Some(S::AwaitingAiChoice),
            (S::Lobby, A::SeatAsGuest) => Some(S::WaitingForOpponent),

            // Round start
            (S::AwaitingAiChoice, A::OpponentJoined) => Some(S::InRound),
            (S::AwaitingAiChoice, A::AddAi) => Some(S::InRound),
            (S::WaitingForOpponent, A::OpponentJoined) => Some(S::InRound),

            // Scoring (host)
            (S::InRound, A::BallOut) => Some(S::RoundEnded),
            (S::RoundEnded, A::Relaunch) => Some(S::InRound),
            (S::RoundEnded, A::MatchWon) => Some(S::MatchEnded),
            (S::MatchEnded, A::Relaunch) => Some(S::InRound),

            // Disconnects
            (S::InRound | S::RoundEnded | S::MatchEnded, A::OpponentLeft) => {
                Some(S::OpponentLeft)
            }
            (S::OpponentLeft, A::OpponentJoined) => Some(S::InRound),

            // Leaving resets from anywhere
            (_, A::Leave) => Some(S::Lobby),

            // Invalid transition
            _ => None,
        }
    }

    /// A ball is in play (or about to be relaunched)
    pub fn is_started(&self) -> bool {
        matches!(
            self.state,
            RoundState::InRound | RoundState::RoundEnded | RoundState::MatchEnded
        )
    }

    /// Seated in a room, whatever the round is doing
    pub fn is_seated(&self) -> bool {
        self.state != RoundState::Lobby
    }
}

impl Default for RoundFsm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let fsm = RoundFsm::new();
        assert_eq!(fsm.state(), RoundState::Lobby);
        assert!(!fsm.is_seated());
    }

    #[test]
    fn test_invalid_transition() {
        let mut fsm = RoundFsm::new();
        let result = fsm.transition(RoundAction::BallOut);
        assert!(!result.success());
        assert_eq!(result.to_state(), RoundState::Lobby);
        assert_eq!(fsm.state(), RoundState::Lobby);
    }

    #[test]
    fn test_host_flow_with_robot() {
        let mut fsm = RoundFsm::new();
        fsm.transition(RoundAction::SeatAsHost);
        assert_eq!(fsm.state(), RoundState::AwaitingAiChoice);
        fsm.transition(RoundAction::AddAi);
        assert_eq!(fsm.state(), RoundState::InRound);
        assert!(fsm.is_started());
        fsm.transition(RoundAction::BallOut);
        assert_eq!(fsm.state(), RoundState::RoundEnded);
        fsm.transition(RoundAction::Relaunch);
        assert_eq!(fsm.state(), RoundState::InRound);
    }

    #[test]
    fn test_match_end_then_relaunch() {
        let mut fsm = RoundFsm::new();
        fsm.transition(RoundAction::SeatAsHost);
        fsm.transition(RoundAction::OpponentJoined);
        fsm.transition(RoundAction::BallOut);
        let result = fsm.transition(RoundAction::MatchWon);
        assert!(result.success());
        assert_eq!(result.from_state(), RoundState::RoundEnded);
        assert_eq!(fsm.state(), RoundState::MatchEnded);
        fsm.transition(RoundAction::Relaunch);
        assert_eq!(fsm.state(), RoundState::InRound);
    }

    #[test]
    fn test_robot_only_offered_while_waiting() {
        let mut fsm = RoundFsm::new();
        fsm.transition(RoundAction::SeatAsGuest);
        assert!(!fsm.can_transition(RoundAction::AddAi));
        fsm.transition(RoundAction::OpponentJoined);
        assert!(!fsm.can_transition(RoundAction::AddAi));
    }

    #[test]
    fn test_opponent_leaves_and_returns() {
        let mut fsm = RoundFsm::new();
        fsm.transition(RoundAction::SeatAsHost);
        fsm.transition(RoundAction::OpponentJoined);
        fsm.transition(RoundAction::OpponentLeft);
        assert_eq!(fsm.state(), RoundState::OpponentLeft);
        assert!(!fsm.is_started());
        fsm.transition(RoundAction::OpponentJoined);
        assert_eq!(fsm.state(), RoundState::InRound);
    }

    #[test]
    fn test_leave_from_anywhere() {
        let mut fsm = RoundFsm::new();
        fsm.transition(RoundAction::SeatAsHost);
        fsm.transition(RoundAction::AddAi);
        fsm.transition(RoundAction::Leave);
        assert_eq!(fsm.state(), RoundState::Lobby);
    }
}
