use crate::Side;

/// Time resource for tracking simulation time
#[derive(Debug, Clone, Copy)]
pub struct Time {
    pub dt: f32,  // Delta time for this step
    pub now: f32, // Total elapsed time, seconds
}

impl Time {
    pub fn new(dt: f32, now: f32) -> Self {
        Self { dt, now }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self {
            dt: crate::Params::FIXED_DT,
            now: 0.0,
        }
    }
}

/// Match score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub left: u8,
    pub right: u8,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, side: Side) {
        match side {
            Side::Left => self.left = self.left.saturating_add(1),
            Side::Right => self.right = self.right.saturating_add(1),
        }
    }

    pub fn get(&self, side: Side) -> u8 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn has_winner(&self, max_score: u8) -> Option<Side> {
        if self.left >= max_score {
            Some(Side::Left)
        } else if self.right >= max_score {
            Some(Side::Right)
        } else {
            None
        }
    }
}

/// Random number generator
pub struct GameRng(pub rand::rngs::StdRng);

impl GameRng {
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::seed_from_u64(seed))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// Events that occurred during this frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Events {
    pub ball_hit_paddle: Option<Side>,
    pub ball_hit_wall: bool,
    /// Side that earns the point after the ball left the world
    pub ball_out: Option<Side>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Keys held this frame, per paddle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub left_up: bool,
    pub left_down: bool,
    pub right_up: bool,
    pub right_down: bool,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// (up, down) held for a side
    pub fn held(&self, side: Side) -> (bool, bool) {
        match side {
            Side::Left => (self.left_up, self.left_down),
            Side::Right => (self.right_up, self.right_down),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_increment() {
        let mut score = Score::new();
        score.increment(Side::Left);
        score.increment(Side::Left);
        score.increment(Side::Right);
        assert_eq!(score, Score { left: 2, right: 1 });
    }

    #[test]
    fn test_score_has_winner_left() {
        let mut score = Score::new();
        for _ in 0..11 {
            score.increment(Side::Left);
        }
        assert_eq!(score.has_winner(11), Some(Side::Left));
    }

    #[test]
    fn test_score_has_winner_right() {
        let mut score = Score::new();
        for _ in 0..11 {
            score.increment(Side::Right);
        }
        assert_eq!(score.has_winner(11), Some(Side::Right));
    }

    #[test]
    fn test_score_no_winner_below_threshold() {
        let score = Score { left: 10, right: 10 };
        assert_eq!(score.has_winner(11), None);
    }

    #[test]
    fn test_score_reset() {
        let mut score = Score { left: 4, right: 9 };
        score.reset();
        assert_eq!(score, Score::new());
    }

    #[test]
    fn test_events_clear() {
        let mut events = Events {
            ball_hit_paddle: Some(Side::Left),
            ball_hit_wall: true,
            ball_out: Some(Side::Right),
        };
        events.clear();
        assert_eq!(events, Events::new());
    }

    #[test]
    fn test_key_state_held() {
        let keys = KeyState {
            left_up: true,
            right_down: true,
            ..KeyState::new()
        };
        assert_eq!(keys.held(Side::Left), (true, false));
        assert_eq!(keys.held(Side::Right), (false, true));
    }
}
