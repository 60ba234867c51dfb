//! Score, speed, phase, and what a tick reports back.

use crate::game::entities::ObstacleKind;

pub const INITIAL_SPEED: u32 = 10;
pub const MAX_SPEED: u32 = 23;
/// Every this many points the score chimes and the game speeds up.
pub const SCORE_STEP: u32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    Collided,
}

/// Per-run numbers. Replaced wholesale on restart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub score: u32,
    /// Scroll speed in pixels per tick; never decreases within a run.
    pub speed: u32,
    pub phase: Phase,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            score: 0,
            speed: INITIAL_SPEED,
            phase: Phase::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Something that happened during a tick. The app turns these into sounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// The player left the ground.
    Jumped,
    /// The player hit the live obstacle; the run is over.
    Collided { score: u32 },
    /// The score reached a multiple of [`SCORE_STEP`].
    Milestone { score: u32, speed: u32 },
    /// A new obstacle life-cycle began.
    ObstacleChanged(ObstacleKind),
}

/// Result of a tick.
#[derive(Clone, Debug, Default)]
pub struct TickReport {
    pub events: Vec<GameEvent>,
}

impl TickReport {
    pub fn collided(&self) -> bool {
        self.events.iter().any(|e| matches!(e, GameEvent::Collided { .. }))
    }

    pub fn jumped(&self) -> bool {
        self.events.contains(&GameEvent::Jumped)
    }
}
