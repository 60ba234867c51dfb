//! Authoritative Simulation Tick
//!
//! One call to [`GameStateMachine::tick`] advances the world by one fixed
//! step. Fetching the preview frame and drawing are the caller's business;
//! everything in between happens here, in this order:
//!
//! 1. jump request (only honoured from rest)
//! 2. collision against the live obstacle (edge-triggered)
//! 3. movement: player physics, obstacles, clouds, ground, animation
//! 4. obstacle re-roll once one has left the screen
//! 5. score and speed ramp

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, trace};

use crate::game::collision::{award_tick, masks_overlap};
use crate::game::entities::{CloudLayer, GroundRing, Obstacles, Player};
use crate::game::state::{GameEvent, GameState, Phase, TickReport};

/// Owns every piece of mutable game state; the only writer to any of it.
pub struct GameStateMachine {
    state: GameState,
    player: Player,
    obstacles: Obstacles,
    clouds: CloudLayer,
    ground: GroundRing,
    rng: StdRng,
    collisions: bool,
    ticks: u64,
    distance: u64,
}

impl GameStateMachine {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let state = GameState::new();
        let obstacles = Obstacles::new(state.score, &mut rng);
        let clouds = CloudLayer::new(&mut rng);
        Self {
            state,
            player: Player::new(),
            obstacles,
            clouds,
            ground: GroundRing::new(),
            rng,
            collisions: true,
            ticks: 0,
            distance: 0,
        }
    }

    /// Practice mode when `false`: obstacles pass through the player.
    pub fn with_collisions(mut self, enabled: bool) -> Self {
        self.collisions = enabled;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn obstacles(&self) -> &Obstacles {
        &self.obstacles
    }

    pub fn clouds(&self) -> &CloudLayer {
        &self.clouds
    }

    pub fn ground(&self) -> &GroundRing {
        &self.ground
    }

    /// Ticks simulated since start (across restarts).
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Pixels scrolled since start; drives background parallax.
    pub fn distance(&self) -> u64 {
        self.distance
    }

    /// Whether this tick would act on a jump. The caller should only consume
    /// the jump latch when this is true; a jump raised while collided stays
    /// pending.
    pub fn accepts_jumps(&self) -> bool {
        self.state.is_running()
    }

    /// Advance one fixed step.
    pub fn tick(&mut self, jump_requested: bool) -> TickReport {
        let mut report = TickReport::default();
        self.ticks += 1;

        if jump_requested && self.state.is_running() {
            if self.player.jump() {
                report.events.push(GameEvent::Jumped);
            } else {
                trace!(y = self.player.y(), "jump dropped, player airborne");
            }
        }

        if self.state.is_running() && self.collisions && self.player_hits_obstacle() {
            self.state.phase = Phase::Collided;
            info!(score = self.state.score, speed = self.state.speed, "collided");
            report.events.push(GameEvent::Collided {
                score: self.state.score,
            });
        }

        match self.state.phase {
            Phase::Running => {
                let speed = self.state.speed;
                self.player.step();
                self.player.animate();
                self.obstacles.advance(speed);
                self.clouds.advance(speed, &mut self.rng);
                self.ground.advance(speed);
                self.distance += speed as u64;
            }
            Phase::Collided => self.player.settle(),
        }

        if let Some(kind) = self.obstacles.reroll_if_off_screen(self.state.score, &mut self.rng) {
            trace!(?kind, "new obstacle");
            report.events.push(GameEvent::ObstacleChanged(kind));
        }

        if self.state.is_running() && award_tick(&mut self.state) {
            debug!(score = self.state.score, speed = self.state.speed, "milestone");
            report.events.push(GameEvent::Milestone {
                score: self.state.score,
                speed: self.state.speed,
            });
        }

        report
    }

    /// Start a new run. Only valid after a collision; returns whether the
    /// restart happened.
    pub fn restart(&mut self) -> bool {
        if self.state.phase != Phase::Collided {
            return false;
        }
        info!(final_score = self.state.score, "restart");
        self.state = GameState::new();
        self.player = Player::new();
        self.obstacles.reset(self.state.score, &mut self.rng);
        true
    }

    fn player_hits_obstacle(&self) -> bool {
        let (rect, sprite) = self.obstacles.active_body();
        masks_overlap(self.player.sprite(), self.player.rect(), sprite, rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::BASE_WIDTH;
    use crate::game::entities::{ObstacleKind, PLAYER_REST_Y};
    use crate::game::state::{INITIAL_SPEED, MAX_SPEED};

    /// Run until the first collision, without jumping.
    fn crash(machine: &mut GameStateMachine) {
        for _ in 0..20_000 {
            if machine.tick(false).collided() {
                return;
            }
        }
        panic!("never collided");
    }

    #[test]
    fn test_airborne_jump_is_dropped() {
        let heights = |second_jump: bool| {
            let mut m = GameStateMachine::new(9).with_collisions(false);
            let mut ys = Vec::new();
            for t in 0..30 {
                let jump = t == 5 || (second_jump && t == 6);
                m.tick(jump);
                ys.push(m.player().y());
            }
            ys
        };
        assert_eq!(heights(false), heights(true));
        assert!(heights(false).iter().any(|&y| y < PLAYER_REST_Y));
    }

    #[test]
    fn test_jump_event_only_from_rest() {
        let mut m = GameStateMachine::new(1).with_collisions(false);
        assert!(m.tick(true).jumped());
        assert!(!m.tick(true).jumped());
    }

    #[test]
    fn test_collision_fires_once() {
        let mut m = GameStateMachine::new(4);
        crash(&mut m);
        assert_eq!(m.state().phase, Phase::Collided);
        let frozen_score = m.state().score;
        let frozen_obstacles = m.obstacles().clone();
        let frozen_ground = m.ground().clone();

        for _ in 0..100 {
            let report = m.tick(false);
            assert!(!report.collided());
            assert!(report.events.is_empty());
        }
        assert_eq!(m.state().phase, Phase::Collided);
        assert_eq!(m.state().score, frozen_score);
        assert_eq!(m.obstacles(), &frozen_obstacles);
        assert_eq!(m.ground(), &frozen_ground);
    }

    #[test]
    fn test_collided_ignores_jumps() {
        let mut m = GameStateMachine::new(4);
        crash(&mut m);
        assert!(!m.accepts_jumps());
        assert!(!m.tick(true).jumped());
    }

    #[test]
    fn test_player_settles_after_collision() {
        let mut m = GameStateMachine::new(4);
        crash(&mut m);
        m.player.jump();
        m.player.step();
        for _ in 0..30 {
            m.tick(false);
        }
        assert!(m.player().at_rest());
    }

    #[test]
    fn test_restart_resets_run() {
        let mut m = GameStateMachine::new(2);
        m.state = GameState {
            score: 537,
            speed: 15,
            phase: Phase::Collided,
        };
        m.player.jump();
        m.player.step();

        assert!(m.restart());
        assert_eq!(m.state(), &GameState::new());
        assert_eq!(m.state().score, 0);
        assert_eq!(m.state().speed, INITIAL_SPEED);
        assert_eq!(m.state().phase, Phase::Running);
        assert!(m.player().at_rest());
        assert_eq!(m.obstacles().ground.rect().x, BASE_WIDTH);
        assert_eq!(m.obstacles().flying.rect().x, BASE_WIDTH);
    }

    #[test]
    fn test_restart_ignored_while_running() {
        let mut m = GameStateMachine::new(2);
        m.tick(false);
        let score = m.state().score;
        assert!(!m.restart());
        assert_eq!(m.state().score, score);
    }

    #[test]
    fn test_score_and_speed_ramp() {
        let mut m = GameStateMachine::new(3).with_collisions(false);
        let mut milestones = 0;
        for i in 1..=1000u32 {
            let before = m.state().speed;
            let report = m.tick(false);
            assert_eq!(m.state().score, i);
            assert!(m.state().speed >= before && m.state().speed <= MAX_SPEED);
            milestones += report
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::Milestone { .. }))
                .count();
        }
        assert_eq!(m.state().speed, (INITIAL_SPEED + 10).min(MAX_SPEED));
        assert_eq!(milestones, 10);
    }

    #[test]
    fn test_obstacle_cycles_report_changes() {
        let mut m = GameStateMachine::new(8).with_collisions(false);
        let mut kinds = Vec::new();
        for _ in 0..2000 {
            for event in m.tick(false).events {
                if let GameEvent::ObstacleChanged(kind) = event {
                    kinds.push(kind);
                }
            }
        }
        assert!(kinds.len() > 10);
        assert!(kinds.contains(&ObstacleKind::Ground));
        assert!(kinds.contains(&ObstacleKind::Flying));
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = |seed| {
            let mut m = GameStateMachine::new(seed);
            let mut trace = Vec::new();
            for t in 0..600 {
                m.tick(t % 37 == 0);
                trace.push((m.state().clone(), m.player().y(), m.obstacles().active()));
            }
            trace
        };
        assert_eq!(run(77), run(77));
    }
}
