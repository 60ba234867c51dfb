//! Player, obstacles and scrolling decor, with their per-tick update rules.
//!
//! All coordinates are in the logical 640×480 screen, y pointing down, and
//! describe an entity's top-left corner.

use std::collections::VecDeque;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::game::sprites::{SPRITES, Sprite};
use crate::game::{BASE_HEIGHT, BASE_WIDTH};

// ── Geometry ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        (x0 < x1 && y0 < y1).then(|| Rect::new(x0, y0, x1 - x0, y1 - y0))
    }
}

// ── Player ──────────────────────────────────────────────────────────────────

pub const PLAYER_X: i32 = 127;
pub const PLAYER_SIZE: i32 = 96;
/// Resting top edge: feet on the grass.
pub const PLAYER_REST_Y: i32 = 357;
/// Highest the top edge gets during a jump.
pub const JUMP_CEILING_Y: i32 = 120;
pub const ASCENT_PER_TICK: i32 = 30;
pub const DESCENT_PER_TICK: i32 = 20;
const PLAYER_ANIM_STEP: f32 = 0.25;

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    y: i32,
    is_jumping: bool,
    anim: f32,
}

impl Player {
    pub fn new() -> Self {
        Self {
            y: PLAYER_REST_Y,
            is_jumping: false,
            anim: 0.0,
        }
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn is_jumping(&self) -> bool {
        self.is_jumping
    }

    /// Standing on the ground, not mid-arc.
    pub fn at_rest(&self) -> bool {
        !self.is_jumping && self.y == PLAYER_REST_Y
    }

    /// Start a jump. Refused (returns false) while airborne.
    pub fn jump(&mut self) -> bool {
        if !self.at_rest() {
            return false;
        }
        self.is_jumping = true;
        true
    }

    /// Vertical physics for one tick: rise to the ceiling, then fall to rest.
    pub fn step(&mut self) {
        if self.is_jumping {
            self.y = (self.y - ASCENT_PER_TICK).max(JUMP_CEILING_Y);
            if self.y == JUMP_CEILING_Y {
                self.is_jumping = false;
            }
        } else {
            self.y = (self.y + DESCENT_PER_TICK).min(PLAYER_REST_Y);
        }
    }

    /// Abandon any ascent and keep falling toward rest.
    pub fn settle(&mut self) {
        self.is_jumping = false;
        self.step();
    }

    pub fn animate(&mut self) {
        self.anim = wrap_phase(self.anim + PLAYER_ANIM_STEP, SPRITES.player.len());
    }

    pub fn sprite(&self) -> &'static Sprite {
        &SPRITES.player[self.anim as usize]
    }

    pub fn rect(&self) -> Rect {
        Rect::new(PLAYER_X, self.y, PLAYER_SIZE, PLAYER_SIZE)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

fn wrap_phase(phase: f32, frames: usize) -> f32 {
    if phase >= frames as f32 { 0.0 } else { phase }
}

// ── Obstacles ───────────────────────────────────────────────────────────────

/// Which obstacle is in play this life-cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObstacleKind {
    Ground,
    Flying,
}

impl ObstacleKind {
    pub fn roll(rng: &mut impl Rng) -> Self {
        if rng.gen_bool(0.5) {
            ObstacleKind::Ground
        } else {
            ObstacleKind::Flying
        }
    }
}

/// Score at which the taller ground obstacles join the rotation.
pub const HARD_OBSTACLE_SCORE: u32 = 500;
const EASY_VARIANTS: [usize; 2] = [0, 1];
const ALL_VARIANTS: [usize; 5] = [0, 1, 2, 3, 4];
pub const FLYING_Y: i32 = 236;
const FLYING_ANIM_STEP: f32 = 0.10;

#[derive(Clone, Debug, PartialEq)]
pub struct GroundObstacle {
    x: i32,
    variant: usize,
}

impl GroundObstacle {
    pub fn variant(&self) -> usize {
        self.variant
    }

    /// Pick a sprite variant for the current score and move off-screen right.
    pub fn reroll(&mut self, score: u32, rng: &mut impl Rng) {
        let pool: &[usize] = if score >= HARD_OBSTACLE_SCORE {
            &ALL_VARIANTS
        } else {
            &EASY_VARIANTS
        };
        self.variant = pool.choose(rng).copied().unwrap_or(0);
        self.x = BASE_WIDTH;
    }

    fn center_y(&self) -> i32 {
        if self.variant == 0 { BASE_HEIGHT - 50 } else { BASE_HEIGHT - 60 }
    }

    pub fn sprite(&self) -> &'static Sprite {
        &SPRITES.ground[self.variant]
    }

    pub fn rect(&self) -> Rect {
        let s = self.sprite();
        Rect::new(self.x, self.center_y() - s.height() / 2, s.width(), s.height())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlyingObstacle {
    x: i32,
    anim: f32,
}

impl FlyingObstacle {
    pub fn sprite(&self) -> &'static Sprite {
        &SPRITES.flying[self.anim as usize]
    }

    pub fn rect(&self) -> Rect {
        let s = self.sprite();
        Rect::new(self.x, FLYING_Y, s.width(), s.height())
    }
}

/// Both obstacle instances plus the single selector saying which one is live.
/// The other one waits just past the right edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacles {
    active: ObstacleKind,
    pub ground: GroundObstacle,
    pub flying: FlyingObstacle,
}

impl Obstacles {
    pub fn new(score: u32, rng: &mut impl Rng) -> Self {
        let mut obstacles = Self {
            active: ObstacleKind::Ground,
            ground: GroundObstacle {
                x: BASE_WIDTH,
                variant: 0,
            },
            flying: FlyingObstacle {
                x: BASE_WIDTH,
                anim: 0.0,
            },
        };
        obstacles.reset(score, rng);
        obstacles
    }

    pub fn active(&self) -> ObstacleKind {
        self.active
    }

    /// The live obstacle's bounds and current sprite.
    pub fn active_body(&self) -> (Rect, &'static Sprite) {
        match self.active {
            ObstacleKind::Ground => (self.ground.rect(), self.ground.sprite()),
            ObstacleKind::Flying => (self.flying.rect(), self.flying.sprite()),
        }
    }

    /// Scroll the live obstacle left by `speed`.
    pub fn advance(&mut self, speed: u32) {
        let speed = speed as i32;
        match self.active {
            ObstacleKind::Ground => self.ground.x -= speed,
            ObstacleKind::Flying => {
                self.flying.x -= speed;
                self.flying.anim = wrap_phase(self.flying.anim + FLYING_ANIM_STEP, SPRITES.flying.len());
            }
        }
    }

    /// Either instance has fully left the screen.
    pub fn off_screen(&self) -> bool {
        self.ground.rect().right() <= 0 || self.flying.rect().right() <= 0
    }

    /// Start a new life-cycle: fresh choice, both instances back at the right
    /// edge, ground sprite re-derived from `score` when ground is chosen.
    pub fn reset(&mut self, score: u32, rng: &mut impl Rng) -> ObstacleKind {
        self.active = ObstacleKind::roll(rng);
        self.ground.x = BASE_WIDTH;
        self.flying.x = BASE_WIDTH;
        if self.active == ObstacleKind::Ground {
            self.ground.reroll(score, rng);
        }
        self.active
    }

    /// Reset if an obstacle has left the screen. Returns the new choice.
    pub fn reroll_if_off_screen(&mut self, score: u32, rng: &mut impl Rng) -> Option<ObstacleKind> {
        self.off_screen().then(|| self.reset(score, rng))
    }
}

// ── Decor ───────────────────────────────────────────────────────────────────

pub const CLOUD_COUNT: usize = 4;
const CLOUD_BANDS: [i32; 3] = [50, 100, 150];
const CLOUD_SPAWN_INSET: [i32; 3] = [30, 120, 210];
const CLOUD_RESPAWN_OFFSET: [i32; 3] = [0, 90, 180];

#[derive(Clone, Debug, PartialEq)]
pub struct Cloud {
    pub x: i32,
    pub y: i32,
}

impl Cloud {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, SPRITES.cloud.width(), SPRITES.cloud.height())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CloudLayer {
    clouds: Vec<Cloud>,
}

impl CloudLayer {
    pub fn new(rng: &mut impl Rng) -> Self {
        let clouds = (0..CLOUD_COUNT)
            .map(|_| Cloud {
                x: BASE_WIDTH - pick(&CLOUD_SPAWN_INSET, rng),
                y: pick(&CLOUD_BANDS, rng),
            })
            .collect();
        Self { clouds }
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    /// Drift left; a cloud that has left the screen comes back on the right
    /// in a new band.
    pub fn advance(&mut self, speed: u32, rng: &mut impl Rng) {
        for cloud in &mut self.clouds {
            if cloud.rect().right() < 0 {
                cloud.x = BASE_WIDTH + pick(&CLOUD_RESPAWN_OFFSET, rng);
                cloud.y = pick(&CLOUD_BANDS, rng);
            }
            cloud.x -= speed as i32;
        }
    }
}

fn pick(options: &[i32], rng: &mut impl Rng) -> i32 {
    options.choose(rng).copied().unwrap_or(0)
}

pub const TILE_WIDTH: i32 = 64;
pub const TILE_HEIGHT: i32 = 32;
pub const GROUND_Y: i32 = 448;
pub const TILE_COUNT: usize = (BASE_WIDTH / TILE_WIDTH) as usize + 2;

/// Ground tiles laid edge to edge. The tile that scrolls fully off the left
/// goes to the back of the line, one tile past the rightmost.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundRing {
    tiles: VecDeque<i32>,
}

impl GroundRing {
    pub fn new() -> Self {
        Self {
            tiles: (0..TILE_COUNT as i32).map(|i| i * TILE_WIDTH).collect(),
        }
    }

    /// Left edges, leftmost first.
    pub fn tiles(&self) -> impl Iterator<Item = i32> + '_ {
        self.tiles.iter().copied()
    }

    pub fn advance(&mut self, speed: u32) {
        for x in &mut self.tiles {
            *x -= speed as i32;
        }
        while let Some(&front) = self.tiles.front() {
            if front + TILE_WIDTH >= 0 {
                break;
            }
            let back = self.tiles.back().copied().unwrap_or(front);
            self.tiles.pop_front();
            self.tiles.push_back(back + TILE_WIDTH);
        }
    }

    /// Tiles are contiguous and span the whole screen width.
    pub fn covers_screen(&self) -> bool {
        let contiguous = self
            .tiles
            .iter()
            .zip(self.tiles.iter().skip(1))
            .all(|(a, b)| b - a == TILE_WIDTH);
        match (self.tiles.front(), self.tiles.back()) {
            (Some(&first), Some(&last)) => contiguous && first <= 0 && last + TILE_WIDTH >= BASE_WIDTH,
            _ => false,
        }
    }
}

impl Default for GroundRing {
    fn default() -> Self {
        Self::new()
    }
}
