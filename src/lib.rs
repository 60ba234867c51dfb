//! # gesture_runner
//!
//! A side-scrolling runner drawn in the terminal where the jump button is your
//! own body: a pose tracker watches a camera feed and a quick upward head
//! motion makes the chicken jump.
//!
//! ```text
//! camera ──► perception::worker ──► perception::channel ──► app (fixed tick)
//!              │ smoother                (frame slot,           │
//!              │ (EMA + velocity)         jump latch)           ▼
//!                                                        game::machine
//!                                                   entities / collision
//!                                                               │
//!                                                 render (terminal) + audio
//! ```
//!
//! The perception worker runs on its own thread at whatever pace the camera
//! and extractor allow. The simulation never waits on it: each tick it takes
//! whatever frame is newest and consumes the jump latch if one is raised.

#![deny(unsafe_code)]

pub mod app;
pub mod audio;
pub mod color;
pub mod config;
pub mod error;
pub mod game;
pub mod perception;
pub mod render;

pub use config::Config;
pub use game::{GameEvent, GameState, GameStateMachine, Phase};
pub use perception::{LandmarkSmoother, PerceptionWorker, SharedChannel};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
