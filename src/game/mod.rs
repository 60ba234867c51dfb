//! Game Logic Module
//!
//! Everything the fixed-rate simulation owns. Pure and single-threaded: no
//! I/O, no clocks, all randomness from a seeded RNG, so a run is reproducible
//! from its seed and its jump inputs.
//!
//! ## Module Structure
//!
//! - `sprites`: pixel art, doubling as collision masks
//! - `entities`: player, obstacles, clouds, ground tiles
//! - `collision`: mask overlap, scoring and the speed ramp
//! - `state`: score/speed/phase and the events a tick reports
//! - `machine`: the per-tick state machine composing all of the above

pub mod collision;
pub mod entities;
pub mod machine;
pub mod sprites;
pub mod state;

pub use entities::ObstacleKind;
pub use machine::GameStateMachine;
pub use state::{GameEvent, GameState, Phase, TickReport};

/// Logical screen width; the renderer scales this to the terminal.
pub const BASE_WIDTH: i32 = 640;
/// Logical screen height.
pub const BASE_HEIGHT: i32 = 480;
/// Default simulation rate (Hz)
pub const TICK_RATE: u32 = 30;
