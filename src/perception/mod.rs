//! Perception pipeline
//!
//! Turns camera frames into an edge-triggered jump signal and a small mirrored
//! preview image. Runs on its own thread and talks to the game only through
//! [`SharedChannel`].
//!
//! ## Module Structure
//!
//! - `frame`: RGB frames and the preview transform
//! - `source`: capture device and pose extractor contracts
//! - `smoother`: exponential smoothing + vertical velocity jump detector
//! - `channel`: latest-frame slot and jump latch shared with the game
//! - `worker`: the capture → extract → smooth → publish loop
//! - `sim`: built-in simulated camera and colour-blob extractor

pub mod channel;
pub mod frame;
pub mod sim;
pub mod smoother;
pub mod source;
pub mod worker;

pub use channel::SharedChannel;
pub use frame::Frame;
pub use smoother::LandmarkSmoother;
pub use source::{FrameSource, Landmark, LandmarkPoint, LandmarkSet, PoseExtractor};
pub use worker::{PerceptionHandle, PerceptionWorker, StepOutcome, WorkerOptions};
