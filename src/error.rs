//! Error types.
//!
//! None of these reach the simulation loop: capture errors are absorbed by the
//! perception worker, audio errors switch the game to silent mode, and config
//! errors stop the process before the terminal is touched.

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Capture device errors
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The device could not be opened at all. Fatal for the perception half.
    #[error("capture device unavailable: {0}")]
    Unavailable(String),

    /// A single read produced no frame. Retried on the next iteration.
    #[error("no frame from {device}")]
    NoFrame { device: String },
}

/// Audio output errors
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio disabled by configuration")]
    Muted,

    #[error("no audio output stream: {0}")]
    Stream(#[from] rodio::StreamError),

    #[error("cannot play on output stream: {0}")]
    Play(#[from] rodio::PlayError),
}
