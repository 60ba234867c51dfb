//! Configuration module - environment variable parsing

use std::env;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use crate::error::ConfigError;
use crate::game::TICK_RATE;

/// Which camera backend feeds the perception worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraMode {
    /// Built-in simulated camera; Space/Up makes the figure hop.
    Simulated,
    /// No camera. The game runs without a preview or jumps.
    Off,
}

/// Tuning for the landmark smoother and worker.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackingConfig {
    /// Weight of the newest sample in the exponential average.
    pub smoothing_alpha: f32,
    /// Per-sample change of the smoothed height that counts as a jump.
    /// Negative: the image y axis points down.
    pub jump_threshold: f32,
    /// Landmarks reported with lower visibility are treated as missing.
    pub min_confidence: f32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: 0.7,
            jump_threshold: -0.03,
            min_confidence: 0.5,
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log filter directive (trace, debug, info, warn, error, or an EnvFilter string)
    pub log_level: String,
    /// File that receives log output; the terminal is busy drawing the game
    pub log_file: PathBuf,
    /// Simulation ticks per second
    pub tick_hz: u32,
    /// RNG seed; `None` draws one from the OS
    pub seed: Option<u64>,
    pub muted: bool,
    /// Practice mode: obstacles never end the run
    pub invulnerable: bool,
    pub camera: CameraMode,
    pub tracking: TrackingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: PathBuf::from("gesture-runner.log"),
            tick_hz: TICK_RATE,
            seed: None,
            muted: false,
            invulnerable: false,
            camera: CameraMode::Simulated,
            tracking: TrackingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build a configuration from any variable lookup. Unset variables keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();
        let tracking = TrackingConfig::default();

        let tick_hz = match lookup("RUNNER_TICK_HZ") {
            Some(v) => match v.trim().parse::<u32>() {
                Ok(hz) if (1..=240).contains(&hz) => hz,
                _ => return Err(invalid("RUNNER_TICK_HZ", v, "expected an integer in 1..=240")),
            },
            None => defaults.tick_hz,
        };

        let seed = match lookup("RUNNER_SEED") {
            Some(v) => Some(
                v.trim()
                    .parse::<u64>()
                    .map_err(|_| invalid("RUNNER_SEED", v.clone(), "expected an unsigned integer"))?,
            ),
            None => None,
        };

        let camera = match lookup("RUNNER_CAMERA") {
            Some(v) => match v.trim().to_ascii_lowercase().as_str() {
                "sim" | "simulated" => CameraMode::Simulated,
                "off" | "none" => CameraMode::Off,
                _ => return Err(invalid("RUNNER_CAMERA", v, "expected `sim` or `off`")),
            },
            None => defaults.camera,
        };

        let smoothing_alpha = parse_f32(&lookup, "RUNNER_SMOOTHING_ALPHA", tracking.smoothing_alpha)?;
        if !(smoothing_alpha > 0.0 && smoothing_alpha <= 1.0) {
            return Err(invalid(
                "RUNNER_SMOOTHING_ALPHA",
                smoothing_alpha.to_string(),
                "expected a value in (0, 1]",
            ));
        }

        let jump_threshold = parse_f32(&lookup, "RUNNER_JUMP_THRESHOLD", tracking.jump_threshold)?;
        if jump_threshold >= 0.0 {
            return Err(invalid(
                "RUNNER_JUMP_THRESHOLD",
                jump_threshold.to_string(),
                "expected a negative value",
            ));
        }

        let min_confidence = parse_f32(&lookup, "RUNNER_MIN_CONFIDENCE", tracking.min_confidence)?;
        if !(0.0..=1.0).contains(&min_confidence) {
            return Err(invalid(
                "RUNNER_MIN_CONFIDENCE",
                min_confidence.to_string(),
                "expected a value in [0, 1]",
            ));
        }

        let log_level = match lookup("RUNNER_LOG") {
            Some(v) => match EnvFilter::try_new(&v) {
                Ok(_) => v,
                Err(_) => return Err(invalid("RUNNER_LOG", v, "expected a tracing filter directive")),
            },
            None => defaults.log_level,
        };

        Ok(Self {
            log_level,
            log_file: lookup("RUNNER_LOG_FILE").map(PathBuf::from).unwrap_or(defaults.log_file),
            tick_hz,
            seed,
            muted: parse_flag(&lookup, "RUNNER_MUTE")?,
            invulnerable: parse_flag(&lookup, "RUNNER_INVULNERABLE")?,
            camera,
            tracking: TrackingConfig {
                smoothing_alpha,
                jump_threshold,
                min_confidence,
            },
        })
    }
}

fn invalid(var: &'static str, value: String, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { var, value, reason }
}

fn parse_flag(lookup: &impl Fn(&str) -> Option<String>, var: &'static str) -> Result<bool, ConfigError> {
    match lookup(var) {
        None => Ok(false),
        Some(v) => match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            _ => Err(invalid(var, v, "expected a boolean")),
        },
    }
}

fn parse_f32(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: f32,
) -> Result<f32, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse::<f32>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(|| invalid(var, v, "expected a number")),
    }
}
