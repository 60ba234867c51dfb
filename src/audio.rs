//! Synthesized sound effects.
//!
//! Clips are synthesized once at startup from rodio's signal sources and
//! handed to a fresh sink as sample buffers on each play. Playback is
//! fire-and-forget.

use std::time::Duration;

use rodio::buffer::SamplesBuffer;
use rodio::cpal::SampleRate;
use rodio::source::{Function, SignalGenerator, chirp};
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{info, warn};

use crate::error::AudioError;
use crate::game::GameEvent;

const SAMPLE_RATE: u32 = 44_100;

/// The three sounds the game makes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Jump,
    Score,
    Collision,
}

impl Cue {
    /// The sound a game event should make, if any.
    pub fn for_event(event: &GameEvent) -> Option<Cue> {
        match event {
            GameEvent::Jumped => Some(Cue::Jump),
            GameEvent::Milestone { .. } => Some(Cue::Score),
            GameEvent::Collided { .. } => Some(Cue::Collision),
            GameEvent::ObstacleChanged(_) => None,
        }
    }
}

/// Something that can play a cue without blocking.
pub trait AudioSink {
    fn play(&self, cue: Cue);
}

/// Plays nothing. Used when muted or when no output device exists.
pub struct Silent;

impl AudioSink for Silent {
    fn play(&self, _cue: Cue) {}
}

// ── Sounds ──────────────────────────────────────────────────────────────────

struct Clips {
    jump: Vec<f32>,
    score: Vec<f32>,
    collision: Vec<f32>,
}

impl Clips {
    fn render() -> Self {
        let rate = SampleRate(SAMPLE_RATE);

        // Short upward chirp.
        let jump = chirp(rate, 300.0, 1200.0, ms(150)).take_duration(ms(150)).collect();

        // Two-note chime.
        let low = SignalGenerator::new(rate, 880.0, Function::Sine).take_duration(ms(80));
        let high = SignalGenerator::new(rate, 1320.0, Function::Sine).take_duration(ms(220));
        let score = low.chain(high).collect();

        // Falling sawtooth: 400Hz to 80Hz in eight steps.
        let collision = (0..8)
            .flat_map(|step| {
                let freq = 400.0 + (80.0 - 400.0) * step as f32 / 7.0;
                SignalGenerator::new(rate, freq, Function::Sawtooth).take_duration(ms(62))
            })
            .collect();

        Self {
            jump: fade(jump, 0.12),
            score: fade(score, 0.2),
            collision: fade(collision, 0.15),
        }
    }

    fn get(&self, cue: Cue) -> &[f32] {
        match cue {
            Cue::Jump => &self.jump,
            Cue::Score => &self.score,
            Cue::Collision => &self.collision,
        }
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Scale a clip to `gain` and ramp it down to silence over its length.
fn fade(samples: Vec<f32>, gain: f32) -> Vec<f32> {
    let length = Duration::from_secs_f64(samples.len() as f64 / SAMPLE_RATE as f64);
    SamplesBuffer::new(1, SAMPLE_RATE, samples)
        .amplify(gain)
        .linear_gain_ramp(length, 1.0, 0.0, true)
        .collect()
}

/// The default output device. Must stay on the thread that opened it.
pub struct Speaker {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    clips: Clips,
}

impl Speaker {
    pub fn open() -> Result<Self, AudioError> {
        let (stream, handle) = OutputStream::try_default()?;
        Ok(Self {
            _stream: stream,
            handle,
            clips: Clips::render(),
        })
    }

    fn start(&self, cue: Cue) -> Result<(), AudioError> {
        let sink = Sink::try_new(&self.handle)?;
        let source = SamplesBuffer::new(1, SAMPLE_RATE, self.clips.get(cue).to_vec());
        sink.append(source);
        sink.detach(); // Play in background
        Ok(())
    }
}

impl AudioSink for Speaker {
    fn play(&self, cue: Cue) {
        if let Err(e) = self.start(cue) {
            warn!("cannot play {:?}: {}", cue, e);
        }
    }
}

/// Open the speaker, falling back to silence.
pub fn open(muted: bool) -> Box<dyn AudioSink> {
    let result = if muted { Err(AudioError::Muted) } else { Speaker::open() };
    match result {
        Ok(speaker) => {
            info!("audio output opened");
            Box::new(speaker)
        }
        Err(e) => {
            warn!("running silent: {}", e);
            Box::new(Silent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ObstacleKind;

    #[test]
    fn test_event_cues() {
        assert_eq!(Cue::for_event(&GameEvent::Jumped), Some(Cue::Jump));
        assert_eq!(
            Cue::for_event(&GameEvent::Milestone { score: 100, speed: 11 }),
            Some(Cue::Score)
        );
        assert_eq!(
            Cue::for_event(&GameEvent::Collided { score: 3 }),
            Some(Cue::Collision)
        );
        assert_eq!(Cue::for_event(&GameEvent::ObstacleChanged(ObstacleKind::Flying)), None);
    }

    #[test]
    fn test_clips_rendered() {
        let clips = Clips::render();
        for (cue, seconds) in [(Cue::Jump, 0.15), (Cue::Score, 0.3), (Cue::Collision, 0.496)] {
            let clip = clips.get(cue);
            let expected = SAMPLE_RATE as f32 * seconds;
            assert!((clip.len() as f32 - expected).abs() < 50.0, "{cue:?}: {} samples", clip.len());
            assert!(clip.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
            assert!(clip.iter().any(|s| s.abs() > 0.01));
        }
    }
}
