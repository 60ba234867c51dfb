//! The perception loop: capture → extract → smooth → publish.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::color::MARKER;
use crate::config::TrackingConfig;
use crate::perception::channel::SharedChannel;
use crate::perception::frame::Frame;
use crate::perception::smoother::LandmarkSmoother;
use crate::perception::source::{FrameSource, Landmark, PoseExtractor};

/// Preview size published to the game.
pub const PREVIEW_WIDTH: usize = 200;
pub const PREVIEW_HEIGHT: usize = 150;

#[derive(Clone, Debug)]
pub struct WorkerOptions {
    /// The landmark whose height drives the jump detector.
    pub tracked: Landmark,
    pub min_confidence: f32,
    /// Pause after a failed capture before trying again.
    pub retry_delay: Duration,
    pub preview_size: (usize, usize),
}

impl WorkerOptions {
    pub fn from_config(config: &TrackingConfig) -> Self {
        Self {
            min_confidence: config.min_confidence,
            ..Self::default()
        }
    }
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self {
            tracked: Landmark::Nose,
            min_confidence: TrackingConfig::default().min_confidence,
            retry_delay: Duration::from_millis(5),
            preview_size: (PREVIEW_WIDTH, PREVIEW_HEIGHT),
        }
    }
}

/// What one iteration of the loop did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepOutcome {
    /// The device gave no frame; nothing changed.
    CaptureFailed,
    /// A preview was published but the tracked landmark was not found.
    Untracked,
    /// The landmark was tracked at this height.
    Tracked { y: f32, jumped: bool },
}

/// Owns the capture device, the extractor and the smoother. Writes only to
/// the [`SharedChannel`].
pub struct PerceptionWorker {
    source: Box<dyn FrameSource>,
    extractor: Box<dyn PoseExtractor>,
    smoother: LandmarkSmoother,
    channel: Arc<SharedChannel>,
    options: WorkerOptions,
}

impl PerceptionWorker {
    pub fn new(
        source: Box<dyn FrameSource>,
        extractor: Box<dyn PoseExtractor>,
        smoother: LandmarkSmoother,
        channel: Arc<SharedChannel>,
        options: WorkerOptions,
    ) -> Self {
        Self {
            source,
            extractor,
            smoother,
            channel,
            options,
        }
    }

    /// Run one capture/extract/publish iteration.
    pub fn step(&mut self) -> StepOutcome {
        let mut frame = match self.source.read() {
            Ok(frame) => frame,
            Err(e) => {
                trace!("capture skipped: {}", e);
                return StepOutcome::CaptureFailed;
            }
        };

        let point = self
            .extractor
            .extract(&frame)
            .and_then(|set| set.visible(self.options.tracked, self.options.min_confidence));

        let jumped = self.smoother.observe(point.map(|p| p.y));
        if jumped {
            debug!(y = ?self.smoother.smoothed_y(), "jump detected");
            self.channel.raise_jump();
        }

        if let Some(p) = point {
            let r = (frame.width().min(frame.height()) / 40).max(2) as i32;
            let cx = (p.x * frame.width() as f32) as i32;
            let cy = (p.y * frame.height() as f32) as i32;
            frame.fill_disc(cx, cy, r, MARKER);
        }

        let (w, h) = self.options.preview_size;
        self.channel.publish_frame(preview(&frame, w, h));

        match point {
            Some(p) => StepOutcome::Tracked { y: p.y, jumped },
            None => StepOutcome::Untracked,
        }
    }

    /// Loop until `stop` is set. The capture device is dropped (released)
    /// when this returns, on every path.
    pub fn run(mut self, stop: Arc<AtomicBool>) {
        info!(device = self.source.name(), "perception worker started");
        let mut failures: u64 = 0;
        while !stop.load(Ordering::Acquire) {
            if self.step() == StepOutcome::CaptureFailed {
                failures += 1;
                thread::sleep(self.options.retry_delay);
            }
        }
        info!(failures, "perception worker stopping");
    }
}

/// Mirror and shrink a frame for display.
pub fn preview(frame: &Frame, width: usize, height: usize) -> Frame {
    frame.mirrored().resized(width, height)
}

/// Handle to a worker running on its own thread.
pub struct PerceptionHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl PerceptionHandle {
    pub fn spawn(worker: PerceptionWorker) -> io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let thread = {
            let stop = Arc::clone(&stop);
            thread::Builder::new()
                .name("perception".into())
                .spawn(move || worker.run(stop))?
        };
        Ok(Self {
            stop,
            thread: Some(thread),
        })
    }

    /// Ask the worker to stop and wait for it to release the device.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("perception worker panicked");
            }
        }
    }
}

impl Drop for PerceptionHandle {
    fn drop(&mut self) {
        // Abandon without joining; the flag still lets the thread exit and
        // drop its device if the process lives long enough.
        self.stop.store(true, Ordering::Release);
    }
}
