//! Simulation mode: a synthetic camera and a matching extractor.
//!
//! The camera paints a figure against a wall at roughly camera frame rate.
//! Pressing the hop key makes the figure jump; the extractor then finds the
//! head by its skin colour, exactly as it would in any other frame. Nothing
//! downstream knows the difference.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tracing::info;

use crate::color::{Rgb, SHIRT, SKIN, WALL_BOT, WALL_TOP};
use crate::error::CaptureError;
use crate::perception::frame::Frame;
use crate::perception::source::{FrameSource, Landmark, LandmarkPoint, LandmarkSet, PoseExtractor};

pub const SIM_WIDTH: usize = 320;
pub const SIM_HEIGHT: usize = 240;

const HEAD_RADIUS: i32 = 18;
const HEAD_REST_Y: f32 = 110.0;
const HEAD_X: i32 = 160;
const HOP_HEIGHT: f32 = 50.0;
const HOP_FRAMES: u32 = 12;

/// Cloneable "make the figure hop" button shared with the input loop.
#[derive(Clone, Debug, Default)]
pub struct HopTrigger(Arc<AtomicBool>);

impl HopTrigger {
    pub fn press(&self) {
        self.0.store(true, Ordering::Release);
    }

    fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

/// A camera that films a synthetic person.
pub struct SimulatedCamera {
    trigger: HopTrigger,
    frame_interval: Duration,
    next_frame: Option<Instant>,
    frame_index: u64,
    hop_frame: Option<u32>,
}

impl SimulatedCamera {
    /// Open the simulated device. `frame_interval` paces `read` like a real
    /// camera; zero makes reads return immediately.
    pub fn open(frame_interval: Duration) -> (Self, HopTrigger) {
        let trigger = HopTrigger::default();
        info!(?frame_interval, "simulated camera opened");
        let camera = Self {
            trigger: trigger.clone(),
            frame_interval,
            next_frame: None,
            frame_index: 0,
            hop_frame: None,
        };
        (camera, trigger)
    }

    /// Head centre height in pixels for the current frame.
    fn head_y(&self) -> f32 {
        let lift = match self.hop_frame {
            Some(f) => {
                let t = f as f32 / HOP_FRAMES as f32;
                4.0 * HOP_HEIGHT * t * (1.0 - t)
            }
            None => 0.0,
        };
        // Slight breathing sway so the tracker never sees a perfectly still signal.
        let sway = (self.frame_index as f32 * 0.15).sin() * 0.6;
        HEAD_REST_Y - lift + sway
    }

    fn advance_hop(&mut self) {
        if self.trigger.take() && self.hop_frame.is_none() {
            self.hop_frame = Some(0);
        }
        self.hop_frame = match self.hop_frame {
            Some(f) if f + 1 < HOP_FRAMES => Some(f + 1),
            _ => None,
        };
    }

    fn paint(&self) -> Frame {
        let mut frame = Frame::new(SIM_WIDTH, SIM_HEIGHT, WALL_TOP);
        for y in 0..SIM_HEIGHT {
            let t = (y as u16 * 256) / SIM_HEIGHT as u16;
            let c = Rgb::lerp(WALL_TOP, WALL_BOT, t);
            frame.fill_rect(0, y as i32, SIM_WIDTH as i32, 1, c);
        }

        let head_y = self.head_y() as i32;
        // Torso and arms hang below the head.
        frame.fill_rect(HEAD_X - 30, head_y + HEAD_RADIUS + 6, 60, 90, SHIRT);
        frame.fill_rect(HEAD_X - 48, head_y + HEAD_RADIUS + 10, 16, 60, SHIRT);
        frame.fill_rect(HEAD_X + 32, head_y + HEAD_RADIUS + 10, 16, 60, SHIRT);
        frame.fill_rect(HEAD_X - 6, head_y + HEAD_RADIUS - 2, 12, 10, SKIN);
        frame.fill_disc(HEAD_X, head_y, HEAD_RADIUS, SKIN);
        frame
    }
}

impl FrameSource for SimulatedCamera {
    fn read(&mut self) -> Result<Frame, CaptureError> {
        if let Some(due) = self.next_frame {
            let now = Instant::now();
            if due > now {
                thread::sleep(due - now);
            }
        }
        self.next_frame = Some(Instant::now() + self.frame_interval);

        self.advance_hop();
        self.frame_index += 1;
        Ok(self.paint())
    }

    fn name(&self) -> &str {
        "simulated camera"
    }
}

impl Drop for SimulatedCamera {
    fn drop(&mut self) {
        info!(frames = self.frame_index, "simulated camera released");
    }
}

/// Finds a landmark as the centroid of pixels close to a target colour.
#[derive(Clone, Debug)]
pub struct ColorBlobExtractor {
    pub landmark: Landmark,
    pub target: Rgb,
    pub tolerance: u8,
    /// Pixel count that counts as fully visible.
    pub expected_pixels: usize,
    /// Fewer matching pixels than this and nothing is reported.
    pub min_pixels: usize,
}

impl ColorBlobExtractor {
    /// An extractor tuned for the simulated camera's head.
    pub fn for_simulated_head() -> Self {
        Self {
            landmark: Landmark::Nose,
            target: SKIN,
            tolerance: 12,
            expected_pixels: 800,
            min_pixels: 40,
        }
    }
}

impl PoseExtractor for ColorBlobExtractor {
    fn extract(&mut self, frame: &Frame) -> Option<LandmarkSet> {
        let (mut count, mut sum_x, mut sum_y) = (0usize, 0usize, 0usize);
        for (x, y, c) in frame.pixels() {
            if c.near(self.target, self.tolerance) {
                count += 1;
                sum_x += x;
                sum_y += y;
            }
        }
        if count < self.min_pixels || frame.width() == 0 || frame.height() == 0 {
            return None;
        }

        let point = LandmarkPoint {
            x: sum_x as f32 / count as f32 / frame.width() as f32,
            y: sum_y as f32 / count as f32 / frame.height() as f32,
            visibility: (count as f32 / self.expected_pixels as f32).min(1.0),
        };
        Some(LandmarkSet::new().with(self.landmark, point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perception::smoother::LandmarkSmoother;

    fn nose_y(extractor: &mut ColorBlobExtractor, frame: &Frame) -> f32 {
        extractor
            .extract(frame)
            .and_then(|s| s.get(Landmark::Nose))
            .map(|p| p.y)
            .unwrap()
    }

    #[test]
    fn test_extractor_finds_head() {
        let (mut camera, _) = SimulatedCamera::open(Duration::ZERO);
        let frame = camera.read().unwrap();
        let mut extractor = ColorBlobExtractor::for_simulated_head();

        let set = extractor.extract(&frame).unwrap();
        let nose = set.get(Landmark::Nose).unwrap();
        assert!((nose.x - 0.5).abs() < 0.05);
        assert!((nose.y * SIM_HEIGHT as f32 - HEAD_REST_Y).abs() < 6.0);
        assert_eq!(nose.visibility, 1.0);
    }

    #[test]
    fn test_extractor_empty_frame() {
        let frame = Frame::new(64, 48, WALL_TOP);
        assert!(ColorBlobExtractor::for_simulated_head().extract(&frame).is_none());
    }

    #[test]
    fn test_hop_moves_head_up_and_back() {
        let (mut camera, trigger) = SimulatedCamera::open(Duration::ZERO);
        let mut extractor = ColorBlobExtractor::for_simulated_head();

        let rest = nose_y(&mut extractor, &camera.read().unwrap());
        trigger.press();
        let mut highest = rest;
        for _ in 0..HOP_FRAMES {
            highest = highest.min(nose_y(&mut extractor, &camera.read().unwrap()));
        }
        let after = nose_y(&mut extractor, &camera.read().unwrap());

        assert!(rest - highest > 0.15);
        assert!((after - rest).abs() < 0.02);
    }

    #[test]
    fn test_hop_is_detected_as_jump() {
        let (mut camera, trigger) = SimulatedCamera::open(Duration::ZERO);
        let mut extractor = ColorBlobExtractor::for_simulated_head();
        let mut smoother = LandmarkSmoother::default();

        for _ in 0..10 {
            let y = nose_y(&mut extractor, &camera.read().unwrap());
            assert!(!smoother.observe(Some(y)), "standing still must not jump");
        }

        trigger.press();
        let mut detected = false;
        for _ in 0..HOP_FRAMES {
            let y = nose_y(&mut extractor, &camera.read().unwrap());
            detected |= smoother.observe(Some(y));
        }
        assert!(detected);
    }
}
