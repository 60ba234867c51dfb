//! Exponential smoothing of a landmark's height plus a vertical velocity
//! jump detector.

use crate::config::TrackingConfig;

/// Smooths successive normalized y samples and flags sharp upward motion.
///
/// Image y grows downward, so moving up gives a negative delta. A jump is
/// reported every time one smoothed step falls below `threshold`. There is no
/// hysteresis: one jerky motion spanning two samples reports twice.
#[derive(Clone, Debug)]
pub struct LandmarkSmoother {
    alpha: f32,
    threshold: f32,
    smoothed_y: Option<f32>,
    previous_y: Option<f32>,
}

impl LandmarkSmoother {
    pub fn new(alpha: f32, threshold: f32) -> Self {
        Self {
            alpha,
            threshold,
            smoothed_y: None,
            previous_y: None,
        }
    }

    pub fn from_config(config: &TrackingConfig) -> Self {
        Self::new(config.smoothing_alpha, config.jump_threshold)
    }

    /// Feed one sample. `None` (tracking lost this frame) leaves the state
    /// untouched. Returns true when this sample completes a jump.
    pub fn observe(&mut self, sample: Option<f32>) -> bool {
        let Some(y) = sample else {
            return false;
        };

        let smoothed = match self.smoothed_y {
            None => y,
            Some(prev) => self.alpha * y + (1.0 - self.alpha) * prev,
        };
        self.smoothed_y = Some(smoothed);

        let jumped = match self.previous_y {
            Some(prev) => smoothed - prev < self.threshold,
            None => false,
        };
        self.previous_y = Some(smoothed);
        jumped
    }

    pub fn smoothed_y(&self) -> Option<f32> {
        self.smoothed_y
    }

    pub fn previous_y(&self) -> Option<f32> {
        self.previous_y
    }
}

impl Default for LandmarkSmoother {
    fn default() -> Self {
        Self::from_config(&TrackingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_sample_passes_through() {
        let mut s = LandmarkSmoother::default();
        assert!(!s.observe(Some(0.42)));
        assert_eq!(s.smoothed_y(), Some(0.42));
        assert_eq!(s.previous_y(), Some(0.42));
    }

    #[test]
    fn test_missing_sample_is_noop() {
        let mut s = LandmarkSmoother::default();
        assert!(!s.observe(None));
        assert_eq!(s.smoothed_y(), None);

        s.observe(Some(0.5));
        assert!(!s.observe(None));
        assert_eq!(s.smoothed_y(), Some(0.5));
        assert_eq!(s.previous_y(), Some(0.5));
    }

    #[test]
    fn test_exponential_average() {
        let mut s = LandmarkSmoother::new(0.7, -0.03);
        s.observe(Some(0.5));
        s.observe(Some(0.6));
        let y = s.smoothed_y().unwrap();
        assert!((y - (0.7 * 0.6 + 0.3 * 0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_sharp_rise_triggers_once() {
        let mut s = LandmarkSmoother::new(0.7, -0.03);
        let mut hits = 0;
        // Stand still, one sharp rise, then hold the new height.
        for y in [0.5, 0.5, 0.5, 0.44, 0.44, 0.44, 0.44] {
            if s.observe(Some(y)) {
                hits += 1;
            }
        }
        // First step: 0.7 * -0.06 = -0.042 (trigger). Second: 0.3 * -0.042 ... = -0.0126.
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_downward_motion_never_triggers() {
        let mut s = LandmarkSmoother::default();
        for i in 0..20 {
            assert!(!s.observe(Some(0.2 + i as f32 * 0.05)));
        }
    }

    #[test]
    fn test_fast_motion_can_trigger_twice() {
        let mut s = LandmarkSmoother::new(0.7, -0.03);
        s.observe(Some(0.6));
        // -0.21 then the catch-up step -0.063: both past the threshold.
        assert!(s.observe(Some(0.3)));
        assert!(s.observe(Some(0.3)));
        assert!(!s.observe(Some(0.3)));
    }

    proptest! {
        #[test]
        fn prop_smoothed_stays_within_seen_range(
            samples in prop::collection::vec(prop::option::of(0.0f32..1.0), 1..200)
        ) {
            let mut s = LandmarkSmoother::default();
            let mut lo = f32::INFINITY;
            let mut hi = f32::NEG_INFINITY;
            let mut first = true;

            for sample in samples {
                let before = s.smoothed_y();
                s.observe(sample);
                let Some(y) = sample else {
                    prop_assert_eq!(s.smoothed_y(), before);
                    continue;
                };
                lo = lo.min(y);
                hi = hi.max(y);
                let smoothed = s.smoothed_y().unwrap();
                if first {
                    prop_assert_eq!(smoothed, y);
                    first = false;
                }
                prop_assert!(smoothed >= lo - 1e-5 && smoothed <= hi + 1e-5);
            }
        }
    }
}
