//! Collision detection and difficulty.

use crate::game::entities::Rect;
use crate::game::sprites::Sprite;
use crate::game::state::{GameState, MAX_SPEED, SCORE_STEP};

/// Pixel-accurate overlap: true when some screen pixel is solid in both
/// sprites. Bounding boxes are only used to limit the search.
pub fn masks_overlap(a: &Sprite, a_rect: Rect, b: &Sprite, b_rect: Rect) -> bool {
    let Some(overlap) = a_rect.intersection(&b_rect) else {
        return false;
    };
    for y in overlap.y..overlap.bottom() {
        for x in overlap.x..overlap.right() {
            if a.solid(x - a_rect.x, y - a_rect.y) && b.solid(x - b_rect.x, y - b_rect.y) {
                return true;
            }
        }
    }
    false
}

/// Score one tick of survival. Returns `true` on a milestone, where speed
/// also goes up by one (clamped to [`MAX_SPEED`]).
pub fn award_tick(state: &mut GameState) -> bool {
    state.score += 1;
    if state.score % SCORE_STEP != 0 {
        return false;
    }
    state.speed = (state.speed + 1).min(MAX_SPEED);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::COMB;
    use crate::game::state::INITIAL_SPEED;

    fn block(art: &[&str]) -> Sprite {
        Sprite::from_art(art, &[('X', COMB)], 1)
    }

    #[test]
    fn test_boxes_overlap_but_pixels_do_not() {
        let a = block(&["X..", "...", "..."]);
        let b = block(&["...", "...", "..X"]);
        assert!(!masks_overlap(&a, Rect::new(0, 0, 3, 3), &b, Rect::new(0, 0, 3, 3)));
    }

    #[test]
    fn test_pixels_overlap() {
        let a = block(&["...", "...", "..X"]);
        let b = block(&["X..", "...", "..."]);
        // b's solid pixel lands on a's bottom-right pixel.
        assert!(masks_overlap(&a, Rect::new(0, 0, 3, 3), &b, Rect::new(2, 2, 3, 3)));
        assert!(!masks_overlap(&a, Rect::new(0, 0, 3, 3), &b, Rect::new(3, 2, 3, 3)));
    }

    #[test]
    fn test_disjoint_boxes() {
        let a = block(&["X"]);
        assert!(!masks_overlap(&a, Rect::new(0, 0, 1, 1), &a, Rect::new(5, 5, 1, 1)));
    }

    #[test]
    fn test_ramp_every_hundred() {
        let mut state = GameState::new();
        let mut milestones = 0;
        for _ in 0..1000 {
            if award_tick(&mut state) {
                milestones += 1;
            }
        }
        assert_eq!(state.score, 1000);
        assert_eq!(milestones, 10);
        assert_eq!(state.speed, INITIAL_SPEED + 10);
    }

    #[test]
    fn test_speed_clamped() {
        let mut state = GameState::new();
        for _ in 0..10_000 {
            let before = state.speed;
            award_tick(&mut state);
            assert!(state.speed >= before);
            assert!(state.speed <= MAX_SPEED);
        }
        assert_eq!(state.speed, MAX_SPEED);
        // Milestones at max still chime.
        state.score = 2 * SCORE_STEP - 1;
        assert!(award_tick(&mut state));
        assert_eq!(state.speed, MAX_SPEED);
    }
}
