//! Scene composition.
//!
//! The world is drawn into a logical 640×480 canvas, then letterboxed into
//! the terminal's pixel buffer (two pixels per character cell, see
//! [`PixelBuf::render`]).

mod font;
mod pixels;

pub use font::{draw_text, draw_text_centered, text_width};
pub use pixels::PixelBuf;

use crate::color::*;
use crate::game::entities::GROUND_Y;
use crate::game::sprites::{SPRITES, Sprite};
use crate::game::{BASE_HEIGHT, BASE_WIDTH, GameStateMachine, Phase};
use crate::perception::Frame;

/// Top-left corner of the camera preview.
pub const PREVIEW_ORIGIN: (i32, i32) = (10, 10);
const SCORE_SIZE: i32 = 6;
const STATUS_SIZE: i32 = 3;

/// Where jumps come from this session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraStatus {
    /// The built-in simulated camera; the keyboard makes the figure hop.
    Simulated,
    /// No camera; the game runs without jumps.
    Off,
}

/// Everything drawn on top of the world.
pub struct Hud<'a> {
    pub preview: Option<&'a Frame>,
    pub camera: CameraStatus,
    pub practice: bool,
}

/// Owns the logical canvas and the terminal-sized buffer it is scaled into.
pub struct Renderer {
    canvas: PixelBuf,
    screen: PixelBuf,
}

impl Renderer {
    /// `cols`×`rows` is the terminal size in character cells.
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            canvas: PixelBuf::new(BASE_WIDTH as usize, BASE_HEIGHT as usize),
            screen: PixelBuf::new(cols as usize, rows as usize * 2),
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.screen.resize(cols as usize, rows as usize * 2);
    }

    /// Compose the frame and scale it to the terminal.
    pub fn compose(&mut self, game: &GameStateMachine, hud: &Hud) -> &PixelBuf {
        draw_scene(&mut self.canvas, game, hud);
        self.screen.letterbox_from(&self.canvas);
        &self.screen
    }
}

pub fn draw_scene(buf: &mut PixelBuf, game: &GameStateMachine, hud: &Hud) {
    draw_sky(buf);
    draw_hills(buf, game.distance());
    for cloud in game.clouds().clouds() {
        blit(buf, &SPRITES.cloud, cloud.x, cloud.y);
    }
    draw_ground(buf, game);

    let obstacles = game.obstacles();
    let ground = obstacles.ground.rect();
    blit(buf, obstacles.ground.sprite(), ground.x, ground.y);
    let flying = obstacles.flying.rect();
    blit(buf, obstacles.flying.sprite(), flying.x, flying.y);

    let player = game.player().rect();
    blit(buf, game.player().sprite(), player.x, player.y);

    draw_preview(buf, hud.preview);
    draw_status(buf, hud);
    draw_score(buf, game.state().score);

    if game.state().phase == Phase::Collided {
        draw_game_over(buf, game.state().score);
    }
}

/// Draw a sprite with its top-left corner at (x, y).
pub fn blit(buf: &mut PixelBuf, sprite: &Sprite, x: i32, y: i32) {
    let s = sprite.scale();
    for (col, row, c) in sprite.cells() {
        buf.fill_rect(x + col * s, y + row * s, s, s, c);
    }
}

fn draw_sky(buf: &mut PixelBuf) {
    for y in 0..GROUND_Y {
        let t = ((y * 256) / GROUND_Y) as u16;
        buf.fill_rect(0, y, BASE_WIDTH, 1, Rgb::lerp(SKY_TOP, SKY_BOT, t));
    }
}

fn draw_hills(buf: &mut PixelBuf, distance: u64) {
    let scroll = distance as f64;
    // Far hills
    for x in 0..BASE_WIDTH {
        let fx = (x as f64 + scroll * 0.2) * 0.01;
        let h = fx.sin() * 24.0 + (fx * 1.7).sin() * 12.0;
        let top = GROUND_Y - h as i32 - 60;
        buf.fill_rect(x, top, 1, GROUND_Y - top, HILL_FAR);
    }
    // Near hills
    for x in 0..BASE_WIDTH {
        let fx = (x as f64 + scroll * 0.4) * 0.015;
        let h = fx.sin() * 16.0 + (fx * 2.3).sin() * 8.0;
        let top = GROUND_Y - h as i32 - 28;
        buf.fill_rect(x, top, 1, GROUND_Y - top, HILL_NEAR);
    }
}

fn draw_ground(buf: &mut PixelBuf, game: &GameStateMachine) {
    use crate::game::entities::{TILE_HEIGHT, TILE_WIDTH};

    for tile in game.ground().tiles() {
        // Grass strip, then striped dirt; both follow the tile so they scroll.
        for dx in 0..TILE_WIDTH {
            let x = tile + dx;
            let blade = (dx / 8) % 2 == 0;
            buf.fill_rect(x, GROUND_Y, 1, 4, if blade { GRASS_LIGHT } else { GRASS });
            buf.fill_rect(x, GROUND_Y + 4, 1, 4, GRASS);
            for y in GROUND_Y + 8..GROUND_Y + TILE_HEIGHT {
                let stripe = (dx + (y - GROUND_Y) * 2) % 24 < 12;
                buf.set(x, y, if stripe { DIRT } else { DIRT_DARK });
            }
        }
    }
}

fn draw_preview(buf: &mut PixelBuf, preview: Option<&Frame>) {
    let Some(frame) = preview else { return };
    let (ox, oy) = PREVIEW_ORIGIN;
    let (w, h) = (frame.width() as i32, frame.height() as i32);
    buf.fill_rect(ox - 2, oy - 2, w + 4, h + 4, SHADOW);
    for (x, y, c) in frame.pixels() {
        buf.set(ox + x as i32, oy + y as i32, c);
    }
}

fn draw_status(buf: &mut PixelBuf, hud: &Hud) {
    let (x, _) = PREVIEW_ORIGIN;
    let y = match hud.preview {
        Some(frame) => PREVIEW_ORIGIN.1 + frame.height() as i32 + 8,
        None => PREVIEW_ORIGIN.1,
    };
    match hud.camera {
        CameraStatus::Simulated => draw_text(buf, x, y, "SPACE TO HOP", STATUS_SIZE, WHITE),
        CameraStatus::Off => draw_text(buf, x, y, "NO CAMERA", STATUS_SIZE, WARNING),
    }
    if hud.practice {
        let y = y + font::text_height(STATUS_SIZE) + 6;
        draw_text(buf, x, y, "PRACTICE", STATUS_SIZE, WHITE);
    }
}

fn draw_score(buf: &mut PixelBuf, score: u32) {
    let text = score.to_string();
    let x = BASE_WIDTH - 14 - text_width(&text, SCORE_SIZE);
    draw_text(buf, x, 14, &text, SCORE_SIZE, WHITE);
}

fn draw_game_over(buf: &mut PixelBuf, score: u32) {
    let cx = BASE_WIDTH / 2;
    let cy = BASE_HEIGHT / 2;
    let (panel_w, panel_h) = (460, 170);

    buf.dim();

    let px = cx - panel_w / 2;
    let py = cy - panel_h / 2;
    buf.fill_rect(px - 4, py - 4, panel_w + 8, panel_h + 8, SHADOW);
    buf.fill_rect(px, py, panel_w, panel_h, DIRT);
    buf.fill_rect(px + 4, py + 4, panel_w - 8, panel_h - 8, PANEL);

    draw_text_centered(buf, cx, py + 20, "GAME OVER", 8, WHITE);
    draw_text_centered(buf, cx, py + 78, &score.to_string(), 5, BEAK);
    draw_text_centered(buf, cx, py + 120, "PRESS R TO RESTART", 4, WHITE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::PLAYER_X;

    fn hud(preview: Option<&Frame>) -> Hud<'_> {
        Hud {
            preview,
            camera: CameraStatus::Simulated,
            practice: false,
        }
    }

    fn crashed(seed: u64) -> GameStateMachine {
        let mut game = GameStateMachine::new(seed);
        for _ in 0..20_000 {
            if game.tick(false).collided() {
                break;
            }
        }
        game
    }

    #[test]
    fn test_blit_scales_cells() {
        let sprite = Sprite::from_art(&["X.", ".X"], &[('X', COMB)], 3);
        let mut buf = PixelBuf::new(6, 6);
        blit(&mut buf, &sprite, 0, 0);
        assert_eq!(buf.get(2, 2), COMB);
        assert_eq!(buf.get(3, 3), COMB);
        assert_eq!(buf.get(3, 0), BLACK);
    }

    #[test]
    fn test_scene_draws_preview_in_corner() {
        let frame = Frame::new(20, 15, MARKER);
        let game = GameStateMachine::new(1);
        let mut buf = PixelBuf::new(BASE_WIDTH as usize, BASE_HEIGHT as usize);
        draw_scene(&mut buf, &game, &hud(Some(&frame)));
        assert_eq!(buf.get(10, 10), MARKER);
        assert_eq!(buf.get(29, 24), MARKER);
        assert_eq!(buf.get(8, 8), SHADOW);
    }

    #[test]
    fn test_scene_draws_player() {
        let game = GameStateMachine::new(1);
        let mut buf = PixelBuf::new(BASE_WIDTH as usize, BASE_HEIGHT as usize);
        draw_scene(&mut buf, &game, &hud(None));
        let rect = game.player().rect();
        let sprite = game.player().sprite();
        let (dx, dy) = (0..rect.w)
            .flat_map(|dx| (0..rect.h).map(move |dy| (dx, dy)))
            .find(|&(dx, dy)| sprite.solid(dx, dy))
            .unwrap();
        assert_eq!(
            Some(buf.get((PLAYER_X + dx) as usize, (rect.y + dy) as usize)),
            sprite.pixel(dx, dy)
        );
    }

    #[test]
    fn test_game_over_dims_world() {
        let game = crashed(4);
        assert_eq!(game.state().phase, Phase::Collided);
        let mut running = PixelBuf::new(BASE_WIDTH as usize, BASE_HEIGHT as usize);
        draw_scene(&mut running, &GameStateMachine::new(4), &hud(None));
        let mut over = PixelBuf::new(BASE_WIDTH as usize, BASE_HEIGHT as usize);
        draw_scene(&mut over, &game, &hud(None));
        // Top of the sky, outside the panel and the HUD text.
        let c = over.get(320, 0);
        assert_eq!(c, SKY_TOP.halved());
        assert_ne!(running.get(320, 0), over.get(320, 0));
    }

    #[test]
    fn test_renderer_letterboxes() {
        let mut renderer = Renderer::new(80, 20);
        let game = GameStateMachine::new(1);
        let screen = renderer.compose(&game, &hud(None));
        assert_eq!((screen.width(), screen.height()), (80, 40));
        // 40 px tall at 4:3 is 53 wide: bars on both sides.
        assert_eq!(screen.get(0, 20), BLACK);
        assert_eq!(screen.get(79, 20), BLACK);
        assert_ne!(screen.get(40, 20), BLACK);
    }
}
