// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    pub const fn halved(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }

    /// True when every channel is within `tolerance` of `other`.
    pub fn near(self, other: Rgb, tolerance: u8) -> bool {
        self.0.abs_diff(other.0) <= tolerance
            && self.1.abs_diff(other.1) <= tolerance
            && self.2.abs_diff(other.2) <= tolerance
    }
}

pub const SKY_TOP: Rgb = Rgb(70, 180, 200);
pub const SKY_BOT: Rgb = Rgb(190, 232, 245);
pub const GRASS: Rgb = Rgb(84, 168, 55);
pub const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
pub const DIRT: Rgb = Rgb(210, 185, 110);
pub const DIRT_DARK: Rgb = Rgb(185, 160, 90);
pub const HILL_FAR: Rgb = Rgb(120, 195, 75);
pub const HILL_NEAR: Rgb = Rgb(95, 175, 55);
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const SHADOW: Rgb = Rgb(30, 30, 30);
pub const PANEL: Rgb = Rgb(220, 195, 120);
pub const WARNING: Rgb = Rgb(230, 70, 50);

// Sprite palette
pub const FEATHER: Rgb = Rgb(250, 248, 240);
pub const COMB: Rgb = Rgb(220, 40, 40);
pub const BEAK: Rgb = Rgb(245, 180, 40);
pub const EYE: Rgb = Rgb(20, 20, 20);
pub const LEG: Rgb = Rgb(235, 140, 30);
pub const CACTUS: Rgb = Rgb(60, 150, 60);
pub const CACTUS_DARK: Rgb = Rgb(35, 100, 40);
pub const STONE: Rgb = Rgb(150, 150, 160);
pub const STONE_DARK: Rgb = Rgb(100, 100, 115);
pub const WOOD: Rgb = Rgb(170, 110, 60);
pub const WOOD_DARK: Rgb = Rgb(110, 70, 35);
pub const CROW: Rgb = Rgb(70, 50, 90);
pub const CROW_WING: Rgb = Rgb(110, 85, 140);
pub const CLOUD: Rgb = Rgb(255, 255, 255);
pub const CLOUD_SHADE: Rgb = Rgb(225, 235, 240);

// Simulated camera scene
pub const WALL_TOP: Rgb = Rgb(60, 64, 72);
pub const WALL_BOT: Rgb = Rgb(95, 100, 110);
pub const SKIN: Rgb = Rgb(240, 190, 150);
pub const SHIRT: Rgb = Rgb(40, 90, 200);
pub const MARKER: Rgb = Rgb(255, 40, 40);
