//! Pixel-art sprites. Each sprite doubles as its own collision mask: a pixel
//! is solid exactly when it is drawn.

use std::sync::LazyLock;

use crate::color::*;

/// A scaled bitmap with transparency.
#[derive(Clone, Debug)]
pub struct Sprite {
    cols: usize,
    rows: usize,
    scale: i32,
    cells: Vec<Option<Rgb>>,
}

impl Sprite {
    /// Build from ASCII art. `.` is transparent; other characters are looked
    /// up in `palette`. Short rows are padded with transparency.
    pub fn from_art(art: &[&str], palette: &[(char, Rgb)], scale: i32) -> Self {
        let cols = art.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let rows = art.len();
        let mut cells = vec![None; cols * rows];
        for (y, row) in art.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                cells[y * cols + x] = palette.iter().find(|(k, _)| *k == ch).map(|(_, c)| *c);
            }
        }
        Self {
            cols,
            rows,
            scale,
            cells,
        }
    }

    /// Width in screen pixels.
    pub fn width(&self) -> i32 {
        self.cols as i32 * self.scale
    }

    /// Height in screen pixels.
    pub fn height(&self) -> i32 {
        self.rows as i32 * self.scale
    }

    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// Art cells as (column, row, colour), skipping transparent ones.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, Rgb)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, c)| {
            c.map(|c| ((i % self.cols) as i32, (i / self.cols) as i32, c))
        })
    }

    /// Colour at a pixel offset from the sprite's top-left corner.
    pub fn pixel(&self, dx: i32, dy: i32) -> Option<Rgb> {
        if dx < 0 || dy < 0 || dx >= self.width() || dy >= self.height() {
            return None;
        }
        let (cx, cy) = ((dx / self.scale) as usize, (dy / self.scale) as usize);
        self.cells[cy * self.cols + cx]
    }

    pub fn solid(&self, dx: i32, dy: i32) -> bool {
        self.pixel(dx, dy).is_some()
    }
}

/// Every sprite the game draws or collides with.
pub struct SpriteSheet {
    pub player: [Sprite; 2],
    pub flying: [Sprite; 2],
    pub ground: [Sprite; 5],
    pub cloud: Sprite,
}

pub static SPRITES: LazyLock<SpriteSheet> = LazyLock::new(SpriteSheet::build);

impl SpriteSheet {
    fn build() -> Self {
        let chicken = [
            ('W', FEATHER),
            ('R', COMB),
            ('Y', BEAK),
            ('K', EYE),
            ('O', LEG),
        ];
        let crow = [('D', CROW), ('P', CROW_WING), ('Y', BEAK), ('K', EYE)];
        let props = [
            ('G', CACTUS),
            ('g', CACTUS_DARK),
            ('S', STONE),
            ('s', STONE_DARK),
            ('B', WOOD),
            ('b', WOOD_DARK),
        ];
        let sky = [('C', CLOUD), ('c', CLOUD_SHADE)];

        Self {
            player: [
                Sprite::from_art(&CHICKEN_A, &chicken, 6),
                Sprite::from_art(&CHICKEN_B, &chicken, 6),
            ],
            flying: [
                Sprite::from_art(&CROW_UP, &crow, 8),
                Sprite::from_art(&CROW_DOWN, &crow, 8),
            ],
            ground: [
                Sprite::from_art(&ROCK, &props, 6),
                Sprite::from_art(&CACTUS_ART, &props, 6),
                Sprite::from_art(&TWIN_CACTUS, &props, 6),
                Sprite::from_art(&FENCE, &props, 6),
                Sprite::from_art(&CRATE, &props, 6),
            ],
            cloud: Sprite::from_art(&CLOUD_ART, &sky, 6),
        }
    }
}

// ── Art ─────────────────────────────────────────────────────────────────────

#[rustfmt::skip]
const CHICKEN_A: [&str; 16] = [
    "................",
    "........RR......",
    ".......RRRR.....",
    "......WWWWW.....",
    "......WWWKWY....",
    "......WWWWWYY...",
    "......WWWWWR....",
    ".WW..WWWWWW.....",
    ".WWWWWWWWWW.....",
    "..WWWWWWWWW.....",
    "..WWWWWWWWW.....",
    "...WWWWWWW......",
    "....WWWWW.......",
    ".....O..O.......",
    ".....O..O.......",
    "....OO.OO.......",
];

#[rustfmt::skip]
const CHICKEN_B: [&str; 16] = [
    "................",
    "........RR......",
    ".......RRRR.....",
    "......WWWWW.....",
    "......WWWKWY....",
    "......WWWWWYY...",
    "......WWWWWR....",
    ".WW..WWWWWW.....",
    ".WWWWWWWWWW.....",
    "..WWWWWWWWW.....",
    "..WWWWWWWWW.....",
    "...WWWWWWW......",
    "....WWWWW.......",
    "......OO........",
    ".....O..O.......",
    "....OO...OO.....",
];

#[rustfmt::skip]
const CROW_UP: [&str; 16] = [
    "................",
    "................",
    "................",
    "........PP......",
    ".......PPP......",
    "......PPPP......",
    "..DD..PPP.......",
    ".YDKDDDDDDDD....",
    "YYDDDDDDDDDDDD..",
    "...DDDDDDDDDDDDD",
    "....DDDDDDDD....",
    "................",
    "................",
    "................",
    "................",
    "................",
];

#[rustfmt::skip]
const CROW_DOWN: [&str; 16] = [
    "................",
    "................",
    "................",
    "................",
    "................",
    "................",
    "..DD............",
    ".YDKDDDDDDDD....",
    "YYDDDDDDDDDDDD..",
    "...DDDDPPPDDDDDD",
    "....DDPPPPDD....",
    "......PPPP......",
    ".......PPP......",
    "........PP......",
    "................",
    "................",
];

#[rustfmt::skip]
const ROCK: [&str; 16] = [
    "................",
    "................",
    "................",
    "................",
    "................",
    "......SSSS......",
    "....SSSSSSSS....",
    "...SSSSSsSSSS...",
    "..SSSsSSSSSSSS..",
    "..SSSSSSSSSsSS..",
    "..SSSSSSSSSSSS..",
    "..ssssssssssss..",
    "................",
    "................",
    "................",
    "................",
];

#[rustfmt::skip]
const CACTUS_ART: [&str; 16] = [
    "................",
    "................",
    ".......GG.......",
    "......GGGG......",
    "......GGGG..GG..",
    ".GG...GGGG..GG..",
    ".GG...GGGG..GG..",
    ".GG...GGGGGGGG..",
    ".GGGGGGGGGGGG...",
    "..GGGGGGGG......",
    "......GGGG......",
    "......GGGG......",
    "......gggg......",
    "................",
    "................",
    "................",
];

#[rustfmt::skip]
const TWIN_CACTUS: [&str; 16] = [
    "................",
    "................",
    "...GG......GG...",
    "..GGGG....GGGG..",
    "G.GGGG.G..GGGG.G",
    "G.GGGG.G..GGGG.G",
    "GGGGGGGG.GGGGGGG",
    ".GGGGGG...GGGGG.",
    "..GGGG....GGGG..",
    "..GGGG....GGGG..",
    "..GGGG....GGGG..",
    "..GGGG....GGGG..",
    "..gggg....gggg..",
    "................",
    "................",
    "................",
];

#[rustfmt::skip]
const FENCE: [&str; 16] = [
    "................",
    "................",
    ".B....B....B....",
    "BBB..BBB..BBB...",
    "BBB..BBB..BBB...",
    "BBBBBBBBBBBBBB..",
    "BBBBBBBBBBBBBB..",
    "BBB..BBB..BBB...",
    "BBB..BBB..BBB...",
    "BBBBBBBBBBBBBB..",
    "BBBBBBBBBBBBBB..",
    "BBB..BBB..BBB...",
    "bbb..bbb..bbb...",
    "................",
    "................",
    "................",
];

#[rustfmt::skip]
const CRATE: [&str; 16] = [
    "................",
    "................",
    ".bbbbbbbbbbbbbb.",
    ".bBBBBBBBBBBBBb.",
    ".bBbBBBBBBBBbBb.",
    ".bBBbBBBBBBbBBb.",
    ".bBBBbBBBBbBBBb.",
    ".bBBBBbBBbBBBBb.",
    ".bBBBBBbbBBBBBb.",
    ".bBBBBbBBbBBBBb.",
    ".bBBBbBBBBbBBBb.",
    ".bBBbBBBBBBbBBb.",
    ".bbbbbbbbbbbbbb.",
    "................",
    "................",
    "................",
];

#[rustfmt::skip]
const CLOUD_ART: [&str; 16] = [
    "................",
    "................",
    "................",
    "................",
    "......CCC.......",
    "....CCCCCCC.....",
    "..CCCCCCCCCCC...",
    ".CCCCCCCCCCCCCC.",
    "CCCCCCCCCCCCCCCC",
    "cccccccccccccccc",
    "................",
    "................",
    "................",
    "................",
    "................",
    "................",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_dimensions() {
        let s = &*SPRITES;
        for sprite in s.player.iter().chain(&s.ground).chain(std::iter::once(&s.cloud)) {
            assert_eq!((sprite.width(), sprite.height()), (96, 96));
        }
        for sprite in &s.flying {
            assert_eq!((sprite.width(), sprite.height()), (128, 128));
        }
    }

    #[test]
    fn test_pixel_lookup_scales() {
        let sprite = Sprite::from_art(&["R.", ".R"], &[('R', COMB)], 4);
        assert_eq!(sprite.pixel(0, 0), Some(COMB));
        assert_eq!(sprite.pixel(3, 3), Some(COMB));
        assert_eq!(sprite.pixel(4, 0), None);
        assert_eq!(sprite.pixel(7, 7), Some(COMB));
        assert!(!sprite.solid(8, 0));
        assert!(!sprite.solid(-1, 0));
        assert_eq!(sprite.cells().count(), 2);
    }

    #[test]
    fn test_crow_clears_standing_chicken() {
        // Lowest solid row of either crow frame must stay above row 1 of the
        // chicken when both sit at their default heights.
        for crow in &SPRITES.flying {
            let lowest = (0..crow.height())
                .rev()
                .find(|&dy| (0..crow.width()).any(|dx| crow.solid(dx, dy)))
                .unwrap();
            assert!(236 + lowest < 357 + 6);
        }
    }
}
