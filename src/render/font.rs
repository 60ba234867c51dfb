// ── Pixel font ──────────────────────────────────────────────────────────────

use crate::color::{Rgb, SHADOW};
use crate::render::pixels::PixelBuf;

/// Horizontal distance between glyph origins, in font pixels.
const ADVANCE: i32 = 4;
const GLYPH_H: i32 = 5;

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
const LETTERS: [(char, [u8; 15]); 15] = [
    ('A', [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1]),
    ('C', [1,1,1, 1,0,0, 1,0,0, 1,0,0, 1,1,1]),
    ('E', [1,1,1, 1,0,0, 1,1,1, 1,0,0, 1,1,1]),
    ('G', [1,1,1, 1,0,0, 1,0,1, 1,0,1, 1,1,1]),
    ('H', [1,0,1, 1,0,1, 1,1,1, 1,0,1, 1,0,1]),
    ('I', [1,1,1, 0,1,0, 0,1,0, 0,1,0, 1,1,1]),
    ('M', [1,0,1, 1,1,1, 1,1,1, 1,0,1, 1,0,1]),
    ('N', [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,0,1]),
    ('O', [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1]),
    ('P', [1,1,1, 1,0,1, 1,1,1, 1,0,0, 1,0,0]),
    ('R', [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,0,1]),
    ('S', [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1]),
    ('T', [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0]),
    ('U', [1,0,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1]),
    ('V', [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0]),
];

fn glyph(ch: char) -> Option<&'static [u8; 15]> {
    match ch {
        '0'..='9' => Some(&DIGITS[ch as usize - '0' as usize]),
        _ => LETTERS
            .iter()
            .find(|(c, _)| *c == ch.to_ascii_uppercase())
            .map(|(_, g)| g),
    }
}

/// Width in screen pixels of `text` drawn at `size`.
pub fn text_width(text: &str, size: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 { 0 } else { (n * ADVANCE - 1) * size }
}

pub fn text_height(size: i32) -> i32 {
    GLYPH_H * size
}

/// Draw `text` with its top-left at (x, y), each font pixel a `size`×`size`
/// block with a drop shadow. Characters without a glyph render as spaces.
pub fn draw_text(buf: &mut PixelBuf, x: i32, y: i32, text: &str, size: i32, fg: Rgb) {
    let offset = size / 2 + 1;
    // Shadow pass
    stamp(buf, x + offset, y + offset, text, size, SHADOW);
    stamp(buf, x, y, text, size, fg);
}

fn stamp(buf: &mut PixelBuf, x: i32, y: i32, text: &str, size: i32, c: Rgb) {
    for (i, ch) in text.chars().enumerate() {
        let Some(glyph) = glyph(ch) else { continue };
        let gx = x + i as i32 * ADVANCE * size;
        for row in 0..5 {
            for col in 0..3 {
                if glyph[row * 3 + col] == 1 {
                    buf.fill_rect(gx + col as i32 * size, y + row as i32 * size, size, size, c);
                }
            }
        }
    }
}

pub fn draw_text_centered(buf: &mut PixelBuf, cx: i32, y: i32, text: &str, size: i32, fg: Rgb) {
    draw_text(buf, cx - text_width(text, size) / 2, y, text, size, fg);
}
