// ── Pixel buffer with half-block rendering ──────────────────────────────────

use std::io::{self, Write};

use crossterm::{cursor, queue, style::{self, Color as CColor}};

use crate::color::{BLACK, Rgb};

pub struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![BLACK; w * h],
        }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, BLACK);
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    pub fn fill(&mut self, c: Rgb) {
        self.px.fill(c);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.w as i32);
        let y1 = (y + h).min(self.h as i32);
        for py in y0..y1 {
            let row = py as usize * self.w;
            self.px[row + x0 as usize..row + x1.max(x0) as usize].fill(c);
        }
    }

    /// Halve the brightness of every pixel.
    pub fn dim(&mut self) {
        for c in &mut self.px {
            *c = c.halved();
        }
    }

    /// Scale `src` into this buffer preserving its aspect ratio, centred,
    /// with black bars on the spare sides.
    pub fn letterbox_from(&mut self, src: &PixelBuf) {
        self.fill(BLACK);
        if src.w == 0 || src.h == 0 || self.w == 0 || self.h == 0 {
            return;
        }
        let scale = (self.w as f32 / src.w as f32).min(self.h as f32 / src.h as f32);
        let dw = ((src.w as f32 * scale) as usize).clamp(1, self.w);
        let dh = ((src.h as f32 * scale) as usize).clamp(1, self.h);
        let ox = (self.w - dw) / 2;
        let oy = (self.h - dh) / 2;
        for y in 0..dh {
            let sy = (y * src.h / dh).min(src.h - 1);
            for x in 0..dw {
                let sx = (x * src.w / dw).min(src.w - 1);
                self.px[(oy + y) * self.w + ox + x] = src.get(sx, sy);
            }
        }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = Rgb(0, 0, 0);
        let mut prev_bg = Rgb(0, 0, 0);
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(out, style::SetBackgroundColor(to_term(top)))?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(out, style::SetForegroundColor(to_term(top)))?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(out, style::SetBackgroundColor(to_term(bot)))?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

fn to_term(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}
