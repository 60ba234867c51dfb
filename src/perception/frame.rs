//! RGB video frames.

use crate::color::Rgb;

/// A captured (or processed) video frame, row-major RGB.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl Frame {
    pub fn new(width: usize, height: usize, fill: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.width + x]
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = c;
        }
    }

    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize, Rgb)> + '_ {
        self.pixels
            .iter()
            .enumerate()
            .map(move |(i, &c)| (i % self.width, i / self.width, c))
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    pub fn fill_disc(&mut self, cx: i32, cy: i32, r: i32, c: Rgb) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set(cx + dx, cy + dy, c);
                }
            }
        }
    }

    /// Left-right flip, so the preview behaves like a mirror.
    pub fn mirrored(&self) -> Frame {
        let mut pixels = Vec::with_capacity(self.pixels.len());
        for row in self.pixels.chunks(self.width.max(1)) {
            pixels.extend(row.iter().rev());
        }
        Frame {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    /// Nearest-neighbour resize.
    pub fn resized(&self, width: usize, height: usize) -> Frame {
        if self.width == 0 || self.height == 0 {
            return Frame::new(width, height, Rgb(0, 0, 0));
        }
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            let sy = y * self.height / height;
            for x in 0..width {
                let sx = x * self.width / width;
                pixels.push(self.get(sx, sy));
            }
        }
        Frame {
            width,
            height,
            pixels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb(255, 0, 0);
    const BLUE: Rgb = Rgb(0, 0, 255);

    #[test]
    fn test_mirrored_flips_columns() {
        let mut frame = Frame::new(4, 2, BLUE);
        frame.set(0, 1, RED);

        let m = frame.mirrored();
        assert_eq!(m.get(3, 1), RED);
        assert_eq!(m.get(0, 1), BLUE);
        assert_eq!(m.width(), 4);
        assert_eq!(m.height(), 2);
    }

    #[test]
    fn test_resized_keeps_layout() {
        let mut frame = Frame::new(8, 8, BLUE);
        frame.fill_rect(0, 0, 4, 4, RED);

        let small = frame.resized(2, 2);
        assert_eq!(small.width(), 2);
        assert_eq!(small.get(0, 0), RED);
        assert_eq!(small.get(1, 0), BLUE);
        assert_eq!(small.get(1, 1), BLUE);
    }

    #[test]
    fn test_set_out_of_bounds_ignored() {
        let mut frame = Frame::new(2, 2, BLUE);
        frame.set(-1, 0, RED);
        frame.set(2, 2, RED);
        assert!(frame.pixels().all(|(_, _, c)| c == BLUE));
    }
}
