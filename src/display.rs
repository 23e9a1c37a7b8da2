use crate::consts::{SCREEN_HEIGHT, SCREEN_PIXELS, SCREEN_WIDTH};

/// 64x32 monochrome framebuffer, one byte per pixel holding 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Display {
    pixels: [u8; SCREEN_PIXELS],
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

impl Display {
    pub fn new() -> Self {
        Display {
            pixels: [0; SCREEN_PIXELS],
        }
    }

    pub fn reset(&mut self) {
        self.pixels = [0; SCREEN_PIXELS];
    }

    /// Off-screen coordinates read as 0.
    pub fn get_pixel(&self, x: usize, y: usize) -> u8 {
        match index(x, y) {
            Some(i) => self.pixels[i],
            None => 0,
        }
    }

    /// Off-screen coordinates are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize, value: u8) {
        if let Some(i) = index(x, y) {
            self.pixels[i] = value & 1;
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.pixels.chunks_exact(SCREEN_WIDTH)
    }

    /// Text frame, one line per row.
    pub fn render(&self) -> String {
        let mut res = String::with_capacity(SCREEN_PIXELS * 3 + SCREEN_HEIGHT);

        for row in self.rows() {
            for &pixel in row {
                res.push(if pixel == 0 { '░' } else { '█' });
            }

            res.push('\n');
        }

        res
    }
}

fn index(x: usize, y: usize) -> Option<usize> {
    if x < SCREEN_WIDTH && y < SCREEN_HEIGHT {
        Some(y * SCREEN_WIDTH + x)
    } else {
        None
    }
}
