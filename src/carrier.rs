use crate::error::{Result, StegError};

/// One RGBA pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pixel {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Pixel {
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Channel values in RGBA order
    pub fn to_bytes(self) -> [u8; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }
}

/// Carrier image as an owned row-major pixel arena
/// Index `i` maps to `x = i % width`, `y = i / width`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl PixelBuffer {
    /// Create a buffer filled with a single pixel value
    pub fn new(width: u32, height: u32, fill: Pixel) -> Self {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![fill; count],
        }
    }

    /// Build a buffer from raw RGBA8 bytes (4 bytes per pixel, row-major)
    pub fn from_rgba(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(StegError::InvalidInput(format!(
                "expected {} RGBA bytes for {}x{}, got {}",
                expected,
                width,
                height,
                bytes.len()
            )));
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|c| Pixel::new(c[0], c[1], c[2], c[3]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> Pixel,
    {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Raw RGBA8 bytes, row-major
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_bytes()).collect()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels, which is also the embedding capacity in bits
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Embedding capacity in bits (one bit per pixel)
    pub fn capacity_bits(&self) -> u64 {
        self.pixels.len() as u64
    }

    /// Pixel at (x, y), or None when out of bounds
    pub fn get(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index_of(x, y)).copied()
    }

    /// Pixel at a linear row-major index
    pub fn at(&self, index: usize) -> Option<Pixel> {
        self.pixels.get(index).copied()
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    fn index_of(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}
