//! Accumulation buffer for radiance samples.

use std::path::Path;

use crate::color::{to_rgb8, Color};
use lumen_core::SpinLock;
use rayon::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilmError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Running sum of the samples that landed in one pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pixel {
    pub sum: Color,
    pub count: u32,
}

impl Pixel {
    /// Mean of the accumulated samples, black when empty.
    pub fn average(&self) -> Color {
        if self.count == 0 {
            Color::ZERO
        } else {
            self.sum / self.count as f32
        }
    }
}

/// A width x height grid of pixels, each behind its own lock so render
/// threads can write concurrently.
pub struct Film {
    width: usize,
    height: usize,
    pixels: Vec<SpinLock<Pixel>>,
}

impl Film {
    pub fn new(width: usize, height: usize) -> Self {
        let pixels = (0..width * height)
            .map(|_| SpinLock::new(Pixel::default()))
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Add one radiance sample to pixel `(x, y)`.
    ///
    /// Non-finite samples are dropped and `false` is returned.
    pub fn add_sample(&self, x: usize, y: usize, color: Color) -> bool {
        if !color.is_finite() || x >= self.width {
            return false;
        }
        match self.pixels.get(y * self.width + x) {
            Some(pixel) => {
                let mut pixel = pixel.lock();
                pixel.sum += color;
                pixel.count += 1;
                true
            }
            None => false,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Pixel {
        *self.pixels[y * self.width + x].lock()
    }

    pub fn clear(&self) {
        for pixel in &self.pixels {
            *pixel.lock() = Pixel::default();
        }
    }

    /// Gamma-encoded 8-bit RGB, row-major from the top-left.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels
            .par_iter()
            .map(|pixel| to_rgb8(pixel.lock().average()))
            .collect::<Vec<[u8; 3]>>()
            .into_iter()
            .flatten()
            .collect()
    }

    /// Write the film to an image file; the format follows the extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), FilmError> {
        image::save_buffer(
            path,
            &self.to_rgb8(),
            self.width as u32,
            self.height as u32,
            image::ColorType::Rgb8,
        )?;
        Ok(())
    }
}
