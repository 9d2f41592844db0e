//! Value types produced by detection and sampling.

use image::Rgb;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box of a candidate reagent pad, in processed-image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when the box is non-empty and lies entirely inside a `width`x`height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.x.checked_add(self.width).is_some_and(|right| right <= width)
            && self.y.checked_add(self.height).is_some_and(|bottom| bottom <= height)
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    pub fn bbox_area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// A region together with the mean color of its pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSample {
    pub region: Region,
    pub color: [u8; 3],
}

impl ColorSample {
    pub fn rgb(&self) -> Rgb<u8> {
        Rgb(self.color)
    }

    pub fn hex(&self) -> String {
        let [r, g, b] = self.color;
        format!("#{r:02X}{g:02X}{b:02X}")
    }
}
