use image::{Rgb, RgbImage};

/// One rectangular pad on a synthetic strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadSpec {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub color: [u8; 3],
}

/// Describes a synthetic test strip: a plain backing with solid pads on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripLayout {
    pub width: u32,
    pub height: u32,
    pub background: [u8; 3],
    pub pads: Vec<PadSpec>,
}

// pH 7.0, chlorine 1.0, nitrates 10, hardness 150, alkalinity 120, bacteria negative
const DEFAULT_PAD_COLORS: [[u8; 3]; 6] = [
    [150, 255, 150],
    [255, 240, 150],
    [255, 200, 200],
    [255, 255, 200],
    [255, 255, 100],
    [100, 255, 100],
];

impl Default for StripLayout {
    /// A 400x100 strip with six 40x40 pads spaced 60 px apart at y = 30.
    fn default() -> Self {
        let pads = DEFAULT_PAD_COLORS
            .iter()
            .enumerate()
            .map(|(i, &color)| PadSpec {
                x: 50 + 60 * i as u32,
                y: 30,
                width: 40,
                height: 40,
                color,
            })
            .collect();
        Self {
            width: 400,
            height: 100,
            background: [240, 240, 230],
            pads,
        }
    }
}

impl StripLayout {
    /// A uniform `width`x`height` backing with no pads.
    pub fn blank(width: u32, height: u32, background: [u8; 3]) -> Self {
        Self {
            width,
            height,
            background,
            pads: Vec::new(),
        }
    }

    pub fn with_pad(mut self, x: u32, y: u32, width: u32, height: u32, color: [u8; 3]) -> Self {
        self.pads.push(PadSpec {
            x,
            y,
            width,
            height,
            color,
        });
        self
    }
}

/// Renders `layout`. Pads are painted in order and clipped to the strip.
pub fn generate_test_strip(layout: &StripLayout) -> RgbImage {
    let mut img = RgbImage::from_pixel(layout.width, layout.height, Rgb(layout.background));
    for pad in &layout.pads {
        fill_rect(&mut img, pad.x, pad.y, pad.width, pad.height, Rgb(pad.color));
    }
    img
}

/// Paints a solid rectangle, silently clipping whatever falls outside `img`.
pub fn fill_rect(img: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>) {
    let x_end = x.saturating_add(width).min(img.width());
    let y_end = y.saturating_add(height).min(img.height());
    for yy in y..y_end {
        for xx in x..x_end {
            img.put_pixel(xx, yy, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_strip_has_six_pads() {
        let layout = StripLayout::default();
        assert_eq!(layout.pads.len(), 6);
        assert_eq!(layout.pads[5].x, 350);

        let img = generate_test_strip(&layout);
        assert_eq!(img.dimensions(), (400, 100));
        assert_eq!(img.get_pixel(10, 10), &Rgb([240, 240, 230]));
        assert_eq!(img.get_pixel(70, 50), &Rgb([150, 255, 150]));
        assert_eq!(img.get_pixel(389, 69), &Rgb([100, 255, 100]));
        assert_eq!(img.get_pixel(390, 69), &Rgb([240, 240, 230]));
    }

    #[test]
    fn fill_rect_clips() {
        let mut img = RgbImage::new(10, 10);
        fill_rect(&mut img, 8, 8, 5, 5, Rgb([1, 1, 1]));
        assert_eq!(img.get_pixel(9, 9), &Rgb([1, 1, 1]));
        assert_eq!(img.get_pixel(7, 9), &Rgb([0, 0, 0]));
        fill_rect(&mut img, 20, 20, 5, 5, Rgb([2, 2, 2]));
    }
}
