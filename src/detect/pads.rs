//! Locates candidate reagent pads in an enhanced strip image.
//!
//! Pads are expected darker (or more saturated) than the strip backing, so the
//! detector binarizes with an inverted local threshold, labels the foreground,
//! keeps only outermost components, filters them by enclosed area and aspect
//! ratio and returns their bounding boxes in reading order.

use std::collections::VecDeque;

use image::{GrayImage, Luma, RgbImage};
use imageproc::contours::{BorderType, Contour, find_contours};
use imageproc::region_labelling::{Connectivity, connected_components};
use log::debug;

use super::threshold::{BACKGROUND, adaptive_threshold_inv};
use crate::config::DetectionConfig;
use crate::error::Result;
use crate::kornia::greyscale::luma;
use crate::region::Region;

/// An outermost foreground component before shape filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    pub bbox: Region,
    /// Pixels inside the component's outer boundary, holes included.
    pub area: u64,
}

/// Returns the ordered bounding boxes of pad-shaped regions in `image`.
pub fn detect(image: &RgbImage, config: &DetectionConfig) -> Result<Vec<Region>> {
    detect_with_mask(image, config).map(|(regions, _)| regions)
}

/// Same as [`detect`], also returning the binary mask the components were read from.
pub fn detect_with_mask(
    image: &RgbImage,
    config: &DetectionConfig,
) -> Result<(Vec<Region>, GrayImage)> {
    let gray = luma(image)?;
    let mask = adaptive_threshold_inv(&gray, config.block_size as usize, config.offset);

    let components = outer_components(&mask);
    let total = components.len();
    let mut regions: Vec<Region> = components
        .into_iter()
        .filter(|c| is_pad_shaped(c, config))
        .map(|c| c.bbox)
        .collect();
    debug!("{} of {} outer components look like pads", regions.len(), total);

    sort_reading_order(&mut regions, config.row_tolerance);
    Ok((regions, mask))
}

pub fn is_pad_shaped(component: &Component, config: &DetectionConfig) -> bool {
    let area = component.area as f64;
    let aspect = component.bbox.aspect_ratio();
    area > config.min_area
        && area < config.max_area
        && aspect > config.min_aspect_ratio
        && aspect < config.max_aspect_ratio
}

/// Returns every foreground component of `mask` that is not enclosed by
/// another one, with its bounding box and filled area.
///
/// Outermost components are the outer borders without a parent in the border
/// hierarchy; pixels are 8-connected.
pub fn outer_components(mask: &GrayImage) -> Vec<Component> {
    let (width, height) = mask.dimensions();
    if width == 0 || height == 0 {
        return Vec::new();
    }
    // Border tracing assumes a background frame (outer borders only start at
    // x > 0) and labelling needs more than one pixel; a one-pixel frame covers both.
    let framed = with_background_frame(mask);
    let framed_width = framed.width() as usize;
    let labels = connected_components(&framed, Connectivity::Eight, Luma([BACKGROUND]))
        .into_raw();

    find_contours::<u32>(&framed)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .filter_map(|contour| {
            let first = contour.points.first()?;
            let label = labels[first.y as usize * framed_width + first.x as usize];
            let framed_bbox = contour_bbox(&contour)?;
            Some(Component {
                bbox: Region::new(
                    framed_bbox.x - 1,
                    framed_bbox.y - 1,
                    framed_bbox.width,
                    framed_bbox.height,
                ),
                area: filled_area(&labels, framed_width, label, &framed_bbox),
            })
        })
        .collect()
}

fn with_background_frame(mask: &GrayImage) -> GrayImage {
    let (width, height) = mask.dimensions();
    let mut framed = GrayImage::from_pixel(width + 2, height + 2, Luma([BACKGROUND]));
    for (x, y, pixel) in mask.enumerate_pixels() {
        framed.put_pixel(x + 1, y + 1, *pixel);
    }
    framed
}

fn contour_bbox(contour: &Contour<u32>) -> Option<Region> {
    let min_x = contour.points.iter().map(|p| p.x).min()?;
    let max_x = contour.points.iter().map(|p| p.x).max()?;
    let min_y = contour.points.iter().map(|p| p.y).min()?;
    let max_y = contour.points.iter().map(|p| p.y).max()?;
    Some(Region::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

/// Counts the pixels of `bbox` that cannot reach its border without crossing
/// `label`, i.e. the component plus everything it encloses.
fn filled_area(labels: &[u32], width: usize, label: u32, bbox: &Region) -> u64 {
    let (x0, y0) = (bbox.x as usize, bbox.y as usize);
    // one pixel of padding so the flood can run around the whole component
    let bw = bbox.width as usize + 2;
    let bh = bbox.height as usize + 2;
    let is_wall = |px: usize, py: usize| -> bool {
        if px == 0 || py == 0 || px == bw - 1 || py == bh - 1 {
            return false;
        }
        labels[(y0 + py - 1) * width + x0 + px - 1] == label
    };

    let mut reached = vec![false; bw * bh];
    let mut queue = VecDeque::new();
    reached[0] = true;
    queue.push_back((0usize, 0usize));
    let mut outside = 0u64;
    while let Some((px, py)) = queue.pop_front() {
        if (1..bw - 1).contains(&px) && (1..bh - 1).contains(&py) {
            outside += 1;
        }
        for (dx, dy) in [(-1isize, 0isize), (1, 0), (0, -1), (0, 1)] {
            let nx = px as isize + dx;
            let ny = py as isize + dy;
            if nx < 0 || ny < 0 || nx >= bw as isize || ny >= bh as isize {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            if reached[ny * bw + nx] || is_wall(nx, ny) {
                continue;
            }
            reached[ny * bw + nx] = true;
            queue.push_back((nx, ny));
        }
    }

    let inner = ((bw - 2) * (bh - 2)) as u64;
    inner - outside
}

/// Whether `a` reads before `b`: same row when the top edges are less than
/// `row_tolerance` apart (then left to right), otherwise top to bottom.
///
/// This is not a strict weak ordering: rows are decided pairwise, so `a`/`b`
/// and `b`/`c` can share a row while `a`/`c` do not.
pub fn reads_before(a: &Region, b: &Region, row_tolerance: u32) -> bool {
    if a.y.abs_diff(b.y) < row_tolerance {
        a.x < b.x
    } else {
        a.y < b.y
    }
}

/// Stable insertion sort driven by [`reads_before`].
///
/// The predicate is not transitive, which the standard library sorts do not
/// allow (they may panic), so the pairwise rule is applied directly.
pub fn sort_reading_order(regions: &mut [Region], row_tolerance: u32) {
    for i in 1..regions.len() {
        let mut j = i;
        while j > 0 && reads_before(&regions[j], &regions[j - 1], row_tolerance) {
            regions.swap(j, j - 1);
            j -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::threshold::FOREGROUND;

    fn mask_with(rects: &[(u32, u32, u32, u32)], w: u32, h: u32) -> GrayImage {
        let mut mask = GrayImage::new(w, h);
        for &(x, y, rw, rh) in rects {
            for yy in y..y + rh {
                for xx in x..x + rw {
                    mask.put_pixel(xx, yy, Luma([FOREGROUND]));
                }
            }
        }
        mask
    }

    fn hollow(mask: &mut GrayImage, x: u32, y: u32, w: u32, h: u32) {
        for yy in y..y + h {
            for xx in x..x + w {
                mask.put_pixel(xx, yy, Luma([BACKGROUND]));
            }
        }
    }

    #[test]
    fn single_pixel_mask_is_handled() {
        assert!(outer_components(&mask_with(&[], 1, 1)).is_empty());
        assert_eq!(
            outer_components(&mask_with(&[(0, 0, 1, 1)], 1, 1)),
            vec![Component {
                bbox: Region::new(0, 0, 1, 1),
                area: 1,
            }]
        );
    }

    #[test]
    fn one_pixel_wide_masks_are_handled() {
        let column = mask_with(&[(0, 3, 1, 5)], 1, 20);
        let found = outer_components(&column);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].bbox, Region::new(0, 3, 1, 5));
        assert_eq!(found[0].area, 5);

        let row = mask_with(&[(2, 0, 4, 1), (10, 0, 3, 1)], 20, 1);
        let areas: Vec<u64> = outer_components(&row).iter().map(|c| c.area).collect();
        assert_eq!(areas.len(), 2);
        assert_eq!(areas.iter().sum::<u64>(), 7);
    }

    #[test]
    fn mask_filled_edge_to_edge_is_one_component() {
        let comps = outer_components(&mask_with(&[(0, 0, 8, 5)], 8, 5));
        assert_eq!(
            comps,
            vec![Component {
                bbox: Region::new(0, 0, 8, 5),
                area: 40,
            }]
        );
    }

    #[test]
    fn solid_block_area_is_pixel_count() {
        let mask = mask_with(&[(5, 6, 12, 7)], 30, 30);
        let comps = outer_components(&mask);
        assert_eq!(comps.len(), 1);
        assert_eq!(comps[0].bbox, Region::new(5, 6, 12, 7));
        assert_eq!(comps[0].area, 84);
    }

    #[test]
    fn ring_area_includes_its_hole() {
        let mut mask = mask_with(&[(4, 4, 20, 10)], 40, 30);
        hollow(&mut mask, 7, 7, 14, 4);
        let comps = outer_components(&mask);
        assert_eq!(comps.len(), 1);
        assert_eq!(comps[0].area, 200);
    }

    #[test]
    fn islands_inside_holes_are_not_reported() {
        let mut mask = mask_with(&[(2, 2, 30, 30)], 40, 40);
        hollow(&mut mask, 5, 5, 24, 24);
        let island = mask_with(&[(12, 12, 6, 6)], 40, 40);
        for (x, y, p) in island.enumerate_pixels() {
            if p[0] == FOREGROUND {
                mask.put_pixel(x, y, *p);
            }
        }
        let comps = outer_components(&mask);
        assert_eq!(comps.len(), 1);
        assert_eq!(comps[0].bbox, Region::new(2, 2, 30, 30));
        assert_eq!(comps[0].area, 900);
    }

    #[test]
    fn diagonal_pixels_join_one_component() {
        let mut mask = GrayImage::new(5, 5);
        mask.put_pixel(1, 1, Luma([FOREGROUND]));
        mask.put_pixel(2, 2, Luma([FOREGROUND]));
        mask.put_pixel(3, 3, Luma([FOREGROUND]));
        let comps = outer_components(&mask);
        assert_eq!(comps.len(), 1);
        assert_eq!(comps[0].bbox, Region::new(1, 1, 3, 3));
        assert_eq!(comps[0].area, 3);
    }

    #[test]
    fn component_touching_left_border_is_outer() {
        let mask = mask_with(&[(0, 3, 4, 4)], 10, 10);
        let comps = outer_components(&mask);
        assert_eq!(comps.len(), 1);
        assert_eq!(comps[0].area, 16);
    }

    #[test]
    fn shape_filter_bounds_are_exclusive() {
        let config = DetectionConfig::default();
        let comp = |w, h, area| Component {
            bbox: Region::new(0, 0, w, h),
            area,
        };
        assert!(is_pad_shaped(&comp(20, 20, 400), &config));
        assert!(!is_pad_shaped(&comp(10, 10, 100), &config));
        assert!(!is_pad_shaped(&comp(100, 100, 10_000), &config));
        assert!(!is_pad_shaped(&comp(30, 10, 300), &config));
        assert!(!is_pad_shaped(&comp(10, 20, 200), &config));
        assert!(is_pad_shaped(&comp(29, 10, 290), &config));
    }

    #[test]
    fn rows_read_left_to_right_then_down() {
        let mut regions = vec![
            Region::new(50, 80, 30, 20),
            Region::new(100, 12, 30, 20),
            Region::new(10, 10, 30, 20),
        ];
        sort_reading_order(&mut regions, 50);
        assert_eq!(
            regions,
            vec![
                Region::new(10, 10, 30, 20),
                Region::new(100, 12, 30, 20),
                Region::new(50, 80, 30, 20),
            ]
        );
    }

    #[test]
    fn row_grouping_is_pairwise() {
        // a~b and b~c share rows, a and c do not
        let a = Region::new(300, 0, 10, 10);
        let b = Region::new(200, 40, 10, 10);
        let c = Region::new(100, 80, 10, 10);
        assert!(reads_before(&b, &a, 50));
        assert!(reads_before(&c, &b, 50));
        assert!(reads_before(&a, &c, 50));

        // c stays last: it is only compared against a, which reads first
        let mut regions = vec![a, b, c];
        sort_reading_order(&mut regions, 50);
        assert_eq!(regions, vec![b, a, c]);
    }
}
