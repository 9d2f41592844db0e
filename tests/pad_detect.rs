use image::{Rgb, RgbImage};
use test_strip_reader::config::DetectionConfig;
use test_strip_reader::test_image_gen::{StripLayout, generate_test_strip};
use test_strip_reader::{PipelineConfig, Region, analyze, detect};

const BACKING: [u8; 3] = [235, 235, 235];
const PAD: [u8; 3] = [60, 60, 60];

fn close_to(region: &Region, expected: &Region, tolerance: u32) -> bool {
    region.x.abs_diff(expected.x) <= tolerance
        && region.y.abs_diff(expected.y) <= tolerance
        && region.width.abs_diff(expected.width) <= tolerance
        && region.height.abs_diff(expected.height) <= tolerance
}

#[test]
fn single_dark_pad_is_found() {
    let layout = StripLayout::blank(200, 200, BACKING).with_pad(85, 90, 30, 20, PAD);
    let img = generate_test_strip(&layout);

    let analysis = analyze(&img, &PipelineConfig::default()).expect("analysis failed");
    assert_eq!(analysis.regions.len(), 1, "regions: {:?}", analysis.regions);

    let expected = Region::new(85, 90, 30, 20);
    assert!(
        close_to(&analysis.regions[0], &expected, 3),
        "got {:?}",
        analysis.regions[0]
    );

    let [r, g, b] = analysis.samples[0].color;
    assert!(r < 60 && g < 60 && b < 60, "sample not dark: {r},{g},{b}");
    let spread = r.max(g).max(b) - r.min(g).min(b);
    assert!(spread <= 10, "sample not neutral: {r},{g},{b}");
}

#[test]
fn uniform_image_has_no_pads() {
    let img = generate_test_strip(&StripLayout::blank(200, 200, [180, 170, 160]));
    let analysis = analyze(&img, &PipelineConfig::default()).expect("analysis failed");
    assert!(analysis.regions.is_empty(), "regions: {:?}", analysis.regions);
    assert!(analysis.samples.is_empty());
}

#[test]
fn pads_come_back_in_reading_order() {
    let layout = StripLayout::blank(200, 200, BACKING)
        .with_pad(50, 80, 30, 20, PAD)
        .with_pad(100, 10, 30, 20, PAD)
        .with_pad(10, 10, 30, 20, PAD);
    let img = generate_test_strip(&layout);

    let analysis = analyze(&img, &PipelineConfig::default()).expect("analysis failed");
    let expected = [
        Region::new(10, 10, 30, 20),
        Region::new(100, 10, 30, 20),
        Region::new(50, 80, 30, 20),
    ];
    assert_eq!(analysis.regions.len(), 3, "regions: {:?}", analysis.regions);
    for (got, want) in analysis.regions.iter().zip(&expected) {
        assert!(close_to(got, want, 3), "got {got:?}, expected {want:?}");
    }
}

#[test]
fn tight_area_window_filters_everything() {
    let layout = StripLayout::blank(200, 200, BACKING).with_pad(85, 90, 30, 20, PAD);
    let img = generate_test_strip(&layout);

    let mut config = PipelineConfig::default();
    config.detection.max_area = 500.0;
    let analysis = analyze(&img, &config).expect("analysis failed");
    assert!(analysis.regions.is_empty(), "regions: {:?}", analysis.regions);
}

#[test]
fn mask_matches_image_size() {
    let layout = StripLayout::blank(200, 200, BACKING).with_pad(85, 90, 30, 20, PAD);
    let img = generate_test_strip(&layout);
    let analysis = analyze(&img, &PipelineConfig::default()).expect("analysis failed");
    assert_eq!(analysis.mask.dimensions(), (200, 200));
    assert!(analysis.mask.pixels().any(|p| p[0] == 255));
}

#[test]
fn single_pixel_image_has_no_pads() {
    let img = RgbImage::from_pixel(1, 1, Rgb([200, 100, 50]));
    let regions = detect(&img, &DetectionConfig::default()).expect("detection failed");
    assert!(regions.is_empty(), "regions: {regions:?}");

    let analysis = analyze(&img, &PipelineConfig::default()).expect("analysis failed");
    assert!(analysis.regions.is_empty());
    assert_eq!(analysis.processed.dimensions(), (1, 1));
    assert_eq!(analysis.mask.dimensions(), (1, 1));
}

#[test]
fn one_pixel_strips_are_analyzed() {
    for (width, height) in [(1, 50), (50, 1), (1, 2), (2, 1)] {
        let layout = StripLayout::blank(width, height, BACKING).with_pad(0, 0, 1, 1, PAD);
        let img = generate_test_strip(&layout);
        let analysis = analyze(&img, &PipelineConfig::default())
            .unwrap_or_else(|e| panic!("{width}x{height}: {e}"));
        assert!(
            analysis.regions.is_empty(),
            "{width}x{height}: {:?}",
            analysis.regions
        );
    }
}
