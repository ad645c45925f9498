#![cfg(feature = "image")]

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use pill_check::detect::validate_graph_image;
use pill_check::{
    AxisCalibration, FileImageSource, PlotArea, PositionValidator, TimeOfDay, ValidationResult,
    ValidatorParams,
};

const BACKGROUND: Rgb<u8> = Rgb([248, 248, 250]);
const GRID: Rgb<u8> = Rgb([200, 200, 205]);
const PILL: Rgb<u8> = Rgb([226, 32, 38]);

/// 1000x500 chart with light grid lines and a 9x9 pill centered at `(cx, cy)`.
fn synthetic_chart(cx: u32, cy: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(1000, 500, BACKGROUND);
    for x in (0..1000).step_by(125) {
        for y in 0..500 {
            img.put_pixel(x, y, GRID);
        }
    }
    for y in cy - 4..=cy + 4 {
        for x in cx - 4..=cx + 4 {
            img.put_pixel(x, y, PILL);
        }
    }
    img
}

fn save(dir: &Path, name: &str, img: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    img.save(&path).expect("save png");
    path
}

#[test]
fn noon_marker_matches_noon() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = save(dir.path(), "noon.png", &synthetic_chart(500, 50));

    let (ok, message) = validate_graph_image(&path, "12:00 PM").into_tuple();
    assert!(ok, "{message}");
    assert!(message.contains("valid"), "{message}");
}

#[test]
fn noon_marker_does_not_match_evening() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = save(dir.path(), "noon.png", &synthetic_chart(500, 50));

    let (ok, message) = validate_graph_image(&path, "8:00 PM").into_tuple();
    assert!(!ok);
    assert!(
        message.starts_with("Invalid time position: detected ~12:00 PM, expected 8:00 PM"),
        "{message}"
    );
}

#[test]
fn mid_chart_marker_is_outside_band() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = save(dir.path(), "low.png", &synthetic_chart(500, 250));

    let res = validate_graph_image(&path, "12:00 PM");
    assert!(!res.is_valid);
    assert!(res.message.starts_with("Invalid Y position"), "{}", res.message);
}

#[test]
fn blank_chart_has_no_pill() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = save(
        dir.path(),
        "blank.png",
        &RgbImage::from_pixel(640, 320, BACKGROUND),
    );
    for expected in ["8:00 PM", "12:00 AM"] {
        assert_eq!(
            validate_graph_image(&path, expected),
            ValidationResult::no_pill()
        );
    }
}

#[test]
fn missing_and_corrupt_files_have_no_pill() {
    let dir = tempfile::tempdir().expect("tempdir");
    assert_eq!(
        validate_graph_image(dir.path().join("missing.png"), "8:00 PM"),
        ValidationResult::no_pill()
    );

    let corrupt = dir.path().join("corrupt.png");
    std::fs::write(&corrupt, b"not really a png").expect("write");
    assert_eq!(
        validate_graph_image(&corrupt, "8:00 PM"),
        ValidationResult::no_pill()
    );

    let validator = PositionValidator::default();
    let expected: TimeOfDay = "8:00 PM".parse().expect("time");
    assert!(validator
        .validate_path(&FileImageSource, &corrupt, expected)
        .is_err());
}

#[test]
fn transparent_png_is_read_as_rgb() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut img = RgbaImage::from_pixel(1440, 300, Rgba([255, 255, 255, 0]));
    for y in 10..14 {
        for x in 1199..1202 {
            img.put_pixel(x, y, Rgba([230, 20, 20, 255]));
        }
    }
    let path = dir.path().join("rgba.png");
    img.save(&path).expect("save png");

    let res = validate_graph_image(&path, "20:00");
    assert!(res.is_valid, "{}", res.message);
}

#[test]
fn plot_area_calibration_uses_chart_bounds() {
    // plot area spans x 100..900 and y 50..450 of a 1000x500 image, 6 AM..6 PM
    let mut img = RgbImage::from_pixel(1000, 500, BACKGROUND);
    for y in 78..=82 {
        for x in 498..=502 {
            img.put_pixel(x, y, PILL);
        }
    }
    let dir = tempfile::tempdir().expect("tempdir");
    let path = save(dir.path(), "area.png", &img);

    let params = ValidatorParams {
        calibration: AxisCalibration {
            start: "6:00 AM".parse().expect("time"),
            window_minutes: 12 * 60,
            plot_area: Some(PlotArea {
                left: 100.0,
                top: 50.0,
                width: 800.0,
                height: 400.0,
            }),
            ..AxisCalibration::default()
        },
        ..ValidatorParams::default()
    };
    let validator = PositionValidator::new(params).expect("validator");
    let report = validator
        .validate_path(&FileImageSource, &path, "12:00 PM".parse().expect("time"))
        .expect("report");
    assert!(report.is_valid(), "{}", report.message());
    let domain = report.domain.expect("domain");
    approx::assert_abs_diff_eq!(domain.vertical_fraction, 0.075);
    approx::assert_abs_diff_eq!(report.expected_x.expect("inside window"), 500.0);
}
