use super::*;

fn opts(metric: ErrorMetric, ignore_alpha: bool) -> CompareOpts {
    CompareOpts {
        metric,
        ignore_alpha,
        ..CompareOpts::default()
    }
}

#[test]
fn defaults_are_luma_ignoring_alpha() {
    let o = CompareOpts::default();
    assert_eq!(o.metric, ErrorMetric::Luma);
    assert!(o.ignore_alpha);
    assert_eq!(o.backdrop, Rgba::WHITE);
    assert_eq!(o.reduction, ReductionPath::Auto);
    assert!(!o.keep_difference);
}

#[test]
fn luma_error_of_black_and_white_is_one() {
    let o = opts(ErrorMetric::Luma, true);
    let e = pixel_error([0, 0, 0, 255], [255, 255, 255, 255], &o);
    assert!((e - 1.0).abs() < 1e-6);
    assert_eq!(pixel_error([10, 20, 30, 255], [10, 20, 30, 255], &o), 0.0);
}

#[test]
fn luma_weights_green_above_blue() {
    let o = opts(ErrorMetric::Luma, true);
    let green = pixel_error([0, 0, 0, 255], [0, 255, 0, 255], &o);
    let blue = pixel_error([0, 0, 0, 255], [0, 0, 255, 255], &o);
    assert!((green - 0.7152).abs() < 1e-5);
    assert!((blue - 0.0722).abs() < 1e-5);
}

#[test]
fn transparent_never_matches_opaque_paint() {
    let clear = [0, 0, 0, 0];
    let black = [0, 0, 0, 255];
    for metric in [ErrorMetric::Luma, ErrorMetric::Channels] {
        for ignore_alpha in [true, false] {
            let e = pixel_error(clear, black, &opts(metric, ignore_alpha));
            assert!((e - 1.0).abs() < 1e-5, "{metric:?} ignore_alpha={ignore_alpha}: {e}");
        }
    }
}

#[test]
fn rgb_under_zero_alpha_is_invisible() {
    let o = opts(ErrorMetric::Channels, false);
    assert_eq!(pixel_error([255, 0, 0, 0], [0, 0, 255, 0], &o), 0.0);
}

#[test]
fn stroke_opacity_counts_as_color_error() {
    let faint_red = [255, 0, 0, 51];
    let red = [255, 0, 0, 255];
    let e = pixel_error(faint_red, red, &opts(ErrorMetric::Channels, true));
    // Over white the faint red reads as (1, 0.8, 0.8).
    assert!((e - 1.6 / 3.0).abs() < 1e-3, "{e}");
    assert!(pixel_error(faint_red, red, &opts(ErrorMetric::Luma, true)) > 0.5);
}

#[test]
fn backdrop_picks_what_transparency_looks_like() {
    let o = CompareOpts {
        backdrop: Rgba::BLACK,
        ..CompareOpts::default()
    };
    assert_eq!(pixel_error([0, 0, 0, 0], [0, 0, 0, 255], &o), 0.0);
    assert_eq!(pixel_error([0, 0, 0, 0], [255, 255, 255, 0], &o), 0.0);
}

#[test]
fn channel_error_is_mean_absolute_difference() {
    let o = opts(ErrorMetric::Channels, true);
    let e = pixel_error([255, 0, 0, 255], [0, 0, 0, 255], &o);
    assert!((e - 1.0 / 3.0).abs() < 1e-6);
}

#[test]
fn error_image_between_identical_images_is_zero() {
    let img = image::RgbaImage::from_pixel(5, 3, image::Rgba([9, 80, 200, 255]));
    let e = ErrorImage::between(&img, &img, &CompareOpts::default());
    assert_eq!((e.width(), e.height()), (5, 3));
    assert!(e.data().iter().all(|&v| v == 0.0));
    assert_eq!(e.get(5, 0), None);
}

#[test]
fn gray_export_scales_to_bytes() {
    let e = ErrorImage::from_raw(2, 1, vec![0.0, 1.0]);
    let g = e.to_gray_image();
    assert_eq!(g.get_pixel(0, 0).0, [0]);
    assert_eq!(g.get_pixel(1, 0).0, [255]);
}

#[test]
fn metric_names_deserialize() {
    let o: CompareOpts =
        serde_json::from_str(r#"{"metric":"channels","reduction":"direct"}"#).unwrap();
    assert_eq!(o.metric, ErrorMetric::Channels);
    assert_eq!(o.reduction, ReductionPath::Direct);
    assert!(o.ignore_alpha);
}
