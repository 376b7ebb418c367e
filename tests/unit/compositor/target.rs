use super::*;

#[test]
fn resize_reallocates_only_on_change() {
    let mut t = TargetImage::new(4, 3);
    assert_eq!(t.generation(), 0);
    assert!(!t.resize(4, 3));
    assert_eq!(t.generation(), 0);
    assert!(t.resize(8, 2));
    assert_eq!(t.size(), Size::new(8, 2));
    assert_eq!(t.generation(), 1);
}

#[test]
fn pixel_is_none_outside() {
    let t = TargetImage::new(2, 2);
    assert_eq!(t.pixel(1, 1), Some(Rgba::TRANSPARENT));
    assert_eq!(t.pixel(2, 0), None);
}

#[test]
fn save_png_rejects_an_empty_target() {
    let t = TargetImage::new(0, 5);
    let err = t
        .save_png(Path::new("target/target_unit/empty.png"))
        .unwrap_err();
    assert!(matches!(err, PaintMaskError::Render(_)));
}

#[test]
fn save_png_creates_parent_dirs() {
    let dir = std::path::PathBuf::from("target").join("target_unit").join("nested");
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("out.png");
    let mut t = TargetImage::new(3, 2);
    t.pixels_mut()[0..4].copy_from_slice(&[255, 0, 0, 255]);
    t.save_png(&path).unwrap();
    let back = image::open(&path).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (3, 2));
    assert_eq!(back.get_pixel(0, 0).0, [255, 0, 0, 255]);
}
