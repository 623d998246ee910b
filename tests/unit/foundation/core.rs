use super::*;

#[test]
fn frame_range_contains_boundaries() {
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert!(!r.contains(FrameIndex(1)));
    assert!(r.contains(FrameIndex(2)));
    assert!(r.contains(FrameIndex(4)));
    assert!(!r.contains(FrameIndex(5)));
    assert_eq!(r.frames().count(), 3);
}

#[test]
fn frame_range_rejects_inverted_bounds() {
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
    assert!(FrameRange::full(0).is_empty());
}

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn fps_converts_fractional_frames() {
    let fps = Fps::integral(30);
    assert_eq!(fps.frames_to_secs(15.0), 0.5);
    assert_eq!(fps.frames_to_secs(-30.0), -1.0);

    let ntsc = Fps::new(30000, 1001).unwrap();
    assert!((ntsc.as_f64() - 29.97).abs() < 1e-2);
}

#[test]
fn frame_index_as_local_saturates() {
    assert_eq!(FrameIndex(7).as_local(), 7);
    assert_eq!(FrameIndex(u64::MAX).as_local(), i64::MAX);
}
