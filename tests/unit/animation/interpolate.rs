use super::*;
use crate::foundation::error::ReelError;

#[test]
fn two_point_midpoint() {
    let v = interpolate(0.5, &[0.0, 1.0], &[4.0, 14.0], InterpolateOpts::default()).unwrap();
    assert_eq!(v, 9.0);
}

#[test]
fn clamp_left_pins_boundary() {
    let v = interpolate(-1.0, &[0.0, 1.0], &[4.0, 14.0], InterpolateOpts::clamp_left()).unwrap();
    assert_eq!(v, 4.0);
}

#[test]
fn extend_continues_nearest_slope() {
    let input = [0.0, 10.0, 20.0];
    let output = [0.0, 1.0, 3.0];
    let opts = InterpolateOpts::default();
    assert_eq!(interpolate(-10.0, &input, &output, opts).unwrap(), -1.0);
    assert_eq!(interpolate(30.0, &input, &output, opts).unwrap(), 5.0);
}

#[test]
fn clamp_right_holds_last_output() {
    let v = interpolate(99.0, &[0.0, 10.0], &[1.0, 0.0], InterpolateOpts::clamp_right()).unwrap();
    assert_eq!(v, 0.0);
}

#[test]
fn picks_segment_of_unequal_width() {
    let input = [0.0, 1.0, 11.0, 12.0];
    let output = [0.0, 1.0, 0.0, 10.0];
    let opts = InterpolateOpts::clamped();
    assert_eq!(interpolate(6.0, &input, &output, opts).unwrap(), 0.5);
    assert_eq!(interpolate(11.5, &input, &output, opts).unwrap(), 5.0);
    assert_eq!(interpolate(0.25, &input, &output, opts).unwrap(), 0.25);
}

#[test]
fn breakpoints_return_exact_outputs() {
    let input = [15.0, 65.0, 90.0];
    let output = [0.1, 0.7, 0.3];
    let opts = InterpolateOpts::default().with_ease(Ease::InOutCubic);
    for (x, y) in input.iter().zip(output) {
        assert_eq!(interpolate(*x, &input, &output, opts).unwrap(), y);
    }
}

#[test]
fn easing_only_shapes_inside_segment() {
    let opts = InterpolateOpts::default().with_ease(Ease::InQuad);
    let inside = interpolate(0.5, &[0.0, 1.0], &[0.0, 100.0], opts).unwrap();
    assert_eq!(inside, 25.0);
    let beyond = interpolate(2.0, &[0.0, 1.0], &[0.0, 100.0], opts).unwrap();
    assert_eq!(beyond, 200.0);
}

#[test]
fn rejects_malformed_ranges() {
    let opts = InterpolateOpts::default();
    for (input, output) in [
        (vec![0.0], vec![1.0]),
        (vec![0.0, 1.0], vec![1.0]),
        (vec![1.0, 1.0], vec![0.0, 1.0]),
        (vec![2.0, 1.0], vec![0.0, 1.0]),
        (vec![0.0, f64::NAN], vec![0.0, 1.0]),
    ] {
        let err = interpolate(0.5, &input, &output, opts).unwrap_err();
        assert!(matches!(err, ReelError::InvalidRange(_)), "{err}");
    }
    assert!(interpolate(f64::INFINITY, &[0.0, 1.0], &[0.0, 1.0], opts).is_err());
}

#[test]
fn colors_interpolate_and_clamp() {
    let from = Color::parse("#1f2937").unwrap();
    let to = Color::parse("#79be15").unwrap();
    assert_eq!(interpolate_colors(0.0, &[0.0, 1.0], &[from, to]).unwrap(), from);
    assert_eq!(interpolate_colors(1.0, &[0.0, 1.0], &[from, to]).unwrap(), to);
    assert_eq!(interpolate_colors(7.0, &[0.0, 1.0], &[from, to]).unwrap(), to);
    assert_eq!(interpolate_colors(-3.0, &[0.0, 1.0], &[from, to]).unwrap(), from);
    let mid = interpolate_colors(0.5, &[0.0, 1.0], &[Color::BLACK, Color::WHITE]).unwrap();
    assert_eq!(mid, Color::rgb(128, 128, 128));
}

#[test]
fn envelope_validates_once_and_samples() {
    let env = Envelope::new(
        vec![0.0, 30.0],
        vec![Vec2::new(0.0, 40.0), Vec2::new(0.0, 0.0)],
        InterpolateOpts::clamped(),
    )
    .unwrap();
    assert_eq!(env.sample(15.0), Vec2::new(0.0, 20.0));
    assert_eq!(env.sample(100.0), Vec2::new(0.0, 0.0));
    assert_eq!(env.domain(), (0.0, 30.0));

    assert!(Envelope::new(vec![0.0, 1.0], vec![0.0], InterpolateOpts::default()).is_err());
    let bad_ease = InterpolateOpts::default().with_ease(Ease::CubicBezier {
        x1: -1.0,
        y1: 0.0,
        x2: 1.0,
        y2: 1.0,
    });
    assert!(Envelope::linear([0.0, 1.0], [0.0, 1.0], bad_ease).is_err());
}
