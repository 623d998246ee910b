use super::*;

const FPS: Fps = Fps::integral(30);

#[test]
fn negative_frames_are_at_rest() {
    let cfg = SpringConfig::default();
    assert_eq!(spring_value(-1.0, FPS, &cfg), 0.0);
    assert_eq!(spring_value(-1000.0, FPS, &cfg), 0.0);
    assert_eq!(spring_value(f64::NAN, FPS, &cfg), 0.0);
}

#[test]
fn continuous_across_zero() {
    for cfg in [
        SpringConfig::default(),
        SpringConfig::molasses(),
        SpringConfig::new(80.0, 100.0, 1.0),
    ] {
        assert_eq!(spring_value(0.0, FPS, &cfg), 0.0);
        assert!(spring_value(1e-6, FPS, &cfg).abs() < 1e-6, "{cfg:?}");
    }
}

#[test]
fn damping_20_stiffness_200_settles_to_one() {
    let cfg = SpringConfig::damped(20.0).with_stiffness(200.0);
    assert!(spring_value(0.0, FPS, &cfg).abs() < 1e-9);
    assert!((spring_value(300.0, FPS, &cfg) - 1.0).abs() < 1e-6);
    for f in 0..300 {
        let v = spring_value(f64::from(f), FPS, &cfg);
        assert!(v.is_finite());
        assert!((-0.01..=1.2).contains(&v), "frame {f}: {v}");
    }
}

#[test]
fn regimes_are_classified() {
    assert_eq!(SpringConfig::default().regime(), Regime::Under);
    assert_eq!(SpringConfig::molasses().regime(), Regime::Critical);
    assert_eq!(SpringConfig::new(80.0, 100.0, 1.0).regime(), Regime::Over);
}

#[test]
fn underdamped_overshoots_and_overdamped_does_not() {
    let bouncy = SpringConfig::default();
    let peak = (0..120)
        .map(|f| spring_value(f64::from(f), FPS, &bouncy))
        .fold(0.0, f64::max);
    assert!(peak > 1.0 && peak < 1.5, "peak {peak}");

    let slow = SpringConfig::new(80.0, 100.0, 1.0);
    let mut prev = 0.0;
    for f in 0..600 {
        let v = spring_value(f64::from(f), FPS, &slow);
        assert!(v >= prev && v <= 1.0);
        prev = v;
    }
}

#[test]
fn overshoot_clamping_caps_at_target() {
    let cfg = SpringConfig::default().with_overshoot_clamping(true);
    for f in 0..120 {
        assert!(spring_value(f64::from(f), FPS, &cfg) <= 1.0);
    }
}

#[test]
fn evaluation_order_does_not_matter() {
    let cfg = SpringConfig::wobbly();
    let forward: Vec<f64> = (0..60).map(|f| spring_value(f64::from(f), FPS, &cfg)).collect();
    let backward: Vec<f64> = (0..60)
        .rev()
        .map(|f| spring_value(f64::from(f), FPS, &cfg))
        .collect();
    assert!(forward.iter().eq(backward.iter().rev()));
}

#[test]
fn invalid_configs_are_rejected() {
    for cfg in [
        SpringConfig::new(0.0, 100.0, 1.0),
        SpringConfig::new(10.0, -1.0, 1.0),
        SpringConfig::new(10.0, 100.0, f64::NAN),
    ] {
        assert!(cfg.validate().is_err());
        assert!(Spring::new(cfg).is_err());
    }
}

#[test]
fn measure_spring_stays_settled_afterwards() {
    let cfg = SpringConfig::default();
    let settle = measure_spring(FPS, &cfg, DEFAULT_SETTLE_THRESHOLD).unwrap();
    assert!(settle > 0);
    for f in settle..settle + 300 {
        let v = spring_value(f as f64, FPS, &cfg);
        assert!((v - 1.0).abs() <= DEFAULT_SETTLE_THRESHOLD);
    }
    assert!(measure_spring(FPS, &cfg, 0.0).is_err());
}

#[test]
fn spring_builder_maps_range_delay_and_duration() {
    let spring = Spring::new(SpringConfig::damped(200.0))
        .unwrap()
        .range(0.8, 1.2)
        .delay(10.0);
    assert_eq!(spring.sample(0.0, FPS), 0.8);
    assert_eq!(spring.sample(10.0, FPS), 0.8);
    assert!((spring.sample(600.0, FPS) - 1.2).abs() < 1e-3);

    let timed = Spring::new(SpringConfig::default())
        .unwrap()
        .duration(FPS, 30.0)
        .unwrap();
    assert!((timed.sample(30.0, FPS) - 1.0).abs() <= DEFAULT_SETTLE_THRESHOLD + 1e-9);
    assert!(timed.speed(5.0, FPS) > 0.0);
}
