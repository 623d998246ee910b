use crate::foundation::core::Fps;
use crate::foundation::error::{ReelError, ReelResult};

/// Damped harmonic oscillator parameters for a unit step response (0 at rest, target 1).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    /// Viscous damping coefficient.
    pub damping: f64,
    /// Spring constant.
    pub stiffness: f64,
    /// Moving mass.
    pub mass: f64,
    /// Hold the target once it has been reached instead of overshooting.
    pub overshoot_clamping: bool,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            damping: 10.0,
            stiffness: 100.0,
            mass: 1.0,
            overshoot_clamping: false,
        }
    }
}

/// Oscillation regime derived from the damping ratio.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Regime {
    /// `ζ < 1`: overshoots and rings down.
    Under,
    /// `ζ == 1` within `1e-9`.
    Critical,
    /// `ζ > 1`: creeps toward the target.
    Over,
}

impl SpringConfig {
    /// Explicit parameters, no clamping.
    pub fn new(damping: f64, stiffness: f64, mass: f64) -> Self {
        Self {
            damping,
            stiffness,
            mass,
            overshoot_clamping: false,
        }
    }

    /// Default stiffness and mass with a custom damping.
    pub fn damped(damping: f64) -> Self {
        Self {
            damping,
            ..Self::default()
        }
    }

    /// Replace the mass.
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// Replace the stiffness.
    pub fn with_stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = stiffness;
        self
    }

    /// Toggle overshoot clamping.
    pub fn with_overshoot_clamping(mut self, clamp: bool) -> Self {
        self.overshoot_clamping = clamp;
        self
    }

    /// Slow settle, slight overshoot.
    pub fn gentle() -> Self {
        Self::new(14.0, 120.0, 1.0)
    }

    /// Noticeable bounce.
    pub fn wobbly() -> Self {
        Self::new(12.0, 180.0, 1.0)
    }

    /// Snappy, little ringing.
    pub fn stiff() -> Self {
        Self::new(30.0, 400.0, 1.0)
    }

    /// Critically damped crawl.
    pub fn molasses() -> Self {
        Self::new(20.0, 100.0, 1.0)
    }

    /// `ζ = c / (2·sqrt(k·m))`.
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    /// Undamped angular frequency `ω0 = sqrt(k/m)`.
    pub fn natural_frequency(&self) -> f64 {
        (self.stiffness / self.mass).sqrt()
    }

    /// Classify by damping ratio.
    pub fn regime(&self) -> Regime {
        let zeta = self.damping_ratio();
        if (zeta - 1.0).abs() < 1e-9 {
            Regime::Critical
        } else if zeta < 1.0 {
            Regime::Under
        } else {
            Regime::Over
        }
    }

    /// Reject non-positive or non-finite parameters.
    pub fn validate(&self) -> ReelResult<()> {
        for (name, v) in [
            ("damping", self.damping),
            ("stiffness", self.stiffness),
            ("mass", self.mass),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(ReelError::animation(format!(
                    "spring {name} must be finite and > 0, got {v}"
                )));
            }
        }
        Ok(())
    }
}

/// Closed-form step response of the oscillator at `local_frame`.
///
/// Returns exactly 0 for negative (or NaN) frames. Evaluating any frame is independent of every
/// other evaluation. `config` is expected to have passed [`SpringConfig::validate`].
pub fn spring_value(local_frame: f64, fps: Fps, config: &SpringConfig) -> f64 {
    if local_frame.is_nan() || local_frame <= 0.0 {
        return 0.0;
    }
    let t = fps.frames_to_secs(local_frame);
    let v = 1.0 - residual(t, config);
    if config.overshoot_clamping && v > 1.0 {
        1.0
    } else {
        v
    }
}

/// Signed distance from the target, `1 - x(t)`, for `t >= 0`.
fn residual(t: f64, config: &SpringConfig) -> f64 {
    let w0 = config.natural_frequency();
    let zeta = config.damping_ratio();
    match config.regime() {
        Regime::Under => {
            let wd = w0 * (1.0 - zeta * zeta).sqrt();
            let decay = (-zeta * w0 * t).exp();
            decay * ((wd * t).cos() + (zeta * w0 / wd) * (wd * t).sin())
        }
        Regime::Critical => (-w0 * t).exp() * (1.0 + w0 * t),
        Regime::Over => {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -w0 * (zeta - root);
            let r2 = -w0 * (zeta + root);
            (r2 * (r1 * t).exp() - r1 * (r2 * t).exp()) / (r2 - r1)
        }
    }
}

/// Monotone upper bound on `|residual(t)|`.
fn residual_bound(t: f64, config: &SpringConfig) -> f64 {
    match config.regime() {
        Regime::Under => {
            let w0 = config.natural_frequency();
            let zeta = config.damping_ratio();
            let wd = w0 * (1.0 - zeta * zeta).sqrt();
            let k = zeta * w0 / wd;
            (-zeta * w0 * t).exp() * (1.0 + k * k).sqrt()
        }
        Regime::Critical | Regime::Over => residual(t, config).abs(),
    }
}

/// Default settle threshold for [`measure_spring`].
pub const DEFAULT_SETTLE_THRESHOLD: f64 = 0.005;

const MAX_MEASURE_SECS: u64 = 600;

/// First frame after which the response stays within `threshold` of the target.
pub fn measure_spring(fps: Fps, config: &SpringConfig, threshold: f64) -> ReelResult<u64> {
    config.validate()?;
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(ReelError::animation(format!(
            "settle threshold must be finite and > 0, got {threshold}"
        )));
    }

    let cap = u64::from(fps.num) * MAX_MEASURE_SECS / u64::from(fps.den);
    for frame in 0..=cap {
        let t = fps.frames_to_secs(frame as f64);
        if residual_bound(t, config) <= threshold {
            return Ok(frame);
        }
    }
    Err(ReelError::animation(format!(
        "spring does not settle within {MAX_MEASURE_SECS}s (damping {}, stiffness {}, mass {})",
        config.damping, config.stiffness, config.mass
    )))
}

/// Spring-driven animation from `from` to `to`, optionally delayed and time-stretched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    config: SpringConfig,
    from: f64,
    to: f64,
    delay: f64,
    time_scale: f64,
}

impl Spring {
    /// Unit spring `0 -> 1` with `config`.
    pub fn new(config: SpringConfig) -> ReelResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            from: 0.0,
            to: 1.0,
            delay: 0.0,
            time_scale: 1.0,
        })
    }

    /// Output endpoints.
    pub fn range(mut self, from: f64, to: f64) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Hold `from` for `frames` before starting.
    pub fn delay(mut self, frames: f64) -> Self {
        self.delay = frames;
        self
    }

    /// Stretch time so the spring settles exactly at `frames`.
    pub fn duration(mut self, fps: Fps, frames: f64) -> ReelResult<Self> {
        if !frames.is_finite() || frames <= 0.0 {
            return Err(ReelError::animation(format!(
                "spring duration must be finite and > 0, got {frames}"
            )));
        }
        let natural = measure_spring(fps, &self.config, DEFAULT_SETTLE_THRESHOLD)?;
        self.time_scale = natural.max(1) as f64 / frames;
        Ok(self)
    }

    /// Underlying oscillator parameters.
    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    /// Value at composition-local `frame`.
    pub fn sample(&self, frame: f64, fps: Fps) -> f64 {
        let progress = spring_value((frame - self.delay) * self.time_scale, fps, &self.config);
        self.from + (self.to - self.from) * progress
    }

    /// Absolute per-frame change, `|sample(frame + 1) - sample(frame)|`.
    pub fn speed(&self, frame: f64, fps: Fps) -> f64 {
        (self.sample(frame + 1.0, fps) - self.sample(frame, fps)).abs()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/spring.rs"]
mod tests;
