use crate::{
    animation::{color::Color, ease::Ease},
    foundation::core::Vec2,
    foundation::error::{ReelError, ReelResult},
};

/// Interpolation contract for envelope output types.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b`. `t` may leave `[0, 1]` when extrapolating.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

/// Behavior outside the declared input range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolate {
    /// Continue the slope of the nearest segment.
    #[default]
    Extend,
    /// Hold the boundary output.
    Clamp,
}

/// Options for [`interpolate`]: one policy per side plus an optional easing.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InterpolateOpts {
    /// Policy below the first breakpoint.
    pub left: Extrapolate,
    /// Policy above the last breakpoint.
    pub right: Extrapolate,
    /// Easing applied to the ratio inside a segment.
    pub ease: Ease,
}

impl InterpolateOpts {
    /// Clamp on both sides.
    pub fn clamped() -> Self {
        Self {
            left: Extrapolate::Clamp,
            right: Extrapolate::Clamp,
            ease: Ease::Linear,
        }
    }

    /// Clamp below the first breakpoint only.
    pub fn clamp_left() -> Self {
        Self {
            left: Extrapolate::Clamp,
            ..Self::default()
        }
    }

    /// Clamp above the last breakpoint only.
    pub fn clamp_right() -> Self {
        Self {
            right: Extrapolate::Clamp,
            ..Self::default()
        }
    }

    /// Replace the easing curve.
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }
}

/// Map `x` through piecewise-linear breakpoints.
///
/// `input` must hold at least two strictly increasing finite values and `output` must have the
/// same length; anything else is [`ReelError::InvalidRange`].
pub fn interpolate(
    x: f64,
    input: &[f64],
    output: &[f64],
    opts: InterpolateOpts,
) -> ReelResult<f64> {
    validate_ranges(input, output.len())?;
    validate_input(x)?;
    Ok(sample_unchecked(x, input, output, opts))
}

/// Component-wise color interpolation in straight-alpha RGBA8, clamped at both ends.
pub fn interpolate_colors(x: f64, input: &[f64], colors: &[Color]) -> ReelResult<Color> {
    validate_ranges(input, colors.len())?;
    validate_input(x)?;
    Ok(sample_unchecked(x, input, colors, InterpolateOpts::clamped()))
}

fn validate_input(x: f64) -> ReelResult<()> {
    if !x.is_finite() {
        return Err(ReelError::invalid_range(format!(
            "interpolation input must be finite, got {x}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_ranges(input: &[f64], output_len: usize) -> ReelResult<()> {
    if input.len() < 2 {
        return Err(ReelError::invalid_range(
            "input range needs at least two breakpoints",
        ));
    }
    if input.len() != output_len {
        return Err(ReelError::invalid_range(format!(
            "input range has {} breakpoints but output range has {output_len}",
            input.len()
        )));
    }
    if let Some(bad) = input.iter().find(|v| !v.is_finite()) {
        return Err(ReelError::invalid_range(format!(
            "input breakpoint {bad} is not finite"
        )));
    }
    if let Some(w) = input.windows(2).find(|w| w[0] >= w[1]) {
        return Err(ReelError::invalid_range(format!(
            "input range must be strictly increasing ({} >= {})",
            w[0], w[1]
        )));
    }
    Ok(())
}

fn sample_unchecked<T: Lerp + Clone>(
    x: f64,
    input: &[f64],
    output: &[T],
    opts: InterpolateOpts,
) -> T {
    let last = input.len() - 1;
    let seg = input.partition_point(|b| *b <= x).clamp(1, last) - 1;

    let (lo, hi) = (input[seg], input[seg + 1]);
    if x == lo {
        return output[seg].clone();
    }
    if x == hi {
        return output[seg + 1].clone();
    }

    let t = (x - lo) / (hi - lo);
    if t < 0.0 {
        return match opts.left {
            Extrapolate::Clamp => output[0].clone(),
            Extrapolate::Extend => T::lerp(&output[seg], &output[seg + 1], t),
        };
    }
    if t > 1.0 {
        return match opts.right {
            Extrapolate::Clamp => output[last].clone(),
            Extrapolate::Extend => T::lerp(&output[seg], &output[seg + 1], t),
        };
    }
    T::lerp(&output[seg], &output[seg + 1], opts.ease.apply(t))
}

/// Pre-validated envelope: breakpoints and outputs checked once, sampled many times.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope<T> {
    input: Vec<f64>,
    output: Vec<T>,
    opts: InterpolateOpts,
}

impl<T: Lerp + Clone> Envelope<T> {
    /// Validate and build.
    pub fn new(input: Vec<f64>, output: Vec<T>, opts: InterpolateOpts) -> ReelResult<Self> {
        validate_ranges(&input, output.len())?;
        if !opts.ease.is_valid() {
            return Err(ReelError::invalid_range(format!(
                "easing {:?} is not invertible",
                opts.ease
            )));
        }
        Ok(Self {
            input,
            output,
            opts,
        })
    }

    /// Two-point envelope `[x0, x1] -> [y0, y1]`.
    pub fn linear(x: [f64; 2], y: [T; 2], opts: InterpolateOpts) -> ReelResult<Self> {
        let [y0, y1] = y;
        Self::new(x.to_vec(), vec![y0, y1], opts)
    }

    /// Sample at `x`. Non-finite input returns the left boundary output.
    pub fn sample(&self, x: f64) -> T {
        if !x.is_finite() {
            return self.output[0].clone();
        }
        sample_unchecked(x, &self.input, &self.output, self.opts)
    }

    /// First and last breakpoints.
    pub fn domain(&self) -> (f64, f64) {
        (self.input[0], self.input[self.input.len() - 1])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interpolate.rs"]
mod tests;
