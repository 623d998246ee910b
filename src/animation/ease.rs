/// Easing curves applied to the within-segment ratio of an envelope.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Identity.
    #[default]
    Linear,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Quadratic ease-in/out.
    InOutQuad,
    /// Cubic ease-in.
    InCubic,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in/out.
    InOutCubic,
    /// CSS-style cubic Bézier through `(0,0)`, `(x1,y1)`, `(x2,y2)`, `(1,1)`.
    CubicBezier {
        /// First control point x, expected in `[0, 1]`.
        x1: f64,
        /// First control point y.
        y1: f64,
        /// Second control point x, expected in `[0, 1]`.
        x2: f64,
        /// Second control point y.
        y2: f64,
    },
}

impl Ease {
    /// Material "standard" curve.
    pub const STANDARD: Self = Self::CubicBezier {
        x1: 0.4,
        y1: 0.0,
        x2: 0.2,
        y2: 1.0,
    };

    /// Map normalized progress `t` in `[0, 1]`. Inputs outside are clamped first.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(x1, y1, x2, y2, t),
        }
    }

    /// Control points outside `[0, 1]` on the x axis make the curve non-invertible.
    pub fn is_valid(self) -> bool {
        match self {
            Self::CubicBezier { x1, y1, x2, y2 } => {
                [x1, y1, x2, y2].iter().all(|v| v.is_finite())
                    && (0.0..=1.0).contains(&x1)
                    && (0.0..=1.0).contains(&x2)
            }
            _ => true,
        }
    }
}

fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    // Polynomial coefficients for one axis: B(s) = ((a*s + b)*s + c)*s.
    fn coeffs(p1: f64, p2: f64) -> (f64, f64, f64) {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        (a, b, c)
    }
    fn at((a, b, c): (f64, f64, f64), s: f64) -> f64 {
        ((a * s + b) * s + c) * s
    }
    fn slope((a, b, c): (f64, f64, f64), s: f64) -> f64 {
        (3.0 * a * s + 2.0 * b) * s + c
    }

    let cx = coeffs(x1, x2);
    let cy = coeffs(y1, y2);

    let mut s = t;
    for _ in 0..8 {
        let err = at(cx, s) - t;
        if err.abs() < 1e-7 {
            return at(cy, s);
        }
        let d = slope(cx, s);
        if d.abs() < 1e-6 {
            break;
        }
        s -= err / d;
    }

    // Newton stalled on a flat section; bisect.
    let (mut lo, mut hi) = (0.0, 1.0);
    s = t;
    for _ in 0..64 {
        let x = at(cx, s);
        if (x - t).abs() < 1e-7 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = 0.5 * (lo + hi);
    }
    at(cy, s)
}
