use crate::animation::color::Color;
use crate::animation::interpolate::{InterpolateOpts, interpolate};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::random;
use crate::render::element::{Element, Gradient, pct, px};
use crate::session::component::{Component, FrameCtx, Props};
use crate::timeline::sequence::Sequence;

/// Named backgrounds used across the campaign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundPreset {
    MendeluGreen,
    MendeluDark,
    PefBlue,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientShape {
    #[default]
    Linear,
    Radial,
}

/// Full-frame backdrop drawn behind a composition.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Background {
    Solid {
        #[serde(default = "white")]
        color: Color,
    },
    Gradient {
        #[serde(default)]
        shape: GradientShape,
        #[serde(default = "default_gradient_colors")]
        colors: Vec<Color>,
        #[serde(default = "default_angle")]
        angle_deg: f64,
    },
    /// Slowly drifting radial blobs over the first color.
    Mesh { colors: Vec<Color> },
    Image { src: String },
    Video { src: String },
    Stars {
        #[serde(default = "default_star_count")]
        count: u32,
    },
    Preset { preset: BackgroundPreset },
}

fn white() -> Color {
    Color::WHITE
}

fn default_gradient_colors() -> Vec<Color> {
    vec![Color::WHITE, Color::BLACK]
}

fn default_angle() -> f64 {
    180.0
}

fn default_star_count() -> u32 {
    200
}

impl Default for Background {
    fn default() -> Self {
        Self::Solid { color: white() }
    }
}

impl BackgroundPreset {
    /// Concrete background the preset stands for.
    pub fn resolve(self) -> Background {
        let mesh = |hex: [u32; 4]| Background::Mesh {
            colors: hex.iter().map(|&h| hex_rgb(h)).collect(),
        };
        match self {
            Self::MendeluGreen => Background::Gradient {
                shape: GradientShape::Linear,
                colors: vec![hex_rgb(0x79be15), hex_rgb(0xa0d25a)],
                angle_deg: 135.0,
            },
            Self::MendeluDark => mesh([0x0f1113, 0x1e2329, 0x79be15, 0x0a5028]),
            Self::PefBlue => mesh([0x0046a0, 0x002a60, 0x00aab4, 0x0a5028]),
        }
    }
}

/// Opaque color from a `0xrrggbb` literal.
pub(crate) const fn hex_rgb(h: u32) -> Color {
    Color::rgb((h >> 16) as u8, (h >> 8) as u8, h as u8)
}

impl Background {
    /// Preset-free form of `self`.
    pub fn resolved(&self) -> Background {
        match self {
            Self::Preset { preset } => preset.resolve(),
            other => other.clone(),
        }
    }

    pub fn check(&self) -> ReelResult<()> {
        match self {
            Self::Mesh { colors } if colors.is_empty() => {
                Err(ReelError::validation("mesh background needs at least one color"))
            }
            Self::Gradient { colors, .. } if colors.len() < 2 => Err(ReelError::validation(
                "gradient background needs at least two colors",
            )),
            Self::Image { src } | Self::Video { src } if src.trim().is_empty() => {
                Err(ReelError::validation("media background needs a source path"))
            }
            _ => Ok(()),
        }
    }

    /// Backdrop at composition-local `frame`.
    pub fn draw(&self, frame: i64) -> ReelResult<Element> {
        let el = match self.resolved() {
            Self::Solid { color } => Element::fill().background(color),
            Self::Gradient {
                shape,
                colors,
                angle_deg,
            } => Element::fill().gradient(match shape {
                GradientShape::Linear => Gradient::Linear {
                    angle_deg,
                    stops: colors,
                },
                GradientShape::Radial => Gradient::Radial { stops: colors },
            }),
            Self::Mesh { colors } => mesh(frame, &colors),
            Self::Image { src } => Element::fill().child(Element::image(src)),
            Self::Video { src } => Element::fill().child(Element::video(src)),
            Self::Stars { count } => Stars::new(count).render(frame)?,
            Self::Preset { .. } => {
                return Err(ReelError::evaluation("background preset resolved to a preset"));
            }
        };
        Ok(el.key("background"))
    }
}

fn mesh(frame: i64, colors: &[Color]) -> Element {
    let f = frame as f64;
    let base = colors.first().copied().unwrap_or(Color::BLACK);
    let blobs = colors.iter().skip(1).enumerate().map(|(i, &c)| {
        let i = i as f64;
        let x = (f / 60.0 + i).sin() * 20.0 + 50.0;
        let y = (f / 90.0 + i).cos() * 20.0 + 50.0;
        let size = 60.0 + (f / 120.0 + i).sin() * 10.0;
        Element::block()
            .at(pct(x), pct(y))
            .size(pct(size), pct(size))
            .gradient(Gradient::Radial {
                stops: vec![c, Color::TRANSPARENT],
            })
            .opacity(0.4)
    });
    Element::fill().background(base).children(blobs)
}

impl Props for Background {
    fn validate(&self) -> ReelResult<()> {
        self.check()
    }
}

impl Component for Background {
    fn timeline(&self) -> ReelResult<Sequence> {
        Ok(Sequence::new("background"))
    }

    fn render(&self, ctx: &FrameCtx<'_>) -> ReelResult<Element> {
        self.draw(ctx.frame())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Star {
    x: f64,
    y: f64,
    size: f64,
    offset: f64,
}

/// Deterministic twinkling star field on black.
#[derive(Clone, Debug, PartialEq)]
pub struct Stars {
    stars: Vec<Star>,
}

impl Stars {
    /// Lay out `count` stars from seeded randomness; identical for identical counts.
    pub fn new(count: u32) -> Self {
        let stars = (0..count)
            .map(|i| {
                let r = random(&format!("starSize{i}"));
                let size = if r > 0.98 {
                    3.0 + random(&format!("starSizeLarge{i}")) * 1.5
                } else if r > 0.9 {
                    1.5 + random(&format!("starSizeMedium{i}")) * 1.5
                } else {
                    0.5 + random(&format!("starSizeSmall{i}"))
                };
                Star {
                    x: random(&format!("starX{i}")) * 100.0,
                    y: random(&format!("starY{i}")) * 100.0,
                    size,
                    offset: random(&format!("starOffset{i}")) * 100.0,
                }
            })
            .collect();
        Self { stars }
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Twinkle opacity of star `i` at `frame`, within `[0.2, 1]`.
    pub fn opacity(&self, i: usize, frame: i64) -> ReelResult<f64> {
        let offset = self.stars.get(i).map_or(0.0, |s| s.offset);
        interpolate(
            ((frame as f64 + offset) * 0.05).sin(),
            &[-1.0, 1.0],
            &[0.2, 1.0],
            InterpolateOpts::clamp_right(),
        )
    }

    pub fn render(&self, frame: i64) -> ReelResult<Element> {
        let mut field = Element::fill().background(Color::BLACK);
        for (i, s) in self.stars.iter().enumerate() {
            let o = self.opacity(i, frame)?;
            field = field.child(
                Element::block()
                    .at(pct(s.x), pct(s.y))
                    .size(px(s.size), px(s.size))
                    .background(Color::WHITE)
                    .radius(s.size / 2.0)
                    .opacity(o)
                    .shadow(0.0, 0.0, s.size * 2.0, Color::WHITE.with_alpha(o * 0.8)),
            );
        }
        Ok(field)
    }
}
