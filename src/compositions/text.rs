use crate::animation::color::Color;
use crate::animation::spring::SpringConfig;
use crate::compositions::{BRAND_GREEN, remap, remap_clamped};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::element::{Element, pct};
use crate::session::component::{Component, FrameCtx, Props};
use crate::session::gate::FontFace;
use crate::timeline::sequence::Sequence;

/// Typographic role of a text block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextPreset {
    Hook,
    Context,
    #[default]
    Headline,
    Body,
    Problem,
    Question,
    Cta,
    Subtext,
}

/// Resolved typography for a [`TextPreset`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font_size: f64,
    pub font_weight: u16,
    pub line_height: f64,
    pub color: Color,
    pub letter_spacing_em: f64,
}

const fn style(font_size: f64, font_weight: u16, line_height: f64, color: u32, ls: f64) -> TextStyle {
    TextStyle {
        font_size,
        font_weight,
        line_height,
        color: super::background::hex_rgb(color),
        letter_spacing_em: ls,
    }
}

impl TextPreset {
    pub fn style(self) -> TextStyle {
        match self {
            Self::Hook => style(120.0, 500, 1.0, 0xffffff, -0.01),
            Self::Context => style(42.0, 400, 1.25, 0xe0e0e0, 0.01),
            Self::Headline => style(80.0, 400, 1.1, 0xffffff, 0.01),
            Self::Body => style(24.0, 400, 1.4, 0xd0d0d0, 0.01),
            Self::Problem => style(48.0, 600, 1.3, 0xf8fafc, 0.01),
            Self::Question => style(56.0, 600, 1.2, 0xffffff, 0.005),
            Self::Cta => style(40.0, 700, 1.3, 0x79be15, 0.01),
            Self::Subtext => style(36.0, 500, 1.4, 0xcbd5e1, 0.01),
        }
    }

    /// Characters before the font starts shrinking.
    pub fn char_limit(self) -> usize {
        match self {
            Self::Hook => 25,
            _ => 40,
        }
    }
}

/// Split `*emphasis*` markup into `(text, highlighted)` runs.
///
/// An unpaired trailing `*` is kept literally.
pub fn parse_emphasis(text: &str) -> Vec<(String, bool)> {
    let parts: Vec<&str> = text.split('*').collect();
    let paired = parts.len() % 2 == 1;
    let mut runs: Vec<(String, bool)> = Vec::new();
    for (i, part) in parts.iter().enumerate() {
        let last = i + 1 == parts.len();
        let (s, hl) = if !paired && last {
            (format!("*{part}"), false)
        } else {
            (part.to_string(), i % 2 == 1)
        };
        if s.is_empty() {
            continue;
        }
        match runs.last_mut() {
            Some((prev, prev_hl)) if *prev_hl == hl => prev.push_str(&s),
            _ => runs.push((s, hl)),
        }
    }
    runs
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ProfessionalTextProps {
    pub text: String,
    #[serde(rename = "type")]
    pub preset: TextPreset,
    pub color: Option<Color>,
    pub highlight_color: Option<Color>,
    pub animate: bool,
}

impl Default for ProfessionalTextProps {
    fn default() -> Self {
        Self {
            text: "reIS".to_owned(),
            preset: TextPreset::Headline,
            color: None,
            highlight_color: None,
            animate: true,
        }
    }
}

impl Props for ProfessionalTextProps {
    fn validate(&self) -> ReelResult<()> {
        if self.text.trim().is_empty() {
            return Err(ReelError::validation("text must not be empty"));
        }
        Ok(())
    }
}

/// Legible, preset-styled text block with a spring entrance and velocity blur.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfessionalText {
    props: ProfessionalTextProps,
}

impl ProfessionalText {
    pub fn new(props: ProfessionalTextProps) -> ReelResult<Self> {
        props.validate()?;
        Ok(Self { props })
    }

    /// Shorthand for an animated block.
    pub fn preset(preset: TextPreset, text: impl Into<String>) -> ReelResult<Self> {
        Self::new(ProfessionalTextProps {
            text: text.into(),
            preset,
            ..ProfessionalTextProps::default()
        })
    }

    fn entrance_config() -> SpringConfig {
        SpringConfig::damped(15.0).with_mass(0.6)
    }

    /// Preset size shrunk proportionally once the visible text exceeds the limit.
    pub fn font_size(&self) -> f64 {
        let preset = self.props.preset;
        let visible: usize = parse_emphasis(&self.props.text)
            .iter()
            .map(|(s, _)| s.chars().count())
            .sum();
        let limit = preset.char_limit();
        let reduction = if visible > limit {
            limit as f64 / visible as f64
        } else {
            1.0
        };
        preset.style().font_size * reduction
    }

    /// Draw at node-local `frame`.
    pub fn draw(&self, ctx: &FrameCtx<'_>) -> ReelResult<Element> {
        let preset = self.props.preset.style();
        let (opacity, y, blur) = if self.props.animate {
            let cfg = Self::entrance_config();
            let entrance = ctx.spring(0, cfg);
            let velocity = (ctx.spring(-1, cfg) - entrance).abs();
            (
                remap_clamped(entrance, &[0.0, 0.5], &[0.0, 1.0])?,
                remap(entrance, &[0.0, 1.0], &[40.0, 0.0])?,
                remap(velocity, &[0.0, 0.1], &[0.0, 8.0])?,
            )
        } else {
            (1.0, 0.0, 0.0)
        };

        let color = self.props.color.unwrap_or(preset.color);
        let highlight = self.props.highlight_color.unwrap_or(BRAND_GREEN);
        let runs = parse_emphasis(&self.props.text).into_iter().map(|(s, hl)| {
            Element::text(s).color(if hl { highlight } else { color })
        });

        let panel = Element::block()
            .key("text-panel")
            .background(Color::rgba(0, 0, 0, 77))
            .radius(16.0)
            .shadow(0.0, 4.0, 12.0, Color::BLACK.with_alpha(0.5))
            .family("Inter")
            .font(self.font_size(), preset.font_weight)
            .with_style(|s| {
                s.line_height = Some(preset.line_height);
                s.letter_spacing_em = Some(preset.letter_spacing_em);
            })
            .color(color)
            .opacity(opacity)
            .translate(0.0, y)
            .blur(blur)
            .children(runs);
        Ok(Element::column().width(pct(100.0)).child(panel))
    }
}

impl Component for ProfessionalText {
    fn timeline(&self) -> ReelResult<Sequence> {
        Ok(Sequence::new("text"))
    }

    fn render(&self, ctx: &FrameCtx<'_>) -> ReelResult<Element> {
        self.draw(ctx)
    }

    fn required_fonts(&self) -> Vec<FontFace> {
        vec![FontFace::new("Inter", self.props.preset.style().font_weight)]
    }
}
