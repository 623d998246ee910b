use crate::animation::color::Color;
use crate::animation::interpolate::{InterpolateOpts, interpolate};
use crate::animation::spring::SpringConfig;
use crate::compositions::background::Background;
use crate::compositions::{remap, remap_clamped};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::element::{Element, pct, px};
use crate::session::component::{Component, FrameCtx, Props};
use crate::session::gate::FontFace;
use crate::timeline::sequence::Sequence;

pub const LOGO_SRC: &str = "mendelu_logo.png";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EndSlideProps {
    pub logo_scale: f64,
    pub theme: Theme,
    pub animate: bool,
    pub cta_text: Option<String>,
}

impl Default for EndSlideProps {
    fn default() -> Self {
        Self {
            logo_scale: 1.0,
            theme: Theme::Dark,
            animate: true,
            cta_text: None,
        }
    }
}

impl Props for EndSlideProps {
    fn validate(&self) -> ReelResult<()> {
        if !self.logo_scale.is_finite() || self.logo_scale <= 0.0 {
            return Err(ReelError::validation(format!(
                "logo_scale must be finite and > 0, got {}",
                self.logo_scale
            )));
        }
        Ok(())
    }
}

/// University logo over a star field with an optional call to action.
#[derive(Clone, Debug, PartialEq)]
pub struct BrandedEndSlide {
    props: EndSlideProps,
    background: Background,
}

impl BrandedEndSlide {
    pub fn new(props: EndSlideProps) -> ReelResult<Self> {
        props.validate()?;
        let background = match props.theme {
            Theme::Dark => Background::Stars { count: 300 },
            Theme::Light => Background::Solid {
                color: Color::WHITE,
            },
        };
        Ok(Self { props, background })
    }

    /// Dark slide with a CTA line.
    pub fn with_cta(logo_scale: f64, cta: impl Into<String>) -> ReelResult<Self> {
        Self::new(EndSlideProps {
            logo_scale,
            cta_text: Some(cta.into()),
            ..EndSlideProps::default()
        })
    }

    fn cta(&self, text: &str, frame: f64) -> ReelResult<Element> {
        let opacity = remap_clamped(frame, &[30.0, 50.0], &[0.0, 1.0])?;
        let breathe = interpolate(
            frame,
            &[50.0, 100.0, 150.0],
            &[1.0, 1.02, 1.0],
            InterpolateOpts::clamp_right(),
        )?;
        Ok(Element::row()
            .key("cta")
            .at(pct(0.0), pct(74.0))
            .width(pct(100.0))
            .opacity(opacity)
            .scale(breathe)
            .child(
                Element::text(text)
                    .color(Color::WHITE)
                    .family("Inter")
                    .font(60.0, 700)
                    .with_style(|s| s.letter_spacing_em = Some(0.01)),
            ))
    }
}

impl Component for BrandedEndSlide {
    fn timeline(&self) -> ReelResult<Sequence> {
        Ok(Sequence::new("end-slide"))
    }

    fn render(&self, ctx: &FrameCtx<'_>) -> ReelResult<Element> {
        let entrance = if self.props.animate {
            ctx.spring(0, SpringConfig::damped(12.0))
        } else {
            1.0
        };
        let k = self.props.logo_scale;
        let scale = remap(entrance, &[0.0, 1.0], &[0.8 * k, 1.2 * k])?;
        let opacity = remap_clamped(entrance, &[0.0, 0.5], &[0.0, 1.0])?;

        let backdrop = match self.props.theme {
            Theme::Dark => Color::rgb(0x0a, 0x0c, 0x10),
            Theme::Light => Color::WHITE,
        };
        let logo = Element::block()
            .key("logo")
            .size(px(120.0), px(120.0))
            .radius(60.0)
            .border(Color::WHITE.with_alpha(0.1))
            .shadow(0.0, 4.0, 20.0, Color::BLACK.with_alpha(0.3))
            .background(Color::WHITE)
            .opacity(opacity)
            .scale(scale)
            .child(Element::image(LOGO_SRC));

        let cta = match &self.props.cta_text {
            Some(text) => Some(self.cta(text, ctx.f())?),
            None => None,
        };
        Ok(Element::fill()
            .background(backdrop)
            .child(self.background.draw(ctx.frame())?)
            .child(Element::fill().child(logo).child_if(cta)))
    }

    fn required_fonts(&self) -> Vec<FontFace> {
        vec![FontFace::new("Inter", 700)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositions::testing::render_at;

    #[test]
    fn logo_grows_from_eighty_percent() {
        let slide = BrandedEndSlide::new(EndSlideProps::default()).unwrap();
        let first = render_at(&slide, 90, 0).unwrap();
        let logo = first.find("logo").unwrap();
        assert_eq!(logo.style.scale, Some(0.8));
        assert_eq!(logo.style.opacity, Some(0.0));
        assert_eq!(logo.children[0].src.as_deref(), Some(LOGO_SRC));

        let late = render_at(&slide, 90, 89).unwrap();
        let scale = late.find("logo").unwrap().style.scale.unwrap();
        assert!((scale - 1.2).abs() < 0.01, "scale {scale}");
        assert!(late.find("cta").is_none());
    }

    #[test]
    fn cta_fades_in_between_30_and_50() {
        let slide = BrandedEndSlide::with_cta(1.5, "Link v biu").unwrap();
        let at = |f| {
            render_at(&slide, 90, f)
                .unwrap()
                .find("cta")
                .and_then(|e| e.style.opacity)
        };
        assert_eq!(at(10), Some(0.0));
        assert_eq!(at(40), Some(0.5));
        assert_eq!(at(60), Some(1.0));
        let el = render_at(&slide, 90, 0).unwrap();
        assert!(el.text_content().contains("Link v biu"));
        let logo = render_at(&slide, 90, 0).unwrap();
        assert_eq!(logo.find("logo").unwrap().style.scale, Some(0.8 * 1.5));
    }

    #[test]
    fn light_theme_uses_white() {
        let slide = BrandedEndSlide::new(EndSlideProps {
            theme: Theme::Light,
            ..EndSlideProps::default()
        })
        .unwrap();
        let el = render_at(&slide, 90, 5).unwrap();
        assert_eq!(el.style.background, Some(Color::WHITE));
        assert_eq!(el.find("background").unwrap().style.background, Some(Color::WHITE));
    }

    #[test]
    fn rejects_non_positive_scale() {
        assert!(BrandedEndSlide::new(EndSlideProps {
            logo_scale: 0.0,
            ..EndSlideProps::default()
        })
        .is_err());
    }
}
