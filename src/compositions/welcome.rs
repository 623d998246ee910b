use crate::animation::color::Color;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::element::Element;
use crate::session::component::{Component, FrameCtx, Props};
use crate::session::gate::FontFace;
use crate::timeline::sequence::Sequence;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WelcomeProps {
    pub title: String,
    pub logo_color: Color,
}

impl Default for WelcomeProps {
    fn default() -> Self {
        Self {
            title: "Welcome to Remotion".to_owned(),
            logo_color: Color::rgb(0x0b, 0x84, 0xf3),
        }
    }
}

impl Props for WelcomeProps {
    fn validate(&self) -> ReelResult<()> {
        if self.title.is_empty() {
            return Err(ReelError::validation("title must not be empty"));
        }
        Ok(())
    }
}

/// Static title card.
#[derive(Clone, Debug, PartialEq)]
pub struct Welcome {
    props: WelcomeProps,
}

impl Welcome {
    pub fn new(props: WelcomeProps) -> ReelResult<Self> {
        props.validate()?;
        Ok(Self { props })
    }
}

impl Component for Welcome {
    fn timeline(&self) -> ReelResult<Sequence> {
        Ok(Sequence::new("welcome"))
    }

    fn render(&self, _ctx: &FrameCtx<'_>) -> ReelResult<Element> {
        Ok(Element::fill().background(Color::WHITE).child(
            Element::text(self.props.title.as_str())
                .key("title")
                .color(self.props.logo_color)
                .font(96.0, 700),
        ))
    }

    fn required_fonts(&self) -> Vec<FontFace> {
        vec![FontFace::new("Inter", 700)]
    }
}
