use std::fmt;

use crate::animation::color::Color;
use crate::foundation::core::Vec2;
use crate::foundation::error::{ReelError, ReelResult};

/// Kind of a node in the declarative render tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Absolutely positioned layer covering its parent.
    Fill,
    /// Generic box.
    Block,
    /// Horizontal flex container.
    Row,
    /// Vertical flex container.
    Column,
    /// Text run.
    Text,
    /// Static image asset.
    Image,
    /// Video asset played from the node's local frame.
    Video,
}

/// CSS-like length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    Px(f64),
    Percent(f64),
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Percent(v) => write!(f, "{v}%"),
        }
    }
}

impl std::str::FromStr for Length {
    type Err = ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (num, ctor): (&str, fn(f64) -> Length) = if let Some(n) = s.strip_suffix("px") {
            (n, Length::Px)
        } else if let Some(n) = s.strip_suffix('%') {
            (n, Length::Percent)
        } else {
            return Err(ReelError::serde(format!("length \"{s}\" needs a px or % unit")));
        };
        num.trim()
            .parse::<f64>()
            .map(ctor)
            .map_err(|_| ReelError::serde(format!("invalid length \"{s}\"")))
    }
}

impl serde::Serialize for Length {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Length {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Gradient fill.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Gradient {
    Linear { angle_deg: f64, stops: Vec<Color> },
    Radial { stops: Vec<Color> },
}

/// Drop shadow / glow.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Shadow {
    pub offset: Vec2,
    pub blur_px: f64,
    pub color: Color,
}

/// Per-element visual properties. Unset fields inherit or use the rasterizer default.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translate: Option<Vec2>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate_x_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate_y_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth_px: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Length>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<Length>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Length>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Length>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Gradient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_px: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur_px: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing_em: Option<f64>,
}

/// One node of the render tree produced for a single frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Element {
    pub kind: ElementKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "is_default_style")]
    pub style: Style,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

fn is_default_style(s: &Style) -> bool {
    *s == Style::default()
}

impl Element {
    fn of(kind: ElementKind) -> Self {
        Self {
            kind,
            key: None,
            style: Style::default(),
            text: None,
            src: None,
            children: Vec::new(),
        }
    }

    pub fn fill() -> Self {
        Self::of(ElementKind::Fill)
    }

    pub fn block() -> Self {
        Self::of(ElementKind::Block)
    }

    pub fn row() -> Self {
        Self::of(ElementKind::Row)
    }

    pub fn column() -> Self {
        Self::of(ElementKind::Column)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::of(ElementKind::Text)
        }
    }

    pub fn image(src: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            ..Self::of(ElementKind::Image)
        }
    }

    pub fn video(src: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            ..Self::of(ElementKind::Video)
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Append an optional child.
    pub fn child_if(self, child: Option<Element>) -> Self {
        match child {
            Some(c) => self.child(c),
            None => self,
        }
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    /// Edit the style in place.
    pub fn with_style(mut self, f: impl FnOnce(&mut Style)) -> Self {
        f(&mut self.style);
        self
    }

    pub fn opacity(self, v: f64) -> Self {
        self.with_style(|s| s.opacity = Some(v))
    }

    pub fn translate(self, x: f64, y: f64) -> Self {
        self.with_style(|s| s.translate = Some(Vec2::new(x, y)))
    }

    pub fn scale(self, v: f64) -> Self {
        self.with_style(|s| s.scale = Some(v))
    }

    pub fn rotate(self, deg: f64) -> Self {
        self.with_style(|s| s.rotate_deg = Some(deg))
    }

    /// 3D tilt plus a push along the view axis.
    pub fn tilt(self, x_deg: f64, y_deg: f64, depth_px: f64) -> Self {
        self.with_style(|s| {
            s.rotate_x_deg = Some(x_deg);
            s.rotate_y_deg = Some(y_deg);
            s.depth_px = Some(depth_px);
        })
    }

    pub fn at(self, left: Length, top: Length) -> Self {
        self.with_style(|s| {
            s.left = Some(left);
            s.top = Some(top);
        })
    }

    pub fn size(self, width: Length, height: Length) -> Self {
        self.with_style(|s| {
            s.width = Some(width);
            s.height = Some(height);
        })
    }

    pub fn width(self, width: Length) -> Self {
        self.with_style(|s| s.width = Some(width))
    }

    pub fn height(self, height: Length) -> Self {
        self.with_style(|s| s.height = Some(height))
    }

    pub fn background(self, c: Color) -> Self {
        self.with_style(|s| s.background = Some(c))
    }

    pub fn gradient(self, g: Gradient) -> Self {
        self.with_style(|s| s.gradient = Some(g))
    }

    pub fn border(self, c: Color) -> Self {
        self.with_style(|s| s.border = Some(c))
    }

    pub fn radius(self, px: f64) -> Self {
        self.with_style(|s| s.radius_px = Some(px))
    }

    pub fn shadow(self, x: f64, y: f64, blur_px: f64, color: Color) -> Self {
        self.with_style(|s| {
            s.shadow = Some(Shadow {
                offset: Vec2::new(x, y),
                blur_px,
                color,
            })
        })
    }

    /// Gaussian blur. Zero or negative radii are dropped.
    pub fn blur(self, px: f64) -> Self {
        self.with_style(|s| s.blur_px = (px > 0.0).then_some(px))
    }

    pub fn color(self, c: Color) -> Self {
        self.with_style(|s| s.color = Some(c))
    }

    pub fn font(self, size: f64, weight: u16) -> Self {
        self.with_style(|s| {
            s.font_size = Some(size);
            s.font_weight = Some(weight);
        })
    }

    pub fn family(self, family: impl Into<String>) -> Self {
        let family = family.into();
        self.with_style(|s| s.font_family = Some(family))
    }

    /// Depth-first search by key.
    pub fn find(&self, key: &str) -> Option<&Element> {
        if self.key.as_deref() == Some(key) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(key))
    }

    /// Total node count, self included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Element::count).sum::<usize>()
    }

    /// Concatenated text of this subtree in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(t) = &self.text {
            out.push_str(t);
        }
        for c in &self.children {
            c.collect_text(out);
        }
    }

    /// Canonical JSON bytes.
    pub fn to_canonical_json(&self) -> ReelResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// `Length::Px` shorthand.
pub fn px(v: f64) -> Length {
    Length::Px(v)
}

/// `Length::Percent` shorthand.
pub fn pct(v: f64) -> Length {
    Length::Percent(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unset_style_is_omitted() {
        let el = Element::text("Ahoj").key("t");
        assert_eq!(
            serde_json::to_value(&el).unwrap(),
            json!({ "kind": "text", "key": "t", "text": "Ahoj" })
        );
    }

    #[test]
    fn lengths_use_css_units() {
        let el = Element::block().at(pct(50.0), px(2.0)).width(px(14.5));
        let v = serde_json::to_value(&el).unwrap();
        assert_eq!(v["style"]["left"], json!("50%"));
        assert_eq!(v["style"]["top"], json!("2px"));
        assert_eq!(v["style"]["width"], json!("14.5px"));
        let back: Element = serde_json::from_value(v).unwrap();
        assert_eq!(back, el);
        assert!("12".parse::<Length>().is_err());
    }

    #[test]
    fn find_count_and_text() {
        let tree = Element::fill()
            .child(Element::text("a").key("first"))
            .child(Element::row().child(Element::text("b").key("second")));
        assert_eq!(tree.count(), 4);
        assert_eq!(tree.find("second").and_then(|e| e.text.as_deref()), Some("b"));
        assert_eq!(tree.text_content(), "ab");
        assert!(tree.find("missing").is_none());
    }

    #[test]
    fn zero_blur_is_dropped() {
        assert_eq!(Element::block().blur(0.0).style.blur_px, None);
        assert_eq!(Element::block().blur(2.5).style.blur_px, Some(2.5));
    }
}
