use crate::animation::color::Color;
use crate::animation::interpolate::{InterpolateOpts, interpolate};
use crate::animation::spring::SpringConfig;
use crate::audio::cue::{AudioCue, AudioKey};
use crate::compositions::background::{Background, BackgroundPreset, hex_rgb};
use crate::compositions::outlook_sync::{CardState, SyncStatus, sync_button};
use crate::compositions::{BRAND_GREEN, remap};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::element::{Element, px};
use crate::scene::script::{Script, StateDelta, derive_scene_state};
use crate::session::component::{Component, FrameCtx, Props};
use crate::session::gate::FontFace;
use crate::timeline::sequence::Sequence;

const EXPAND_AT: i64 = 30;
const FOCUS_AT: i64 = 70;
const SUBSCRIBE_AT: i64 = 90;
const HIGHLIGHT_FRAMES: i64 = 90;

const POPUP_BG: Color = hex_rgb(0x1d232a);

/// Student societies offered in the profile popup, as `(id, display name)`.
pub const PROFILES: [(&str, &str); 6] = [
    ("supef", "SUPEF"),
    ("esn", "ESN Mendelu"),
    ("au_frrms", "AU FRRMS"),
    ("af", "AF Spolek"),
    ("zf", "ZF Spolek"),
    ("ldf", "LDF Spolek"),
];

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpolkyProps {
    /// Open the society list at frame 30.
    pub expanded: bool,
    /// Societies ticked from the first frame.
    pub subscribed_ids: Vec<String>,
    /// Society that gets ticked and highlighted at frame 90.
    pub subscribe_id: Option<String>,
    pub background: Option<Background>,
}

impl Default for SpolkyProps {
    fn default() -> Self {
        Self {
            expanded: true,
            subscribed_ids: vec!["supef".to_owned()],
            subscribe_id: Some("esn".to_owned()),
            background: Some(Background::Preset {
                preset: BackgroundPreset::MendeluDark,
            }),
        }
    }
}

impl Props for SpolkyProps {
    fn validate(&self) -> ReelResult<()> {
        for id in self.subscribed_ids.iter().chain(&self.subscribe_id) {
            if !PROFILES.iter().any(|&(known, _)| known == id.as_str()) {
                return Err(ReelError::validation(format!("unknown society \"{id}\"")));
            }
        }
        if let Some(bg) = &self.background {
            bg.check()?;
        }
        Ok(())
    }
}

/// Profile popup zooming in on the society subscriptions.
#[derive(Clone, Debug, PartialEq)]
pub struct Spolky {
    props: SpolkyProps,
    script: Script,
}

impl Spolky {
    pub fn new(props: SpolkyProps) -> ReelResult<Self> {
        props.validate()?;
        let mut script = Script::new();
        for id in &props.subscribed_ids {
            script = script.at(0, StateDelta::insert("subscribed", id.as_str()));
        }
        if let Some(id) = &props.subscribe_id {
            script = script.at(SUBSCRIBE_AT, StateDelta::insert("subscribed", id.as_str()));
        }
        Ok(Self { props, script })
    }

    /// Society highlighted at `frame`, if any.
    pub fn highlighted(&self, frame: i64) -> Option<&str> {
        self.props
            .subscribe_id
            .as_deref()
            .filter(|_| (SUBSCRIBE_AT..SUBSCRIBE_AT + HIGHLIGHT_FRAMES).contains(&frame))
    }

    fn section(&self, ctx: &FrameCtx<'_>) -> ReelResult<Element> {
        let expansion = ctx.spring(EXPAND_AT, SpringConfig::damped(20.0));
        let (height, opacity) = if self.props.expanded {
            (
                remap(expansion, &[0.0, 1.0], &[0.0, 160.0])?,
                remap(expansion, &[0.0, 0.5], &[0.0, 1.0])?.clamp(0.0, 1.0),
            )
        } else {
            (0.0, 0.0)
        };
        let chevron = remap(expansion, &[0.0, 1.0], &[0.0, 90.0])?;

        let snap = derive_scene_state(ctx.frame(), &self.script);
        let highlight = self.highlighted(ctx.frame());
        let mut list = Element::column()
            .key("spolky-list")
            .height(px(height))
            .opacity(opacity);
        for (i, &(id, name)) in PROFILES.iter().enumerate() {
            let s = ctx.spring(
                EXPAND_AT + 10 + 5 * i as i64,
                SpringConfig::new(15.0, 100.0, 1.0),
            );
            let checked = snap.contains("subscribed", id);
            let mut check = Element::block()
                .key(format!("sub-{id}"))
                .size(px(14.0), px(14.0))
                .radius(3.0)
                .border(BRAND_GREEN);
            if checked {
                check = check.background(BRAND_GREEN);
            }
            let mut row = Element::row()
                .key(format!("spolek-{id}"))
                .radius(6.0)
                .opacity(s.clamp(0.0, 1.0))
                .translate(remap(s, &[0.0, 1.0], &[-10.0, 0.0])?, 0.0)
                .child(
                    Element::text(name)
                        .font(12.0, 400)
                        .color(Color::WHITE.with_alpha(0.9)),
                )
                .child(check);
            if highlight == Some(id) {
                row = row.background(BRAND_GREEN.with_alpha(0.3)).border(BRAND_GREEN);
            }
            list = list.child(row);
        }

        Ok(Element::column()
            .key("spolky-section")
            .border(Color::WHITE.with_alpha(0.1))
            .child(
                Element::row()
                    .child(
                        Element::text("Odebírané spolky")
                            .font(12.0, 500)
                            .color(Color::WHITE.with_alpha(0.7)),
                    )
                    .child(
                        Element::block()
                            .key("chevron")
                            .size(px(16.0), px(16.0))
                            .color(Color::WHITE)
                            .rotate(chevron),
                    ),
            )
            .child(list))
    }
}

impl Component for Spolky {
    fn timeline(&self) -> ReelResult<Sequence> {
        let mut root = Sequence::new("spolky").child(Sequence::sound(
            "enter",
            0,
            AudioCue::new(AudioKey::Swoosh).volume(0.5),
        ));
        if self.props.expanded {
            root = root.child(Sequence::sound(
                "expand",
                EXPAND_AT,
                AudioCue::new(AudioKey::ToggleOn).volume(0.5),
            ));
        }
        if self.props.subscribe_id.is_some() {
            root = root.child(Sequence::sound(
                "subscribe",
                SUBSCRIBE_AT,
                AudioCue::new(AudioKey::Tick).volume(1.0),
            ));
        }
        Ok(root)
    }

    fn render(&self, ctx: &FrameCtx<'_>) -> ReelResult<Element> {
        let entrance = ctx.spring(0, SpringConfig::damped(20.0));
        let scale = remap(entrance, &[0.0, 1.0], &[0.9, 1.0])?;
        let y = remap(entrance, &[0.0, 1.0], &[20.0, 0.0])?;

        let span = [0.0, ctx.duration() as f64];
        let rot_x = remap(ctx.f(), &span, &[15.0, 5.0])?;
        let rot_y = remap(ctx.f(), &span, &[-20.0, -5.0])?;

        let focus = ctx.spring(FOCUS_AT, SpringConfig::damped(20.0).with_mass(2.0));
        let focus_scale = remap(focus, &[0.0, 1.0], &[1.0, 1.2])?;
        let focus_y = remap(focus, &[0.0, 1.0], &[0.0, -40.0])?;
        let dim = interpolate(focus, &[0.0, 1.0], &[1.0, 0.0], InterpolateOpts::clamped())?;

        let sync_row = sync_button(
            ctx,
            &CardState {
                enabled: Some(false),
                loading: false,
                progress: 0.0,
                toggle_progress: 0.0,
                status: SyncStatus::Pending,
                event_count: 0,
                show_visualization: false,
            },
        )?;

        let popup = Element::column()
            .key("popup")
            .width(px(288.0))
            .background(POPUP_BG)
            .radius(12.0)
            .border(Color::WHITE.with_alpha(0.1))
            .family("Inter")
            .opacity(entrance.clamp(0.0, 1.0))
            .translate(0.0, y + focus_y)
            .scale(scale * focus_scale)
            .tilt(rot_x, rot_y, 0.0)
            .shadow(
                -rot_y / 2.0,
                remap(rot_x, &[-45.0, 45.0], &[20.0, -20.0])?,
                rot_x.abs() + rot_y.abs() + 20.0,
                Color::BLACK.with_alpha(0.5),
            )
            .child(
                Element::text("Nastavení")
                    .key("popup-header")
                    .font(16.0, 600)
                    .color(Color::WHITE)
                    .opacity(dim),
            )
            .child(
                Element::row()
                    .key("feedback")
                    .opacity(dim * 0.5)
                    .child(Element::block().size(px(16.0), px(16.0)).color(BRAND_GREEN))
                    .child(
                        Element::text("Nahlásit chybu / Nápad")
                            .font(12.0, 500)
                            .color(Color::WHITE),
                    ),
            )
            .child(
                self.section(ctx)?
                    .with_style(|s| s.depth_px = Some(focus * 20.0)),
            )
            .child(Element::fill().key("sync-row").opacity(dim * 0.5).child(sync_row))
            .child(
                Element::row()
                    .key("dark-mode")
                    .opacity(dim)
                    .child(
                        Element::text("Tmavý režim")
                            .font(12.0, 400)
                            .color(Color::WHITE.with_alpha(0.7)),
                    )
                    .child(
                        Element::block()
                            .size(px(32.0), px(20.0))
                            .radius(10.0)
                            .background(BRAND_GREEN),
                    ),
            );

        let mut root = Element::fill();
        if let Some(bg) = &self.props.background {
            root = root.child(bg.draw(ctx.frame())?);
        }
        Ok(root.child(popup))
    }

    fn required_fonts(&self) -> Vec<FontFace> {
        [400, 500, 600, 700]
            .into_iter()
            .map(|w| FontFace::new("Inter", w))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositions::testing::render_at;

    fn spolky() -> Spolky {
        Spolky::new(SpolkyProps::default()).unwrap()
    }

    #[test]
    fn subscription_lands_at_ninety_with_highlight() {
        let s = spolky();
        let bg = |frame, key: &str| {
            render_at(&s, 240, frame)
                .unwrap()
                .find(key)
                .and_then(|e| e.style.background)
        };
        assert_eq!(bg(89, "sub-supef"), Some(BRAND_GREEN));
        assert_eq!(bg(89, "sub-esn"), None);
        assert_eq!(bg(90, "sub-esn"), Some(BRAND_GREEN));
        assert_eq!(bg(89, "spolek-esn"), None);
        assert_eq!(bg(100, "spolek-esn"), Some(BRAND_GREEN.with_alpha(0.3)));
        assert_eq!(bg(180, "spolek-esn"), None);
        assert_eq!(s.highlighted(179), Some("esn"));
        assert_eq!(s.highlighted(180), None);
    }

    #[test]
    fn list_expands_from_thirty() {
        let s = spolky();
        let el = render_at(&s, 240, 30).unwrap();
        assert_eq!(el.find("chevron").unwrap().style.rotate_deg, Some(0.0));
        assert_eq!(el.find("spolky-list").unwrap().style.height, Some(px(0.0)));
        assert_eq!(el.find("spolek-supef").unwrap().style.opacity, Some(0.0));

        let open = render_at(&s, 240, 120).unwrap();
        match open.find("chevron").and_then(|c| c.style.rotate_deg) {
            Some(deg) => assert!((deg - 90.0).abs() < 1.0, "chevron {deg}"),
            None => panic!("chevron not rotated"),
        }
        assert_eq!(open.find("spolky-list").map(|l| l.children.len()), Some(6));
        assert!(open.text_content().contains("ESN Mendelu"));
    }

    #[test]
    fn collapsed_popup_keeps_list_hidden() {
        let s = Spolky::new(SpolkyProps {
            expanded: false,
            ..SpolkyProps::default()
        })
        .unwrap();
        let el = render_at(&s, 240, 120).unwrap();
        let list = el.find("spolky-list").unwrap();
        assert_eq!(list.style.height, Some(px(0.0)));
        assert_eq!(list.style.opacity, Some(0.0));
        let froms: Vec<i64> = s.timeline().unwrap().children.iter().map(|c| c.from).collect();
        assert_eq!(froms, vec![0, 90]);
    }

    #[test]
    fn focus_dims_everything_but_the_section() {
        let s = spolky();
        let op = |frame, key: &str| {
            render_at(&s, 240, frame)
                .unwrap()
                .find(key)
                .and_then(|e| e.style.opacity)
                .unwrap()
        };
        assert_eq!(op(70, "popup-header"), 1.0);
        assert_eq!(op(70, "feedback"), 0.5);
        assert!(op(230, "popup-header") < 0.05);
        assert!(op(230, "dark-mode") < 0.05);
        let popup = render_at(&s, 240, 230).unwrap();
        let scale = popup.find("popup").and_then(|p| p.style.scale).unwrap();
        assert!((scale - 1.2).abs() < 0.01, "scale {scale}");
    }

    #[test]
    fn cues_follow_the_beats() {
        let seq = spolky().timeline().unwrap();
        let froms: Vec<i64> = seq.children.iter().map(|c| c.from).collect();
        assert_eq!(froms, vec![0, 30, 90]);
        assert_eq!(seq.children[2].cues[0].key, AudioKey::Tick);
    }

    #[test]
    fn rejects_unknown_society() {
        assert!(
            Spolky::new(SpolkyProps {
                subscribe_id: Some("chess".to_owned()),
                ..SpolkyProps::default()
            })
            .is_err()
        );
    }
}
