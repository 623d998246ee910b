use std::f64::consts::PI;

use crate::animation::color::Color;
use crate::animation::interpolate::{Envelope, InterpolateOpts, interpolate, interpolate_colors};
use crate::animation::spring::{SpringConfig, spring_value};
use crate::audio::cue::{AudioCue, AudioKey};
use crate::compositions::background::{Background, hex_rgb};
use crate::compositions::{BRAND_GREEN, check_scale, remap, remap_clamped};
use crate::foundation::core::Fps;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::element::{Element, pct, px};
use crate::scene::script::{SceneSnapshot, Script, StateDelta, derive_scene_state};
use crate::session::component::{Component, FrameCtx, Props, check_unit};
use crate::session::gate::FontFace;
use crate::timeline::sequence::Sequence;

const SYNC_START: i64 = 15;
const SYNC_END: i64 = 65;

const CARD_BG: Color = hex_rgb(0x1e2329);
const TOGGLE_OFF: Color = hex_rgb(0x1f2937);
const TOGGLE_DISABLED: Color = hex_rgb(0x374151);
const EXAM_RED: Color = hex_rgb(0xf85149);
const MUTED: Color = hex_rgb(0x8b949e);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    #[default]
    Pending,
    Syncing,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EventKind {
    Lecture,
    Exam,
    Exercise,
}

impl EventKind {
    fn label(self) -> &'static str {
        match self {
            Self::Lecture => "přednáška",
            Self::Exam => "zkouška",
            Self::Exercise => "cvičení",
        }
    }
}

const SAMPLE_EVENTS: [(&str, &str, EventKind); 3] = [
    ("Přednáška: Algoritmizace", "Po 09:00 - 10:50", EventKind::Lecture),
    ("Zkouška: Matematika I", "St 10:00 - 12:00", EventKind::Exam),
    ("Cvičení: Programování", "Pá 14:00 - 15:40", EventKind::Exercise),
];

/// Everything that can change per frame on the sync card.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardState {
    /// `None` renders the switch as disabled.
    pub enabled: Option<bool>,
    pub loading: bool,
    /// Sync progress in `[0, 1]`.
    pub progress: f64,
    /// Switch position; may overshoot while a spring settles.
    pub toggle_progress: f64,
    pub status: SyncStatus,
    pub event_count: usize,
    pub show_visualization: bool,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OutlookSyncProps {
    pub enabled: Option<bool>,
    pub loading: bool,
    pub show_info: bool,
    pub progress: f64,
    /// Drive progress over frames 15..65 and play the sync cues.
    pub animate: bool,
    pub rotation_x: f64,
    pub rotation_y: f64,
    pub depth: f64,
    pub sync_status: SyncStatus,
    pub event_count: usize,
    pub scale: f64,
    pub background: Option<Background>,
    pub is_done: bool,
    pub show_visualization: bool,
    pub toggle_progress: f64,
}

impl Default for OutlookSyncProps {
    fn default() -> Self {
        Self {
            enabled: Some(true),
            loading: false,
            show_info: false,
            progress: 1.0,
            animate: false,
            rotation_x: 0.0,
            rotation_y: 0.0,
            depth: 0.0,
            sync_status: SyncStatus::Pending,
            event_count: 3,
            scale: 1.0,
            background: None,
            is_done: false,
            show_visualization: true,
            toggle_progress: 1.0,
        }
    }
}

impl Props for OutlookSyncProps {
    fn validate(&self) -> ReelResult<()> {
        check_unit("progress", self.progress)?;
        check_scale(self.scale)?;
        if !self.toggle_progress.is_finite() {
            return Err(ReelError::validation("toggle_progress must be finite"));
        }
        if let Some(bg) = &self.background {
            bg.check()?;
        }
        Ok(())
    }
}

/// Calendar sync card: switch, progress and the events being imported.
#[derive(Clone, Debug, PartialEq)]
pub struct OutlookSync {
    props: OutlookSyncProps,
}

impl OutlookSync {
    pub fn new(props: OutlookSyncProps) -> ReelResult<Self> {
        props.validate()?;
        Ok(Self { props })
    }

    fn state_at(&self, frame: i64) -> ReelResult<CardState> {
        let p = &self.props;
        let progress = if p.animate {
            remap_clamped(
                frame as f64,
                &[SYNC_START as f64, SYNC_END as f64],
                &[0.0, 1.0],
            )?
        } else {
            p.progress
        };
        Ok(CardState {
            enabled: p.enabled,
            loading: p.loading,
            progress,
            toggle_progress: p.toggle_progress,
            status: p.sync_status,
            event_count: p.event_count,
            show_visualization: p.show_visualization,
        })
    }
}

impl Component for OutlookSync {
    fn timeline(&self) -> ReelResult<Sequence> {
        let root = Sequence::new("outlook-sync");
        if !self.props.animate {
            return Ok(root);
        }
        Ok(root
            .child(Sequence::sound("enter", 0, AudioCue::new(AudioKey::Swoosh).volume(0.6)))
            .child(Sequence::sound(
                "toggle",
                SYNC_START,
                AudioCue::new(AudioKey::ToggleOn).volume(0.8),
            ))
            .child(Sequence::sound(
                "done",
                SYNC_END,
                AudioCue::new(AudioKey::Success).volume(0.6),
            )))
    }

    fn render(&self, ctx: &FrameCtx<'_>) -> ReelResult<Element> {
        let state = self.state_at(ctx.frame())?;
        let p = &self.props;
        let card = sync_card(ctx, &state, p.scale)?
            .tilt(p.rotation_x, p.rotation_y, p.depth);
        let mut root = Element::fill();
        if let Some(bg) = &p.background {
            root = root.child(bg.draw(ctx.frame())?);
        }
        Ok(root.child(card))
    }

    fn required_fonts(&self) -> Vec<FontFace> {
        sync_fonts()
    }
}

fn sync_fonts() -> Vec<FontFace> {
    vec![
        FontFace::new("Inter", 500),
        FontFace::new("Inter", 600),
        FontFace::new("Inter", 700),
    ]
}

/// The card itself, shared by [`OutlookSync`] and [`OutlookSyncHint`].
pub fn sync_card(ctx: &FrameCtx<'_>, state: &CardState, scale: f64) -> ReelResult<Element> {
    let entrance = ctx.spring(0, SpringConfig::damped(20.0));
    let opacity = remap_clamped(entrance, &[0.0, 0.5], &[0.0, 1.0])?;
    let y = remap(entrance, &[0.0, 1.0], &[20.0, 0.0])?;

    let mut card = Element::column()
        .key("sync-card")
        .width(px(320.0))
        .background(CARD_BG)
        .radius(12.0)
        .border(Color::WHITE.with_alpha(0.05))
        .shadow(0.0, 20.0, 60.0, Color::BLACK.with_alpha(0.3))
        .family("Inter")
        .opacity(opacity)
        .scale(scale)
        .translate(0.0, y)
        .child(sync_button(ctx, state)?);
    if state.show_visualization {
        card = card.child(visualization(ctx.f(), ctx.fps(), state)?);
    }
    Ok(card)
}

pub(crate) fn sync_button(ctx: &FrameCtx<'_>, state: &CardState) -> ReelResult<Element> {
    let tp = state.toggle_progress;
    let pulse = if state.loading {
        remap(
            (ctx.f() / ctx.fps().as_f64() * PI * 2.0).sin(),
            &[-1.0, 1.0],
            &[0.8, 1.0],
        )?
    } else {
        1.0
    };
    let handle_x = remap(tp, &[0.0, 1.0], &[4.0, 14.0])?;
    let track = if state.enabled == Some(true) {
        interpolate_colors(tp, &[0.0, 1.0], &[TOGGLE_OFF, BRAND_GREEN])?
    } else {
        TOGGLE_DISABLED
    };
    let glow = interpolate(tp, &[0.8, 1.0], &[0.0, 0.4], InterpolateOpts::clamp_left())?;

    let label = Element::row()
        .child(
            Element::block()
                .key("calendar-icon")
                .size(px(16.0), px(16.0))
                .color(hex_rgb(0x9ca3af))
                .opacity(remap(tp, &[0.0, 1.0], &[0.4, 0.8])?)
                .scale(remap(tp, &[0.0, 1.0], &[1.0, 1.1])?),
        )
        .child(
            Element::text("Synchronizace rozvrhu")
                .font(12.0, 700)
                .color(hex_rgb(0xf3f4f6))
                .opacity(remap(tp, &[0.0, 1.0], &[0.5, 0.8])?),
        );
    let switch = Element::block()
        .key("toggle")
        .size(px(32.0), px(20.0))
        .radius(10.0)
        .background(track)
        .opacity(if state.loading { 0.7 } else { 1.0 })
        .child(
            Element::fill()
                .key("toggle-glow")
                .background(BRAND_GREEN)
                .radius(10.0)
                .blur(12.0)
                .opacity(glow),
        )
        .child(
            Element::block()
                .key("toggle-handle")
                .at(px(handle_x), px(2.0))
                .size(px(14.0), px(14.0))
                .radius(7.0)
                .background(Color::WHITE)
                .scale(pulse),
        );
    Ok(Element::row().key("sync-button").child(label).child(switch))
}

fn visualization(frame: f64, fps: Fps, state: &CardState) -> ReelResult<Element> {
    let syncing = state.status != SyncStatus::Pending;
    let spring_frame = if syncing { state.progress * 60.0 } else { 0.0 };
    let vis = spring_value(spring_frame, fps, &SpringConfig::damped(20.0));
    let height = interpolate(vis, &[0.0, 1.0], &[0.0, 180.0], InterpolateOpts::clamp_right())?;
    let opacity = interpolate(vis, &[0.0, 0.4], &[0.0, 1.0], InterpolateOpts::clamp_right())?;

    let in_flight = state.status == SyncStatus::Syncing;
    let text_pulse = remap((frame / fps.as_f64() * PI * 3.0).sin(), &[-1.0, 1.0], &[0.6, 1.0])?;
    let heading = Element::row()
        .child(
            Element::text(if in_flight {
                "Synchronizace..."
            } else {
                "Synchronizace dokončena"
            })
            .key("sync-status")
            .font(10.0, 700)
            .color(BRAND_GREEN)
            .opacity(if in_flight { text_pulse } else { 1.0 }),
        )
        .child(
            Element::text(format!("{}%", (state.progress * 100.0).round()))
                .key("sync-percent")
                .font(10.0, 700)
                .color(MUTED),
        );
    let bar = Element::block()
        .width(pct(100.0))
        .height(px(4.0))
        .background(Color::WHITE.with_alpha(0.05))
        .radius(2.0)
        .child(
            Element::block()
                .key("sync-bar")
                .width(pct(state.progress * 100.0))
                .height(pct(100.0))
                .background(BRAND_GREEN),
        );

    let mut events = Element::column().key("sync-events");
    for (i, &(title, time, kind)) in SAMPLE_EVENTS.iter().take(state.event_count).enumerate() {
        if let Some(card) = event_card(i, title, time, kind, state.progress, fps)? {
            events = events.child(card);
        }
    }

    Ok(Element::column()
        .key("sync-visualization")
        .height(px(height))
        .opacity(opacity)
        .child(heading)
        .child(bar)
        .child(events))
}

fn event_card(
    index: usize,
    title: &str,
    time: &str,
    kind: EventKind,
    progress: f64,
    fps: Fps,
) -> ReelResult<Option<Element>> {
    let s = spring_value(
        progress * 60.0 - index as f64 * 10.0,
        fps,
        &SpringConfig::damped(15.0),
    );
    if s <= 0.0 {
        return Ok(None);
    }
    let accent = if kind == EventKind::Exam {
        EXAM_RED
    } else {
        BRAND_GREEN
    };
    let x = remap(s, &[0.0, 1.0], &[20.0, 0.0])?;
    let scale = remap(s, &[0.0, 1.0], &[0.95, 1.0])?;
    Ok(Some(
        Element::row()
            .key(format!("event-{index}"))
            .background(hex_rgb(0x161b22).with_alpha(0.4))
            .radius(12.0)
            .border(Color::WHITE.with_alpha(0.1))
            .opacity(s.min(1.0))
            .translate(x, 0.0)
            .scale(scale)
            .child(
                Element::block()
                    .size(px(4.0), px(32.0))
                    .radius(2.0)
                    .background(accent),
            )
            .child(
                Element::column()
                    .child(Element::text(kind.label()).font(8.0, 700).color(accent))
                    .child(
                        Element::text(title)
                            .font(12.0, 600)
                            .color(hex_rgb(0xf0f6fc)),
                    )
                    .child(Element::text(time).font(10.0, 500).color(MUTED)),
            ),
    ))
}

/// Timing of the scripted sync demo.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintPace {
    /// Eight seconds: switch at 45, sync 60..180, events appear one by one.
    #[default]
    Full,
    /// Four seconds: springy switch at 20, sync 30..80, no event list.
    Quick,
}

struct PaceTiming {
    duration: u64,
    enter_cue_frames: i64,
    trigger: i64,
    sync: (i64, i64),
}

impl HintPace {
    fn timing(self) -> PaceTiming {
        match self {
            Self::Full => PaceTiming {
                duration: 240,
                enter_cue_frames: 30,
                trigger: 45,
                sync: (60, 180),
            },
            Self::Quick => PaceTiming {
                duration: 120,
                enter_cue_frames: 20,
                trigger: 20,
                sync: (30, 80),
            },
        }
    }

    /// Output length in frames.
    pub fn duration(self) -> u64 {
        self.timing().duration
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OutlookSyncHintProps {
    pub pace: HintPace,
    pub scale: f64,
}

impl Default for OutlookSyncHintProps {
    fn default() -> Self {
        Self {
            pace: HintPace::Full,
            scale: 1.0,
        }
    }
}

impl Props for OutlookSyncHintProps {
    fn validate(&self) -> ReelResult<()> {
        check_scale(self.scale)
    }
}

/// Scripted walk-through of turning calendar sync on.
#[derive(Clone, Debug, PartialEq)]
pub struct OutlookSyncHint {
    props: OutlookSyncHintProps,
    script: Script,
}

impl OutlookSyncHint {
    pub fn new(props: OutlookSyncHintProps) -> ReelResult<Self> {
        props.validate()?;
        let t = props.pace.timing();
        let (start, end) = t.sync;
        let progress = Envelope::linear(
            [start as f64, end as f64],
            [0.0, 1.0],
            InterpolateOpts::clamped(),
        )?;
        let script = Script::new()
            .at(0, StateDelta::phase("status", "pending"))
            .at(0, StateDelta::progress("sync", progress))
            .at(t.trigger, StateDelta::flag("enabled", true))
            .at(start, StateDelta::phase("status", "syncing"))
            .at(end, StateDelta::phase("status", "completed"));
        Ok(Self { props, script })
    }

    /// Quick-paced hint at `scale`, as embedded in the calendar introduction.
    pub fn quick(scale: f64) -> ReelResult<Self> {
        Self::new(OutlookSyncHintProps {
            pace: HintPace::Quick,
            scale,
        })
    }

    /// Scene state at `frame`.
    pub fn snapshot(&self, frame: i64) -> SceneSnapshot {
        derive_scene_state(frame, &self.script)
    }

    fn card_state(&self, ctx: &FrameCtx<'_>) -> CardState {
        let snap = self.snapshot(ctx.frame());
        let status = match snap.phase("status") {
            Some("syncing") => SyncStatus::Syncing,
            Some("completed") => SyncStatus::Completed,
            _ => SyncStatus::Pending,
        };
        let progress = snap.progress("sync");
        match self.props.pace {
            HintPace::Full => CardState {
                enabled: Some(snap.flag("enabled")),
                loading: status == SyncStatus::Syncing,
                progress,
                toggle_progress: 1.0,
                status,
                event_count: events_for_progress(progress),
                show_visualization: true,
            },
            HintPace::Quick => {
                let trigger = self.props.pace.timing().trigger;
                CardState {
                    enabled: Some(snap.flag("enabled")),
                    loading: status == SyncStatus::Syncing,
                    progress,
                    toggle_progress: ctx.spring(trigger, quick_toggle_spring()),
                    status,
                    event_count: 3,
                    show_visualization: false,
                }
            }
        }
    }
}

fn quick_toggle_spring() -> SpringConfig {
    SpringConfig::new(10.0, 200.0, 0.5)
}

/// Events listed once sync progress passes 0.3, 0.6 and 0.9.
pub fn events_for_progress(progress: f64) -> usize {
    [0.3, 0.6, 0.9].iter().filter(|&&t| progress >= t).count()
}

impl Component for OutlookSyncHint {
    fn timeline(&self) -> ReelResult<Sequence> {
        let t = self.props.pace.timing();
        Ok(Sequence::new("outlook-sync-hint")
            .child(
                Sequence::sound("enter", 0, AudioCue::new(AudioKey::Swoosh).volume(0.6))
                    .lasting(t.enter_cue_frames),
            )
            .child(Sequence::sound(
                "toggle",
                t.trigger,
                AudioCue::new(AudioKey::ToggleOn).volume(0.8),
            ))
            .child(Sequence::sound(
                "done",
                t.sync.1,
                AudioCue::new(AudioKey::Success).volume(0.6),
            )))
    }

    fn render(&self, ctx: &FrameCtx<'_>) -> ReelResult<Element> {
        let state = self.card_state(ctx);
        Ok(Element::fill().child(sync_card(ctx, &state, self.props.scale)?))
    }

    fn required_fonts(&self) -> Vec<FontFace> {
        sync_fonts()
    }

    fn duration_override(&self) -> Option<u64> {
        Some(self.props.pace.duration())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositions::testing::render_at;

    fn handle_left(el: &Element) -> f64 {
        match el.find("toggle-handle").and_then(|h| h.style.left) {
            Some(crate::render::element::Length::Px(v)) => v,
            other => panic!("unexpected handle position {other:?}"),
        }
    }

    #[test]
    fn static_card_shows_full_switch() {
        let card = OutlookSync::new(OutlookSyncProps::default()).unwrap();
        let el = render_at(&card, 90, 45).unwrap();
        assert_eq!(handle_left(&el), 14.0);
        assert_eq!(el.find("toggle").unwrap().style.background, Some(BRAND_GREEN));
        assert_eq!(el.find("toggle-glow").unwrap().style.opacity, Some(0.4));
        assert_eq!(
            el.find("sync-percent").and_then(|e| e.text.as_deref()),
            Some("100%")
        );
    }

    #[test]
    fn disabled_switch_is_grey() {
        let card = OutlookSync::new(OutlookSyncProps {
            enabled: None,
            toggle_progress: 0.0,
            ..OutlookSyncProps::default()
        })
        .unwrap();
        let el = render_at(&card, 90, 10).unwrap();
        assert_eq!(el.find("toggle").unwrap().style.background, Some(TOGGLE_DISABLED));
        assert_eq!(handle_left(&el), 4.0);
        assert_eq!(el.find("toggle-glow").unwrap().style.opacity, Some(0.0));
    }

    #[test]
    fn animated_card_drives_progress_and_cues() {
        let card = OutlookSync::new(OutlookSyncProps {
            animate: true,
            ..OutlookSyncProps::default()
        })
        .unwrap();
        assert_eq!(card.state_at(0).unwrap().progress, 0.0);
        assert_eq!(card.state_at(40).unwrap().progress, 0.5);
        assert_eq!(card.state_at(80).unwrap().progress, 1.0);
        let seq = card.timeline().unwrap();
        let froms: Vec<i64> = seq.children.iter().map(|c| c.from).collect();
        assert_eq!(froms, vec![0, 15, 65]);
    }

    #[test]
    fn rejects_out_of_range_progress() {
        assert!(OutlookSync::new(OutlookSyncProps {
            progress: 1.5,
            ..OutlookSyncProps::default()
        })
        .is_err());
    }

    #[test]
    fn event_count_thresholds() {
        assert_eq!(events_for_progress(0.0), 0);
        assert_eq!(events_for_progress(0.3), 1);
        assert_eq!(events_for_progress(0.75), 2);
        assert_eq!(events_for_progress(1.0), 3);
    }

    #[test]
    fn full_hint_follows_its_script() {
        let hint = OutlookSyncHint::new(OutlookSyncHintProps::default()).unwrap();
        let snap = hint.snapshot(44);
        assert!(!snap.flag("enabled"));
        assert_eq!(snap.phase("status"), Some("pending"));
        let snap = hint.snapshot(120);
        assert!(snap.flag("enabled"));
        assert_eq!(snap.phase("status"), Some("syncing"));
        assert_eq!(snap.progress("sync"), 0.5);
        assert_eq!(hint.snapshot(200).phase("status"), Some("completed"));

        let el = render_at(&hint, 240, 20).unwrap();
        assert_eq!(el.find("toggle").unwrap().style.background, Some(TOGGLE_DISABLED));
        let el = render_at(&hint, 240, 239).unwrap();
        assert_eq!(el.find("sync-events").unwrap().children.len(), 3);
        assert_eq!(
            el.find("sync-status").and_then(|e| e.text.as_deref()),
            Some("Synchronizace dokončena")
        );
    }

    #[test]
    fn quick_hint_hides_visualization_and_springs_the_switch() {
        let hint = OutlookSyncHint::quick(2.0).unwrap();
        assert_eq!(hint.duration_override(), Some(120));
        let before = render_at(&hint, 120, 19).unwrap();
        assert_eq!(handle_left(&before), 4.0);
        assert!(before.find("sync-visualization").is_none());
        let after = render_at(&hint, 120, 60).unwrap();
        assert!((handle_left(&after) - 14.0).abs() < 0.5);
        assert_eq!(after.find("sync-card").unwrap().style.scale, Some(2.0));
    }
}
