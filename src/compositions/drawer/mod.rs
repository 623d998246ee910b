//! Subject detail drawer: header, file list and grade statistics.

mod files;
mod hint;
mod stats;

use std::collections::BTreeMap;
use std::f64::consts::PI;

use crate::animation::color::Color;
use crate::animation::interpolate::{InterpolateOpts, interpolate};
use crate::animation::spring::SpringConfig;
use crate::audio::cue::{AudioCue, AudioKey};
use crate::compositions::background::{Background, hex_rgb};
use crate::compositions::{BRAND_GREEN, check_scale, remap, remap_clamped};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::element::{Element, px};
use crate::session::component::{Component, FrameCtx, Props, check_unit};
use crate::session::gate::FontFace;
use crate::timeline::sequence::Sequence;

pub use files::file_list;
pub use hint::{FilesHint, FilesHintProps, SubjectDrawerShowcase};
pub use stats::{aggregate_grades, success_rate};

const CARD_BG: Color = hex_rgb(0x1a1f26);
const SCRIPTED_SELECTION: [&str; 3] = ["l1", "l2", "l3"];

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Lecturer {
    pub name: String,
    #[serde(default)]
    pub roles: Option<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Subject {
    pub name: String,
    pub code: String,
    pub credits: String,
    pub status: String,
    pub completion: String,
    #[serde(default)]
    pub garant: Option<String>,
    #[serde(default)]
    pub vyucujici: Vec<Lecturer>,
}

impl Subject {
    /// Mandatory exam course as shown in the campaign.
    pub fn mandatory(name: &str, code: &str) -> Self {
        Self {
            name: name.to_owned(),
            code: code.to_owned(),
            credits: "6 KREDITŮ".to_owned(),
            status: "POVINNÝ".to_owned(),
            completion: "Zkouška".to_owned(),
            garant: None,
            vyucujici: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FileEntry {
    pub file_name: String,
    pub link: String,
    #[serde(default)]
    pub file_comment: Option<String>,
}

impl FileEntry {
    pub fn new(link: &str, file_name: &str) -> Self {
        Self {
            file_name: file_name.to_owned(),
            link: link.to_owned(),
            file_comment: None,
        }
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.file_comment = Some(comment.to_owned());
        self
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FileGroup {
    pub name: String,
    pub display_name: String,
    pub files: Vec<FileEntry>,
}

impl FileGroup {
    /// The catch-all "OSTATNÍ" folder.
    pub fn other(files: Vec<FileEntry>) -> Self {
        Self {
            name: "ostatni".to_owned(),
            display_name: "OSTATNÍ".to_owned(),
            files,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assessment {
    Credit,
    Exam,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreditGrades {
    pub zap: u32,
    pub nezap: u32,
    #[serde(default)]
    pub zap_nedost: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TermStats {
    #[serde(default)]
    pub grades: Option<BTreeMap<String, u32>>,
    #[serde(default)]
    pub credit_grades: Option<CreditGrades>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SemesterStats {
    pub semester: String,
    pub total_pass: u32,
    pub total_fail: u32,
    #[serde(rename = "type")]
    pub kind: Assessment,
    pub terms: Vec<TermStats>,
}

/// Grade history, latest semester first.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SuccessRate {
    pub stats: Vec<SemesterStats>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveTab {
    #[default]
    Files,
    Syllabus,
    Stats,
}

impl ActiveTab {
    const ALL: [(Self, &'static str); 3] = [
        (Self::Files, "Soubory"),
        (Self::Syllabus, "Požadavky"),
        (Self::Stats, "Úspěšnost"),
    ];
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SubjectDrawerProps {
    pub subject: Subject,
    pub groups: Vec<FileGroup>,
    pub success_rate: Option<SuccessRate>,
    pub active_tab: ActiveTab,
    /// Tilt in from 15°/-10° over the first 60 frames.
    pub animate: bool,
    pub background: Option<Background>,
    pub scale: f64,
    pub selected_ids: Vec<String>,
    pub downloaded_ids: Vec<String>,
    /// Per-file download ratio; files strictly between 0 and 1 show a progress ring.
    pub download_progress: BTreeMap<String, f64>,
    pub rotation_x: f64,
    pub rotation_y: f64,
    pub depth: f64,
    /// Select `l1..l3` between frames 30 and 60 and click at 30.
    pub scripted_selection: bool,
    pub is_done: bool,
}

impl Default for SubjectDrawerProps {
    fn default() -> Self {
        Self {
            subject: Subject::mandatory("Algoritmizace", "ALG"),
            groups: vec![FileGroup::other(hint::algoritmizace_files())],
            success_rate: Some(sample_success_rate()),
            active_tab: ActiveTab::Files,
            animate: false,
            background: None,
            scale: 1.0,
            selected_ids: Vec::new(),
            downloaded_ids: Vec::new(),
            download_progress: BTreeMap::new(),
            rotation_x: 0.0,
            rotation_y: 0.0,
            depth: 0.0,
            scripted_selection: false,
            is_done: false,
        }
    }
}

fn sample_success_rate() -> SuccessRate {
    let grades = [("A", 18), ("B", 22), ("C", 25), ("D", 18), ("E", 15), ("F", 14), ("FN", 8)];
    SuccessRate {
        stats: vec![SemesterStats {
            semester: "ZS 2024/2025".to_owned(),
            total_pass: 98,
            total_fail: 22,
            kind: Assessment::Exam,
            terms: vec![TermStats {
                grades: Some(grades.iter().map(|&(g, n)| (g.to_owned(), n)).collect()),
                credit_grades: None,
            }],
        }],
    }
}

impl Props for SubjectDrawerProps {
    fn validate(&self) -> ReelResult<()> {
        if self.subject.name.is_empty() {
            return Err(ReelError::validation("subject name cannot be empty"));
        }
        check_scale(self.scale)?;
        for (link, &p) in &self.download_progress {
            check_unit(&format!("download_progress[{link}]"), p)?;
        }
        for v in [self.rotation_x, self.rotation_y, self.depth] {
            if !v.is_finite() {
                return Err(ReelError::validation("rotation and depth must be finite"));
            }
        }
        if let Some(bg) = &self.background {
            bg.check()?;
        }
        Ok(())
    }
}

/// Per-frame selection state of the drawer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawerState {
    pub selected: Vec<String>,
    /// Downloaded links with the node-local frame their celebration starts, if any.
    pub downloaded: Vec<(String, Option<i64>)>,
    pub is_done: bool,
}

impl DrawerState {
    pub fn is_selected(&self, link: &str) -> bool {
        self.selected.iter().any(|s| s == link)
    }

    pub fn downloaded_since(&self, link: &str) -> Option<Option<i64>> {
        self.downloaded
            .iter()
            .find(|(l, _)| l == link)
            .map(|(_, since)| *since)
    }
}

/// The subject drawer card with optional tilt, backdrop and scripted selection.
#[derive(Clone, Debug, PartialEq)]
pub struct SubjectDrawer {
    props: SubjectDrawerProps,
}

impl SubjectDrawer {
    pub fn new(props: SubjectDrawerProps) -> ReelResult<Self> {
        props.validate()?;
        Ok(Self { props })
    }

    pub fn props(&self) -> &SubjectDrawerProps {
        &self.props
    }

    /// Selection state from props alone.
    pub fn state_at(&self, frame: i64) -> DrawerState {
        let p = &self.props;
        let selected = if p.scripted_selection && frame < 30 {
            Vec::new()
        } else if p.scripted_selection && frame < 60 {
            SCRIPTED_SELECTION.iter().map(|s| s.to_string()).collect()
        } else {
            p.selected_ids.clone()
        };
        DrawerState {
            selected,
            downloaded: p.downloaded_ids.iter().map(|l| (l.clone(), None)).collect(),
            is_done: p.is_done,
        }
    }

    /// Draw the drawer with an externally derived `state`.
    pub fn draw(&self, ctx: &FrameCtx<'_>, state: &DrawerState) -> ReelResult<Element> {
        let p = &self.props;
        let f = ctx.f();
        let entrance = ctx.spring(0, SpringConfig::damped(20.0));
        let (rot_x, rot_y) = if p.animate {
            (
                interpolate(f, &[0.0, 60.0], &[15.0, p.rotation_x], InterpolateOpts::clamp_right())?,
                interpolate(f, &[0.0, 60.0], &[-10.0, p.rotation_y], InterpolateOpts::clamp_right())?,
            )
        } else {
            (p.rotation_x, p.rotation_y)
        };
        let opacity = remap_clamped(entrance, &[0.0, 0.5], &[0.0, 1.0])?;
        let y = remap(entrance, &[0.0, 1.0], &[40.0, 0.0])?;
        let scale = p.scale * remap(entrance, &[0.0, 1.0], &[0.95, 1.0])?;
        let shadow_y = remap(rot_x, &[-45.0, 45.0], &[20.0, -20.0])?;
        let shadow_blur = rot_x.abs() + rot_y.abs() + 30.0;

        let body = match p.active_tab {
            ActiveTab::Files => file_list(ctx, &p.groups, state, &p.download_progress)?,
            ActiveTab::Stats => success_rate(ctx.f(), p.success_rate.as_ref())?,
            ActiveTab::Syllabus => Element::column(),
        };
        let card = Element::column()
            .key("drawer-card")
            .size(px(600.0), px(450.0))
            .background(CARD_BG)
            .radius(24.0)
            .border(Color::WHITE.with_alpha(0.05))
            .shadow(-rot_y / 2.0, shadow_y, shadow_blur, Color::BLACK.with_alpha(0.5))
            .family("Inter")
            .opacity(opacity)
            .scale(scale)
            .translate(0.0, y)
            .tilt(rot_x, rot_y, p.depth)
            .child(header(f, &p.subject, p.active_tab, state)?)
            .child(
                Element::column()
                    .key("drawer-body")
                    .background(Color::BLACK.with_alpha(0.1))
                    .child(body),
            );

        let mut root = Element::fill();
        if let Some(bg) = &p.background {
            root = root.child(bg.draw(ctx.frame())?);
        }
        Ok(root.child(card))
    }

    fn fonts() -> Vec<FontFace> {
        vec![FontFace::new("Inter", 700), FontFace::new("Inter", 900)]
    }
}

fn header(frame: f64, subject: &Subject, tab: ActiveTab, state: &DrawerState) -> ReelResult<Element> {
    let count = state.selected.len();
    let active = count > 0 || state.is_done;
    let pulse = if active {
        remap((frame / 10.0 * PI).sin(), &[-1.0, 1.0], &[1.0, 1.03])?
    } else {
        1.0
    };
    let label = if state.is_done {
        "Staženo".to_owned()
    } else if count > 0 {
        format!("Stáhnout ({count})")
    } else {
        "Stáhnout".to_owned()
    };
    let mut button = Element::row()
        .key("download-button")
        .radius(8.0)
        .scale(pulse)
        .child(Element::text(label).key("download-label").font(10.0, 700));
    button = if state.is_done {
        button
            .background(BRAND_GREEN)
            .color(Color::WHITE)
            .shadow(0.0, 0.0, 25.0, BRAND_GREEN.with_alpha(0.5))
    } else if active {
        button
            .background(BRAND_GREEN)
            .color(Color::WHITE)
            .shadow(0.0, 0.0, 15.0, BRAND_GREEN.with_alpha(0.3))
    } else {
        button
            .background(hex_rgb(0x374151))
            .color(Color::WHITE.with_alpha(0.2))
            .border(Color::WHITE.with_alpha(0.05))
    };

    let chips = Element::row()
        .child(
            Element::text(subject.status.as_str())
                .font(9.0, 700)
                .background(Color::BLACK.with_alpha(0.4))
                .color(Color::WHITE.with_alpha(0.4)),
        )
        .child(
            Element::text(format!("{} ({})", subject.completion, subject.credits))
                .font(9.0, 700)
                .background(BRAND_GREEN.with_alpha(0.1))
                .color(BRAND_GREEN),
        );
    let title = Element::row()
        .child(
            Element::text(subject.name.as_str())
                .key("subject-name")
                .font(20.0, 700)
                .color(Color::WHITE)
                .with_style(|s| s.line_height = Some(1.3)),
        )
        .child(button);
    let tabs = Element::row().key("tabs").children(ActiveTab::ALL.iter().map(|&(t, name)| {
        let el = Element::text(name).font(10.0, 700);
        if t == tab {
            el.key("tab-active").color(Color::WHITE).border(BRAND_GREEN)
        } else {
            el.color(Color::WHITE.with_alpha(0.2))
        }
    }));
    Ok(Element::column()
        .key("drawer-header")
        .background(CARD_BG)
        .child(chips)
        .child(title)
        .child(tabs))
}

impl Component for SubjectDrawer {
    fn timeline(&self) -> ReelResult<Sequence> {
        let root = Sequence::new("subject-drawer");
        if !self.props.scripted_selection {
            return Ok(root);
        }
        Ok(root.child(Sequence::sound(
            "click",
            30,
            AudioCue::new(AudioKey::Tick).volume(0.5),
        )))
    }

    fn render(&self, ctx: &FrameCtx<'_>) -> ReelResult<Element> {
        self.draw(ctx, &self.state_at(ctx.frame()))
    }

    fn required_fonts(&self) -> Vec<FontFace> {
        Self::fonts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositions::testing::render_at;
    use serde_json::json;

    fn label(el: &Element) -> String {
        el.find("download-label").map(Element::text_content).unwrap_or_default()
    }

    #[test]
    fn deserializes_snake_case_props() {
        let props: SubjectDrawerProps = serde_json::from_value(json!({
            "subject": {
                "name": "Statistika", "code": "STA", "credits": "6 KREDITŮ",
                "status": "POVINNÝ", "completion": "Zkouška"
            },
            "active_tab": "stats",
            "success_rate": { "stats": [{
                "semester": "LS 2024", "total_pass": 3, "total_fail": 1, "type": "credit",
                "terms": [{ "credit_grades": { "zap": 3, "nezap": 1 } }]
            }]}
        }))
        .unwrap();
        assert_eq!(props.active_tab, ActiveTab::Stats);
        assert!(props.groups.len() == 1 && props.scale == 1.0);
        assert!(SubjectDrawer::new(props).is_ok());
        assert!(serde_json::from_value::<SubjectDrawerProps>(json!({ "active_tab": "grades" })).is_err());
    }

    #[test]
    fn rejects_empty_subject_name_and_bad_progress() {
        let mut props = SubjectDrawerProps::default();
        props.subject.name.clear();
        assert!(SubjectDrawer::new(props).is_err());

        let mut props = SubjectDrawerProps::default();
        props.download_progress.insert("c3".to_owned(), 1.5);
        assert!(SubjectDrawer::new(props).is_err());
    }

    #[test]
    fn scripted_selection_windows() {
        let drawer = SubjectDrawer::new(SubjectDrawerProps {
            scripted_selection: true,
            selected_ids: vec!["c3".to_owned()],
            ..SubjectDrawerProps::default()
        })
        .unwrap();
        assert!(drawer.state_at(29).selected.is_empty());
        assert_eq!(drawer.state_at(30).selected, ["l1", "l2", "l3"]);
        assert_eq!(drawer.state_at(60).selected, ["c3"]);
        assert_eq!(label(&render_at(&drawer, 150, 45).unwrap()), "Stáhnout (3)");
        assert_eq!(label(&render_at(&drawer, 150, 10).unwrap()), "Stáhnout");

        let seq = drawer.timeline().unwrap();
        assert_eq!(seq.children[0].from, 30);
    }

    #[test]
    fn tilt_settles_to_static_rotation() {
        let drawer = SubjectDrawer::new(SubjectDrawerProps {
            animate: true,
            rotation_x: 25.0,
            rotation_y: -15.0,
            depth: 50.0,
            ..SubjectDrawerProps::default()
        })
        .unwrap();
        let first = render_at(&drawer, 150, 0).unwrap();
        let card = first.find("drawer-card").unwrap();
        assert_eq!(card.style.rotate_x_deg, Some(15.0));
        assert_eq!(card.style.rotate_y_deg, Some(-10.0));
        assert_eq!(card.style.opacity, Some(0.0));
        assert_eq!(card.style.scale, Some(0.95));

        let late = render_at(&drawer, 150, 100).unwrap();
        let card = late.find("drawer-card").unwrap();
        assert_eq!(card.style.rotate_x_deg, Some(25.0));
        assert_eq!(card.style.rotate_y_deg, Some(-15.0));
        assert_eq!(card.style.depth_px, Some(50.0));
        assert_eq!(card.style.opacity, Some(1.0));
    }

    #[test]
    fn done_state_pulses_the_button() {
        let drawer = SubjectDrawer::new(SubjectDrawerProps {
            is_done: true,
            ..SubjectDrawerProps::default()
        })
        .unwrap();
        let el = render_at(&drawer, 150, 3).unwrap();
        assert_eq!(label(&el), "Staženo");
        let pulse = el.find("download-button").unwrap().style.scale.unwrap();
        assert!((1.0..=1.03).contains(&pulse));
        assert_eq!(
            el.find("tab-active").map(Element::text_content).as_deref(),
            Some("Soubory")
        );
    }
}
