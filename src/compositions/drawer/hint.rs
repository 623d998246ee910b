use crate::audio::cue::{AudioCue, AudioKey};
use crate::compositions::background::Stars;
use crate::compositions::check_scale;
use crate::compositions::remap;
use crate::compositions::text::{ProfessionalText, TextPreset};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::element::{Element, pct};
use crate::scene::script::{Script, StateDelta, derive_scene_state};
use crate::session::component::{Component, FrameCtx, Props};
use crate::session::gate::FontFace;
use crate::timeline::sequence::Sequence;

use super::{ActiveTab, DrawerState, FileEntry, FileGroup, Subject, SubjectDrawer, SubjectDrawerProps};

/// Files of the Algoritmizace course as listed in the hint.
pub(super) fn algoritmizace_files() -> Vec<FileEntry> {
    vec![
        FileEntry::new("c3", "Cvičení 3 Programování sekvence a větvení"),
        FileEntry::new("c4", "Cvičení 4 -- cykly elementární algoritmy"),
        FileEntry::new("h1", "Harmonogram výuky a podmínky ukončení"),
        FileEntry::new("p1", "Pracovní listy 1 a 2 -- Vývojové diagramy (1)")
            .comment("Inspirace pro první cvičení"),
        FileEntry::new("p2", "Pracovní listy 1 a 2 -- Vývojové diagramy (2)"),
    ]
}

const PICKED: [&str; 3] = ["c3", "c4", "h1"];
const SELECT_AT: i64 = 30;
const DOWNLOAD_AT: [i64; 3] = [50, 70, 90];
const DONE_AT: i64 = 100;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FilesHintProps {
    pub subject: Subject,
    pub animate: bool,
    pub rotation_x: f64,
    pub rotation_y: f64,
    pub depth: f64,
    pub scale: f64,
}

impl Default for FilesHintProps {
    fn default() -> Self {
        Self {
            subject: Subject::mandatory("Algoritmizace", "ALG"),
            animate: false,
            rotation_x: 0.0,
            rotation_y: 0.0,
            depth: 0.0,
            scale: 1.0,
        }
    }
}

impl Props for FilesHintProps {
    fn validate(&self) -> ReelResult<()> {
        check_scale(self.scale)?;
        if ![self.rotation_x, self.rotation_y, self.depth]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(ReelError::validation("rotation and depth must be finite"));
        }
        Ok(())
    }
}

/// Scripted drawer demo: pick three files, download them one by one, finish.
#[derive(Clone, Debug, PartialEq)]
pub struct FilesHint {
    drawer: SubjectDrawer,
    script: Script,
}

impl FilesHint {
    pub fn new(props: FilesHintProps) -> ReelResult<Self> {
        props.validate()?;
        let drawer = SubjectDrawer::new(SubjectDrawerProps {
            subject: props.subject,
            groups: vec![FileGroup::other(algoritmizace_files())],
            success_rate: None,
            active_tab: ActiveTab::Files,
            animate: props.animate,
            scale: props.scale,
            rotation_x: props.rotation_x,
            rotation_y: props.rotation_y,
            depth: props.depth,
            ..SubjectDrawerProps::default()
        })?;
        let mut script = Script::new();
        for id in PICKED {
            script = script.at(SELECT_AT, StateDelta::insert("selected", id));
        }
        for (id, at) in PICKED.into_iter().zip(DOWNLOAD_AT) {
            script = script.at(at, StateDelta::insert("downloaded", id));
        }
        script = script.at(DONE_AT, StateDelta::flag("done", true));
        Ok(Self { drawer, script })
    }

    /// Drawer state at node-local `frame`.
    pub fn state_at(&self, frame: i64) -> DrawerState {
        let snap = derive_scene_state(frame, &self.script);
        DrawerState {
            selected: snap.set("selected").to_vec(),
            downloaded: snap
                .set("downloaded")
                .iter()
                .map(|id| (id.clone(), self.script.joined_at(frame, "downloaded", id)))
                .collect(),
            is_done: snap.flag("done"),
        }
    }
}

impl Component for FilesHint {
    fn timeline(&self) -> ReelResult<Sequence> {
        let ping = || AudioCue::new(AudioKey::Success).volume(0.3);
        Ok(Sequence::new("files-hint")
            .child(Sequence::sound(
                "select",
                SELECT_AT,
                AudioCue::new(AudioKey::ToggleOn).volume(0.4),
            ))
            .child(Sequence::sound("ping-1", 80, ping()))
            .child(Sequence::sound("ping-2", 100, ping()))
            .child(Sequence::sound("ping-3", 120, ping())))
    }

    fn render(&self, ctx: &FrameCtx<'_>) -> ReelResult<Element> {
        self.drawer.draw(ctx, &self.state_at(ctx.frame()))
    }

    fn required_fonts(&self) -> Vec<FontFace> {
        SubjectDrawer::fonts()
    }
}

const SHOWCASE_INTRO: i64 = 60;

/// Headline intro, then the drawer under a context label, with a slow zoom.
#[derive(Clone, Debug, PartialEq)]
pub struct SubjectDrawerShowcase {
    headline: ProfessionalText,
    label: ProfessionalText,
    drawer: SubjectDrawer,
    stars: Stars,
}

impl SubjectDrawerShowcase {
    pub fn new() -> ReelResult<Self> {
        let files = [
            "Cvičení 3 Programování sekvence a větvení",
            "Cvičení 4 -- cykly elementární algoritmy",
            "Harmonogram výuky a podmínky ukončení",
            "Pracovní listy 1 a 2 -- Vývojové diagramy (1)",
            "Pracovní listy 1 a 2 -- Vývojové diagramy (2)",
            "Pracovní list 5 -- Podprogramy",
            "Pracovní list 6 -- Pole a záznamy",
            "Pracovní list 7 -- Matice",
        ]
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let file = FileEntry::new(&format!("f{}", i + 1), name);
            if i == 3 || i == 4 {
                file.comment("Inspirace pro první cvičení")
            } else {
                file
            }
        })
        .collect();
        let mut subject = Subject::mandatory("Algoritmizace", "INP");
        subject.credits = "6 Kreditů".to_owned();
        subject.status = "Povinný".to_owned();
        Ok(Self {
            headline: ProfessionalText::preset(TextPreset::Headline, "SPRÁVA STUDIA: *PŘEHLEDNĚ*")?,
            label: ProfessionalText::preset(TextPreset::Context, "STANDARDNÍ ROZHRANÍ")?,
            drawer: SubjectDrawer::new(SubjectDrawerProps {
                subject,
                groups: vec![FileGroup::other(files)],
                animate: true,
                ..SubjectDrawerProps::default()
            })?,
            stars: Stars::new(400),
        })
    }
}

impl Component for SubjectDrawerShowcase {
    fn timeline(&self) -> ReelResult<Sequence> {
        Ok(Sequence::new("showcase")
            .child(Sequence::new("intro").lasting(SHOWCASE_INTRO))
            .child(Sequence::new("drawer").at(SHOWCASE_INTRO)))
    }

    fn render(&self, ctx: &FrameCtx<'_>) -> ReelResult<Element> {
        let zoom = remap(ctx.f(), &[0.0, ctx.duration() as f64], &[1.0, 1.1])?;
        let mut root = Element::fill()
            .scale(zoom)
            .child(self.stars.render(ctx.frame())?.key("background"));
        if let Some(intro) = ctx.sequence("intro")? {
            root = root.child(Element::fill().key("intro").child(self.headline.draw(&intro)?));
        }
        if let Some(scene) = ctx.sequence("drawer")? {
            root = root.child(
                Element::fill()
                    .key("scene")
                    .child(
                        Element::fill()
                            .at(pct(0.0), pct(7.0))
                            .child(self.label.draw(&scene)?),
                    )
                    .child(self.drawer.render(&scene)?),
            );
        }
        Ok(root)
    }

    fn required_fonts(&self) -> Vec<FontFace> {
        let mut fonts = SubjectDrawer::fonts();
        fonts.extend(self.headline.required_fonts());
        fonts.extend(self.label.required_fonts());
        fonts
    }
}
