//! Narrative promo cuts: problem, question, hero demo, branded end slide.

use crate::animation::color::Color;
use crate::audio::cue::{AudioCue, AudioKey};
use crate::compositions::background::{Stars, hex_rgb};
use crate::compositions::calendar::{WeeklyCalendar, WeeklyCalendarProps};
use crate::compositions::drawer::{FilesHint, FilesHintProps, Subject};
use crate::compositions::end_slide::BrandedEndSlide;
use crate::compositions::outlook_sync::OutlookSyncHint;
use crate::compositions::text::{ProfessionalText, TextPreset};
use crate::foundation::error::ReelResult;
use crate::render::element::Element;
use crate::session::component::{Component, FrameCtx};
use crate::session::gate::FontFace;
use crate::timeline::sequence::{Sequence, Series};

const BACKDROP: Color = hex_rgb(0x0a0c10);
const STAR_COUNT: u32 = 500;

/// One act: a component played for `frames` frames.
struct Act {
    name: &'static str,
    frames: i64,
    body: Box<dyn Component>,
    opening: Option<AudioCue>,
}

impl Act {
    fn new(name: &'static str, frames: i64, body: impl Component + 'static) -> Self {
        Self {
            name,
            frames,
            body: Box::new(body),
            opening: None,
        }
    }

    fn opening(mut self, cue: AudioCue) -> Self {
        self.opening = Some(cue);
        self
    }
}

/// Acts played back to back over a star field.
///
/// Each act keeps its own timeline, so its audio cues land inside the act's window.
pub struct Introduction {
    name: &'static str,
    stars: Stars,
    acts: Vec<Act>,
}

impl Introduction {
    /// Study-portal cut: three clicks to download course files.
    pub fn reis() -> ReelResult<Self> {
        let hero = FilesHint::new(FilesHintProps {
            subject: Subject::mandatory("Statistika", "STA"),
            animate: true,
            rotation_x: 25.0,
            rotation_y: -15.0,
            depth: 50.0,
            scale: 2.0,
        })?;
        Ok(Self::with_acts(
            "reis-introduction",
            vec![
                Act::new(
                    "problem",
                    75,
                    ProfessionalText::preset(TextPreset::Problem, "Studium by mělo být jednoduché")?,
                )
                .opening(AudioCue::new(AudioKey::IntroSwoosh).volume(0.6)),
                Act::new(
                    "question",
                    45,
                    ProfessionalText::preset(TextPreset::Question, "Co kdyby stačily tři kliky?")?,
                ),
                Act::new("hero", 240, hero),
                end_act()?,
            ],
        ))
    }

    /// Calendar cut: sync switch, then the filled week.
    pub fn outlook_sync() -> ReelResult<Self> {
        Ok(Self::with_acts(
            "outlook-sync-introduction",
            vec![
                Act::new(
                    "problem",
                    75,
                    ProfessionalText::preset(TextPreset::Problem, "Už tě nebaví opisovat rozvrh?")?,
                )
                .opening(AudioCue::new(AudioKey::IntroSwoosh).volume(0.6)),
                Act::new(
                    "question",
                    45,
                    ProfessionalText::preset(
                        TextPreset::Question,
                        "Co kdyby se tvůj kalendář plnil sám?",
                    )?,
                ),
                Act::new("hero", 120, OutlookSyncHint::quick(2.0)?),
                Act::new(
                    "week",
                    120,
                    WeeklyCalendar::new(WeeklyCalendarProps::default())?,
                ),
                end_act()?,
            ],
        ))
    }

    fn with_acts(name: &'static str, acts: Vec<Act>) -> Self {
        Self {
            name,
            stars: Stars::new(STAR_COUNT),
            acts,
        }
    }

    /// Sum of every act's length.
    pub fn total_frames(&self) -> u64 {
        self.acts.iter().map(|a| a.frames as u64).sum()
    }

    /// Act names in playback order.
    pub fn act_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.acts.iter().map(|a| a.name)
    }
}

fn end_act() -> ReelResult<Act> {
    Ok(Act::new("end", 90, BrandedEndSlide::with_cta(1.5, "Link v biu")?)
        .opening(AudioCue::new(AudioKey::OutroChime).volume(0.6)))
}

impl Component for Introduction {
    fn timeline(&self) -> ReelResult<Sequence> {
        let mut series = Series::new();
        for act in &self.acts {
            let mut seq = act.body.timeline()?.named(act.name).lasting(act.frames);
            if let Some(cue) = &act.opening {
                seq = seq.cue(cue.clone());
            }
            series = series.then(seq);
        }
        series.attach(Sequence::new(self.name))
    }

    fn render(&self, ctx: &FrameCtx<'_>) -> ReelResult<Element> {
        let mut root = Element::fill()
            .background(BACKDROP)
            .child(self.stars.render(ctx.frame())?.key("background"));
        for act in &self.acts {
            if let Some(local) = ctx.sequence(act.name)? {
                root = root.child(Element::fill().key(act.name).child(act.body.render(&local)?));
            }
        }
        Ok(root)
    }

    fn required_fonts(&self) -> Vec<FontFace> {
        let mut fonts: Vec<FontFace> = self
            .acts
            .iter()
            .flat_map(|a| a.body.required_fonts())
            .collect();
        fonts.sort();
        fonts.dedup();
        fonts
    }

    fn duration_override(&self) -> Option<u64> {
        Some(self.total_frames())
    }
}
