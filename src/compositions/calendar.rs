use std::fmt;
use std::str::FromStr;

use crate::animation::color::Color;
use crate::animation::spring::SpringConfig;
use crate::compositions::background::{Stars, hex_rgb};
use crate::compositions::{BRAND_GREEN, remap_clamped};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::element::{Element, pct, px};
use crate::session::component::{Component, FrameCtx, Props};
use crate::session::gate::FontFace;
use crate::timeline::sequence::Sequence;

/// Default visible window of a full timetable day.
pub const DEFAULT_START_HOUR: u8 = 7;
pub const DEFAULT_END_HOUR: u8 = 20;

const START_DELAY: i64 = 15;
const DELAY_PER_ITEM: i64 = 15;

const PANEL_BG: Color = hex_rgb(0x1f2937);
const SIDEBAR_BG: Color = hex_rgb(0x111827);
const EXAM_RED: Color = hex_rgb(0xdc2626);

/// Wall-clock time of day, `HH:MM` on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> ReelResult<Self> {
        if hour > 23 || minute > 59 {
            return Err(ReelError::validation(format!(
                "invalid time of day {hour:02}:{minute:02}"
            )));
        }
        Ok(Self { hour, minute })
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ReelError::validation(format!("expected HH:MM, got \"{s}\""));
        let (h, m) = s.split_once(':').ok_or_else(bad)?;
        let hour = h.trim().parse::<u8>().map_err(|_| bad())?;
        let minute = m.trim().parse::<u8>().map_err(|_| bad())?;
        Self::new(hour, minute)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl serde::Serialize for ClockTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for ClockTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LessonKind {
    Exam,
    Seminar,
    Lecture,
}

impl LessonKind {
    fn palette(self) -> (Color, Color) {
        match self {
            Self::Exam => (hex_rgb(0xfef2f2).with_alpha(0.85), EXAM_RED),
            Self::Seminar => (hex_rgb(0xf0f7ff).with_alpha(0.85), hex_rgb(0x00548f)),
            Self::Lecture => (hex_rgb(0xf3faea).with_alpha(0.85), BRAND_GREEN),
        }
    }
}

/// One timetable block.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Lesson {
    pub id: String,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub course_name: String,
    #[serde(default)]
    pub course_code: String,
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub is_seminar: bool,
    #[serde(default)]
    pub is_exam: bool,
}

impl Lesson {
    pub fn kind(&self) -> LessonKind {
        if self.is_exam {
            LessonKind::Exam
        } else if self.is_seminar {
            LessonKind::Seminar
        } else {
            LessonKind::Lecture
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end_time.minutes().saturating_sub(self.start_time.minutes())
    }

    /// Card title: exams show only the part after the last `" - "`.
    pub fn title(&self) -> &str {
        if self.is_exam {
            exam_section_name(&self.course_name)
        } else {
            &self.course_name
        }
    }
}

/// Last `" - "`-separated part of an exam name, or the whole name.
pub fn exam_section_name(course_name: &str) -> &str {
    course_name
        .rsplit_once(" - ")
        .map_or(course_name, |(_, section)| section)
}

/// Lessons assigned to side-by-side rows so overlapping blocks never share one.
#[derive(Clone, Debug, PartialEq)]
pub struct OrganizedLessons<'a> {
    pub lessons: Vec<(&'a Lesson, usize)>,
    /// At least 1.
    pub total_rows: usize,
}

/// Greedy row packing: by start time, each lesson takes the first row that is already free.
pub fn organize_lessons(lessons: &[Lesson]) -> OrganizedLessons<'_> {
    if lessons.is_empty() {
        return OrganizedLessons {
            lessons: Vec::new(),
            total_rows: 1,
        };
    }
    let mut sorted: Vec<&Lesson> = lessons.iter().collect();
    sorted.sort_by_key(|l| l.start_time.minutes());

    let mut row_ends: Vec<u32> = Vec::new();
    let mut placed = Vec::with_capacity(sorted.len());
    for lesson in sorted {
        let (start, end) = (lesson.start_time.minutes(), lesson.end_time.minutes());
        let row = match row_ends.iter().position(|&e| e <= start) {
            Some(i) => {
                row_ends[i] = end;
                i
            }
            None => {
                row_ends.push(end);
                row_ends.len() - 1
            }
        };
        placed.push((lesson, row));
    }
    OrganizedLessons {
        lessons: placed,
        total_rows: row_ends.len(),
    }
}

/// Vertical position of `time` within `[start_hour, end_hour)` in percent.
pub fn time_to_percent(time: ClockTime, start_hour: u8, end_hour: u8) -> f64 {
    let total = f64::from(end_hour) - f64::from(start_hour);
    let from_start = (f64::from(time.hour) - f64::from(start_hour)) * 60.0 + f64::from(time.minute);
    from_start / (total * 60.0) * 100.0
}

/// `(top, height)` in percent for a block.
pub fn event_span(start: ClockTime, end: ClockTime, start_hour: u8, end_hour: u8) -> (f64, f64) {
    let top = time_to_percent(start, start_hour, end_hour);
    (top, time_to_percent(end, start_hour, end_hour) - top)
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WeeklyCalendarProps {
    pub lessons: Vec<Lesson>,
    pub start_hour: u8,
    pub end_hour: u8,
    pub day_number: u8,
    pub day_name: String,
    pub animated: bool,
    pub star_count: u32,
}

impl Default for WeeklyCalendarProps {
    fn default() -> Self {
        Self {
            lessons: sample_lessons(),
            start_hour: 8,
            end_hour: 13,
            day_number: 8,
            day_name: "Středa".to_owned(),
            animated: true,
            star_count: 500,
        }
    }
}

fn sample_lessons() -> Vec<Lesson> {
    vec![
        Lesson {
            id: "algoritmizace".to_owned(),
            start_time: ClockTime { hour: 9, minute: 0 },
            end_time: ClockTime { hour: 10, minute: 0 },
            course_name: "Přednáška: Algoritmizace".to_owned(),
            course_code: "ALG".to_owned(),
            room: "Q1.1".to_owned(),
            is_seminar: false,
            is_exam: false,
        },
        Lesson {
            id: "databaze".to_owned(),
            start_time: ClockTime { hour: 11, minute: 0 },
            end_time: ClockTime { hour: 12, minute: 0 },
            course_name: "Zkouška: Databáze".to_owned(),
            course_code: "DB".to_owned(),
            room: "Aula".to_owned(),
            is_seminar: false,
            is_exam: true,
        },
    ]
}

impl Props for WeeklyCalendarProps {
    fn validate(&self) -> ReelResult<()> {
        if self.start_hour >= self.end_hour || self.end_hour > 24 {
            return Err(ReelError::validation(format!(
                "hour window {}..{} is empty or exceeds a day",
                self.start_hour, self.end_hour
            )));
        }
        for l in &self.lessons {
            if l.end_time <= l.start_time {
                return Err(ReelError::validation(format!(
                    "lesson \"{}\" ends at {} before it starts at {}",
                    l.id, l.end_time, l.start_time
                )));
            }
        }
        Ok(())
    }
}

/// Single-day timetable with lessons springing in one after another.
#[derive(Clone, Debug, PartialEq)]
pub struct WeeklyCalendar {
    props: WeeklyCalendarProps,
    stars: Stars,
}

impl WeeklyCalendar {
    pub fn new(props: WeeklyCalendarProps) -> ReelResult<Self> {
        props.validate()?;
        let stars = Stars::new(props.star_count);
        Ok(Self { props, stars })
    }

    fn entrance(ctx: &FrameCtx<'_>, index: usize) -> f64 {
        ctx.spring(
            START_DELAY + index as i64 * DELAY_PER_ITEM,
            SpringConfig::new(15.0, 120.0, 0.8),
        )
    }

    fn day(&self, ctx: &FrameCtx<'_>) -> ReelResult<Element> {
        let p = &self.props;
        let organized = organize_lessons(&p.lessons);
        let rows = organized.total_rows as f64;
        let mut day = Element::fill()
            .key("day")
            .background(Color::WHITE.with_alpha(0.05));
        for (index, &(lesson, row)) in organized.lessons.iter().enumerate() {
            let (top, height) = event_span(lesson.start_time, lesson.end_time, p.start_hour, p.end_hour);
            let (left, width) = if organized.total_rows > 1 {
                (row as f64 / rows * 100.0, 100.0 / rows)
            } else {
                (0.0, 100.0)
            };
            let entrance = if p.animated {
                Self::entrance(ctx, index)
            } else {
                1.0
            };
            day = day.child(
                event_card(lesson)
                    .at(pct(left), pct(top))
                    .size(pct(width), pct(height))
                    .scale(entrance)
                    .opacity(remap_clamped(entrance, &[0.0, 1.0], &[0.0, 1.0])?),
            );
        }
        Ok(day)
    }
}

fn event_card(lesson: &Lesson) -> Element {
    let (fill, accent) = lesson.kind().palette();
    let ink = hex_rgb(0x111827);
    let mut card = Element::column()
        .key(format!("lesson-{}", lesson.id))
        .background(fill)
        .border(accent)
        .radius(4.0)
        .family("Inter")
        .child(Element::text(lesson.title()).font(14.0, 600).color(ink));
    if lesson.duration_minutes() >= 60 {
        if lesson.is_exam {
            let course = lesson
                .course_name
                .split(" - ")
                .next()
                .unwrap_or(&lesson.course_name);
            card = card.child(Element::text(course).font(12.0, 500).color(EXAM_RED));
        }
        let mut footer = Element::row();
        if !lesson.room.is_empty() {
            footer = footer.child(
                Element::text(lesson.room.as_str())
                    .key(format!("room-{}", lesson.id))
                    .font(14.0, 400)
                    .color(hex_rgb(0x4b5563)),
            );
        }
        card = card.child(footer.child(
            Element::text(format!("{} - {}", lesson.start_time, lesson.end_time))
                .font(14.0, 400)
                .color(hex_rgb(0x6b7280)),
        ));
    }
    card
}

impl Component for WeeklyCalendar {
    fn timeline(&self) -> ReelResult<Sequence> {
        Ok(Sequence::new("weekly-calendar"))
    }

    fn render(&self, ctx: &FrameCtx<'_>) -> ReelResult<Element> {
        let p = &self.props;
        let hours = p.end_hour - p.start_hour;
        let header = Element::row()
            .key("calendar-header")
            .height(px(56.0))
            .background(SIDEBAR_BG.with_alpha(0.3))
            .child(
                Element::text(p.day_number.to_string())
                    .font(20.0, 700)
                    .color(Color::WHITE),
            )
            .child(
                Element::text(p.day_name.to_uppercase())
                    .font(13.0, 500)
                    .color(hex_rgb(0xf3f4f6))
                    .with_style(|s| s.letter_spacing_em = Some(0.05)),
            );
        let sidebar = Element::column()
            .key("hours")
            .width(px(48.0))
            .background(SIDEBAR_BG)
            .children((0..hours).map(|i| {
                Element::text(format!("{}:00", p.start_hour + i))
                    .at(pct(0.0), pct(f64::from(i) / f64::from(hours) * 100.0))
                    .font(10.0, 500)
                    .color(hex_rgb(0x9ca3af))
            }));
        let grid = Element::fill()
            .background(PANEL_BG)
            .children((0..=hours).map(|i| {
                Element::block()
                    .at(pct(0.0), pct(f64::from(i) / f64::from(hours) * 100.0))
                    .size(pct(100.0), px(1.0))
                    .background(SIDEBAR_BG)
            }))
            .child(self.day(ctx)?);

        let panel = Element::column()
            .key("calendar")
            .size(px(320.0), px(480.0))
            .background(PANEL_BG)
            .radius(12.0)
            .border(Color::WHITE.with_alpha(0.05))
            .shadow(0.0, 20.0, 60.0, Color::BLACK.with_alpha(0.5))
            .family("Inter")
            .child(header)
            .child(Element::row().child(sidebar).child(grid));
        Ok(Element::fill()
            .child(self.stars.render(ctx.frame())?.key("background"))
            .child(panel))
    }

    fn required_fonts(&self) -> Vec<FontFace> {
        [400, 500, 600, 700]
            .into_iter()
            .map(|w| FontFace::new("Inter", w))
            .collect()
    }
}
