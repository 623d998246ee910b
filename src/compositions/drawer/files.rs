use std::collections::BTreeMap;

use crate::animation::color::Color;
use crate::animation::interpolate::{InterpolateOpts, interpolate};
use crate::animation::spring::{SpringConfig, spring_value};
use crate::compositions::background::hex_rgb;
use crate::compositions::{BRAND_GREEN, remap_clamped};
use crate::foundation::error::ReelResult;
use crate::render::element::{Element, pct, px};
use crate::session::component::FrameCtx;

use super::{DrawerState, FileEntry, FileGroup};

const DOWNLOADED: Color = hex_rgb(0x10b981);

#[derive(Clone, Copy, Debug, PartialEq)]
enum RowState {
    Idle,
    Selected,
    Downloading(f64),
    Downloaded,
}

impl RowState {
    fn accent(self) -> Option<Color> {
        match self {
            Self::Idle => None,
            Self::Selected | Self::Downloading(_) => Some(BRAND_GREEN),
            Self::Downloaded => Some(DOWNLOADED),
        }
    }
}

/// Flat list of every file across `groups`, fading in two frames apart.
pub fn file_list(
    ctx: &FrameCtx<'_>,
    groups: &[FileGroup],
    state: &DrawerState,
    download_progress: &BTreeMap<String, f64>,
) -> ReelResult<Element> {
    let files = groups.iter().flat_map(|g| g.files.iter());
    let mut list = Element::column().key("file-list");
    for (i, file) in files.enumerate() {
        let progress = download_progress.get(&file.link).copied().unwrap_or(0.0);
        let since = state.downloaded_since(&file.link);
        let row_state = if since.is_some() {
            RowState::Downloaded
        } else if progress > 0.0 && progress < 1.0 {
            RowState::Downloading(progress)
        } else if state.is_selected(&file.link) {
            RowState::Selected
        } else {
            RowState::Idle
        };
        list = list.child(file_row(ctx, i, file, row_state, since.flatten())?);
    }
    Ok(list)
}

/// Scale and glow of a row whose download landed at `start`.
fn celebration(ctx: &FrameCtx<'_>, start: Option<i64>) -> ReelResult<(f64, f64)> {
    let Some(start) = start.filter(|&s| ctx.frame() >= s) else {
        return Ok((1.0, 0.0));
    };
    let s = spring_value(
        (ctx.frame() - start) as f64,
        ctx.fps(),
        &SpringConfig::damped(10.0).with_mass(0.3),
    );
    let scale = interpolate(s, &[0.0, 1.0], &[1.0, 1.05], InterpolateOpts::clamp_right())?;
    let glow = interpolate(
        s,
        &[0.0, 0.5, 1.0],
        &[0.0, 1.0, 0.3],
        InterpolateOpts::clamp_right(),
    )?;
    Ok((scale, glow))
}

fn file_row(
    ctx: &FrameCtx<'_>,
    index: usize,
    file: &FileEntry,
    state: RowState,
    celebrate_from: Option<i64>,
) -> ReelResult<Element> {
    let delay = index as f64 * 2.0;
    let opacity = remap_clamped(ctx.f(), &[delay, delay + 10.0], &[0.0, 1.0])?;
    let (scale, glow) = if state == RowState::Downloaded {
        celebration(ctx, celebrate_from)?
    } else {
        (1.0, 0.0)
    };

    let marker = match state {
        RowState::Downloading(p) => Element::block()
            .key(format!("progress-{}", file.link))
            .size(px(16.0), px(16.0))
            .radius(8.0)
            .border(Color::WHITE.with_alpha(0.1))
            .rotate(-90.0)
            .child(
                Element::block()
                    .width(pct(p * 100.0))
                    .height(pct(100.0))
                    .background(BRAND_GREEN),
            ),
        _ => {
            let mut check = Element::block()
                .key(format!("check-{}", file.link))
                .size(px(16.0), px(16.0))
                .radius(4.0)
                .border(state.accent().unwrap_or(Color::WHITE.with_alpha(0.1)));
            if let Some(c) = state.accent() {
                check = check.background(c);
            }
            if state == RowState::Downloaded {
                check = check.shadow(0.0, 0.0, 20.0 * glow, DOWNLOADED.with_alpha(glow));
            }
            check
        }
    };

    let name_color = state.accent().unwrap_or(Color::WHITE.with_alpha(0.8));
    let mut label = Element::column().child(
        Element::text(file.file_name.as_str())
            .font(11.0, 700)
            .color(name_color),
    );
    if let Some(comment) = &file.file_comment {
        label = label.child(
            Element::text(comment.as_str())
                .font(9.0, 700)
                .color(Color::WHITE.with_alpha(0.2)),
        );
    }

    let mut row = Element::row()
        .key(format!("file-{}", file.link))
        .radius(8.0)
        .opacity(opacity)
        .scale(scale)
        .child(marker)
        .child(label);
    if let Some(c) = state.accent() {
        row = row.background(c.with_alpha(0.05)).border(c.with_alpha(0.1));
    }
    Ok(row)
}
