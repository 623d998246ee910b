//! Built-in compositions of the reIS promo campaign.

pub mod background;
pub mod calendar;
pub mod drawer;
pub mod end_slide;
pub mod intro;
pub mod outlook_sync;
pub mod spolky;
pub mod text;
pub mod welcome;

use crate::animation::color::Color;
use crate::animation::interpolate::{InterpolateOpts, interpolate};
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::session::component::{Component, parse_props};
use crate::session::registry::{Composition, Factory, Registry};

/// MENDELU brand green, `#79be15`.
pub const BRAND_GREEN: Color = background::hex_rgb(0x79be15);

/// Linear remap that keeps extending past both ends.
pub(crate) fn remap(x: f64, input: &[f64], output: &[f64]) -> ReelResult<f64> {
    interpolate(x, input, output, InterpolateOpts::default())
}

/// Linear remap held at the boundary outputs.
pub(crate) fn remap_clamped(x: f64, input: &[f64], output: &[f64]) -> ReelResult<f64> {
    interpolate(x, input, output, InterpolateOpts::clamped())
}

pub(crate) fn check_scale(scale: f64) -> ReelResult<()> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(ReelError::validation(format!(
            "scale must be finite and > 0, got {scale}"
        )));
    }
    Ok(())
}

fn boxed<C: Component + 'static>(c: ReelResult<C>) -> ReelResult<Box<dyn Component>> {
    Ok(Box::new(c?))
}

/// Register every built-in composition.
pub fn register_all(reg: &mut Registry) {
    let entries: [(Composition, Factory); 12] = [
        (
            Composition {
                id: "Welcome",
                canvas: Canvas::HD,
                fps: Fps::integral(30),
                duration: 60,
            },
            |v| boxed(parse_props(v).and_then(welcome::Welcome::new)),
        ),
        (Composition::full_hd("OutlookSync", 90), |v| {
            boxed(parse_props(v).and_then(outlook_sync::OutlookSync::new))
        }),
        (Composition::full_hd("OutlookSyncHint", 240), |v| {
            boxed(parse_props(v).and_then(outlook_sync::OutlookSyncHint::new))
        }),
        (Composition::full_hd("FilesHint", 240), |v| {
            boxed(parse_props(v).and_then(drawer::FilesHint::new))
        }),
        (Composition::full_hd("SubjectDrawer", 150), |v| {
            boxed(parse_props(v).and_then(drawer::SubjectDrawer::new))
        }),
        (Composition::full_hd("SubjectDrawerShowcase", 240), |_| {
            boxed(drawer::SubjectDrawerShowcase::new())
        }),
        (Composition::full_hd("BrandedEndSlide", 90), |v| {
            boxed(parse_props(v).and_then(end_slide::BrandedEndSlide::new))
        }),
        (Composition::full_hd("ProfessionalText", 90), |v| {
            boxed(parse_props(v).and_then(text::ProfessionalText::new))
        }),
        (Composition::full_hd("WeeklyCalendar", 120), |v| {
            boxed(parse_props(v).and_then(calendar::WeeklyCalendar::new))
        }),
        (Composition::full_hd("Spolky", 240), |v| {
            boxed(parse_props(v).and_then(spolky::Spolky::new))
        }),
        (Composition::full_hd("ReisIntroduction", 450), |_| {
            boxed(intro::Introduction::reis())
        }),
        (Composition::full_hd("OutlookSyncIntroduction", 450), |_| {
            boxed(intro::Introduction::outlook_sync())
        }),
    ];
    for (meta, factory) in entries {
        let id = meta.id;
        if let Err(err) = reg.register(meta, factory) {
            tracing::warn!(id, %err, "skipping built-in composition");
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::foundation::core::{Canvas, FrameIndex, Fps};
    use crate::foundation::error::ReelResult;
    use crate::render::element::Element;
    use crate::session::component::{Component, FrameCtx};
    use crate::timeline::resolve::Timeline;

    /// Render `c` at global `frame` of a `total`-frame 1080p30 timeline.
    pub fn render_at(c: &dyn Component, total: u64, frame: u64) -> ReelResult<Element> {
        let timeline = Timeline::new(c.timeline()?, total)?;
        let ctxs = timeline.resolve(FrameIndex(frame));
        let ctx = FrameCtx::root(&timeline, &ctxs, Fps::integral(30), Canvas::FULL_HD);
        c.render(&ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_holds_every_composition_once() {
        let reg = Registry::builtin();
        assert_eq!(reg.len(), 12);
        assert_eq!(reg.lookup("Welcome").unwrap().meta.canvas, Canvas::HD);
        assert_eq!(reg.lookup("ReisIntroduction").unwrap().meta.duration, 450);
        for entry in reg.iter() {
            assert!(entry.instantiate(None).is_ok(), "{} defaults", entry.meta.id);
        }
    }

    #[test]
    fn remap_extends_and_clamps() {
        assert_eq!(remap(2.0, &[0.0, 1.0], &[0.0, 10.0]).unwrap(), 20.0);
        assert_eq!(remap_clamped(2.0, &[0.0, 1.0], &[0.0, 10.0]).unwrap(), 10.0);
        assert!(check_scale(0.0).is_err());
    }
}
