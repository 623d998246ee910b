use rayon::prelude::*;

use crate::audio::cue::AudioMap;
use crate::audio::manifest::{AudioManifest, build_audio_manifest};
use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::fnv1a64;
use crate::render::element::Element;
use crate::session::component::{Component, FrameCtx};
use crate::session::gate::{FontCatalog, ensure_ready};
use crate::session::registry::{Composition, RegistryEntry};
use crate::session::sink::{FrameSink, SinkConfig};
use crate::timeline::resolve::Timeline;

/// Options controlling `RenderSession` range rendering behavior.
#[derive(Clone, Debug)]
pub struct RenderSessionOpts {
    /// Evaluate frames on a dedicated rayon pool.
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Frames evaluated per parallel batch before they are pushed to the sink.
    pub chunk_size: usize,
    /// Fonts available to the rasterizer.
    pub fonts: FontCatalog,
}

impl Default for RenderSessionOpts {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
            chunk_size: 64,
            fonts: FontCatalog::default(),
        }
    }
}

/// Range render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub frames_total: u64,
    /// Frames whose digest differs from the previous frame.
    pub frames_changed: u64,
}

/// Evaluated frame: the element tree plus a digest of its canonical JSON.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameSnapshot {
    pub frame: FrameIndex,
    /// FNV-1a 64 of `serde_json::to_vec(&root)`.
    pub digest: u64,
    pub root: Element,
}

/// Binds one component instance to its validated timeline and evaluates frames.
///
/// Construction front-loads prop validation, timeline validation and the readiness gate; frame
/// evaluation afterwards is a pure function of the frame index.
pub struct RenderSession {
    meta: Composition,
    component: Box<dyn Component>,
    timeline: Timeline,
    opts: RenderSessionOpts,
}

impl std::fmt::Debug for RenderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSession")
            .field("meta", &self.meta)
            .field("timeline_nodes", &self.timeline.len())
            .field("opts", &self.opts)
            .finish_non_exhaustive()
    }
}

impl RenderSession {
    /// Instantiate a registry entry with `props` and prepare it for rendering.
    #[tracing::instrument(level = "debug", skip(entry, props, opts), fields(comp = entry.meta.id))]
    pub fn new(
        entry: &RegistryEntry,
        props: Option<&serde_json::Value>,
        opts: RenderSessionOpts,
    ) -> ReelResult<Self> {
        let component = entry.instantiate(props)?;
        Self::from_component(entry.meta.clone(), component, opts)
    }

    /// Prepare an already-built component.
    pub fn from_component(
        mut meta: Composition,
        component: Box<dyn Component>,
        opts: RenderSessionOpts,
    ) -> ReelResult<Self> {
        if let Some(d) = component.duration_override() {
            meta.duration = d;
        }
        let timeline = Timeline::new(component.timeline()?, meta.duration)?;

        let required = component.required_fonts();
        let fonts = opts.fonts.require(&required);
        ensure_ready(&[&fonts])?;

        tracing::debug!(
            comp = meta.id,
            frames = meta.duration,
            nodes = timeline.len(),
            "render session ready"
        );
        Ok(Self {
            meta,
            component,
            timeline,
            opts,
        })
    }

    pub fn meta(&self) -> &Composition {
        &self.meta
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Output length in frames.
    pub fn duration(&self) -> u64 {
        self.meta.duration
    }

    /// Evaluate a single frame.
    pub fn render_frame(&self, frame: FrameIndex) -> ReelResult<FrameSnapshot> {
        if frame.0 >= self.meta.duration {
            return Err(ReelError::validation(format!(
                "frame {} is outside the {} frame composition",
                frame.0, self.meta.duration
            )));
        }
        let ctxs = self.timeline.resolve(frame);
        let ctx = FrameCtx::root(&self.timeline, &ctxs, self.meta.fps, self.meta.canvas);
        let root = self.component.render(&ctx).map_err(|e| match e {
            ReelError::Evaluation(msg) => {
                ReelError::evaluation(format!("{} frame {}: {msg}", self.meta.id, frame.0))
            }
            other => other,
        })?;
        let digest = fnv1a64(&root.to_canonical_json()?);
        Ok(FrameSnapshot {
            frame,
            digest,
            root,
        })
    }

    /// Render `range` and stream frames into `sink` in increasing frame order.
    ///
    /// Any frame failure aborts the whole range; `end` is only called on success.
    #[tracing::instrument(level = "debug", skip(self, sink), fields(comp = self.meta.id))]
    pub fn render_range(
        &self,
        range: FrameRange,
        sink: &mut dyn FrameSink,
    ) -> ReelResult<RenderStats> {
        if range.is_empty() {
            return Err(ReelError::validation(
                "render_range range must be non-empty",
            ));
        }
        if range.end.0 > self.meta.duration {
            return Err(ReelError::validation(
                "render_range range must be within composition duration",
            ));
        }

        let pool = if self.opts.parallel {
            Some(build_thread_pool(self.opts.threads)?)
        } else {
            None
        };

        sink.begin(SinkConfig {
            composition: self.meta.id.to_owned(),
            canvas: self.meta.canvas,
            fps: self.meta.fps,
            range,
        })?;

        let mut stats = RenderStats::default();
        let mut prev_digest = None;
        let mut push = |snap: &FrameSnapshot, stats: &mut RenderStats| -> ReelResult<()> {
            stats.frames_total += 1;
            if prev_digest != Some(snap.digest) {
                stats.frames_changed += 1;
            }
            prev_digest = Some(snap.digest);
            sink.push_frame(snap)
        };

        match pool.as_ref() {
            Some(pool) => {
                let chunk = normalized_chunk_size(self.opts.chunk_size);
                let mut start = range.start.0;
                while start < range.end.0 {
                    let end = (start + chunk).min(range.end.0);
                    // Indexed parallel collect keeps frame order.
                    let frames = pool.install(|| {
                        (start..end)
                            .into_par_iter()
                            .map(|f| self.render_frame(FrameIndex(f)))
                            .collect::<ReelResult<Vec<_>>>()
                    })?;
                    for snap in &frames {
                        push(snap, &mut stats)?;
                    }
                    start = end;
                }
            }
            None => {
                for f in range.frames() {
                    let snap = self.render_frame(f)?;
                    push(&snap, &mut stats)?;
                }
            }
        }

        sink.end()?;
        tracing::debug!(
            frames = stats.frames_total,
            changed = stats.frames_changed,
            "range rendered"
        );
        Ok(stats)
    }

    /// Cue sheet for `range`, computed once outside the frame loop.
    pub fn audio_manifest(&self, range: FrameRange, map: &AudioMap) -> ReelResult<AudioManifest> {
        build_audio_manifest(&self.timeline, range, self.meta.fps, map)
    }
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    chunk_size.max(1) as u64
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ReelError::validation(
            "render_range 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::interpolate::{InterpolateOpts, interpolate};
    use crate::audio::cue::{AudioCue, AudioKey};
    use crate::session::gate::FontFace;
    use crate::session::sink::InMemorySink;
    use crate::timeline::sequence::Sequence;

    struct Fade;

    impl Component for Fade {
        fn timeline(&self) -> ReelResult<Sequence> {
            Ok(Sequence::new("fade").child(Sequence::sound(
                "ping",
                3,
                AudioCue::new(AudioKey::Tick),
            )))
        }

        fn render(&self, ctx: &FrameCtx<'_>) -> ReelResult<Element> {
            let o = interpolate(ctx.f(), &[0.0, 4.0], &[0.0, 1.0], InterpolateOpts::clamped())?;
            Ok(Element::fill().opacity(o))
        }

        fn required_fonts(&self) -> Vec<FontFace> {
            vec![FontFace::new("Inter", 700)]
        }
    }

    fn session(parallel: bool, threads: Option<usize>) -> RenderSession {
        RenderSession::from_component(
            Composition::full_hd("Fade", 8),
            Box::new(Fade),
            RenderSessionOpts {
                parallel,
                threads,
                chunk_size: 3,
                ..RenderSessionOpts::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn render_range_is_ordered_and_counts_changes() {
        let sess = session(false, None);
        let mut sink = InMemorySink::new();
        let stats = sess.render_range(FrameRange::full(8), &mut sink).unwrap();
        assert_eq!(
            stats,
            RenderStats {
                frames_total: 8,
                frames_changed: 5,
            }
        );
        assert!(sink.is_finished());
        for (i, snap) in sink.frames().iter().enumerate() {
            assert_eq!(snap.frame, FrameIndex(i as u64));
        }
        assert_eq!(sink.config().map(|c| c.composition.as_str()), Some("Fade"));
    }

    #[test]
    fn parallel_matches_sequential() {
        let mut seq = InMemorySink::new();
        session(false, None)
            .render_range(FrameRange::full(8), &mut seq)
            .unwrap();
        let mut par = InMemorySink::new();
        session(true, Some(2))
            .render_range(FrameRange::full(8), &mut par)
            .unwrap();
        assert_eq!(seq.frames(), par.frames());
    }

    #[test]
    fn rejects_bad_ranges_and_thread_counts() {
        let sess = session(true, Some(0));
        let mut sink = InMemorySink::new();
        assert!(sess.render_range(FrameRange::full(8), &mut sink).is_err());

        let sess = session(false, None);
        let out_of_bounds = FrameRange::new(FrameIndex(4), FrameIndex(9)).unwrap();
        assert!(sess.render_range(out_of_bounds, &mut sink).is_err());
        assert!(sess.render_frame(FrameIndex(8)).is_err());
    }

    #[test]
    fn missing_fonts_block_the_session() {
        let err = RenderSession::from_component(
            Composition::full_hd("Fade", 8),
            Box::new(Fade),
            RenderSessionOpts {
                fonts: FontCatalog::empty(),
                ..RenderSessionOpts::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, ReelError::Validation(_)));
    }

    #[test]
    fn audio_manifest_covers_the_range() {
        let sess = session(false, None);
        let manifest = sess
            .audio_manifest(FrameRange::full(8), &AudioMap::default())
            .unwrap();
        assert_eq!(manifest.entries.len(), 1);
        assert_eq!(manifest.entries[0].start_frame, 3);
        assert_eq!(manifest.entries[0].node, "fade/ping");
    }
}
