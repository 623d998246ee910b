use crate::animation::spring::{SpringConfig, spring_value};
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::element::Element;
use crate::session::gate::FontFace;
use crate::timeline::resolve::{NodeIdx, NodeTimeCtx, Timeline};
use crate::timeline::sequence::Sequence;

/// Per-frame view of one timeline node, handed to [`Component::render`].
///
/// All time values are node-local: `frame() == 0` is the node's first active frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameCtx<'a> {
    timeline: &'a Timeline,
    ctxs: &'a [NodeTimeCtx],
    node: NodeIdx,
    frame: i64,
    duration: i64,
    fps: Fps,
    canvas: Canvas,
}

impl<'a> FrameCtx<'a> {
    /// Context for the timeline root. `ctxs` must come from [`Timeline::resolve`].
    pub fn root(timeline: &'a Timeline, ctxs: &'a [NodeTimeCtx], fps: Fps, canvas: Canvas) -> Self {
        let duration = timeline
            .duration(NodeIdx::ROOT)
            .unwrap_or(timeline.total_frames() as i64);
        Self {
            timeline,
            ctxs,
            node: NodeIdx::ROOT,
            frame: ctxs[NodeIdx::ROOT.0 as usize].local_frame,
            duration,
            fps,
            canvas,
        }
    }

    /// Node-local frame.
    pub fn frame(&self) -> i64 {
        self.frame
    }

    /// Node-local frame as `f64`.
    pub fn f(&self) -> f64 {
        self.frame as f64
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Length of the node in frames. Unbounded nodes span the rest of their parent.
    pub fn duration(&self) -> i64 {
        self.duration
    }

    /// Timeline path of the current node.
    pub fn path(&self) -> &'a str {
        self.timeline.path(self.node)
    }

    /// Context of the named child node, `None` while the child is inactive.
    ///
    /// Asking for a child the component never declared in its timeline is an evaluation error.
    pub fn sequence(&self, name: &str) -> ReelResult<Option<FrameCtx<'a>>> {
        let child = self.timeline.child(self.node, name).ok_or_else(|| {
            ReelError::evaluation(format!(
                "\"{}\" has no timeline child named \"{name}\"",
                self.path()
            ))
        })?;
        let tc = self.ctxs[child.0 as usize];
        let Some(frame) = tc.local() else {
            return Ok(None);
        };
        let from = self.timeline.origin(child) - self.timeline.origin(self.node);
        let duration = self
            .timeline
            .duration(child)
            .unwrap_or(self.duration - from);
        Ok(Some(Self {
            node: child,
            frame,
            duration,
            ..*self
        }))
    }

    /// Unit spring response started `delay` frames into this node.
    ///
    /// `config` must be a valid preset or a literal already checked with
    /// [`SpringConfig::validate`].
    pub fn spring(&self, delay: i64, config: SpringConfig) -> f64 {
        spring_value((self.frame - delay) as f64, self.fps, &config)
    }
}

/// A composition or composable part: a timeline shape plus a per-frame render function.
///
/// `render` must be a pure function of the context and the component's props.
pub trait Component: Send + Sync {
    /// Timeline rooted at this component. Parents embed it with
    /// `child.timeline()?.named(..).at(..).lasting(..)`.
    fn timeline(&self) -> ReelResult<Sequence>;

    /// Build the element tree for one frame.
    fn render(&self, ctx: &FrameCtx<'_>) -> ReelResult<Element>;

    /// Font faces that must be available before the first frame.
    fn required_fonts(&self) -> Vec<FontFace> {
        Vec::new()
    }

    /// Output length when it depends on props rather than the registry entry.
    fn duration_override(&self) -> Option<u64> {
        None
    }
}

/// Boundary validation for JSON props.
pub trait Props: serde::de::DeserializeOwned {
    /// Check invariants the type system cannot express.
    fn validate(&self) -> ReelResult<()> {
        Ok(())
    }
}

/// Parse and validate props, falling back to defaults when `value` is `None`.
pub fn parse_props<P: Props + Default>(value: Option<&serde_json::Value>) -> ReelResult<P> {
    let props = match value {
        Some(v) => P::deserialize(v)
            .map_err(|e| ReelError::validation(format!("invalid props: {e}")))?,
        None => P::default(),
    };
    props.validate()?;
    Ok(props)
}

/// Reject values outside `[0, 1]`.
pub(crate) fn check_unit(name: &str, v: f64) -> ReelResult<()> {
    if !v.is_finite() || !(0.0..=1.0).contains(&v) {
        return Err(ReelError::validation(format!(
            "{name} must be within [0, 1], got {v}"
        )));
    }
    Ok(())
}
