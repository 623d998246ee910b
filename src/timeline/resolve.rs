use std::collections::HashMap;

use crate::audio::cue::AudioCue;
use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::{ReelError, ReelResult};
use crate::timeline::sequence::Sequence;

/// Dense index into [`Timeline`] nodes. The root is always `NodeIdx(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIdx(pub u32);

impl NodeIdx {
    pub const ROOT: Self = Self(0);

    fn get(self) -> usize {
        self.0 as usize
    }
}

/// Per-node timing at one global frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeTimeCtx {
    /// Node and all its ancestors are inside their windows.
    pub active: bool,
    /// Node-local frame. Only meaningful while `active`.
    pub local_frame: i64,
}

impl NodeTimeCtx {
    /// Local frame when active.
    pub fn local(self) -> Option<i64> {
        self.active.then_some(self.local_frame)
    }
}

/// Half-open window `[start, end)` in global frames; `end == None` is unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlobalWindow {
    pub start: i64,
    pub end: Option<i64>,
}

impl GlobalWindow {
    fn intersect(self, other: Self) -> Self {
        let end = match (self.end, other.end) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        Self {
            start: self.start.max(other.start),
            end,
        }
    }

    /// `true` when no frame can be inside the window.
    pub fn is_empty(self) -> bool {
        self.end.is_some_and(|e| e <= self.start)
    }

    /// Clip to `range` and return the first covered frame and the exclusive end.
    pub fn clip(self, range: FrameRange) -> Option<(u64, u64)> {
        let lo = self.start.max(range.start.as_local());
        let hi = self
            .end
            .map_or(range.end.as_local(), |e| e.min(range.end.as_local()));
        (lo < hi).then(|| (lo as u64, hi as u64))
    }
}

#[derive(Clone, Debug)]
struct TimelineNode {
    name: String,
    path: String,
    from: i64,
    duration: Option<i64>,
    children: Vec<NodeIdx>,
    cues: Vec<AudioCue>,
    /// Global frame at which local frame 0 occurs.
    origin: i64,
    /// Window where the node and all ancestors are active.
    window: GlobalWindow,
}

/// A validated, flattened [`Sequence`] tree bound to an output length.
#[derive(Clone, Debug)]
pub struct Timeline {
    nodes: Vec<TimelineNode>,
    by_path: HashMap<String, NodeIdx>,
    total_frames: u64,
}

/// One cue firing at a global frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FiredCue<'a> {
    pub node: NodeIdx,
    pub path: &'a str,
    pub cue: &'a AudioCue,
}

impl Timeline {
    /// Flatten and validate `root` against an output of `total_frames` frames.
    ///
    /// Fails with [`ReelError::DegenerateTimeline`] when any node has `duration <= 0`, or a
    /// negative `from` whose magnitude reaches the output length. Sibling names must be unique.
    #[tracing::instrument(level = "debug", skip(root), fields(root = %root.name))]
    pub fn new(root: Sequence, total_frames: u64) -> ReelResult<Self> {
        if total_frames == 0 {
            return Err(ReelError::degenerate("timeline output has zero frames"));
        }
        let total = i64::try_from(total_frames)
            .map_err(|_| ReelError::degenerate("timeline output length overflows i64"))?;

        let mut tl = Self {
            nodes: Vec::new(),
            by_path: HashMap::new(),
            total_frames,
        };
        let unbounded = GlobalWindow {
            start: 0,
            end: None,
        };
        tl.flatten(root, None, 0, unbounded, total)?;

        let output = GlobalWindow {
            start: 0,
            end: Some(total),
        };
        for node in &tl.nodes {
            if node.window.intersect(output).is_empty() {
                tracing::warn!(
                    path = %node.path,
                    "timeline node is never active within {total_frames} output frames"
                );
            }
        }
        tracing::debug!(nodes = tl.nodes.len(), total_frames, "timeline validated");
        Ok(tl)
    }

    fn flatten(
        &mut self,
        seq: Sequence,
        parent: Option<NodeIdx>,
        parent_origin: i64,
        parent_window: GlobalWindow,
        total: i64,
    ) -> ReelResult<NodeIdx> {
        let path = match parent {
            Some(p) => format!("{}/{}", self.nodes[p.get()].path, seq.name),
            None => seq.name.clone(),
        };
        if seq.name.is_empty() || seq.name.contains('/') {
            return Err(ReelError::validation(format!(
                "timeline node name {:?} under \"{path}\" must be non-empty and contain no '/'",
                seq.name
            )));
        }
        if let Some(d) = seq.duration
            && d <= 0
        {
            return Err(ReelError::degenerate(format!(
                "node \"{path}\" has non-positive duration {d}"
            )));
        }
        if seq.from < 0 && seq.from.unsigned_abs() >= total as u64 {
            return Err(ReelError::degenerate(format!(
                "node \"{path}\" starts {} frames before its parent, beyond the {total} frame output",
                seq.from.unsigned_abs()
            )));
        }
        for cue in &seq.cues {
            cue.validate()?;
        }

        let origin = parent_origin.saturating_add(seq.from);
        let own = GlobalWindow {
            start: origin,
            end: seq.duration.map(|d| origin.saturating_add(d)),
        };
        let window = own.intersect(parent_window);

        let idx = NodeIdx(u32::try_from(self.nodes.len()).map_err(|_| {
            ReelError::degenerate("timeline has more nodes than fit in a u32 index")
        })?);
        if self.by_path.insert(path.clone(), idx).is_some() {
            return Err(ReelError::validation(format!(
                "duplicate timeline node path \"{path}\""
            )));
        }
        self.nodes.push(TimelineNode {
            name: seq.name,
            path,
            from: seq.from,
            duration: seq.duration,
            children: Vec::with_capacity(seq.children.len()),
            cues: seq.cues,
            origin,
            window,
        });

        for child in seq.children {
            let c = self.flatten(child, Some(idx), origin, window, total)?;
            self.nodes[idx.get()].children.push(c);
        }
        Ok(idx)
    }

    /// Output length in frames.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Full output range.
    pub fn range(&self) -> FrameRange {
        FrameRange::full(self.total_frames)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look a node up by slash-separated path, e.g. `"intro/hero/toggle"`.
    pub fn find(&self, path: &str) -> Option<NodeIdx> {
        self.by_path.get(path).copied()
    }

    /// Named child of `parent`.
    pub fn child(&self, parent: NodeIdx, name: &str) -> Option<NodeIdx> {
        self.nodes
            .get(parent.get())?
            .children
            .iter()
            .copied()
            .find(|c| self.nodes[c.get()].name == name)
    }

    /// Path of `idx`.
    pub fn path(&self, idx: NodeIdx) -> &str {
        &self.nodes[idx.get()].path
    }

    /// Effective window of `idx` in global frames.
    pub fn window(&self, idx: NodeIdx) -> GlobalWindow {
        self.nodes[idx.get()].window
    }

    /// Global frame at which `idx` has local frame 0.
    pub fn origin(&self, idx: NodeIdx) -> i64 {
        self.nodes[idx.get()].origin
    }

    /// Declared duration of `idx`.
    pub fn duration(&self, idx: NodeIdx) -> Option<i64> {
        self.nodes[idx.get()].duration
    }

    /// First global output frame at which `idx` is active, if any.
    pub fn activation_frame(&self, idx: NodeIdx) -> Option<u64> {
        self.window(idx)
            .clip(self.range())
            .map(|(start, _)| start)
    }

    /// Compute the time context of every node at `global`.
    pub fn resolve(&self, global: FrameIndex) -> Vec<NodeTimeCtx> {
        let mut out = Vec::new();
        self.resolve_into(global, &mut out);
        out
    }

    /// Like [`Timeline::resolve`], reusing `out`.
    pub fn resolve_into(&self, global: FrameIndex, out: &mut Vec<NodeTimeCtx>) {
        out.clear();
        out.resize(self.nodes.len(), NodeTimeCtx::default());
        // The root's parent-local frame is the global frame.
        self.rec_time(NodeIdx::ROOT, global.as_local(), true, out);
    }

    fn rec_time(&self, idx: NodeIdx, parent_local: i64, parent_active: bool, out: &mut [NodeTimeCtx]) {
        let node = &self.nodes[idx.get()];
        let local = parent_local - node.from;
        let active = parent_active && local >= 0 && node.duration.is_none_or(|d| local < d);
        out[idx.get()] = NodeTimeCtx {
            active,
            local_frame: local,
        };
        for &c in &node.children {
            self.rec_time(c, local, active, out);
        }
    }

    /// Cues whose owning node activates exactly at `global`.
    ///
    /// Calling this twice with the same frame returns the same cues; no other frame returns them.
    pub fn cues_at(&self, global: FrameIndex) -> Vec<FiredCue<'_>> {
        let mut fired = Vec::new();
        for (i, node) in self.nodes.iter().enumerate() {
            if node.cues.is_empty() {
                continue;
            }
            let idx = NodeIdx(i as u32);
            if self.activation_frame(idx) != Some(global.0) {
                continue;
            }
            tracing::debug!(path = %node.path, frame = global.0, cues = node.cues.len(), "cues fire");
            fired.extend(node.cues.iter().map(|cue| FiredCue {
                node: idx,
                path: &node.path,
                cue,
            }));
        }
        fired
    }

    /// Every node carrying cues, with its cues.
    pub fn cue_nodes(&self) -> impl Iterator<Item = (NodeIdx, &[AudioCue])> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.cues.is_empty())
            .map(|(i, n)| (NodeIdx(i as u32), n.cues.as_slice()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/resolve.rs"]
mod tests;
