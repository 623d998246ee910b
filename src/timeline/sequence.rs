use crate::audio::cue::AudioCue;
use crate::foundation::error::{ReelError, ReelResult};

/// Declarative timeline node: a window of its parent's local time.
///
/// Active at parent-local frame `F` iff `F - from >= 0` and (`duration` is `None` or
/// `F - from < duration`). The node's local frame is `F - from`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sequence {
    /// Name, unique among siblings.
    pub name: String,
    /// Start offset in parent-local frames. May be negative.
    #[serde(default)]
    pub from: i64,
    /// Length in frames; `None` runs until the parent ends.
    #[serde(default)]
    pub duration: Option<i64>,
    /// Nested nodes, timed relative to this node's local frame.
    #[serde(default)]
    pub children: Vec<Sequence>,
    /// Sound effects fired once on activation.
    #[serde(default)]
    pub cues: Vec<AudioCue>,
}

impl Sequence {
    /// Unbounded node starting at parent frame 0.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from: 0,
            duration: None,
            children: Vec::new(),
            cues: Vec::new(),
        }
    }

    /// Set the start offset.
    pub fn at(mut self, from: i64) -> Self {
        self.from = from;
        self
    }

    /// Bound the node to `duration` frames.
    pub fn lasting(mut self, duration: i64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Rename the node, typically when embedding another component's root.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Append a child node.
    pub fn child(mut self, child: Sequence) -> Self {
        self.children.push(child);
        self
    }

    /// Append an audio cue.
    pub fn cue(mut self, cue: AudioCue) -> Self {
        self.cues.push(cue);
        self
    }

    /// Convenience for a leaf that only carries one cue.
    pub fn sound(name: impl Into<String>, from: i64, cue: AudioCue) -> Self {
        Self::new(name).at(from).cue(cue)
    }

    /// Whether the node is active at `parent_local`.
    pub fn is_active(&self, parent_local: i64) -> bool {
        let local = parent_local - self.from;
        local >= 0 && self.duration.is_none_or(|d| local < d)
    }

    /// Local frame at `parent_local`, `None` while inactive.
    pub fn local_frame(&self, parent_local: i64) -> Option<i64> {
        self.is_active(parent_local)
            .then_some(parent_local - self.from)
    }

    /// Exclusive end in parent-local frames, if bounded.
    pub fn end(&self) -> Option<i64> {
        self.duration.map(|d| self.from + d)
    }
}

/// Lays children out back to back: each starts where the previous one ended.
#[derive(Clone, Debug, Default)]
pub struct Series {
    items: Vec<(Sequence, i64)>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `seq` right after the previous item.
    pub fn then(self, seq: Sequence) -> Self {
        self.then_offset(seq, 0)
    }

    /// Append `seq`, shifted by `offset` frames from where the previous item ended.
    pub fn then_offset(mut self, seq: Sequence, offset: i64) -> Self {
        self.items.push((seq, offset));
        self
    }

    /// Resolve `from` of every item and return them in order.
    ///
    /// Every item but the last needs a duration.
    pub fn into_children(self) -> ReelResult<Vec<Sequence>> {
        let n = self.items.len();
        let mut cursor = 0i64;
        let mut out = Vec::with_capacity(n);
        for (i, (mut seq, offset)) in self.items.into_iter().enumerate() {
            seq.from = cursor + offset;
            match seq.duration {
                Some(d) => cursor = seq.from + d,
                None if i + 1 < n => {
                    return Err(ReelError::degenerate(format!(
                        "series item \"{}\" is unbounded but is not the last item",
                        seq.name
                    )));
                }
                None => {}
            }
            out.push(seq);
        }
        Ok(out)
    }

    /// Attach the laid-out items as children of `parent`.
    pub fn attach(self, mut parent: Sequence) -> ReelResult<Sequence> {
        parent.children.extend(self.into_children()?);
        Ok(parent)
    }
}
