use std::collections::BTreeMap;

use crate::animation::interpolate::Envelope;

/// One scripted change to scene state.
#[derive(Clone, Debug, PartialEq)]
pub enum StateDelta {
    /// Add `id` to the named set. Inserting a present id is a no-op.
    Insert { set: String, id: String },
    /// Remove `id` from the named set.
    Remove { set: String, id: String },
    /// Empty the named set.
    Clear { set: String },
    /// Set a named enum phase.
    Phase { name: String, value: String },
    /// Set a named flag.
    Flag { name: String, value: bool },
    /// Drive a named ratio by `envelope(frame)` from the threshold onward.
    Progress { name: String, envelope: Envelope<f64> },
}

impl StateDelta {
    pub fn insert(set: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Insert {
            set: set.into(),
            id: id.into(),
        }
    }

    pub fn remove(set: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Remove {
            set: set.into(),
            id: id.into(),
        }
    }

    pub fn clear(set: impl Into<String>) -> Self {
        Self::Clear { set: set.into() }
    }

    pub fn phase(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Phase {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn flag(name: impl Into<String>, value: bool) -> Self {
        Self::Flag {
            name: name.into(),
            value,
        }
    }

    pub fn progress(name: impl Into<String>, envelope: Envelope<f64>) -> Self {
        Self::Progress {
            name: name.into(),
            envelope,
        }
    }
}

/// Frame-thresholded list of deltas, kept sorted by threshold.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Script {
    steps: Vec<(i64, StateDelta)>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `delta` at `threshold`. Equal thresholds apply in insertion order.
    pub fn at(mut self, threshold: i64, delta: StateDelta) -> Self {
        let pos = self.steps.partition_point(|(t, _)| *t <= threshold);
        self.steps.insert(pos, (threshold, delta));
        self
    }

    /// Build from unordered pairs. The sort is stable.
    pub fn from_steps(mut steps: Vec<(i64, StateDelta)>) -> Self {
        steps.sort_by_key(|(t, _)| *t);
        Self { steps }
    }

    pub fn steps(&self) -> &[(i64, StateDelta)] {
        &self.steps
    }

    /// Threshold at which `id` last joined `set`, as seen at `frame`.
    ///
    /// `None` when `id` is not a member at `frame`.
    pub fn joined_at(&self, frame: i64, set: &str, id: &str) -> Option<i64> {
        let mut since = None;
        for (t, delta) in self.steps.iter().take_while(|(t, _)| *t <= frame) {
            match delta {
                StateDelta::Insert { set: s, id: i } if s == set && i == id => {
                    since = since.or(Some(*t));
                }
                StateDelta::Remove { set: s, id: i } if s == set && i == id => since = None,
                StateDelta::Clear { set: s } if s == set => since = None,
                _ => {}
            }
        }
        since
    }
}

/// Scene state derived for one frame.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct SceneSnapshot {
    /// Named sets in insertion order.
    pub sets: BTreeMap<String, Vec<String>>,
    pub phases: BTreeMap<String, String>,
    pub flags: BTreeMap<String, bool>,
    pub progress: BTreeMap<String, f64>,
}

impl SceneSnapshot {
    /// Members of a set, empty when the set was never touched.
    pub fn set(&self, name: &str) -> &[String] {
        self.sets.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, set: &str, id: &str) -> bool {
        self.set(set).iter().any(|m| m == id)
    }

    pub fn phase(&self, name: &str) -> Option<&str> {
        self.phases.get(name).map(String::as_str)
    }

    /// Flag value, `false` when unset.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Ratio value, `0.0` when unset.
    pub fn progress(&self, name: &str) -> f64 {
        self.progress.get(name).copied().unwrap_or(0.0)
    }
}

/// Fold every delta with `threshold <= frame` into a fresh snapshot.
///
/// Nothing carries over between calls, so seeking backwards matches a fresh evaluation.
pub fn derive_scene_state(frame: i64, script: &Script) -> SceneSnapshot {
    let mut snap = SceneSnapshot::default();
    for (_, delta) in script.steps.iter().take_while(|(t, _)| *t <= frame) {
        match delta {
            StateDelta::Insert { set, id } => {
                let members = snap.sets.entry(set.clone()).or_default();
                if !members.contains(id) {
                    members.push(id.clone());
                }
            }
            StateDelta::Remove { set, id } => {
                if let Some(members) = snap.sets.get_mut(set) {
                    members.retain(|m| m != id);
                }
            }
            StateDelta::Clear { set } => {
                snap.sets.entry(set.clone()).or_default().clear();
            }
            StateDelta::Phase { name, value } => {
                snap.phases.insert(name.clone(), value.clone());
            }
            StateDelta::Flag { name, value } => {
                snap.flags.insert(name.clone(), *value);
            }
            StateDelta::Progress { name, envelope } => {
                snap.progress
                    .insert(name.clone(), envelope.sample(frame as f64));
            }
        }
    }
    snap
}

#[cfg(test)]
#[path = "../../tests/unit/scene/script.rs"]
mod tests;
