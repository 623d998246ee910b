use std::collections::BTreeMap;
use std::fmt;

use crate::foundation::error::{ReelError, ReelResult};

/// Closed set of sound effects a composition may schedule.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioKey {
    ToggleOn,
    ToggleOff,
    Hover,
    Swoosh,
    Success,
    Tick,
    IntroSwoosh,
    OutroChime,
}

impl AudioKey {
    pub const ALL: [Self; 8] = [
        Self::ToggleOn,
        Self::ToggleOff,
        Self::Hover,
        Self::Swoosh,
        Self::Success,
        Self::Tick,
        Self::IntroSwoosh,
        Self::OutroChime,
    ];

    /// Wire name, e.g. `TOGGLE_ON`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ToggleOn => "TOGGLE_ON",
            Self::ToggleOff => "TOGGLE_OFF",
            Self::Hover => "HOVER",
            Self::Swoosh => "SWOOSH",
            Self::Success => "SUCCESS",
            Self::Tick => "TICK",
            Self::IntroSwoosh => "INTRO_SWOOSH",
            Self::OutroChime => "OUTRO_CHIME",
        }
    }

    fn default_asset(self) -> &'static str {
        match self {
            Self::ToggleOn | Self::Tick => "kenney_ui-audio/Audio/click1.ogg",
            Self::ToggleOff => "kenney_ui-audio/Audio/switch2.ogg",
            Self::Hover => "kenney_ui-audio/Audio/rollover3.ogg",
            Self::Swoosh | Self::IntroSwoosh => "kenney_ui-audio/Audio/switch1.ogg",
            Self::Success | Self::OutroChime => "kenney_ui-audio/Audio/switch10.ogg",
        }
    }
}

impl fmt::Display for AudioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Static mapping from [`AudioKey`] to an asset path relative to the public asset root.
///
/// Deserializes from a partial JSON object; keys not present keep their built-in path.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct AudioMap {
    assets: BTreeMap<AudioKey, String>,
}

impl Default for AudioMap {
    fn default() -> Self {
        Self {
            assets: AudioKey::ALL
                .iter()
                .map(|k| (*k, k.default_asset().to_owned()))
                .collect(),
        }
    }
}

impl AudioMap {
    /// Asset path for `key`.
    pub fn asset(&self, key: AudioKey) -> &str {
        self.assets
            .get(&key)
            .map(String::as_str)
            .unwrap_or_else(|| key.default_asset())
    }

    /// Replace the asset for one key. Empty paths are rejected.
    pub fn with_override(mut self, key: AudioKey, path: impl Into<String>) -> ReelResult<Self> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(ReelError::validation(format!(
                "audio asset for {key} must not be empty"
            )));
        }
        self.assets.insert(key, path);
        Ok(self)
    }
}

impl<'de> serde::Deserialize<'de> for AudioMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let overrides = BTreeMap::<AudioKey, String>::deserialize(deserializer)?;
        let mut map = Self::default();
        for (key, path) in overrides {
            map = map
                .with_override(key, path)
                .map_err(serde::de::Error::custom)?;
        }
        Ok(map)
    }
}

/// One sound effect attached to a timeline node.
///
/// Plays from the node's activation frame. `start_from` and `end_at` trim the source, both in
/// source frames; without `end_at` the cue runs until its node ends.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioCue {
    pub key: AudioKey,
    #[serde(default = "default_volume")]
    pub volume: f64,
    #[serde(default)]
    pub start_from: u64,
    #[serde(default)]
    pub end_at: Option<u64>,
}

fn default_volume() -> f64 {
    0.5
}

impl AudioCue {
    /// Cue at the default volume.
    pub fn new(key: AudioKey) -> Self {
        Self {
            key,
            volume: default_volume(),
            start_from: 0,
            end_at: None,
        }
    }

    /// Replace the volume.
    pub fn volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    /// Stop at source `frame`.
    pub fn end_at(mut self, frame: u64) -> Self {
        self.end_at = Some(frame);
        self
    }

    pub(crate) fn validate(&self) -> ReelResult<()> {
        if !self.volume.is_finite() || !(0.0..=1.0).contains(&self.volume) {
            return Err(ReelError::validation(format!(
                "{} cue volume must be in [0, 1], got {}",
                self.key, self.volume
            )));
        }
        if let Some(end) = self.end_at
            && end <= self.start_from
        {
            return Err(ReelError::validation(format!(
                "{} cue ends at {end} before it starts at {}",
                self.key, self.start_from
            )));
        }
        Ok(())
    }
}
