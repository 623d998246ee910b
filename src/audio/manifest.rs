use crate::audio::cue::{AudioKey, AudioMap};
use crate::foundation::core::{Fps, FrameRange};
use crate::foundation::error::{ReelError, ReelResult};
use crate::timeline::resolve::Timeline;

/// One scheduled sound in output frame space.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CueEntry {
    pub key: AudioKey,
    /// Asset path resolved through the [`AudioMap`].
    pub asset: String,
    /// Owning timeline node.
    pub node: String,
    /// First global frame of playback.
    pub start_frame: u64,
    /// Exclusive global end frame.
    pub end_frame: u64,
    pub volume: f64,
    /// Source frames skipped at `start_frame`.
    pub trim_frames: u64,
}

impl CueEntry {
    /// Playback start in seconds relative to the beginning of `range`.
    pub fn offset_secs(&self, range: FrameRange, fps: Fps) -> f64 {
        fps.frames_to_secs((self.start_frame - range.start.0) as f64)
    }
}

/// Cue sheet for one render range.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AudioManifest {
    pub range: FrameRange,
    pub fps: Fps,
    pub entries: Vec<CueEntry>,
}

/// Schedule every cue of `timeline` that sounds inside `range`.
///
/// Runs once per render, outside the per-frame loop. A cue whose node activated before
/// `range.start` is scheduled at `range.start` and trimmed by the frames already played.
pub fn build_audio_manifest(
    timeline: &Timeline,
    range: FrameRange,
    fps: Fps,
    map: &AudioMap,
) -> ReelResult<AudioManifest> {
    if range.is_empty() {
        return Err(ReelError::validation(
            "audio manifest range must be non-empty",
        ));
    }
    if range.end.0 > timeline.total_frames() {
        return Err(ReelError::validation(
            "audio manifest range must be within composition duration",
        ));
    }

    let mut entries = Vec::new();
    for (idx, cues) in timeline.cue_nodes() {
        let Some(activation) = timeline.activation_frame(idx) else {
            continue;
        };
        let Some((lo, hi)) = timeline.window(idx).clip(range) else {
            continue;
        };
        let already_played = lo - activation;

        for cue in cues {
            let trim = cue.start_from + already_played;
            let remaining = match cue.end_at {
                Some(end) if end <= trim => continue,
                Some(end) => end - trim,
                None => u64::MAX,
            };
            entries.push(CueEntry {
                key: cue.key,
                asset: map.asset(cue.key).to_owned(),
                node: timeline.path(idx).to_owned(),
                start_frame: lo,
                end_frame: hi.min(lo.saturating_add(remaining)),
                volume: cue.volume,
                trim_frames: trim,
            });
        }
    }
    entries.sort_by(|a, b| {
        a.start_frame
            .cmp(&b.start_frame)
            .then_with(|| a.node.cmp(&b.node))
            .then_with(|| a.key.cmp(&b.key))
    });
    tracing::debug!(
        entries = entries.len(),
        start = range.start.0,
        end = range.end.0,
        "audio manifest built"
    );

    Ok(AudioManifest {
        range,
        fps,
        entries,
    })
}
