#![forbid(unsafe_code)]

pub mod animation;
pub mod audio;
pub mod compositions;
pub mod foundation;
pub mod render;
pub mod scene;
pub mod session;
pub mod timeline;

pub use animation::color::Color;
pub use animation::interpolate::{Extrapolate, InterpolateOpts, interpolate};
pub use animation::spring::{SpringConfig, spring_value};
pub use audio::cue::{AudioCue, AudioKey, AudioMap};
pub use audio::manifest::{AudioManifest, CueEntry};
pub use foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
pub use foundation::error::{ReelError, ReelResult};
pub use render::element::{Element, Length, pct, px};
pub use scene::script::{SceneSnapshot, Script, StateDelta, derive_scene_state};
pub use session::component::{Component, FrameCtx, Props};
pub use session::registry::{Composition, Registry};
pub use session::render_session::{FrameSnapshot, RenderSession, RenderSessionOpts, RenderStats};
pub use session::sink::{FrameSink, InMemorySink, JsonLinesSink};
pub use timeline::resolve::Timeline;
pub use timeline::sequence::{Sequence, Series};
