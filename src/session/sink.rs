use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::foundation::core::{Canvas, Fps, FrameRange};
use crate::foundation::error::{ReelError, ReelResult};
use crate::session::render_session::FrameSnapshot;

/// Configuration provided to a [`FrameSink`] at the start of a range render.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SinkConfig {
    /// Registry id of the composition.
    pub composition: String,
    pub canvas: Canvas,
    pub fps: Fps,
    /// Frames that will be pushed.
    pub range: FrameRange,
}

/// Consumer of rendered snapshots.
///
/// `push_frame` is called in strictly increasing frame order within the requested range, whether
/// or not frames were evaluated in parallel.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, frame: &FrameSnapshot) -> ReelResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> ReelResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<FrameSnapshot>,
    finished: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[FrameSnapshot] {
        &self.frames
    }

    /// Per-frame digests in push order.
    pub fn digests(&self) -> Vec<u64> {
        self.frames.iter().map(|f| f.digest).collect()
    }

    /// Whether `end` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, frame: &FrameSnapshot) -> ReelResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Writes a header line with the [`SinkConfig`], then one JSON object per frame.
pub struct JsonLinesSink<W: Write + Send> {
    out: BufWriter<W>,
}

impl JsonLinesSink<File> {
    /// Create (or truncate) `path`, creating parent directories as needed.
    pub fn create(path: &Path) -> ReelResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                ReelError::evaluation(format!("create output dir '{}': {e}", parent.display()))
            })?;
        }
        let f = File::create(path)
            .map_err(|e| ReelError::evaluation(format!("create '{}': {e}", path.display())))?;
        Ok(Self::new(f))
    }
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            out: BufWriter::new(writer),
        }
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> ReelResult<W> {
        self.out
            .into_inner()
            .map_err(|e| ReelError::evaluation(format!("flush json lines sink: {e}")))
    }

    fn write_line<T: serde::Serialize>(&mut self, value: &T) -> ReelResult<()> {
        serde_json::to_writer(&mut self.out, value)?;
        self.out
            .write_all(b"\n")
            .map_err(|e| ReelError::evaluation(format!("write json line: {e}")))
    }
}

impl<W: Write + Send> FrameSink for JsonLinesSink<W> {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        self.write_line(&cfg)
    }

    fn push_frame(&mut self, frame: &FrameSnapshot) -> ReelResult<()> {
        self.write_line(frame)
    }

    fn end(&mut self) -> ReelResult<()> {
        self.out
            .flush()
            .map_err(|e| ReelError::evaluation(format!("flush json lines sink: {e}")))
    }
}
