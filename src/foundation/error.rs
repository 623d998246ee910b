/// Crate-wide result alias.
pub type ReelResult<T> = Result<T, ReelError>;

/// Error taxonomy for composition building and frame evaluation.
///
/// Configuration variants (`InvalidRange`, `DegenerateTimeline`, `Animation`) are raised while a
/// composition is being built. `Validation` covers prop values rejected at the boundary.
/// `Evaluation` is fatal for the whole render job.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Malformed envelope breakpoints or mismatched output range.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// Timeline node that can never produce a valid active window.
    #[error("degenerate timeline: {0}")]
    DegenerateTimeline(String),

    /// Prop or configuration values outside their declared bounds.
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid spring or animation configuration.
    #[error("animation error: {0}")]
    Animation(String),

    /// Failure while evaluating a frame.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Serialization or parse failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped foreign error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build [`ReelError::InvalidRange`].
    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::InvalidRange(msg.into())
    }

    /// Build [`ReelError::DegenerateTimeline`].
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateTimeline(msg.into())
    }

    /// Build [`ReelError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build [`ReelError::Animation`].
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build [`ReelError::Evaluation`].
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build [`ReelError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for errors detected while building a composition, before any frame is evaluated.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidRange(_) | Self::DegenerateTimeline(_) | Self::Animation(_)
        )
    }
}

impl From<serde_json::Error> for ReelError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
