/// Convenience result type used across paintmask.
pub type PaintMaskResult<T> = Result<T, PaintMaskError>;

/// Errors surfaced at the configuration, IO and image boundaries.
///
/// Painting mutations never produce these: an invalid call sequence is reported through a
/// `bool`/`Option` return and leaves the painting untouched.
#[derive(thiserror::Error, Debug)]
pub enum PaintMaskError {
    /// Invalid sizes or malformed input data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Settings that fail to parse or validate.
    #[error("config error: {0}")]
    Config(String),

    /// A target that cannot be produced or written.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PaintMaskError {
    /// Build a [`PaintMaskError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PaintMaskError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`PaintMaskError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
