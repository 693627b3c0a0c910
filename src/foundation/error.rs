/// Result type used across segmark.
pub type SegmarkResult<T> = Result<T, SegmarkError>;

/// Error taxonomy of the annotation, codec and overlay APIs.
#[derive(thiserror::Error, Debug)]
pub enum SegmarkError {
    /// Invalid caller data: bad chunk intervals, empty viewports, incomplete submissions.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed run-length mask payloads.
    #[error("codec error: {0}")]
    Codec(String),

    /// Failures while rasterizing overlays or loading label fonts.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Failure reported by a [`SegmentationService`](crate::SegmentationService).
    #[error("segmentation service error: {0}")]
    Service(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SegmarkError {
    /// Build a [`SegmarkError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SegmarkError::Codec`] value.
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// Build a [`SegmarkError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`SegmarkError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`SegmarkError::Service`] value.
    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }
}

impl From<serde_json::Error> for SegmarkError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
