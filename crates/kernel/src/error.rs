/// Result type for panel generation.
pub type Result<T> = std::result::Result<T, LithoError>;

/// Errors raised while turning an image into a panel mesh.
///
/// Every variant is reported synchronously; nothing is retried. A failed
/// generation has to be re-run by the caller with corrected input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LithoError {
    /// Zero-sized or malformed pixel buffer.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Parameters violate a geometric invariant or an accepted range.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// A triangle had a zero-length normal and the active policy rejects it.
    #[error("degenerate triangle #{triangle}: zero-length normal")]
    DegenerateGeometry { triangle: usize },

    /// Emitted triangle or byte count disagrees with the analytic prediction.
    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Generation was cancelled through its cancel token.
    #[error("generation cancelled")]
    Cancelled,
}

impl LithoError {
    pub fn invalid_image(msg: impl Into<String>) -> Self {
        Self::InvalidImage(msg.into())
    }

    pub fn invalid_parameters(msg: impl Into<String>) -> Self {
        Self::InvalidParameters(msg.into())
    }
}
