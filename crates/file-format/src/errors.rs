use litho_kernel::LithoError;

/// Errors while reading a parameter file or an STL body.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error("failed to parse file: {0}")]
    ParseError(String),

    #[error("unknown file format: {0}")]
    UnknownFormat(String),

    #[error("file version {file_version} is newer than supported version {supported_version}")]
    FutureVersion {
        file_version: u32,
        supported_version: u32,
    },

    #[error("migration failed from version {from} to {to}: {reason}")]
    MigrationFailed { from: u32, to: u32, reason: String },

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("binary STL of {triangles} triangles must be {expected} bytes, got {actual}")]
    StlLength {
        triangles: usize,
        expected: usize,
        actual: usize,
    },
}

/// Errors while producing STL or OpenSCAD output.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExportError {
    #[error("mesh generation failed: {0}")]
    Generation(#[from] LithoError),

    #[error("failed to format OpenSCAD text")]
    Format(#[from] std::fmt::Error),
}
