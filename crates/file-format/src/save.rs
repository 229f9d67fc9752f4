use litho_kernel::PanelParameters;
use serde::Serialize;

use crate::errors::LoadError;
use crate::metadata::ParameterMetadata;

/// Format identifier written to every parameter file.
pub const FORMAT_NAME: &str = "litho-panel";

/// Current parameter file version.
pub const FORMAT_VERSION: u32 = 2;

/// The top-level file structure.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterFile<'a> {
    pub format: &'static str,
    pub version: u32,
    pub metadata: &'a ParameterMetadata,
    pub parameters: &'a PanelParameters,
}

/// Serialize parameters and metadata to pretty-printed JSON.
pub fn save_parameters(
    params: &PanelParameters,
    metadata: &ParameterMetadata,
) -> Result<String, LoadError> {
    let file = ParameterFile {
        format: FORMAT_NAME,
        version: FORMAT_VERSION,
        metadata,
        parameters: params,
    };
    serde_json::to_string_pretty(&file).map_err(|e| LoadError::ParseError(e.to_string()))
}
