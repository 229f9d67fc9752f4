use litho_kernel::PanelParameters;
use serde::Deserialize;
use tracing::debug;

use crate::errors::LoadError;
use crate::metadata::ParameterMetadata;
use crate::save::{FORMAT_NAME, FORMAT_VERSION};

/// The top-level file structure before migration.
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterFileRaw {
    pub format: String,
    pub version: u32,
    pub metadata: ParameterMetadata,
    pub parameters: serde_json::Value,
}

/// Deserialize parameters and metadata from a JSON string.
///
/// Older versions are migrated forward; the result is validated so a loaded
/// file can go straight to the mesh builder.
pub fn load_parameters(json: &str) -> Result<(PanelParameters, ParameterMetadata), LoadError> {
    let raw: ParameterFileRaw =
        serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

    if raw.format != FORMAT_NAME {
        return Err(LoadError::UnknownFormat(raw.format));
    }

    if raw.version > FORMAT_VERSION {
        return Err(LoadError::FutureVersion {
            file_version: raw.version,
            supported_version: FORMAT_VERSION,
        });
    }

    let value = if raw.version < FORMAT_VERSION {
        debug!(from = raw.version, to = FORMAT_VERSION, "migrating parameter file");
        crate::migrate::migrate(raw.parameters, raw.version, FORMAT_VERSION)?
    } else {
        raw.parameters
    };

    let params: PanelParameters =
        serde_json::from_value(value).map_err(|e| LoadError::ParseError(e.to_string()))?;
    params
        .validate()
        .map_err(|e| LoadError::InvalidParameters(e.to_string()))?;

    Ok((params, raw.metadata))
}
