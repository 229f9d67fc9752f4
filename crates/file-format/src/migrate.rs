use litho_kernel::WALL_THICKNESS;
use serde_json::Value;

use crate::errors::LoadError;

/// Apply format migrations from `from_version` to `to_version`.
///
/// Migrations run one step at a time: v1→v2, v2→v3, and so on.
pub fn migrate(mut parameters: Value, from_version: u32, to_version: u32) -> Result<Value, LoadError> {
    for version in from_version..to_version {
        parameters = match version {
            1 => migrate_v1_to_v2(parameters)?,
            _ => {
                return Err(LoadError::MigrationFailed {
                    from: version,
                    to: version + 1,
                    reason: format!("no migration path from v{} to v{}", version, version + 1),
                });
            }
        };
    }
    Ok(parameters)
}

/// v1 stored the stand thickness explicitly; it is now a constant.
fn migrate_v1_to_v2(mut parameters: Value) -> Result<Value, LoadError> {
    let failed = |reason: String| LoadError::MigrationFailed { from: 1, to: 2, reason };
    let object = parameters
        .as_object_mut()
        .ok_or_else(|| failed("parameters must be an object".to_string()))?;

    if let Some(thickness) = object.remove("wallThickness") {
        match thickness.as_f64() {
            Some(t) if (t - WALL_THICKNESS).abs() < 1e-9 => {}
            _ => {
                return Err(failed(format!(
                    "wallThickness {} is not supported; only {} is",
                    thickness, WALL_THICKNESS
                )));
            }
        }
    }
    Ok(parameters)
}
