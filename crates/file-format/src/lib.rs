//! Output formats for lithophane panels (binary STL, OpenSCAD text) and the
//! versioned JSON file that stores panel parameters.

pub mod errors;
pub mod load;
pub mod metadata;
pub mod migrate;
pub mod save;
pub mod scad;
pub mod stl;

pub use errors::{ExportError, LoadError};
pub use load::load_parameters;
pub use metadata::ParameterMetadata;
pub use save::{FORMAT_NAME, FORMAT_VERSION, save_parameters};
pub use scad::{ScadOptions, SolidNode, build_panel_solid, panel_to_scad, render_scad};
pub use stl::{StlCursor, read_stl, stl_len, write_header, write_stl, write_stl_parallel};

use litho_kernel::{HeightGrid, PanelParameters};
use litho_tessellation::{GenerationControl, PolarMeshBuilder};

/// Generate a panel straight into binary STL bytes.
pub fn panel_to_stl(
    grid: &HeightGrid,
    params: &PanelParameters,
    control: &GenerationControl,
) -> Result<Vec<u8>, ExportError> {
    let builder = PolarMeshBuilder::new(grid, params)?;
    Ok(write_stl_parallel(&builder, control)?)
}
