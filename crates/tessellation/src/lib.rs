//! Polar tessellation of a height grid into a closed lithophane panel plus
//! its support stand.
//!
//! The triangle order is fixed up front by [`TriangleLayout`]; the builder can
//! produce any triangle by index, or the whole mesh in one sequential pass.

pub mod builder;
pub mod control;
pub mod layout;
pub mod mesh;
pub mod polar;

pub use builder::PolarMeshBuilder;
pub use control::{CancelToken, GenerationControl, ProgressCallback};
pub use layout::{STL_PREAMBLE_LEN, STL_RECORD_LEN, Shell, Slot, SurfaceKind, TriangleLayout};
pub use mesh::{Mesh, SurfaceRange};
pub use polar::{PolarGrid, angular_index, radial_sample_row};

use litho_kernel::{HeightGrid, PanelParameters, Result};

/// Build the full panel mesh with default tolerances and no progress hooks.
pub fn build_panel_mesh(grid: &HeightGrid, params: &PanelParameters) -> Result<Mesh> {
    PolarMeshBuilder::new(grid, params)?.build()
}
