//! PanelRun — the whole pipeline scripted for tests.
//!
//! Runs the same entry points a caller would: pixel buffer → height grid →
//! mesh → binary STL, keeping every intermediate for inspection.

use litho_format::{ScadOptions, panel_to_scad, write_stl, write_stl_parallel};
use litho_kernel::{HeightGrid, PanelParameters, PixelBuffer, extract_height_grid};
use litho_tessellation::{GenerationControl, Mesh, PolarMeshBuilder};

use crate::helpers::HarnessError;
use crate::oracle::{self, OracleVerdict};
use crate::report::PanelReport;

/// One completed generation with its intermediates.
#[derive(Debug, Clone)]
pub struct PanelRun {
    pub params: PanelParameters,
    pub grid: HeightGrid,
    pub mesh: Mesh,
    pub stl: Vec<u8>,
}

impl PanelRun {
    /// Run the pipeline on raw RGBA bytes.
    pub fn from_rgba(
        width: usize,
        height: usize,
        rgba: &[u8],
        params: &PanelParameters,
    ) -> Result<Self, HarnessError> {
        let image = PixelBuffer::new(width, height, rgba)?;
        let grid = extract_height_grid(&image)?;
        Self::from_grid(grid, params)
    }

    /// Run the pipeline on an already extracted grid.
    pub fn from_grid(grid: HeightGrid, params: &PanelParameters) -> Result<Self, HarnessError> {
        let mesh = PolarMeshBuilder::new(&grid, params)?.build()?;
        let stl = write_stl(&mesh)?;
        Ok(Self {
            params: *params,
            grid,
            mesh,
            stl,
        })
    }

    pub fn resolution(&self) -> usize {
        self.grid.resolution()
    }

    /// Mesh oracles plus the byte-level ones.
    pub fn verdicts(&self) -> Vec<OracleVerdict> {
        let mut verdicts = oracle::run_all_mesh_checks(&self.mesh, &self.params, self.resolution());
        verdicts.push(oracle::check_stl_len(&self.stl, self.resolution()));
        verdicts.push(oracle::check_stl_round_trip(&self.stl, &self.mesh));
        verdicts
    }

    /// Fail with the first failing oracle.
    pub fn verify(&self) -> Result<(), HarnessError> {
        match self.verdicts().into_iter().find(|v| !v.passed) {
            None => Ok(()),
            Some(v) => Err(HarnessError::OracleFailure {
                oracle: v.oracle_name,
                detail: v.detail,
            }),
        }
    }

    /// Regenerate through the parallel writer for comparison.
    pub fn parallel_stl(&self) -> Result<Vec<u8>, HarnessError> {
        let builder = PolarMeshBuilder::new(&self.grid, &self.params)?;
        Ok(write_stl_parallel(&builder, &GenerationControl::new())?)
    }

    /// OpenSCAD text for the same grid and parameters.
    pub fn scad(&self) -> Result<String, HarnessError> {
        Ok(panel_to_scad(&self.grid, &self.params, &ScadOptions::default())?)
    }

    pub fn report(&self) -> PanelReport {
        PanelReport::from_run(self)
    }
}
