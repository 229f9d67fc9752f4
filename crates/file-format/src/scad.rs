//! Procedural-solid output rendered as OpenSCAD text.
//!
//! The solid is built from the same height grid and parameters as the mesh:
//! one ring of elliptic relief pillars per radial row, standing on the back
//! plane at `z = min_height`, and the support stand tube below it.

use std::f64::consts::TAU;
use std::fmt::Write;

use tracing::{debug, instrument};

use litho_kernel::{HeightGrid, PanelParameters, Tolerance, height_for_gray};
use litho_tessellation::PolarGrid;

use crate::errors::ExportError;

/// Overlap added above and below cutting cylinders so differences leave no
/// coincident faces.
const CUT_MARGIN: f64 = 1.0;

/// A constructive solid expression.
#[derive(Debug, Clone, PartialEq)]
pub enum SolidNode {
    /// Upright cylinder with its base on `z = 0`.
    Cylinder { radius: f64, height: f64 },
    Union(Vec<SolidNode>),
    /// `base` minus every node in `cut`.
    Difference {
        base: Box<SolidNode>,
        cut: Vec<SolidNode>,
    },
    Translate {
        offset: [f64; 3],
        child: Box<SolidNode>,
    },
    /// Euler angles in degrees.
    Rotate {
        degrees: [f64; 3],
        child: Box<SolidNode>,
    },
    Scale {
        factors: [f64; 3],
        child: Box<SolidNode>,
    },
}

impl SolidNode {
    pub fn cylinder(radius: f64, height: f64) -> Self {
        Self::Cylinder { radius, height }
    }

    pub fn union(children: Vec<SolidNode>) -> Self {
        Self::Union(children)
    }

    pub fn difference(base: SolidNode, cut: Vec<SolidNode>) -> Self {
        Self::Difference {
            base: Box::new(base),
            cut,
        }
    }

    pub fn translated(self, offset: [f64; 3]) -> Self {
        Self::Translate {
            offset,
            child: Box::new(self),
        }
    }

    pub fn rotated_z(self, degrees: f64) -> Self {
        Self::Rotate {
            degrees: [0.0, 0.0, degrees],
            child: Box::new(self),
        }
    }

    pub fn scaled(self, factors: [f64; 3]) -> Self {
        Self::Scale {
            factors,
            child: Box::new(self),
        }
    }

    /// Vertical extent `(min z, max z)`, or `None` for an empty tree or one
    /// rotated off the z axis. A difference is bounded by its base.
    pub fn z_range(&self) -> Option<(f64, f64)> {
        match self {
            Self::Cylinder { height, .. } => Some((0.0, *height)),
            Self::Union(children) => children
                .iter()
                .filter_map(Self::z_range)
                .reduce(|(lo, hi), (l, h)| (lo.min(l), hi.max(h))),
            Self::Difference { base, .. } => base.z_range(),
            Self::Translate { offset, child } => child
                .z_range()
                .map(|(lo, hi)| (lo + offset[2], hi + offset[2])),
            Self::Rotate { degrees, child } => {
                if degrees[0] == 0.0 && degrees[1] == 0.0 {
                    child.z_range()
                } else {
                    None
                }
            }
            Self::Scale { factors, child } => child.z_range().map(|(lo, hi)| {
                let (a, b) = (lo * factors[2], hi * factors[2]);
                (a.min(b), a.max(b))
            }),
        }
    }

    /// Number of cylinder primitives in the tree.
    pub fn cylinder_count(&self) -> usize {
        match self {
            Self::Cylinder { .. } => 1,
            Self::Union(children) => children.iter().map(Self::cylinder_count).sum(),
            Self::Difference { base, cut } => {
                base.cylinder_count() + cut.iter().map(Self::cylinder_count).sum::<usize>()
            }
            Self::Translate { child, .. } | Self::Rotate { child, .. } | Self::Scale { child, .. } => {
                child.cylinder_count()
            }
        }
    }
}

/// Rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScadOptions {
    /// Global `$fn` facet count.
    pub facets: u32,
    /// Digits after the decimal point.
    pub precision: usize,
}

impl Default for ScadOptions {
    fn default() -> Self {
        Self {
            facets: 64,
            precision: 4,
        }
    }
}

/// A cylinder whose bottom sits `CUT_MARGIN` below `z = 0` and whose top
/// clears `height` by the same margin.
fn cutter(radius: f64, height: f64) -> SolidNode {
    SolidNode::cylinder(radius, height + 2.0 * CUT_MARGIN).translated([0.0, 0.0, -CUT_MARGIN])
}

/// Build the panel and stand as one solid.
///
/// The panel body spans the same heights as the mesh: nothing below the
/// back plane but the stand. Cells whose relief above the back plane is flat
/// under `tolerance` get no pillar, and rows left without pillars are
/// dropped.
#[instrument(skip(grid, params, tolerance), fields(resolution = grid.resolution()))]
pub fn build_panel_solid(
    grid: &HeightGrid,
    params: &PanelParameters,
    tolerance: &Tolerance,
) -> litho_kernel::Result<SolidNode> {
    params.validate()?;
    let r = grid.resolution();
    let polar = PolarGrid::new(r, params.inner_radius(), params.outer_radius());
    let base_height = params.min_height;
    let step = TAU / r as f64;

    let mut rings = Vec::new();
    let mut pillars = 0usize;
    for i in 0..r {
        let (r1, r2) = (polar.ring_radius(i), polar.ring_radius(i + 1));
        let mid_radius = (r1 + r2) / 2.0;
        let ring: Vec<SolidNode> = (0..r)
            .filter_map(|j| {
                let relief =
                    height_for_gray(grid.gray(i, j), params.min_height, params.max_height)
                        - base_height;
                if tolerance.is_flat(relief) {
                    return None;
                }
                let angle = (j as f64 + 0.5) * step;
                Some(
                    SolidNode::cylinder(0.5, 1.0)
                        .scaled([r2 - r1, mid_radius * step, relief])
                        .rotated_z(angle.to_degrees())
                        .translated([mid_radius * angle.cos(), mid_radius * angle.sin(), base_height]),
                )
            })
            .collect();
        if !ring.is_empty() {
            pillars += ring.len();
            rings.push(SolidNode::union(ring));
        }
    }

    let stand_height = params.wall_height + params.min_height;
    let stand = SolidNode::difference(
        SolidNode::cylinder(params.stand_outer_radius(), stand_height),
        vec![cutter(params.stand_inner_radius(), stand_height)],
    )
    .translated([0.0, 0.0, -params.wall_height]);

    debug!(pillars, "procedural solid built");
    let mut parts = Vec::with_capacity(2);
    if !rings.is_empty() {
        parts.push(SolidNode::union(rings));
    }
    parts.push(stand);
    Ok(SolidNode::union(parts))
}

struct ScadWriter<'a> {
    out: String,
    options: &'a ScadOptions,
}

impl ScadWriter<'_> {
    fn num(&self, value: f64) -> String {
        let text = format!("{:.*}", self.options.precision, value);
        // "-0.0000" reads as noise in diffs.
        if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
            text[1..].to_string()
        } else {
            text
        }
    }

    fn vector(&self, v: [f64; 3]) -> String {
        format!("[{}, {}, {}]", self.num(v[0]), self.num(v[1]), self.num(v[2]))
    }

    fn block(&mut self, head: &str, children: &[&SolidNode], depth: usize) -> std::fmt::Result {
        writeln!(self.out, "{:indent$}{} {{", "", head, indent = depth * 2)?;
        for child in children {
            self.node(child, depth + 1)?;
        }
        writeln!(self.out, "{:indent$}}}", "", indent = depth * 2)
    }

    fn node(&mut self, node: &SolidNode, depth: usize) -> std::fmt::Result {
        match node {
            SolidNode::Cylinder { radius, height } => {
                let line = format!("cylinder(h = {}, r = {});", self.num(*height), self.num(*radius));
                writeln!(self.out, "{:indent$}{}", "", line, indent = depth * 2)
            }
            SolidNode::Union(children) => {
                let children: Vec<&SolidNode> = children.iter().collect();
                self.block("union()", &children, depth)
            }
            SolidNode::Difference { base, cut } => {
                let children: Vec<&SolidNode> =
                    std::iter::once(base.as_ref()).chain(cut.iter()).collect();
                self.block("difference()", &children, depth)
            }
            SolidNode::Translate { offset, child } => {
                let head = format!("translate({})", self.vector(*offset));
                self.block(&head, &[child.as_ref()], depth)
            }
            SolidNode::Rotate { degrees, child } => {
                let head = format!("rotate({})", self.vector(*degrees));
                self.block(&head, &[child.as_ref()], depth)
            }
            SolidNode::Scale { factors, child } => {
                let head = format!("scale({})", self.vector(*factors));
                self.block(&head, &[child.as_ref()], depth)
            }
        }
    }
}

/// Render a solid tree as OpenSCAD source.
pub fn render_scad(solid: &SolidNode, options: &ScadOptions) -> Result<String, ExportError> {
    let mut writer = ScadWriter {
        out: String::new(),
        options,
    };
    writeln!(writer.out, "$fn = {};", options.facets)?;
    writer.node(solid, 0)?;
    Ok(writer.out)
}

/// Build and render the procedural solid for a panel.
pub fn panel_to_scad(
    grid: &HeightGrid,
    params: &PanelParameters,
    options: &ScadOptions,
) -> Result<String, ExportError> {
    let solid = build_panel_solid(grid, params, &Tolerance::default())?;
    render_scad(&solid, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cylinder_count_walks_tree() {
        let tree = SolidNode::union(vec![
            SolidNode::cylinder(1.0, 1.0),
            SolidNode::difference(
                SolidNode::cylinder(2.0, 1.0),
                vec![SolidNode::cylinder(1.0, 1.0).translated([0.0, 0.0, -1.0])],
            ),
        ]);
        assert_eq!(tree.cylinder_count(), 3);
    }

    #[test]
    fn test_z_range_follows_transforms() {
        let tree = SolidNode::union(vec![
            SolidNode::cylinder(1.0, 2.0).scaled([1.0, 1.0, 3.0]).translated([0.0, 0.0, 1.0]),
            SolidNode::difference(
                SolidNode::cylinder(2.0, 1.0).translated([0.0, 0.0, -4.0]),
                vec![SolidNode::cylinder(1.0, 10.0).translated([0.0, 0.0, -8.0])],
            ),
        ]);
        assert_eq!(tree.z_range(), Some((-4.0, 7.0)));
        assert_eq!(SolidNode::union(vec![]).z_range(), None);
    }

    #[test]
    fn test_render_nests_blocks() {
        let tree = SolidNode::cylinder(0.5, 1.0).scaled([2.0, 3.0, 4.0]).rotated_z(90.0);
        let text = render_scad(&tree, &ScadOptions::default()).unwrap();
        let expected = "$fn = 64;\n\
                        rotate([0.0000, 0.0000, 90.0000]) {\n\
                        \x20 scale([2.0000, 3.0000, 4.0000]) {\n\
                        \x20   cylinder(h = 1.0000, r = 0.5000);\n\
                        \x20 }\n\
                        }\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_negative_zero_is_printed_plain() {
        let tree = SolidNode::cylinder(1.0, 1.0).translated([-0.00001, 0.0, -2.0]);
        let text = render_scad(&tree, &ScadOptions { facets: 12, precision: 2 }).unwrap();
        assert!(text.starts_with("$fn = 12;\ntranslate([0.00, 0.00, -2.00])"));
    }

    #[test]
    fn test_white_image_has_no_pillars() {
        let grid = HeightGrid::uniform(4, 255.0).unwrap();
        let solid =
            build_panel_solid(&grid, &PanelParameters::default(), &Tolerance::default()).unwrap();
        // Stand outer and stand bore only.
        assert_eq!(solid.cylinder_count(), 2);
        assert_eq!(solid.z_range(), Some((-5.0, 0.5)));
    }

    #[test]
    fn test_one_pillar_per_raised_cell() {
        let samples = (0..9).map(|k| if k % 2 == 0 { 0.0 } else { 255.0 }).collect();
        let grid = HeightGrid::from_samples(3, samples).unwrap();
        let solid =
            build_panel_solid(&grid, &PanelParameters::default(), &Tolerance::default()).unwrap();
        assert_eq!(solid.cylinder_count(), 2 + 5);
    }
}
