//! Turn an image into a lithophane panel: binary STL and/or OpenSCAD text.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use image::imageops::FilterType;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use litho_format::{
    ParameterMetadata, ScadOptions, load_parameters, panel_to_scad, save_parameters,
    write_stl_parallel,
};
use litho_kernel::{
    DegeneratePolicy, PanelParameters, PixelBuffer, RadialEdgePolicy, extract_height_grid,
};
use litho_tessellation::{GenerationControl, PolarMeshBuilder};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    Default,
    Compact,
    Large,
}

impl Preset {
    fn parameters(self) -> PanelParameters {
        match self {
            Preset::Default => PanelParameters::default(),
            Preset::Compact => PanelParameters::compact(),
            Preset::Large => PanelParameters::large(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "litho-render", version, about = "Generate a circular lithophane panel from an image")]
struct Args {
    /// Input image (any format the `image` crate decodes).
    image: PathBuf,

    /// Parameter file to load; overrides --preset.
    #[arg(short, long)]
    params: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "default")]
    preset: Preset,

    /// Binary STL output. Defaults to the image path with an .stl extension
    /// when no output is given.
    #[arg(long)]
    stl: Option<PathBuf>,

    /// OpenSCAD output.
    #[arg(long)]
    scad: Option<PathBuf>,

    /// Downscale so the shorter image side is at most this many pixels.
    #[arg(long)]
    max_resolution: Option<u32>,

    /// Read the last height row at the rim instead of wrapping to the first.
    #[arg(long)]
    clamp_rim: bool,

    /// Fail on zero-area triangles instead of writing a zero normal.
    #[arg(long)]
    strict: bool,

    /// `$fn` for OpenSCAD cylinders.
    #[arg(long, default_value_t = 64)]
    facets: u32,

    /// Write the effective parameters to this file.
    #[arg(long)]
    save_params: Option<PathBuf>,
}

/// Effective parameters, plus the metadata of the file they came from.
fn resolve_parameters(
    args: &Args,
) -> anyhow::Result<(PanelParameters, Option<ParameterMetadata>)> {
    let (mut params, meta) = match &args.params {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let (params, meta) = load_parameters(&json)
                .with_context(|| format!("loading {}", path.display()))?;
            debug!(name = %meta.name, "parameter file loaded");
            (params, Some(meta))
        }
        None => (args.preset.parameters(), None),
    };
    if args.clamp_rim {
        params = params.with_radial_edge(RadialEdgePolicy::Clamp);
    }
    if args.strict {
        params = params.with_degenerate(DegeneratePolicy::Reject);
    }
    params.validate()?;
    if let Err(e) = params.check_ranges() {
        warn!(%e, "parameters outside the usual range");
    }
    Ok((params, meta))
}

fn load_rgba(path: &Path, max_resolution: Option<u32>) -> anyhow::Result<image::RgbaImage> {
    let mut img = image::open(path).with_context(|| format!("decoding {}", path.display()))?;
    if let Some(cap) = max_resolution {
        let short = img.width().min(img.height());
        if cap == 0 {
            bail!("--max-resolution must be positive");
        }
        if short > cap {
            let scale = cap as f64 / short as f64;
            let w = ((img.width() as f64 * scale).round() as u32).max(cap);
            let h = ((img.height() as f64 * scale).round() as u32).max(cap);
            img = img.resize_exact(w, h, FilterType::Triangle);
            debug!(width = w, height = h, "image downscaled");
        }
    }
    Ok(img.to_rgba8())
}

fn run(args: Args) -> anyhow::Result<()> {
    let (params, loaded_meta) = resolve_parameters(&args)?;

    let rgba = load_rgba(&args.image, args.max_resolution)?;
    let (width, height) = (rgba.width() as usize, rgba.height() as usize);
    let pixels = PixelBuffer::new(width, height, rgba.as_raw())?;
    let grid = extract_height_grid(&pixels)?;
    info!(width, height, resolution = grid.resolution(), "image sampled");

    let stl_path = match (&args.stl, &args.scad) {
        (None, None) => Some(args.image.with_extension("stl")),
        (stl, _) => stl.clone(),
    };

    if let Some(path) = &stl_path {
        let control = GenerationControl::new().with_progress(|stage, fraction| {
            debug!(stage, fraction, "progress");
        });
        let builder = PolarMeshBuilder::new(&grid, &params)?;
        let bytes = write_stl_parallel(&builder, &control)?;
        fs::write(path, &bytes).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), bytes = bytes.len(), "STL written");
    }

    if let Some(path) = &args.scad {
        let options = ScadOptions {
            facets: args.facets,
            ..ScadOptions::default()
        };
        let text = panel_to_scad(&grid, &params, &options)?;
        fs::write(path, &text).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), bytes = text.len(), "OpenSCAD written");
    }

    if let Some(path) = &args.save_params {
        let source = args.image.display().to_string();
        let meta = match loaded_meta {
            Some(mut meta) => {
                meta.touch();
                meta.source_image = Some(source);
                meta
            }
            None => {
                let name = args
                    .image
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "panel".to_string());
                ParameterMetadata::new(name).with_source_image(source)
            }
        };
        let json = save_parameters(&params, &meta)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "parameters saved");
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    run(Args::parse())
}
