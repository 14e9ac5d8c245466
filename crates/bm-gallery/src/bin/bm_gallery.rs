use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use bm_core::{ImageView, RoiSpec, Unit};
use bm_profile::{BeamBand, BeamOptions, BeamProfiler, CentroidOptions};
use bm_stats::ThresholdSpec;
use clap::{Args, Parser, Subcommand};
use image::ColorType;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "bm_gallery")]
#[command(about = "Run beam-metrology measurements on external fixtures")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(name = "report")]
    Report(ReportArgs),
    #[command(name = "centroid")]
    Centroid(CentroidArgs),
}

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Grayscale PNG to measure (8-bit or 16-bit)
    #[arg(long, required = true)]
    input: PathBuf,

    /// Pixel pitch in microns
    #[arg(long)]
    pitch_um: Option<f64>,

    /// Unit for reported lengths: pixels, microns, milli or metres
    #[arg(long, default_value = "pixels")]
    unit: String,

    /// Threshold as a fraction of the floor-to-peak span
    #[arg(long, default_value_t = 0.1)]
    threshold_frac: f64,

    /// Absolute threshold in counts (overrides --threshold-frac)
    #[arg(long)]
    threshold: Option<f64>,

    /// Tail fraction averaged for the noise-floor/peak estimate
    #[arg(long, default_value_t = 0.001)]
    sample_frac: f64,

    /// Region of interest as 1-based inclusive xmin,ymin,xmax,ymax pixels
    #[arg(long)]
    roi: Option<String>,

    /// Output JSON path; stdout when omitted
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct ReportArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Bottom band edge as a fraction of the floor-to-peak span
    #[arg(long, default_value_t = 0.1)]
    band_bottom: f64,

    /// Top band edge as a fraction of the floor-to-peak span
    #[arg(long, default_value_t = 0.9)]
    band_top: f64,
}

#[derive(Args, Debug, Clone)]
struct CentroidArgs {
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Debug, Clone, Serialize)]
struct CentroidDto {
    unit: Unit,
    x: f64,
    y: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.cmd {
        Command::Report(args) => run_report(args),
        Command::Centroid(args) => run_centroid(args),
    }
}

fn run_report(args: ReportArgs) -> Result<()> {
    let (mut profiler, unit, threshold) = prepare(&args.common)?;

    let report = profiler
        .beam_parameters(&BeamOptions {
            unit: Some(unit),
            threshold,
            sample_fraction: args.common.sample_frac,
            band: BeamBand {
                bottom: args.band_bottom,
                top: args.band_top,
            },
        })
        .context("measuring beam parameters")?;

    emit_json(args.common.out.as_deref(), &report)
}

fn run_centroid(args: CentroidArgs) -> Result<()> {
    let (mut profiler, unit, threshold) = prepare(&args.common)?;

    let centroid = profiler
        .centroid(&CentroidOptions {
            unit: Some(unit),
            threshold,
            sample_fraction: args.common.sample_frac,
        })
        .context("measuring centroid")?;

    emit_json(
        args.common.out.as_deref(),
        &CentroidDto {
            unit,
            x: centroid.x,
            y: centroid.y,
        },
    )
}

/// Load the fixture and apply the shared flags in order: pitch first (the
/// region may be given in physical units), then the region.
fn prepare(common: &CommonArgs) -> Result<(BeamProfiler, Unit, ThresholdSpec)> {
    let unit: Unit = common.unit.parse().context("parsing --unit")?;
    let mut profiler = load_profiler(&common.input)?;

    if let Some(pitch) = common.pitch_um {
        profiler
            .set_pixel_pitch(pitch, Unit::Microns)
            .context("setting pixel pitch")?;
    }
    if let Some(spec) = &common.roi {
        profiler
            .set_roi(&parse_roi(spec)?)
            .context("resolving --roi")?;
    }

    let threshold = match common.threshold {
        Some(cut) => ThresholdSpec::Absolute(cut),
        None => ThresholdSpec::Fraction(common.threshold_frac),
    };

    Ok((profiler, unit, threshold))
}

fn load_profiler(path: &Path) -> Result<BeamProfiler> {
    let dyn_img =
        image::open(path).with_context(|| format!("opening input image {}", path.display()))?;

    let deep = matches!(
        dyn_img.color(),
        ColorType::L16 | ColorType::La16 | ColorType::Rgb16 | ColorType::Rgba16
    );

    let profiler = if deep {
        let luma = dyn_img.to_luma16();
        let (w, h) = luma.dimensions();
        let view = ImageView::from_slice(w as usize, h as usize, w as usize, luma.as_raw())
            .context("wrapping decoded pixels")?;
        BeamProfiler::from_u16(&view)
    } else {
        let luma = dyn_img.to_luma8();
        let (w, h) = luma.dimensions();
        let view = ImageView::from_slice(w as usize, h as usize, w as usize, luma.as_raw())
            .context("wrapping decoded pixels")?;
        BeamProfiler::from_u8(&view)
    };

    profiler.with_context(|| format!("constructing profiler from {}", path.display()))
}

fn parse_roi(spec: &str) -> Result<RoiSpec> {
    let parts = spec
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()
        .with_context(|| format!("parsing --roi '{spec}'"))?;

    if parts.len() != 4 {
        bail!(
            "--roi wants 4 comma-separated values, got {}.",
            parts.len()
        );
    }

    Ok(RoiSpec {
        xmin: Some(parts[0]),
        ymin: Some(parts[1]),
        xmax: Some(parts[2]),
        ymax: Some(parts[3]),
        ..RoiSpec::default()
    })
}

fn emit_json(out: Option<&Path>, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    match out {
        Some(path) => {
            fs::write(path, bytes).with_context(|| format!("writing json {}", path.display()))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes).context("writing json to stdout")?;
            stdout.write_all(b"\n").context("writing json to stdout")
        }
    }
}
