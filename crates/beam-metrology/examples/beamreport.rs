//! Example: full beam report on a single grayscale frame.
//!
//! Loads an 8-bit grayscale PNG and runs `BeamProfiler` end to end: the
//! noise-floor/peak estimate, thresholding, the intensity-weighted centroid
//! and the banded beam parameters (equivalent diameter, widths at the lit
//! and half-maximum levels, top-hat factor). When the input file is missing
//! a synthetic flat-top disc is measured instead, so the example runs out
//! of the box.
//!
//! The report is written to a JSON file next to the input image.
//!
//! Run from the workspace root:
//!   cargo run -p beam-metrology --example beamreport -- --help
//!   cargo run -p beam-metrology --example beamreport -- --pitch-um 5.5 --unit microns

use std::time::Instant;

use anyhow::{Context, Result};
use beam_metrology::{
    BeamOptions, BeamProfiler, BeamReport, CentroidOptions, Image, ImageView, ThresholdSpec, Unit,
};
use clap::Parser;
use image::ImageReader;
use serde::Serialize;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Measure beam metrics on a grayscale frame")]
struct Args {
    /// Path to an 8-bit grayscale PNG (default: data/beam_0.png; a
    /// synthetic disc is measured when the file is missing)
    #[arg(long, default_value = "data/beam_0.png")]
    input: String,

    /// Pixel pitch in microns. Physical report units need this.
    #[arg(long)]
    pitch_um: Option<f64>,

    /// Report unit: pixels, microns, milli or metres
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

    /// Output JSON path (default: <input stem>_report.json next to input)
    #[arg(long)]
    out: Option<String>,
}

// ── JSON DTOs ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct FrameResult {
    input: String,
    width: usize,
    height: usize,
    pixel_pitch_um: Option<f64>,
    /// Wall-clock time for the measurement, in milliseconds.
    elapsed_ms: f64,
    report: BeamReport,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Decode a PNG to 8-bit grayscale and wrap it in a profiler.
fn profiler_from_png(path: &str) -> Result<BeamProfiler> {
    let gray = ImageReader::open(path)
        .with_context(|| format!("opening {path}"))?
        .decode()
        .with_context(|| format!("decoding {path}"))?
        .into_luma8();

    let width = gray.width() as usize;
    let height = gray.height() as usize;
    let view = ImageView::from_slice(width, height, width, gray.as_raw())
        .context("wrapping decoded pixels")?;
    BeamProfiler::from_u8(&view).context("constructing profiler")
}

/// Flat-top disc with a one-pixel linear rim on a dark background.
fn synthetic_disc(width: usize, height: usize, cx: f64, cy: f64, radius: f64) -> Image<f32> {
    let mut data = vec![0.0f32; width * height];
    for y in 0..height {
        for x in 0..width {
            let dx = (x + 1) as f64 - cx;
            let dy = (y + 1) as f64 - cy;
            let r = (dx * dx + dy * dy).sqrt();
            if r <= radius {
                data[y * width + x] = 220.0;
            } else if r <= radius + 1.0 {
                data[y * width + x] = (220.0 * (radius + 1.0 - r)) as f32;
            }
        }
    }
    Image::from_vec(width, height, data).expect("buffer length matches dimensions")
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    let unit: Unit = args.unit.parse().context("parsing --unit")?;
    let img_path = &args.input;
    let out_path = args.out.unwrap_or_else(|| {
        let p = std::path::Path::new(img_path);
        let stem = p.file_stem().unwrap_or_default().to_string_lossy();
        let dir = p.parent().unwrap_or(std::path::Path::new("."));
        dir.join(format!("{stem}_report.json"))
            .to_string_lossy()
            .into_owned()
    });

    let mut profiler = if std::path::Path::new(img_path).exists() {
        let profiler = profiler_from_png(img_path)?;
        println!(
            "loaded {img_path}: {}x{}",
            profiler.width(),
            profiler.height()
        );
        profiler
    } else {
        println!("{img_path} not found; measuring a synthetic flat-top disc instead");
        BeamProfiler::new(synthetic_disc(640, 480, 320.0, 240.0, 120.0))
            .context("constructing profiler")?
    };

    if let Some(pitch) = args.pitch_um {
        profiler
            .set_pixel_pitch(pitch, Unit::Microns)
            .context("setting pixel pitch")?;
    }

    let threshold = match args.threshold {
        Some(cut) => ThresholdSpec::Absolute(cut),
        None => ThresholdSpec::Fraction(args.threshold_frac),
    };
    println!(
        "config: unit={unit}, threshold={threshold:?}, sample_frac={}",
        args.sample_frac
    );

    let t0 = Instant::now();
    let centroid = profiler.centroid(&CentroidOptions {
        unit: Some(unit),
        threshold,
        sample_fraction: args.sample_frac,
    })?;
    let report = profiler.beam_parameters(&BeamOptions {
        unit: Some(unit),
        threshold,
        sample_fraction: args.sample_frac,
        ..BeamOptions::default()
    })?;
    let elapsed_ms = t0.elapsed().as_secs_f64() * 1e3;

    println!(
        "centroid ({:.2}, {:.2}) {unit}  diameter {:.2} {unit}  top-hat {:.3}  ({elapsed_ms:.2} ms)",
        centroid.x, centroid.y, report.diameter, report.top_hat_factor
    );
    println!(
        "levels: noise {:.2}, peak {:.2}, threshold {:.2} counts",
        report.noise_floor, report.peak_level, report.threshold
    );

    let result = FrameResult {
        input: img_path.clone(),
        width: profiler.width(),
        height: profiler.height(),
        pixel_pitch_um: profiler.calibration().pixel_pitch_um(),
        elapsed_ms,
        report,
    };

    let out_file =
        std::fs::File::create(&out_path).with_context(|| format!("creating {out_path}"))?;
    serde_json::to_writer_pretty(out_file, &result)
        .with_context(|| format!("writing JSON to {out_path}"))?;

    println!("report written to {out_path}");
    Ok(())
}
