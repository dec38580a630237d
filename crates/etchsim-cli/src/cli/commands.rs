use super::CliError;
use super::helpers::*;
use etchsim_core::domain::{EtchError, ProcessParameters};
use etchsim_core::modules::{
    DepositionMode, average_leading_rows, parameters_from_flux, parse_flux_table,
    summarize_window,
};
use etchsim_core::numerics::{
    ReconstructionOptions, blend_curves, forward_transform, reconstruct, smooth,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct PredictArgs {
    /// Lookup table JSON keyed by `ion_neu_depIon_depNeu_cycles`
    #[arg(long)]
    table: PathBuf,

    /// Etch ion flux, in table units
    #[arg(long)]
    ion: f64,

    /// Etch neutral flux, in table units
    #[arg(long)]
    neutral: f64,

    /// Deposition ion flux
    #[arg(long, default_value_t = 3.0)]
    dep_ion: f64,

    /// Deposition neutral flux
    #[arg(long, default_value_t = 2.0)]
    dep_neutral: f64,

    /// Number of etch/deposition cycles
    #[arg(long)]
    cycles: u32,

    /// Write the predicted profile as SVG
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Optional JSON configuration overriding the built-in defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a JSON report instead of the human summary
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
pub(super) struct FluxArgs {
    /// Measurement CSV: header row, then `depth, flux_1, flux_2, ...`
    #[arg(long)]
    csv: PathBuf,

    /// First sample index of the analysis window
    #[arg(long, default_value_t = 1000)]
    start: usize,

    /// End sample index (exclusive) of the analysis window
    #[arg(long, default_value_t = 1200)]
    end: usize,

    /// Raw neutral flux, scaled like the ion flux
    #[arg(long, default_value_t = 500.0)]
    neutral: f64,

    /// Zero the deposition fluxes
    #[arg(long)]
    no_deposition: bool,

    /// Lookup table used to predict a profile from the derived parameters
    #[arg(long)]
    table: Option<PathBuf>,

    /// Write the predicted profile as SVG (requires --table)
    #[arg(long, requires = "table")]
    svg: Option<PathBuf>,

    /// Optional JSON configuration overriding the built-in defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a JSON report instead of the human summary
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
pub(super) struct ReconstructArgs {
    /// JSON array of `[x, y]` points
    #[arg(long)]
    points: PathBuf,

    /// Number of reconstructed samples
    #[arg(long, default_value_t = 400)]
    samples: usize,

    /// Keep only the K largest-magnitude coefficients
    #[arg(long)]
    top_k: Option<usize>,

    /// Midpoint smoothing passes applied after reconstruction
    #[arg(long, default_value_t = 10)]
    smooth: usize,

    /// SVG output path
    #[arg(long)]
    svg: PathBuf,
}

#[derive(clap::Args)]
pub(super) struct BlendArgs {
    /// JSON array of `[x, y]` points, weighted by --weight
    #[arg(long)]
    first: PathBuf,

    /// JSON array of `[x, y]` points, weighted by 1 - --weight
    #[arg(long)]
    second: PathBuf,

    /// Blend weight of the first curve
    #[arg(long, allow_negative_numbers = true)]
    weight: f64,

    /// Number of reconstructed samples
    #[arg(long, default_value_t = 400)]
    samples: usize,

    /// Midpoint smoothing passes applied after blending
    #[arg(long, default_value_t = 10)]
    smooth: usize,

    /// SVG output path
    #[arg(long)]
    svg: PathBuf,
}

#[derive(clap::Args)]
pub(super) struct KeysArgs {
    /// Lookup table JSON
    #[arg(long)]
    table: PathBuf,
}

pub(super) fn run_predict_command(args: PredictArgs) -> Result<i32, CliError> {
    let config = load_config(args.config.as_deref())?;
    let table = load_table(&args.table)?;
    let parameters = ProcessParameters::new(
        args.ion,
        args.neutral,
        args.dep_ion,
        args.dep_neutral,
        args.cycles,
    );

    let report = predict_with_table(&table, &config, &parameters, args.svg.as_deref())?;
    if args.json {
        print_json(&report)?;
    } else {
        println!("{}", render_prediction_summary(&report));
    }
    Ok(0)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FluxReport {
    measured_depth: f64,
    average_ion_flux: f64,
    n_cycles: u32,
    sample_count: usize,
    parameters: ProcessParameters,
    model_depth: f64,
    prediction: Option<PredictionReport>,
}

pub(super) fn run_flux_command(args: FluxArgs) -> Result<i32, CliError> {
    if args.start > args.end {
        return Err(CliError::Usage(format!(
            "--start ({}) must not exceed --end ({})",
            args.start, args.end
        )));
    }

    let config = load_config(args.config.as_deref())?;
    let rows = parse_flux_table(&read_text(&args.csv, "flux table")?)?;
    let record = average_leading_rows(&rows, config.flux.leading_rows)?;
    let summary = summarize_window(&record.series, args.start..args.end, &config.flux);
    if summary.sample_count == 0 {
        tracing::warn!(
            start = args.start,
            end = args.end,
            available = record.series.len(),
            "analysis window selects no samples"
        );
    }

    let deposition = if args.no_deposition {
        DepositionMode::Disabled
    } else {
        DepositionMode::Enabled
    };
    let parameters = parameters_from_flux(&summary, args.neutral, deposition, &config.flux);
    let model_depth = config.prediction.depth_model.predict(&parameters);

    let prediction = match &args.table {
        Some(path) => {
            let table = load_table(path)?;
            Some(predict_with_table(
                &table,
                &config,
                &parameters,
                args.svg.as_deref(),
            )?)
        }
        None => None,
    };

    let report = FluxReport {
        measured_depth: record.measured_depth,
        average_ion_flux: summary.average_ion_flux,
        n_cycles: summary.n_cycles,
        sample_count: summary.sample_count,
        parameters,
        model_depth,
        prediction,
    };

    if args.json {
        print_json(&report)?;
        return Ok(0);
    }

    println!("Measured depth: {}", report.measured_depth);
    println!(
        "Window [{}, {}): {} samples, {} cycles, average ion flux {}",
        args.start, args.end, report.sample_count, report.n_cycles, report.average_ion_flux
    );
    match &report.prediction {
        Some(prediction) => println!("{}", render_prediction_summary(prediction)),
        None => println!("Model depth: {}", report.model_depth),
    }
    Ok(0)
}

pub(super) fn run_reconstruct_command(args: ReconstructArgs) -> Result<i32, CliError> {
    if args.samples == 0 {
        return Err(CliError::Usage("--samples must be at least 1".to_string()));
    }

    let curve = load_points(&args.points)?;
    if curve.is_empty() {
        return Err(EtchError::input_validation(
            "INPUT.POINTS_JSON",
            format!("points file '{}' holds no points", args.points.display()),
        )
        .into());
    }

    let representation = forward_transform(&curve);
    let rebuilt = reconstruct(
        &representation,
        ReconstructionOptions::new(args.samples, args.top_k),
    );
    let smoothed = smooth(&rebuilt, args.smooth).map_err(EtchError::from)?;

    write_svg(&args.svg, &smoothed)?;
    println!(
        "Reconstructed {} points into {} ({} after smoothing): {}",
        curve.len(),
        rebuilt.len(),
        smoothed.len(),
        args.svg.display()
    );
    Ok(0)
}

pub(super) fn run_blend_command(args: BlendArgs) -> Result<i32, CliError> {
    if args.samples == 0 {
        return Err(CliError::Usage("--samples must be at least 1".to_string()));
    }
    if !args.weight.is_finite() {
        return Err(CliError::Usage(format!(
            "--weight must be finite, got {}",
            args.weight
        )));
    }

    let first = load_points(&args.first)?;
    let second = load_points(&args.second)?;
    let blended = blend_curves(
        &first,
        &second,
        args.weight,
        ReconstructionOptions::with_samples(args.samples),
    )
    .map_err(EtchError::from)?;
    let smoothed = smooth(&blended, args.smooth).map_err(EtchError::from)?;

    if write_svg(&args.svg, &smoothed)? {
        println!(
            "Blended {} and {} points at weight {} into {} points: {}",
            first.len(),
            second.len(),
            args.weight,
            smoothed.len(),
            args.svg.display()
        );
    } else {
        println!("Blend produced no points; no SVG written");
    }
    Ok(0)
}

pub(super) fn run_keys_command(args: KeysArgs) -> Result<i32, CliError> {
    let table = load_table(&args.table)?;
    for key in table.keys() {
        println!("{}", key);
    }
    Ok(0)
}
