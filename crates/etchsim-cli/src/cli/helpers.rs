use super::CliError;
use anyhow::Context;
use etchsim_core::common::EtchsimConfig;
use etchsim_core::domain::{EtchError, ProcessParameters};
use etchsim_core::geometry::{Curve, Point2};
use etchsim_core::modules::{LookupTable, Prediction, ProfileInterpolator, render_svg};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

pub(super) const DEFAULT_LOG_FILTER: &str = "warn";

/// Logs go to stderr so stdout stays parseable with `--json`.
pub(super) fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub(super) fn load_config(path: Option<&Path>) -> Result<EtchsimConfig, CliError> {
    match path {
        Some(path) => Ok(EtchsimConfig::from_json_file(path)?),
        None => Ok(EtchsimConfig::default()),
    }
}

pub(super) fn load_table(path: &Path) -> Result<LookupTable, CliError> {
    let table = LookupTable::from_json_file(path)?;
    tracing::debug!(path = %path.display(), entries = table.len(), "loaded lookup table");
    Ok(table)
}

/// Reads a JSON array of `[x, y]` (or `[x, y, z]`) points.
pub(super) fn load_points(path: &Path) -> Result<Curve, CliError> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read points file '{}'", path.display()))?;
    let raw: Vec<Vec<f64>> = serde_json::from_str(&content).map_err(|error| {
        EtchError::input_validation(
            "INPUT.POINTS_JSON",
            format!("failed to parse points file '{}': {}", path.display(), error),
        )
    })?;

    raw.iter()
        .enumerate()
        .map(|(index, point)| match point.as_slice() {
            [x, y, ..] => Ok(Point2::new(*x, *y)),
            _ => Err(CliError::Compute(EtchError::input_validation(
                "INPUT.POINTS_JSON",
                format!("point {} has {} components, expected at least 2", index, point.len()),
            ))),
        })
        .collect()
}

pub(super) fn read_text(path: &Path, what: &str) -> Result<String, CliError> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {} '{}'", what, path.display()))?;
    Ok(content)
}

/// Writes the curve as SVG; returns `false` without touching the file when the
/// curve is empty.
pub(super) fn write_svg(path: &Path, curve: &Curve) -> Result<bool, CliError> {
    let Some(document) = render_svg(curve) else {
        tracing::warn!(path = %path.display(), "curve has no points, SVG not written");
        return Ok(false);
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create SVG directory '{}'", parent.display()))?;
    }
    fs::write(path, document)
        .with_context(|| format!("failed to write SVG '{}'", path.display()))?;
    Ok(true)
}

pub(super) fn predict_with_table(
    table: &LookupTable,
    config: &EtchsimConfig,
    parameters: &ProcessParameters,
    svg_path: Option<&Path>,
) -> Result<PredictionReport, CliError> {
    let interpolator = ProfileInterpolator::new(table, &config.prediction)?;
    let prediction = interpolator.predict(parameters)?;

    let svg_written = match svg_path {
        Some(path) => write_svg(path, &prediction.curve)?.then(|| path.to_path_buf()),
        None => None,
    };

    Ok(PredictionReport::new(*parameters, &prediction, svg_written))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PredictionReport {
    pub(super) parameters: ProcessParameters,
    pub(super) ion_weight: f64,
    pub(super) neutral_weight: f64,
    pub(super) profile_depth: f64,
    pub(super) model_depth: f64,
    pub(super) point_count: usize,
    pub(super) used_fallback: bool,
    pub(super) warnings: Vec<String>,
    pub(super) svg_path: Option<PathBuf>,
}

impl PredictionReport {
    fn new(
        parameters: ProcessParameters,
        prediction: &Prediction,
        svg_path: Option<PathBuf>,
    ) -> Self {
        tracing::debug!(ion = ?prediction.ion, neutral = ?prediction.neutral, "prediction axes");
        Self {
            parameters,
            ion_weight: prediction.ion.upper_weight(),
            neutral_weight: prediction.neutral.upper_weight(),
            profile_depth: prediction.profile_depth,
            model_depth: prediction.model_depth,
            point_count: prediction.curve.len(),
            used_fallback: prediction.used_fallback(),
            warnings: prediction.warnings.iter().map(ToString::to_string).collect(),
            svg_path,
        }
    }
}

pub(super) fn render_prediction_summary(report: &PredictionReport) -> String {
    let mut lines = vec![
        format!(
            "Parameters: ion={} neutral={} dep_ion={} dep_neutral={} cycles={}",
            report.parameters.etch_ion_flux,
            report.parameters.etch_neu_flux,
            report.parameters.dep_ion_flux,
            report.parameters.dep_neu_flux,
            report.parameters.n_cycles
        ),
        format!(
            "Blend weights: ion={} neutral={}",
            report.ion_weight, report.neutral_weight
        ),
        format!("Predicted profile depth: {}", report.profile_depth),
        format!("Model depth: {}", report.model_depth),
        format!("Profile points: {}", report.point_count),
    ];
    if let Some(path) = &report.svg_path {
        lines.push(format!("SVG written: {}", path.display()));
    }
    for warning in &report.warnings {
        lines.push(format!("Warning: {}", warning));
    }
    lines.join("\n")
}

pub(super) fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value).map_err(|error| {
        EtchError::internal(
            "RUN.JSON_OUTPUT",
            format!("failed to serialize JSON output: {}", error),
        )
    })?;
    println!("{}", rendered);
    Ok(())
}
