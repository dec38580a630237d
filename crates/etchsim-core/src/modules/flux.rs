//! Derives the kernel's scalar inputs from a measured ion-flux time series.
//!
//! The measurement table is a CSV with a header row; each data row holds the
//! measured depth followed by flux samples taken every `sample_interval` time
//! units. The leading rows are averaged column-wise into one series.

use crate::common::FluxSummaryConfig;
use crate::domain::{EtchError, EtchResult, ProcessParameters};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepositionMode {
    #[default]
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FluxRecord {
    pub measured_depth: f64,
    pub series: Vec<f64>,
}

impl FluxRecord {
    pub fn time_stamps(&self, sample_interval: f64) -> Vec<f64> {
        (0..self.series.len())
            .map(|index| sample_interval * (index + 1) as f64)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxSummary {
    pub average_ion_flux: f64,
    pub n_cycles: u32,
    pub sample_count: usize,
}

/// Counts rising crossings: `series[i] <= threshold && series[i + 1] > threshold`.
pub fn count_cycles(series: &[f64], threshold: f64) -> usize {
    series
        .windows(2)
        .filter(|pair| pair[0] <= threshold && pair[1] > threshold)
        .count()
}

pub fn threshold_filter(series: &[f64], threshold: f64) -> Vec<f64> {
    series
        .iter()
        .copied()
        .filter(|value| *value > threshold)
        .collect()
}

/// Parses the numeric rows of a measurement CSV, skipping the header line and
/// blank lines.
pub fn parse_flux_table(source: &str) -> EtchResult<Vec<Vec<f64>>> {
    let mut rows = Vec::new();
    for (line_index, line) in source.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }

        let row = line
            .split(',')
            .enumerate()
            .map(|(column, field)| {
                field.trim().parse::<f64>().map_err(|_| {
                    EtchError::input_validation(
                        "INPUT.FLUX_CSV",
                        format!(
                            "line {} column {}: '{}' is not a number",
                            line_index + 1,
                            column + 1,
                            field.trim()
                        ),
                    )
                })
            })
            .collect::<EtchResult<Vec<f64>>>()?;
        rows.push(row);
    }
    Ok(rows)
}

/// Column-wise mean of the first `count` rows; column 0 becomes the measured
/// depth and the rest the flux series. Rows shorter than the first row are an
/// input error.
pub fn average_leading_rows(rows: &[Vec<f64>], count: usize) -> EtchResult<FluxRecord> {
    let selected = &rows[..rows.len().min(count.max(1))];
    let Some(first) = selected.first() else {
        return Err(EtchError::input_validation(
            "INPUT.FLUX_EMPTY",
            "flux table has no data rows",
        ));
    };
    let width = first.len();
    if width == 0 {
        return Err(EtchError::input_validation(
            "INPUT.FLUX_EMPTY",
            "flux table rows have no columns",
        ));
    }

    let mut sums = vec![0.0_f64; width];
    for (row_index, row) in selected.iter().enumerate() {
        if row.len() != width {
            return Err(EtchError::input_validation(
                "INPUT.FLUX_ROW_WIDTH",
                format!(
                    "flux row {} has {} columns, expected {}",
                    row_index + 1,
                    row.len(),
                    width
                ),
            ));
        }
        for (sum, value) in sums.iter_mut().zip(row) {
            *sum += value;
        }
    }

    let row_count = selected.len() as f64;
    let mut averaged = sums.into_iter().map(|sum| sum / row_count);
    let measured_depth = averaged.next().unwrap_or_default();
    Ok(FluxRecord {
        measured_depth,
        series: averaged.collect(),
    })
}

/// Summarizes `series[window]` (clamped to the series bounds): the cycle count
/// over the raw window and the mean of samples above the filter threshold
/// (0 when none are).
pub fn summarize_window(
    series: &[f64],
    window: Range<usize>,
    config: &FluxSummaryConfig,
) -> FluxSummary {
    let end = window.end.min(series.len());
    let start = window.start.min(end);
    let selected = &series[start..end];

    let filtered = threshold_filter(selected, config.flux_filter_threshold);
    let average_ion_flux = if filtered.is_empty() {
        0.0
    } else {
        filtered.iter().sum::<f64>() / filtered.len() as f64
    };
    let n_cycles = count_cycles(selected, config.cycle_threshold);

    FluxSummary {
        average_ion_flux,
        n_cycles: u32::try_from(n_cycles).unwrap_or(u32::MAX),
        sample_count: selected.len(),
    }
}

/// Scales raw flux readings into lookup-table units and attaches the
/// deposition levels.
pub fn parameters_from_flux(
    summary: &FluxSummary,
    neutral_flux: f64,
    deposition: DepositionMode,
    config: &FluxSummaryConfig,
) -> ProcessParameters {
    let (dep_ion_flux, dep_neu_flux) = match deposition {
        DepositionMode::Enabled => (config.deposition_ion_flux, config.deposition_neu_flux),
        DepositionMode::Disabled => (0.0, 0.0),
    };

    ProcessParameters::new(
        summary.average_ion_flux / config.flux_scale,
        neutral_flux / config.flux_scale,
        dep_ion_flux,
        dep_neu_flux,
        summary.n_cycles,
    )
}
