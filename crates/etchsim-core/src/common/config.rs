//! Runtime configuration for prediction and flux summarizing.
//!
//! Defaults reproduce the reference lookup table's layout: ion flux sampled at
//! 2 and 4, neutral flux at 0.5 and 1.5, deposition fixed at (3, 2).

use crate::domain::{EtchError, EtchResult};
use crate::modules::depth::DepthModel;
use crate::numerics::{
    DEFAULT_RECONSTRUCTION_SAMPLES, DEFAULT_SMOOTHING_ITERATIONS, ReconstructionOptions,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ReferenceInterval {
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub const fn points(&self) -> [f64; 2] {
        [self.lower, self.upper]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PredictionConfig {
    pub ion_interval: ReferenceInterval,
    pub neutral_interval: ReferenceInterval,
    pub reference_dep_ion: f64,
    pub reference_dep_neu: f64,
    pub reconstruction_samples: usize,
    pub top_k: Option<usize>,
    pub smoothing_iterations: usize,
    /// Scale on the lower-endpoint depth in the depth blend. The reference
    /// tool uses 2; 1 gives a plain linear blend.
    pub depth_second_term_scale: f64,
    pub fallback_point_count: usize,
    pub depth_model: DepthModel,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            ion_interval: ReferenceInterval::new(2.0, 4.0),
            neutral_interval: ReferenceInterval::new(0.5, 1.5),
            reference_dep_ion: 3.0,
            reference_dep_neu: 2.0,
            reconstruction_samples: DEFAULT_RECONSTRUCTION_SAMPLES,
            top_k: None,
            smoothing_iterations: DEFAULT_SMOOTHING_ITERATIONS,
            depth_second_term_scale: 2.0,
            fallback_point_count: 100,
            depth_model: DepthModel::default(),
        }
    }
}

impl PredictionConfig {
    pub fn reconstruction_options(&self) -> ReconstructionOptions {
        ReconstructionOptions::new(self.reconstruction_samples, self.top_k)
    }

    pub fn validate(&self) -> EtchResult<()> {
        for (name, interval) in [
            ("ionInterval", self.ion_interval),
            ("neutralInterval", self.neutral_interval),
        ] {
            if !(interval.lower.is_finite()
                && interval.upper.is_finite()
                && interval.lower < interval.upper)
            {
                return Err(EtchError::input_validation(
                    "INPUT.CONFIG_INTERVAL",
                    format!(
                        "{} must satisfy lower < upper with finite bounds, got [{}, {}]",
                        name, interval.lower, interval.upper
                    ),
                ));
            }
        }

        if self.smoothing_iterations >= self.reconstruction_samples {
            return Err(EtchError::input_validation(
                "INPUT.CONFIG_SMOOTHING",
                format!(
                    "smoothingIterations ({}) must be below reconstructionSamples ({})",
                    self.smoothing_iterations, self.reconstruction_samples
                ),
            ));
        }

        if self.top_k == Some(0) {
            return Err(EtchError::input_validation(
                "INPUT.CONFIG_TOP_K",
                "topK must be at least 1 when set",
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FluxSummaryConfig {
    /// A cycle is counted each time the series rises above this level.
    pub cycle_threshold: f64,
    /// Samples at or below this level are excluded from the flux average.
    pub flux_filter_threshold: f64,
    /// Divisor turning raw flux readings into lookup-table units.
    pub flux_scale: f64,
    pub leading_rows: usize,
    pub deposition_ion_flux: f64,
    pub deposition_neu_flux: f64,
    pub sample_interval: f64,
}

impl Default for FluxSummaryConfig {
    fn default() -> Self {
        Self {
            cycle_threshold: 4800.0,
            flux_filter_threshold: 2500.0,
            flux_scale: 1000.0,
            leading_rows: 4,
            deposition_ion_flux: 3.0,
            deposition_neu_flux: 2.0,
            sample_interval: 250.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EtchsimConfig {
    pub prediction: PredictionConfig,
    pub flux: FluxSummaryConfig,
}

impl EtchsimConfig {
    pub fn from_json_str(source: &str) -> EtchResult<Self> {
        let config: Self = serde_json::from_str(source).map_err(|error| {
            EtchError::input_validation(
                "INPUT.CONFIG_JSON",
                format!("failed to parse configuration: {}", error),
            )
        })?;
        config.prediction.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> EtchResult<Self> {
        let source = fs::read_to_string(path).map_err(|error| {
            EtchError::io_system(
                "IO.CONFIG_READ",
                format!("failed to read configuration '{}': {}", path.display(), error),
            )
        })?;
        Self::from_json_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::{EtchsimConfig, PredictionConfig, ReferenceInterval};

    #[test]
    fn defaults_follow_reference_table_layout() {
        let config = PredictionConfig::default();
        assert_eq!(config.ion_interval.points(), [2.0, 4.0]);
        assert_eq!(config.neutral_interval.points(), [0.5, 1.5]);
        assert_eq!(config.reconstruction_options().samples, 400);
        assert_eq!(config.smoothing_iterations, 10);
        assert_eq!(config.depth_second_term_scale, 2.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config = EtchsimConfig::from_json_str(
            r#"{
                "prediction": {"reconstructionSamples": 128, "depthSecondTermScale": 1.0},
                "flux": {"cycleThreshold": 10.0}
            }"#,
        )
        .expect("valid configuration");

        assert_eq!(config.prediction.reconstruction_samples, 128);
        assert_eq!(config.prediction.depth_second_term_scale, 1.0);
        assert_eq!(config.prediction.ion_interval, ReferenceInterval::new(2.0, 4.0));
        assert_eq!(config.flux.cycle_threshold, 10.0);
        assert_eq!(config.flux.flux_scale, 1000.0);
    }

    #[test]
    fn invalid_intervals_and_smoothing_are_rejected() {
        let inverted = EtchsimConfig::from_json_str(
            r#"{"prediction": {"ionInterval": {"lower": 4.0, "upper": 2.0}}}"#,
        )
        .expect_err("inverted interval");
        assert_eq!(inverted.placeholder(), "INPUT.CONFIG_INTERVAL");

        let collapsing = EtchsimConfig::from_json_str(
            r#"{"prediction": {"reconstructionSamples": 8, "smoothingIterations": 8}}"#,
        )
        .expect_err("smoothing would collapse");
        assert_eq!(collapsing.placeholder(), "INPUT.CONFIG_SMOOTHING");
    }
}
