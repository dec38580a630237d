//! Two-stage profile interpolation over the (ion flux, neutral flux) plane.
//!
//! The four lookup corners sit at the endpoints of the ion and neutral
//! reference intervals. Stage one morphs along the ion axis at both neutral
//! endpoints; stage two morphs the two intermediates along the neutral axis.
//! A parameter outside its interval clamps to the nearest endpoint, which is
//! the same as blending at weight 0 or 1.

use crate::common::PredictionConfig;
use crate::domain::{EtchResult, ParameterAxis, ProcessParameters};
use crate::geometry::Curve;
use crate::modules::lookup::{LookupTable, ProcessKey, Retrieved};
use crate::numerics::{
    IntervalPosition, KernelError, ReconstructionOptions, blend_curves, linear_weight,
    locate_in_interval, smooth,
};
use std::fmt::{Display, Formatter};

/// How one parameter axis contributes to the blend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisBlend {
    /// `weight * upper + (1 - weight) * lower`.
    Weighted(f64),
    Lower,
    Upper,
}

impl AxisBlend {
    pub fn resolve(position: &IntervalPosition, lower: f64, upper: f64, value: f64) -> Self {
        if !position.is_clamped() {
            return Self::Weighted(linear_weight(lower, upper, value));
        }
        if position.lower == lower {
            Self::Lower
        } else {
            Self::Upper
        }
    }

    /// Effective weight of the upper endpoint.
    pub fn upper_weight(&self) -> f64 {
        match self {
            Self::Weighted(weight) => *weight,
            Self::Lower => 0.0,
            Self::Upper => 1.0,
        }
    }

    fn blend(
        &self,
        upper: &Curve,
        lower: &Curve,
        options: ReconstructionOptions,
    ) -> Result<Curve, KernelError> {
        blend_curves(upper, lower, self.upper_weight(), options)
    }
}

/// Corner profiles indexed by (ion endpoint, neutral endpoint).
#[derive(Debug, Clone, Copy)]
pub struct CornerCurves<'a> {
    pub ion_lower_neu_lower: &'a Curve,
    pub ion_upper_neu_lower: &'a Curve,
    pub ion_lower_neu_upper: &'a Curve,
    pub ion_upper_neu_upper: &'a Curve,
}

impl<'a> CornerCurves<'a> {
    pub fn uniform(curve: &'a Curve) -> Self {
        Self {
            ion_lower_neu_lower: curve,
            ion_upper_neu_lower: curve,
            ion_lower_neu_upper: curve,
            ion_upper_neu_upper: curve,
        }
    }
}

/// Morphs the four corners into one profile, before smoothing.
pub fn hierarchical_blend(
    corners: CornerCurves<'_>,
    ion: AxisBlend,
    neutral: AxisBlend,
    options: ReconstructionOptions,
) -> Result<Curve, KernelError> {
    let at_neu_lower = ion.blend(
        corners.ion_upper_neu_lower,
        corners.ion_lower_neu_lower,
        options,
    )?;
    let at_neu_upper = ion.blend(
        corners.ion_upper_neu_upper,
        corners.ion_lower_neu_upper,
        options,
    )?;
    neutral.blend(&at_neu_upper, &at_neu_lower, options)
}

/// `first * w + scale * (1 - w) * second`, with `w` the ion-axis weight.
///
/// `first` is the (ion lower, neutral lower) corner depth and `second` the
/// (ion lower, neutral upper) one.
pub fn blend_depth(first_depth: f64, second_depth: f64, ion: AxisBlend, scale: f64) -> f64 {
    let weight = ion.upper_weight();
    first_depth * weight + scale * (1.0 - weight) * second_depth
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredictionWarning {
    MissingLookupEntry {
        key: ProcessKey,
    },
    ClampedParameter {
        axis: ParameterAxis,
        value: f64,
        endpoint: f64,
    },
}

impl Display for PredictionWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingLookupEntry { key } => {
                write!(f, "lookup entry {} missing; used flat fallback profile", key)
            }
            Self::ClampedParameter {
                axis,
                value,
                endpoint,
            } => write!(
                f,
                "{} value {} outside reference interval; clamped to {}",
                axis, value, endpoint
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub curve: Curve,
    /// Depth interpolated from the lookup table.
    pub profile_depth: f64,
    /// Depth from the closed-form model.
    pub model_depth: f64,
    pub ion: AxisBlend,
    pub neutral: AxisBlend,
    pub warnings: Vec<PredictionWarning>,
}

impl Prediction {
    pub fn used_fallback(&self) -> bool {
        self.warnings
            .iter()
            .any(|warning| matches!(warning, PredictionWarning::MissingLookupEntry { .. }))
    }
}

pub struct ProfileInterpolator<'a> {
    table: &'a LookupTable,
    config: &'a PredictionConfig,
}

impl<'a> ProfileInterpolator<'a> {
    pub fn new(table: &'a LookupTable, config: &'a PredictionConfig) -> EtchResult<Self> {
        config.validate()?;
        Ok(Self { table, config })
    }

    pub fn corner_key(&self, etch_ion: f64, etch_neu: f64, n_cycles: u32) -> ProcessKey {
        ProcessKey::new(
            etch_ion,
            etch_neu,
            self.config.reference_dep_ion,
            self.config.reference_dep_neu,
            n_cycles,
        )
    }

    pub fn predict(&self, parameters: &ProcessParameters) -> EtchResult<Prediction> {
        let mut warnings = Vec::new();
        let ion = self.resolve_axis(
            ParameterAxis::IonFlux,
            self.config.ion_interval.points(),
            parameters.etch_ion_flux,
            &mut warnings,
        )?;
        let neutral = self.resolve_axis(
            ParameterAxis::NeutralFlux,
            self.config.neutral_interval.points(),
            parameters.etch_neu_flux,
            &mut warnings,
        )?;
        tracing::debug!(?ion, ?neutral, "resolved blend weights");

        let [ion_lower, ion_upper] = self.config.ion_interval.points();
        let [neu_lower, neu_upper] = self.config.neutral_interval.points();
        let cycles = parameters.n_cycles;
        let corners = [
            self.retrieve(self.corner_key(ion_lower, neu_lower, cycles), &mut warnings),
            self.retrieve(self.corner_key(ion_upper, neu_lower, cycles), &mut warnings),
            self.retrieve(self.corner_key(ion_lower, neu_upper, cycles), &mut warnings),
            self.retrieve(self.corner_key(ion_upper, neu_upper, cycles), &mut warnings),
        ];

        let options = self.config.reconstruction_options();
        let blended = hierarchical_blend(
            CornerCurves {
                ion_lower_neu_lower: &*corners[0].curve,
                ion_upper_neu_lower: &*corners[1].curve,
                ion_lower_neu_upper: &*corners[2].curve,
                ion_upper_neu_upper: &*corners[3].curve,
            },
            ion,
            neutral,
            options,
        )?;
        let curve = smooth(&blended, self.config.smoothing_iterations)?;

        let profile_depth = blend_depth(
            corners[0].depth,
            corners[2].depth,
            ion,
            self.config.depth_second_term_scale,
        );
        let model_depth = self.config.depth_model.predict(parameters);

        Ok(Prediction {
            curve,
            profile_depth,
            model_depth,
            ion,
            neutral,
            warnings,
        })
    }

    fn resolve_axis(
        &self,
        axis: ParameterAxis,
        [lower, upper]: [f64; 2],
        value: f64,
        warnings: &mut Vec<PredictionWarning>,
    ) -> EtchResult<AxisBlend> {
        let position = locate_in_interval(&[lower, upper], value)?;
        let blend = AxisBlend::resolve(&position, lower, upper, value);
        if position.is_clamped() {
            tracing::warn!(%axis, value, endpoint = position.lower, "parameter clamped to reference endpoint");
            warnings.push(PredictionWarning::ClampedParameter {
                axis,
                value,
                endpoint: position.lower,
            });
        }
        Ok(blend)
    }

    fn retrieve(
        &self,
        key: ProcessKey,
        warnings: &mut Vec<PredictionWarning>,
    ) -> Retrieved<'a> {
        let retrieved = self
            .table
            .retrieve(&key, self.config.fallback_point_count);
        if retrieved.fallback {
            warnings.push(PredictionWarning::MissingLookupEntry { key });
        }
        retrieved
    }
}
