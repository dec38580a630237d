pub mod errors;

pub use errors::{EtchError, EtchErrorCategory, EtchResult};

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Scalar process inputs consumed by the interpolator and the depth model.
///
/// Flux values are in the scaled units used by the lookup table keys
/// (raw flux divided by the configured flux scale).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessParameters {
    pub etch_ion_flux: f64,
    pub etch_neu_flux: f64,
    pub dep_ion_flux: f64,
    pub dep_neu_flux: f64,
    pub n_cycles: u32,
}

impl ProcessParameters {
    pub fn new(
        etch_ion_flux: f64,
        etch_neu_flux: f64,
        dep_ion_flux: f64,
        dep_neu_flux: f64,
        n_cycles: u32,
    ) -> Self {
        Self {
            etch_ion_flux,
            etch_neu_flux,
            dep_ion_flux,
            dep_neu_flux,
            n_cycles,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterAxis {
    IonFlux,
    NeutralFlux,
}

impl ParameterAxis {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IonFlux => "ion-flux",
            Self::NeutralFlux => "neutral-flux",
        }
    }
}

impl Display for ParameterAxis {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}
