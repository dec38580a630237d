use crate::domain::ProcessParameters;
use serde::{Deserialize, Serialize};

/// Linear etch-depth model:
/// `depth0 + n_cycles * (k_etch_ion*ion + k_etch_neu*neu - k_dep_ion*dep_ion - k_dep_neu*dep_neu)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DepthModel {
    pub depth0: f64,
    pub k_etch_ion: f64,
    pub k_etch_neu: f64,
    pub k_dep_ion: f64,
    pub k_dep_neu: f64,
}

impl DepthModel {
    pub const fn from_coefficients(coefficients: [f64; 5]) -> Self {
        Self {
            depth0: coefficients[0],
            k_etch_ion: coefficients[1],
            k_etch_neu: coefficients[2],
            k_dep_ion: coefficients[3],
            k_dep_neu: coefficients[4],
        }
    }

    pub const fn coefficients(&self) -> [f64; 5] {
        [
            self.depth0,
            self.k_etch_ion,
            self.k_etch_neu,
            self.k_dep_ion,
            self.k_dep_neu,
        ]
    }

    pub fn predict(&self, parameters: &ProcessParameters) -> f64 {
        let per_cycle = self.k_etch_ion * parameters.etch_ion_flux
            + self.k_etch_neu * parameters.etch_neu_flux
            - self.k_dep_ion * parameters.dep_ion_flux
            - self.k_dep_neu * parameters.dep_neu_flux;
        self.depth0 + per_cycle * f64::from(parameters.n_cycles)
    }
}

impl Default for DepthModel {
    fn default() -> Self {
        Self::from_coefficients([
            0.6107013349023487,
            0.08764549541244973,
            0.4704964371594592,
            -0.0021575778435470455,
            0.21221505218096873,
        ])
    }
}
