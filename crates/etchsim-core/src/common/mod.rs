pub mod config;

pub use config::{EtchsimConfig, FluxSummaryConfig, PredictionConfig, ReferenceInterval};
