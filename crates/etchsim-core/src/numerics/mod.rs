pub mod blend;
pub mod interval;
pub mod smoothing;
pub mod transform;

pub use blend::{blend_curves, blend_representations};
pub use interval::{CLAMPED_WEIGHT, IntervalPosition, linear_weight, locate_in_interval};
pub use smoothing::{DEFAULT_SMOOTHING_ITERATIONS, smooth};
pub use transform::{
    DEFAULT_RECONSTRUCTION_SAMPLES, FREQUENCY_GRID_MAX, FREQUENCY_GRID_MIN,
    FrequencyRepresentation, ReconstructionOptions, forward_transform, frequency_grid,
    reconstruct,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    #[error("curve component length mismatch: x={x_len}, y={y_len}")]
    DimensionMismatch { x_len: usize, y_len: usize },
    #[error("frequency representation length mismatch: first={first}, second={second}")]
    LengthMismatch { first: usize, second: usize },
    #[error("interval requires at least 2 points, got {point_count}")]
    DegenerateInterval { point_count: usize },
    #[error("interval spacing must be finite and > 0, got {step}")]
    InvalidIntervalStep { step: f64 },
    #[error("interval query must be finite, got {value}")]
    NonFiniteQuery { value: f64 },
    #[error("{iterations} smoothing passes would collapse a {point_count}-point curve")]
    SmoothingCollapse {
        point_count: usize,
        iterations: usize,
    },
}
