pub mod depth;
pub mod flux;
pub mod interpolator;
pub mod lookup;
pub mod render;

pub use depth::DepthModel;
pub use flux::{
    DepositionMode, FluxRecord, FluxSummary, average_leading_rows, count_cycles,
    parameters_from_flux, parse_flux_table, summarize_window, threshold_filter,
};
pub use interpolator::{
    AxisBlend, CornerCurves, Prediction, PredictionWarning, ProfileInterpolator,
    hierarchical_blend,
};
pub use lookup::{LookupRecord, LookupTable, ProcessKey, Retrieved};
pub use render::{RenderFrame, render_svg};
