pub mod curve;

pub use curve::{BoundingBox, Curve, Point2};
