use crate::numerics::KernelError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Self) -> Self {
        Self::new(0.5 * (self.x + other.x), 0.5 * (self.y + other.y))
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Ordered boundary profile. Point order defines the parametrization used by
/// the frequency transform, so curves are never re-sorted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Curve {
    points: Vec<Point2>,
}

impl Curve {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    pub fn from_xy(xs: &[f64], ys: &[f64]) -> Result<Self, KernelError> {
        if xs.len() != ys.len() {
            return Err(KernelError::DimensionMismatch {
                x_len: xs.len(),
                y_len: ys.len(),
            });
        }

        Ok(Self::new(
            xs.iter()
                .zip(ys)
                .map(|(x, y)| Point2::new(*x, *y))
                .collect(),
        ))
    }

    /// Flat profile `(i, 0)` for `i in 0..point_count`, used when a lookup
    /// entry is missing.
    pub fn flat(point_count: usize) -> Self {
        Self::new(
            (0..point_count)
                .map(|index| Point2::new(index as f64, 0.0))
                .collect(),
        )
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Extends the curve to `length` points by repeating its last point.
    /// Curves already at least `length` long, and empty curves, are returned
    /// unchanged.
    pub fn padded_to(&self, length: usize) -> Self {
        let Some(last) = self.points.last().copied() else {
            return self.clone();
        };
        if self.points.len() >= length {
            return self.clone();
        }

        let mut points = Vec::with_capacity(length);
        points.extend_from_slice(&self.points);
        points.resize(length, last);
        Self::new(points)
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.points.first()?;
        let mut bounds = BoundingBox {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };

        for point in &self.points[1..] {
            bounds.min_x = bounds.min_x.min(point.x);
            bounds.max_x = bounds.max_x.max(point.x);
            bounds.min_y = bounds.min_y.min(point.y);
            bounds.max_y = bounds.max_y.max(point.y);
        }

        Some(bounds)
    }

    pub fn max_abs_deviation(&self, other: &Self) -> Option<f64> {
        if self.len() != other.len() {
            return None;
        }

        Some(
            self.points
                .iter()
                .zip(&other.points)
                .map(|(a, b)| (a.x - b.x).abs().max((a.y - b.y).abs()))
                .fold(0.0_f64, f64::max),
        )
    }
}

impl From<Vec<Point2>> for Curve {
    fn from(points: Vec<Point2>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Point2> for Curve {
    fn from_iter<I: IntoIterator<Item = Point2>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn max_extent(&self) -> f64 {
        self.width().max(self.height())
    }
}
