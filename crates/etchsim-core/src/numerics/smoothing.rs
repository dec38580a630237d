use super::KernelError;
use crate::geometry::Curve;

pub const DEFAULT_SMOOTHING_ITERATIONS: usize = 10;

/// Midpoint (Laplacian) smoothing: each pass maps `N` points to `N - 1`
/// midpoints of consecutive pairs, so `iterations` passes shorten the curve by
/// `iterations` points.
///
/// An empty curve is returned as-is. A non-empty curve that would shrink to
/// zero points is rejected.
pub fn smooth(curve: &Curve, iterations: usize) -> Result<Curve, KernelError> {
    if curve.is_empty() {
        return Ok(Curve::default());
    }
    if iterations >= curve.len() {
        return Err(KernelError::SmoothingCollapse {
            point_count: curve.len(),
            iterations,
        });
    }

    let mut points = curve.points().to_vec();
    for _ in 0..iterations {
        points = points
            .windows(2)
            .map(|pair| pair[0].midpoint(pair[1]))
            .collect();
    }

    Ok(Curve::new(points))
}
