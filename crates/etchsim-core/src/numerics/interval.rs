use super::KernelError;

/// Weight reported for queries outside the interval points. A clamped
/// position is not a blend: only the endpoint it was clamped to applies.
pub const CLAMPED_WEIGHT: f64 = -1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalPosition {
    pub lower: f64,
    pub upper: f64,
    pub weight: f64,
}

impl IntervalPosition {
    pub fn is_clamped(&self) -> bool {
        self.weight == CLAMPED_WEIGHT
    }

    pub fn blend_weight(&self) -> Option<f64> {
        (!self.is_clamped()).then_some(self.weight)
    }
}

/// `(x - lower) / (upper - lower)` without clamping.
pub fn linear_weight(lower: f64, upper: f64, x: f64) -> f64 {
    (x - lower) / (upper - lower)
}

/// Locates `x` among sorted, uniformly spaced `points`.
///
/// Spacing is taken from the first two points and is not checked against the
/// rest. Queries below the first or above the last point clamp to that point
/// with [`CLAMPED_WEIGHT`].
pub fn locate_in_interval(points: &[f64], x: f64) -> Result<IntervalPosition, KernelError> {
    if points.len() < 2 {
        return Err(KernelError::DegenerateInterval {
            point_count: points.len(),
        });
    }
    if !x.is_finite() {
        return Err(KernelError::NonFiniteQuery { value: x });
    }

    let step = points[1] - points[0];
    if !step.is_finite() || step <= 0.0 {
        return Err(KernelError::InvalidIntervalStep { step });
    }

    let first = points[0];
    let last = points[points.len() - 1];
    if x < first {
        return Ok(IntervalPosition {
            lower: first,
            upper: first,
            weight: CLAMPED_WEIGHT,
        });
    }
    if x > last {
        return Ok(IntervalPosition {
            lower: last,
            upper: last,
            weight: CLAMPED_WEIGHT,
        });
    }

    let index = (((x - first) / step).floor() as usize).min(points.len() - 2);
    let lower = points[index];
    let upper = points[index + 1];

    Ok(IntervalPosition {
        lower,
        upper,
        weight: (x - lower) / step,
    })
}

#[cfg(test)]
mod tests {
    use super::{CLAMPED_WEIGHT, IntervalPosition, linear_weight, locate_in_interval};
    use crate::numerics::KernelError;

    #[test]
    fn linear_weight_spans_unit_range() {
        assert_eq!(linear_weight(2.0, 4.0, 2.0), 0.0);
        assert_eq!(linear_weight(2.0, 4.0, 4.0), 1.0);
        assert_eq!(linear_weight(2.0, 4.0, 3.0), 0.5);
        assert_eq!(linear_weight(0.5, 1.5, 2.0), 1.5);
    }

    #[test]
    fn locate_inside_reference_interval() {
        let middle = locate_in_interval(&[2.0, 4.0], 3.0).expect("valid interval");
        assert_eq!(
            middle,
            IntervalPosition {
                lower: 2.0,
                upper: 4.0,
                weight: 0.5
            }
        );
        assert_eq!(
            locate_in_interval(&[2.0, 4.0], 2.0).expect("valid").weight,
            0.0
        );
        assert_eq!(
            locate_in_interval(&[2.0, 4.0], 4.0).expect("valid").weight,
            1.0
        );
    }

    #[test]
    fn out_of_range_queries_clamp_with_sentinel() {
        let below = locate_in_interval(&[2.0, 4.0], 1.0).expect("valid interval");
        assert_eq!((below.lower, below.upper, below.weight), (2.0, 2.0, CLAMPED_WEIGHT));
        assert!(below.is_clamped());
        assert_eq!(below.blend_weight(), None);

        let above = locate_in_interval(&[2.0, 4.0], 5.0).expect("valid interval");
        assert_eq!((above.lower, above.upper, above.weight), (4.0, 4.0, CLAMPED_WEIGHT));
    }

    #[test]
    fn locate_picks_containing_sub_interval() {
        let points = [0.0, 10.0, 20.0, 30.0];
        let position = locate_in_interval(&points, 25.0).expect("valid interval");
        assert_eq!((position.lower, position.upper), (20.0, 30.0));
        assert!((position.weight - 0.5).abs() < 1.0e-12);
        assert_eq!(position.blend_weight(), Some(position.weight));
    }

    #[test]
    fn degenerate_intervals_are_rejected() {
        assert_eq!(
            locate_in_interval(&[2.0], 2.0).expect_err("single point"),
            KernelError::DegenerateInterval { point_count: 1 }
        );
        assert_eq!(
            locate_in_interval(&[2.0, 2.0], 2.0).expect_err("zero spacing"),
            KernelError::InvalidIntervalStep { step: 0.0 }
        );
        assert!(matches!(
            locate_in_interval(&[2.0, 4.0], f64::NAN),
            Err(KernelError::NonFiniteQuery { .. })
        ));
    }
}
