use super::KernelError;
use super::transform::{
    FrequencyRepresentation, ReconstructionOptions, forward_transform, reconstruct,
};
use crate::geometry::Curve;

/// Weighted combination `weight * first + (1 - weight) * second` of both the
/// coefficients and the frequency grids.
///
/// The blended grid generally differs from either input grid and is the one
/// reconstruction must use.
pub fn blend_representations(
    first: &FrequencyRepresentation,
    second: &FrequencyRepresentation,
    weight: f64,
) -> Result<FrequencyRepresentation, KernelError> {
    if first.len() != second.len() {
        return Err(KernelError::LengthMismatch {
            first: first.len(),
            second: second.len(),
        });
    }

    let complement = 1.0 - weight;
    let frequencies = first
        .frequencies()
        .iter()
        .zip(second.frequencies())
        .map(|(f1, f2)| weight * f1 + complement * f2)
        .collect();
    let coefficients = first
        .coefficients()
        .iter()
        .zip(second.coefficients())
        .map(|(c1, c2)| *c1 * weight + *c2 * complement)
        .collect();

    FrequencyRepresentation::new(frequencies, coefficients)
}

/// Morphs two curves: pads the shorter one with its last point, transforms
/// both, blends at `weight` and reconstructs with `options`.
///
/// If either curve is empty there is nothing to morph and an empty curve is
/// returned.
pub fn blend_curves(
    first: &Curve,
    second: &Curve,
    weight: f64,
    options: ReconstructionOptions,
) -> Result<Curve, KernelError> {
    if first.is_empty() || second.is_empty() {
        tracing::warn!(
            first_len = first.len(),
            second_len = second.len(),
            "skipping blend of empty curve"
        );
        return Ok(Curve::default());
    }

    let length = first.len().max(second.len());
    let first = forward_transform(&first.padded_to(length));
    let second = forward_transform(&second.padded_to(length));
    let blended = blend_representations(&first, &second, weight)?;

    Ok(reconstruct(&blended, options))
}

#[cfg(test)]
mod tests {
    use super::{blend_curves, blend_representations};
    use crate::geometry::{Curve, Point2};
    use crate::numerics::transform::{ReconstructionOptions, forward_transform};
    use crate::numerics::KernelError;

    fn arc(count: usize, radius: f64) -> Curve {
        (0..count)
            .map(|index| {
                let angle = index as f64 / count as f64 * std::f64::consts::PI;
                Point2::new(radius * angle.cos(), -radius * angle.sin())
            })
            .collect()
    }

    #[test]
    fn boundary_weights_select_one_input() {
        let a = forward_transform(&arc(101, 2.0));
        let b = forward_transform(&arc(101, 5.0));

        assert_eq!(blend_representations(&a, &b, 0.0).expect("same length"), b);
        assert_eq!(blend_representations(&a, &b, 1.0).expect("same length"), a);
    }

    #[test]
    fn midpoint_blend_averages_grids_and_coefficients() {
        let a = forward_transform(&arc(11, 1.0));
        let b = forward_transform(&arc(11, 3.0));
        let mid = blend_representations(&a, &b, 0.5).expect("same length");

        for index in 0..mid.len() {
            let expected = (a.coefficients()[index] + b.coefficients()[index]) * 0.5;
            assert!((mid.coefficients()[index] - expected).norm() < 1.0e-12);
            assert_eq!(mid.frequencies()[index], a.frequencies()[index]);
        }
    }

    #[test]
    fn unequal_representations_are_rejected() {
        let a = forward_transform(&arc(10, 1.0));
        let b = forward_transform(&arc(12, 1.0));
        assert_eq!(
            blend_representations(&a, &b, 0.5).expect_err("lengths differ"),
            KernelError::LengthMismatch {
                first: 10,
                second: 12
            }
        );
    }

    #[test]
    fn curve_blend_at_zero_reproduces_second_curve() {
        let a = arc(101, 2.0);
        let b = arc(101, 5.0);
        let options = ReconstructionOptions::with_samples(101);

        let at_zero = blend_curves(&a, &b, 0.0, options).expect("blend succeeds");
        let at_one = blend_curves(&a, &b, 1.0, options).expect("blend succeeds");

        assert!(at_zero.max_abs_deviation(&b).expect("same length") < 1.0e-9);
        assert!(at_one.max_abs_deviation(&a).expect("same length") < 1.0e-9);
    }

    #[test]
    fn shorter_curve_is_padded_before_transform() {
        let long = arc(101, 2.0);
        let short = Curve::new(long.points()[..60].to_vec());
        let options = ReconstructionOptions::with_samples(101);

        let rebuilt = blend_curves(&long, &short, 0.0, options).expect("blend succeeds");
        let expected = short.padded_to(101);
        assert!(rebuilt.max_abs_deviation(&expected).expect("same length") < 1.0e-9);
    }

    #[test]
    fn empty_input_yields_empty_curve() {
        let blended = blend_curves(
            &Curve::default(),
            &arc(10, 1.0),
            0.5,
            ReconstructionOptions::default(),
        )
        .expect("empty blend is a no-op");
        assert!(blended.is_empty());
    }
}
