//! Direct Fourier transform of a 2-D curve on a fixed, non-harmonic frequency
//! grid.
//!
//! Points are packed as `z = x + i*y`. The grid is `linspace(-50, 50, N)` for an
//! N-point curve rather than the integer harmonics of an FFT, so coefficients
//! are evaluated directly in O(N^2). Reconstruction evaluates the resulting
//! trigonometric sum at any number of samples on `[0, 1)`.

use super::KernelError;
use crate::geometry::{Curve, Point2};
use num_complex::Complex64;
use std::f64::consts::TAU;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub const FREQUENCY_GRID_MIN: f64 = -50.0;
pub const FREQUENCY_GRID_MAX: f64 = 50.0;
pub const DEFAULT_RECONSTRUCTION_SAMPLES: usize = 400;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrequencyRepresentation {
    frequencies: Vec<f64>,
    coefficients: Vec<Complex64>,
}

impl FrequencyRepresentation {
    pub fn new(frequencies: Vec<f64>, coefficients: Vec<Complex64>) -> Result<Self, KernelError> {
        if frequencies.len() != coefficients.len() {
            return Err(KernelError::LengthMismatch {
                first: frequencies.len(),
                second: coefficients.len(),
            });
        }

        Ok(Self {
            frequencies,
            coefficients,
        })
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn coefficients(&self) -> &[Complex64] {
        &self.coefficients
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, Complex64)> + '_ {
        self.frequencies
            .iter()
            .copied()
            .zip(self.coefficients.iter().copied())
    }

    /// Indices of the `top_k` largest-magnitude coefficients, largest first.
    /// Equal magnitudes keep index order.
    fn dominant_indices(&self, top_k: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.len()).collect();
        indices.sort_by(|left, right| {
            self.coefficients[*right]
                .norm()
                .total_cmp(&self.coefficients[*left].norm())
        });
        indices.truncate(top_k);
        indices
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconstructionOptions {
    pub samples: usize,
    pub top_k: Option<usize>,
}

impl ReconstructionOptions {
    pub fn new(samples: usize, top_k: Option<usize>) -> Self {
        Self { samples, top_k }
    }

    pub fn with_samples(samples: usize) -> Self {
        Self {
            samples,
            top_k: None,
        }
    }
}

impl Default for ReconstructionOptions {
    fn default() -> Self {
        Self::with_samples(DEFAULT_RECONSTRUCTION_SAMPLES)
    }
}

/// `count` frequencies linearly spaced over `[-50, 50]`, both ends included.
pub fn frequency_grid(count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![FREQUENCY_GRID_MIN],
        _ => {
            let step = (FREQUENCY_GRID_MAX - FREQUENCY_GRID_MIN) / (count - 1) as f64;
            let mut grid: Vec<f64> = (0..count)
                .map(|index| FREQUENCY_GRID_MIN + index as f64 * step)
                .collect();
            grid[count - 1] = FREQUENCY_GRID_MAX;
            grid
        }
    }
}

/// `c_k = (1/N) * sum_n z_n * exp(-2*pi*i*f_k*n/N)`.
///
/// An empty curve yields an empty representation.
pub fn forward_transform(curve: &Curve) -> FrequencyRepresentation {
    let samples: Vec<Complex64> = curve
        .points()
        .iter()
        .map(|point| Complex64::new(point.x, point.y))
        .collect();
    let frequencies = frequency_grid(samples.len());
    let count = samples.len() as f64;

    let coefficients = collect_indexed(frequencies.len(), |index| {
        let frequency = frequencies[index];
        let mut sum = Complex64::new(0.0, 0.0);
        for (n, sample) in samples.iter().enumerate() {
            let phase = Complex64::from_polar(1.0, -TAU * frequency * n as f64 / count);
            sum += sample * phase;
        }
        sum / count
    });

    FrequencyRepresentation {
        frequencies,
        coefficients,
    }
}

/// `z(t_j) = sum_k c_k * exp(2*pi*i*f_k*t_j)` with `t_j = j / samples`.
///
/// The output length is `options.samples` whatever the representation length.
/// With `top_k` set only the largest coefficients contribute.
pub fn reconstruct(
    representation: &FrequencyRepresentation,
    options: ReconstructionOptions,
) -> Curve {
    let indices: Vec<usize> = match options.top_k {
        Some(top_k) => representation.dominant_indices(top_k),
        None => (0..representation.len()).collect(),
    };
    let sample_count = options.samples as f64;

    let points = collect_indexed(options.samples, |sample| {
        let t = sample as f64 / sample_count;
        let mut z = Complex64::new(0.0, 0.0);
        for index in &indices {
            let phase = Complex64::from_polar(1.0, TAU * representation.frequencies[*index] * t);
            z += representation.coefficients[*index] * phase;
        }
        Point2::new(z.re, z.im)
    });

    Curve::new(points)
}

#[cfg(feature = "parallel")]
fn collect_indexed<T, F>(count: usize, evaluate: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Send + Sync,
{
    (0..count).into_par_iter().map(evaluate).collect()
}

#[cfg(not(feature = "parallel"))]
fn collect_indexed<T, F>(count: usize, evaluate: F) -> Vec<T>
where
    F: Fn(usize) -> T,
{
    (0..count).map(evaluate).collect()
}
