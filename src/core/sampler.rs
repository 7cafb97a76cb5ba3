//! Beta-PERT duration sampling

use rand::Rng;
use rand_distr::{Beta, Distribution};

use super::task::Estimate;

/// Draws task durations from a Beta-PERT distribution on `[O, P]`.
///
/// Shape parameters are computed once at construction:
/// `alpha = 1 + 4(M-O)/(P-O)`, `beta = 1 + 4(P-M)/(P-O)`.
/// A zero-width estimate always yields `M`.
#[derive(Debug, Clone)]
pub enum DurationSampler {
    Fixed(f64),
    Pert {
        low: f64,
        range: f64,
        shape: Beta<f64>,
    },
}

impl DurationSampler {
    pub fn new(estimate: &Estimate) -> Self {
        let Estimate {
            optimistic: o,
            likely: m,
            pessimistic: p,
        } = *estimate;
        Self::from_points(o, m, p)
    }

    fn from_points(o: f64, m: f64, p: f64) -> Self {
        let range = p - o;
        if range == 0.0 {
            return Self::Fixed(m);
        }

        let alpha = 1.0 + 4.0 * (m - o) / range;
        let beta = 1.0 + 4.0 * (p - m) / range;
        match Beta::new(alpha, beta) {
            Ok(shape) => Self::Pert {
                low: o,
                range,
                shape,
            },
            Err(e) => {
                // Only reachable when M lies outside [O, P]; validated estimates never get here.
                log::warn!("Degenerate PERT shape ({}, {}): {}; using likely value", alpha, beta, e);
                Self::Fixed(m)
            }
        }
    }

    /// Draw one duration
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Self::Fixed(value) => *value,
            Self::Pert { low, range, shape } => low + range * shape.sample(rng),
        }
    }

    /// Draw `n` independent durations
    pub fn sample_batch<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<f64> {
        match self {
            Self::Fixed(value) => vec![*value; n],
            Self::Pert { .. } => (0..n).map(|_| self.sample(rng)).collect(),
        }
    }
}
