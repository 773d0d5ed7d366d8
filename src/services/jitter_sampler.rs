use rand::Rng;
use rand_distr::{Distribution, Uniform};

/// Cycle lengths vary by up to this many days around the mean.
pub const CYCLE_JITTER_DAYS: f64 = 2.0;
/// Period lengths vary by up to this many days around the mean.
pub const DURATION_JITTER_DAYS: f64 = 1.0;

/// Source of the per-trial perturbation applied to a mean value.
pub trait JitterSampler {
    /// Returns `mean` perturbed by a draw from `[-spread, spread]`.
    fn sample(&mut self, mean: f64, spread: f64) -> f64;
}

pub struct UniformJitterSampler<R: Rng> {
    rng: R,
}

impl<R: Rng> UniformJitterSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> JitterSampler for UniformJitterSampler<R> {
    fn sample(&mut self, mean: f64, spread: f64) -> f64 {
        if spread <= 0.0 {
            return mean;
        }
        mean + Uniform::new_inclusive(-spread, spread).sample(&mut self.rng)
    }
}

/// Disables jitter: every trial uses the mean values.
pub struct FixedJitterSampler;

impl JitterSampler for FixedJitterSampler {
    fn sample(&mut self, mean: f64, _spread: f64) -> f64 {
        mean
    }
}
