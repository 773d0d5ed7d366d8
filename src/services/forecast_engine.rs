//! Monte Carlo forecast of the days a period falls on within one month.
//!
//! Every trial jitters the mean cycle and period lengths, projects up to
//! [`MAX_PROJECTED_CYCLES`](crate::services::trial_projection::MAX_PROJECTED_CYCLES)
//! periods forward from the reference date and tallies the month days they
//! cover. Trials are independent, so the batched entry point spreads them
//! over a rayon pool and sums the per-batch tallies.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::cycle::SimulationParameters;
use crate::domain::forecast::{DailyTally, ForecastError, ForecastResult};
use crate::domain::month_window::MonthWindow;
use crate::services::jitter_sampler::{FixedJitterSampler, JitterSampler, UniformJitterSampler};
use crate::services::trial_projection::TrialProjection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastProgress {
    pub completed_trials: usize,
    pub total_trials: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JitterMode {
    #[default]
    Uniform,
    Disabled,
}

#[derive(Debug, Clone, Default)]
pub struct ForecastOptions {
    pub jitter: JitterMode,
    /// Seed of the first batch; batch `k` uses `seed + k`. Random when `None`.
    pub seed: Option<u64>,
    /// Worker threads. Rayon's default pool size when `None`.
    pub threads: Option<usize>,
}

pub type ProgressCallback<'a> = &'a (dyn Fn(ForecastProgress) + Sync);

struct BatchOutcome {
    tally: DailyTally,
    hit_trials: u64,
}

impl BatchOutcome {
    fn empty(day_count: u32) -> Self {
        Self {
            tally: DailyTally::new(day_count),
            hit_trials: 0,
        }
    }

    fn merge(mut self, other: BatchOutcome) -> Self {
        self.tally.merge(&other.tally);
        self.hit_trials += other.hit_trials;
        self
    }
}

/// Runs a forecast on the current thread with uniformly jittered lengths.
pub fn run_forecast(
    params: &SimulationParameters,
    window: &MonthWindow,
) -> Result<ForecastResult, ForecastError> {
    let mut sampler = UniformJitterSampler::new(rand::thread_rng());
    run_forecast_with_sampler(params, window, &mut sampler)
}

/// Runs a forecast on the current thread, drawing all jitter from `sampler`.
pub fn run_forecast_with_sampler<S: JitterSampler + ?Sized>(
    params: &SimulationParameters,
    window: &MonthWindow,
    sampler: &mut S,
) -> Result<ForecastResult, ForecastError> {
    params.validate()?;
    info!(
        trials = params.trial_count,
        month = %window.label(),
        "running forecast"
    );

    let outcome = simulate_batch(params, window, params.trial_count, sampler);
    let result = ForecastResult::from_tally(&outcome.tally, outcome.hit_trials, params.trial_count);
    info!(
        monthly_chance = result.monthly_chance,
        peak_day = result.peak_day,
        "forecast complete"
    );
    Ok(result)
}

/// Runs a forecast in fixed batches on a rayon pool.
///
/// Batch sizes depend only on the trial count and each batch owns a seeded
/// RNG, so a seeded run gives the same result for any number of threads.
/// Progress is reported after every batch; a run cancelled through `cancel`
/// yields [`ForecastError::Cancelled`] and no result.
pub fn run_forecast_with_options(
    params: &SimulationParameters,
    window: &MonthWindow,
    options: &ForecastOptions,
    progress: Option<ProgressCallback<'_>>,
    cancel: Option<&AtomicBool>,
) -> Result<ForecastResult, ForecastError> {
    params.validate()?;

    let total = params.trial_count;
    let batch_size = batch_size(total);
    let batch_count = total.div_ceil(batch_size);
    let seed = options.seed.unwrap_or_else(rand::random);
    info!(
        trials = total,
        batches = batch_count,
        seed,
        month = %window.label(),
        "running batched forecast"
    );

    let pool = build_pool(options.threads)?;
    let completed = Mutex::new(0usize);
    let is_cancelled = || cancel.is_some_and(|flag| flag.load(Ordering::Relaxed));

    let outcome = pool.install(|| {
        (0..batch_count)
            .into_par_iter()
            .map(|batch_index| {
                if is_cancelled() {
                    return Err(ForecastError::Cancelled);
                }
                let trials = batch_size.min(total - batch_index * batch_size);
                let batch_seed = seed.wrapping_add(batch_index as u64);
                let outcome = match options.jitter {
                    JitterMode::Uniform => {
                        let mut sampler =
                            UniformJitterSampler::new(StdRng::seed_from_u64(batch_seed));
                        simulate_batch(params, window, trials, &mut sampler)
                    }
                    JitterMode::Disabled => {
                        simulate_batch(params, window, trials, &mut FixedJitterSampler)
                    }
                };
                report_batch(&completed, trials, total, progress);
                debug!(batch = batch_index, trials, hits = outcome.hit_trials, "batch done");
                Ok(outcome)
            })
            .try_reduce(
                || BatchOutcome::empty(window.day_count),
                |left, right| Ok(left.merge(right)),
            )
    })?;

    if is_cancelled() {
        return Err(ForecastError::Cancelled);
    }

    let result = ForecastResult::from_tally(&outcome.tally, outcome.hit_trials, total);
    info!(
        monthly_chance = result.monthly_chance,
        peak_day = result.peak_day,
        "forecast complete"
    );
    Ok(result)
}

/// Between 100 and 1000 trials, aiming for about fifty progress updates.
pub fn batch_size(trial_count: usize) -> usize {
    (trial_count / 50).clamp(100, 1000)
}

fn simulate_batch<S: JitterSampler + ?Sized>(
    params: &SimulationParameters,
    window: &MonthWindow,
    trials: usize,
    sampler: &mut S,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::empty(window.day_count);
    for _ in 0..trials {
        let projection = TrialProjection::sample(params, window, sampler);
        if projection.record(&mut outcome.tally) {
            outcome.hit_trials += 1;
        }
    }
    outcome
}

// Holding the lock while calling back keeps reported counts in order.
fn report_batch(
    completed: &Mutex<usize>,
    trials: usize,
    total: usize,
    progress: Option<ProgressCallback<'_>>,
) {
    let mut done = completed.lock().unwrap_or_else(|e| e.into_inner());
    *done += trials;
    if let Some(callback) = progress {
        callback(ForecastProgress {
            completed_trials: *done,
            total_trials: total,
        });
    }
}

fn build_pool(threads: Option<usize>) -> Result<rayon::ThreadPool, ForecastError> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = threads {
        builder = builder.num_threads(threads);
    }
    builder
        .build()
        .map_err(|e| ForecastError::ThreadPool(e.to_string()))
}
