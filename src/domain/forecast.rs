use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForecastError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("forecast was cancelled")]
    Cancelled,
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),
}

/// Per-day counters of trials whose projected interval covered the day.
///
/// Index `i` belongs to day `i + 1` of the month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTally {
    counts: Vec<u64>,
}

impl DailyTally {
    pub fn new(day_count: u32) -> Self {
        Self {
            counts: vec![0; day_count as usize],
        }
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Increments every index in `first..=last`. Out-of-range indices are ignored.
    pub fn mark_range(&mut self, first: usize, last: usize) {
        if first > last || self.is_empty() {
            return;
        }
        let last = last.min(self.counts.len() - 1);
        if let Some(days) = self.counts.get_mut(first..=last) {
            for count in days {
                *count += 1;
            }
        }
    }

    /// Adds the counts of another tally for the same month.
    pub fn merge(&mut self, other: &DailyTally) {
        for (count, other_count) in self.counts.iter_mut().zip(&other.counts) {
            *count += other_count;
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ForecastResult {
    pub daily_percentages: Vec<f64>,
    pub monthly_chance: f64,
    pub peak_day: u32,
    pub days_in_month: u32,
}

impl ForecastResult {
    /// Converts raw counts into percentages of `trial_count`.
    pub fn from_tally(tally: &DailyTally, hit_trials: u64, trial_count: usize) -> Self {
        let trials = trial_count as f64;
        let daily_percentages: Vec<f64> = tally
            .counts()
            .iter()
            .map(|count| (*count as f64 / trials) * 100.0)
            .collect();
        let monthly_chance = (hit_trials as f64 / trials) * 100.0;
        let peak_day = peak_day(&daily_percentages);

        Self {
            days_in_month: daily_percentages.len() as u32,
            daily_percentages,
            monthly_chance,
            peak_day,
        }
    }

    pub fn peak_percentage(&self) -> f64 {
        self.percentage_for_day(self.peak_day).unwrap_or(0.0)
    }

    pub fn percentage_for_day(&self, day: u32) -> Option<f64> {
        let index = (day as usize).checked_sub(1)?;
        self.daily_percentages.get(index).copied()
    }
}

// First maximum wins, so an all-zero month peaks on day 1.
fn peak_day(values: &[f64]) -> u32 {
    let mut peak_index = 0;
    for (index, value) in values.iter().enumerate() {
        if *value > values[peak_index] {
            peak_index = index;
        }
    }
    peak_index as u32 + 1
}
