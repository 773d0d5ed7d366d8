use chrono::NaiveDate;

use crate::domain::cycle::{ForecastInputs, SimulationParameters};
use crate::services::jitter_sampler::JitterSampler;

// A mock JitterSampler that never perturbs the mean
pub struct MockSampler;
impl JitterSampler for MockSampler {
    fn sample(&mut self, mean: f64, _spread: f64) -> f64 {
        mean
    }
}

pub fn on_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

// Skips validation so tests can hand invalid values to the engine.
pub fn params_on(
    reference_date: NaiveDate,
    mean_cycle_length: f64,
    mean_event_duration: f64,
    trial_count: usize,
) -> SimulationParameters {
    SimulationParameters {
        reference_date,
        mean_cycle_length,
        mean_event_duration,
        trial_count,
    }
}

pub fn complete_inputs() -> ForecastInputs {
    ForecastInputs {
        last_period: Some("2024-01-15".to_string()),
        cycle_length: Some("28".to_string()),
        period_length: Some("5".to_string()),
        simulations: Some("1000".to_string()),
    }
}
