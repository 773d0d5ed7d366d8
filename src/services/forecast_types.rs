use serde::Serialize;

use crate::domain::cycle::SimulationParameters;
use crate::domain::forecast::ForecastResult;
use crate::domain::month_window::MonthWindow;
use crate::domain::severity::SeverityBand;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DailyForecast {
    pub day: u32,
    pub date: String,
    pub percentage: f64,
    pub band: SeverityBand,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ForecastReport {
    pub month: String,
    pub first_day: String,
    pub last_day: String,
    pub last_period: String,
    pub cycle_length: f64,
    pub period_length: f64,
    pub simulations: usize,
    pub monthly_chance: f64,
    pub peak_day: u32,
    pub peak_percentage: f64,
    pub days: Vec<DailyForecast>,
}

impl ForecastReport {
    pub fn new(
        params: &SimulationParameters,
        window: &MonthWindow,
        result: &ForecastResult,
    ) -> Self {
        let days = result
            .daily_percentages
            .iter()
            .zip(1u32..)
            .map(|(percentage, day)| DailyForecast {
                day,
                date: window
                    .date_of_day(day)
                    .map(|date| date.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
                percentage: *percentage,
                band: SeverityBand::from_percentage(*percentage),
            })
            .collect();

        Self {
            month: window.label(),
            first_day: window.first_day.format("%Y-%m-%d").to_string(),
            last_day: window.last_day.format("%Y-%m-%d").to_string(),
            last_period: params.reference_date.format("%Y-%m-%d").to_string(),
            cycle_length: params.mean_cycle_length,
            period_length: params.mean_event_duration,
            simulations: params.trial_count,
            monthly_chance: result.monthly_chance,
            peak_day: result.peak_day,
            peak_percentage: result.peak_percentage(),
            days,
        }
    }
}
