use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::forecast::ForecastError;

/// Validated inputs of a forecast run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationParameters {
    pub reference_date: NaiveDate,
    pub mean_cycle_length: f64,
    pub mean_event_duration: f64,
    pub trial_count: usize,
}

impl SimulationParameters {
    pub fn new(
        reference_date: NaiveDate,
        mean_cycle_length: f64,
        mean_event_duration: f64,
        trial_count: usize,
    ) -> Result<Self, ForecastError> {
        let params = Self {
            reference_date,
            mean_cycle_length,
            mean_event_duration,
            trial_count,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ForecastError> {
        if !self.mean_cycle_length.is_finite() {
            return Err(ForecastError::InvalidInput(
                "cycle length must be a number".to_string(),
            ));
        }
        if !self.mean_event_duration.is_finite() {
            return Err(ForecastError::InvalidInput(
                "period length must be a number".to_string(),
            ));
        }
        if self.trial_count == 0 {
            return Err(ForecastError::InvalidInput(
                "number of simulations must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Raw, possibly incomplete values as typed by the user or read from a
/// cycle profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForecastInputs {
    pub last_period: Option<String>,
    pub cycle_length: Option<String>,
    pub period_length: Option<String>,
    pub simulations: Option<String>,
}

impl ForecastInputs {
    /// True when all four values are present, regardless of whether they parse.
    pub fn is_complete(&self) -> bool {
        [
            &self.last_period,
            &self.cycle_length,
            &self.period_length,
            &self.simulations,
        ]
        .iter()
        .all(|value| value.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }

    /// Values present in `overrides` replace the ones in `self`.
    pub fn overridden_by(self, overrides: ForecastInputs) -> ForecastInputs {
        ForecastInputs {
            last_period: overrides.last_period.or(self.last_period),
            cycle_length: overrides.cycle_length.or(self.cycle_length),
            period_length: overrides.period_length.or(self.period_length),
            simulations: overrides.simulations.or(self.simulations),
        }
    }

    pub fn parse(&self) -> Result<SimulationParameters, ForecastError> {
        let last_period = required(&self.last_period, "last period date")?;
        let reference_date = NaiveDate::parse_from_str(last_period, "%Y-%m-%d").map_err(|_| {
            ForecastError::InvalidInput(format!("invalid last period date: {last_period}"))
        })?;
        let cycle_length = parse_days(&self.cycle_length, "cycle length")?;
        let period_length = parse_days(&self.period_length, "period length")?;
        let simulations = required(&self.simulations, "number of simulations")?;
        let trial_count: usize = simulations.parse().map_err(|_| {
            ForecastError::InvalidInput(format!("invalid number of simulations: {simulations}"))
        })?;

        SimulationParameters::new(reference_date, cycle_length, period_length, trial_count)
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, ForecastError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ForecastError::InvalidInput(format!("missing {name}")))
}

fn parse_days(value: &Option<String>, name: &str) -> Result<f64, ForecastError> {
    let raw = required(value, name)?;
    let days: f64 = raw
        .parse()
        .map_err(|_| ForecastError::InvalidInput(format!("invalid {name}: {raw}")))?;
    if !days.is_finite() {
        return Err(ForecastError::InvalidInput(format!("invalid {name}: {raw}")));
    }
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{complete_inputs, on_date};

    #[test]
    fn parse_builds_parameters_from_complete_inputs() {
        let params = complete_inputs().parse().unwrap();

        assert_eq!(params.reference_date, on_date(2024, 1, 15));
        assert_eq!(params.mean_cycle_length, 28.0);
        assert_eq!(params.mean_event_duration, 5.0);
        assert_eq!(params.trial_count, 1000);
    }

    #[test]
    fn parse_rejects_missing_values() {
        let mut inputs = complete_inputs();
        inputs.cycle_length = None;

        assert!(!inputs.is_complete());
        assert!(matches!(inputs.parse(), Err(ForecastError::InvalidInput(_))));
    }

    #[test]
    fn parse_rejects_non_numeric_values() {
        let test_cases = vec![
            ("cycle_length", "abc"),
            ("cycle_length", "NaN"),
            ("period_length", "inf"),
            ("simulations", "0"),
            ("simulations", "-3"),
            ("last_period", "2024-02-30"),
        ];

        for (field, value) in test_cases {
            let mut inputs = complete_inputs();
            let slot = match field {
                "cycle_length" => &mut inputs.cycle_length,
                "period_length" => &mut inputs.period_length,
                "simulations" => &mut inputs.simulations,
                _ => &mut inputs.last_period,
            };
            *slot = Some(value.to_string());

            assert!(
                matches!(inputs.parse(), Err(ForecastError::InvalidInput(_))),
                "Expected {field}={value} to be rejected"
            );
        }
    }

    #[test]
    fn blank_values_do_not_count_as_complete() {
        let mut inputs = complete_inputs();
        inputs.simulations = Some("  ".to_string());

        assert!(!inputs.is_complete());
    }

    #[test]
    fn overrides_take_precedence() {
        let profile = complete_inputs();
        let flags = ForecastInputs {
            cycle_length: Some("30".to_string()),
            ..ForecastInputs::default()
        };

        let merged = profile.overridden_by(flags);
        assert_eq!(merged.cycle_length.as_deref(), Some("30"));
        assert_eq!(merged.period_length.as_deref(), Some("5"));
    }

    #[test]
    fn new_rejects_nan_cycle_length() {
        let result = SimulationParameters::new(on_date(2024, 1, 15), f64::NAN, 5.0, 10);
        assert!(matches!(result, Err(ForecastError::InvalidInput(_))));
    }
}
