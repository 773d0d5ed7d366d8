use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::domain::cycle::{ForecastInputs, SimulationParameters};
use crate::domain::forecast::{ForecastError, ForecastResult};
use crate::domain::month_window::{MonthWindow, derive_month_window};
use crate::services::calendar_grid::CalendarGrid;

/// The displayed month and the forecast shown for it.
///
/// A session starts on the month after `anchor`. Navigating re-runs the
/// forecast when all inputs are present and shows a blank calendar otherwise.
#[derive(Debug, Clone)]
pub struct ForecastSession {
    anchor: NaiveDate,
    month_offset: i64,
    inputs: ForecastInputs,
    last_result: Option<ForecastResult>,
}

impl ForecastSession {
    pub fn new(anchor: NaiveDate, inputs: ForecastInputs) -> Self {
        Self {
            anchor,
            month_offset: 1,
            inputs,
            last_result: None,
        }
    }

    /// Starts on the month containing `month.first_day`.
    pub fn starting_at(anchor: NaiveDate, month: &MonthWindow, inputs: ForecastInputs) -> Self {
        let offset = (month.year() as i64 - anchor.year() as i64) * 12 + month.month() as i64
            - anchor.month() as i64;
        Self {
            anchor,
            month_offset: offset,
            inputs,
            last_result: None,
        }
    }

    pub fn window(&self) -> MonthWindow {
        derive_month_window(self.anchor, self.month_offset)
    }

    pub fn month_offset(&self) -> i64 {
        self.month_offset
    }

    pub fn inputs(&self) -> &ForecastInputs {
        &self.inputs
    }

    pub fn set_inputs(&mut self, inputs: ForecastInputs) {
        self.inputs = inputs;
    }

    pub fn last_result(&self) -> Option<&ForecastResult> {
        self.last_result.as_ref()
    }

    pub fn clear(&mut self) {
        self.last_result = None;
    }

    /// Runs `engine` for the current month. Invalid inputs clear the
    /// previous result before the error is returned.
    pub fn calculate<F>(&mut self, engine: F) -> Result<&ForecastResult, ForecastError>
    where
        F: FnOnce(&SimulationParameters, &MonthWindow) -> Result<ForecastResult, ForecastError>,
    {
        let window = self.window();
        let outcome = self.inputs.parse().and_then(|params| engine(&params, &window));
        match outcome {
            Ok(result) => Ok(&*self.last_result.insert(result)),
            Err(error) => {
                self.clear();
                Err(error)
            }
        }
    }

    /// Moves `direction` months (negative for earlier months).
    ///
    /// Returns `Ok(None)` when inputs are incomplete and the calendar is blank.
    pub fn change_month<F>(
        &mut self,
        direction: i64,
        engine: F,
    ) -> Result<Option<&ForecastResult>, ForecastError>
    where
        F: FnOnce(&SimulationParameters, &MonthWindow) -> Result<ForecastResult, ForecastError>,
    {
        self.month_offset = self.month_offset.saturating_add(direction);
        debug!(offset = self.month_offset, month = %self.window().label(), "changed month");

        if self.inputs.is_complete() {
            self.calculate(engine).map(Some)
        } else {
            self.clear();
            Ok(None)
        }
    }

    pub fn calendar(&self, today: NaiveDate) -> CalendarGrid {
        CalendarGrid::build(self.window(), self.last_result.as_ref(), today)
    }
}
