use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::forecast::ForecastResult;
use crate::domain::month_window::MonthWindow;
use crate::domain::severity::SeverityBand;

pub const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarCell {
    /// `None` for padding cells beyond the representable date range.
    pub date: Option<NaiveDate>,
    pub in_month: bool,
    pub is_today: bool,
    /// Only set for days of the month once a forecast exists.
    pub percentage: Option<f64>,
}

impl CalendarCell {
    pub fn band(&self) -> Option<SeverityBand> {
        self.percentage.map(SeverityBand::from_percentage)
    }
}

/// Whole weeks (Sunday to Saturday) covering a month.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarGrid {
    pub window: MonthWindow,
    pub weeks: Vec<[CalendarCell; 7]>,
    pub has_probabilities: bool,
}

impl CalendarGrid {
    /// Builds the grid for `window`. Without a result the grid is blank.
    pub fn build(window: MonthWindow, result: Option<&ForecastResult>, today: NaiveDate) -> Self {
        let leading = window.first_day.weekday().num_days_from_sunday() as i64;
        let trailing = 6 - window.last_day.weekday().num_days_from_sunday() as i64;
        let cell_count = leading + window.day_count as i64 + trailing;

        let percentages = result
            .map(|r| r.daily_percentages.as_slice())
            .filter(|values| !values.is_empty());

        let cells: Vec<CalendarCell> = (0..cell_count)
            .map(|offset| {
                let date = window
                    .first_day
                    .checked_add_signed(Duration::days(offset - leading));
                let in_month = date.is_some_and(|d| window.contains(d));
                let percentage = match (percentages, date) {
                    (Some(values), Some(date)) if in_month => {
                        Some(values.get(date.day0() as usize).copied().unwrap_or(0.0))
                    }
                    _ => None,
                };
                CalendarCell {
                    date,
                    in_month,
                    is_today: date == Some(today),
                    percentage,
                }
            })
            .collect();

        let weeks = cells
            .chunks(7)
            .filter_map(|week| <[CalendarCell; 7]>::try_from(week.to_vec()).ok())
            .collect();

        Self {
            window,
            weeks,
            has_probabilities: percentages.is_some(),
        }
    }
}

/// Plain-text rendering: one row per week, days outside the month left
/// blank, today in brackets and each day's band digit (0-4) beneath it.
pub fn format_calendar_grid(grid: &CalendarGrid) -> String {
    let mut lines = Vec::new();
    lines.push(format!("{:^34}", grid.window.label()));
    lines.push(
        DAY_NAMES
            .iter()
            .map(|name| format!("{name:>4}"))
            .collect::<Vec<_>>()
            .join(" "),
    );

    for week in &grid.weeks {
        let days = week
            .iter()
            .map(|cell| match (cell.date, cell.in_month, cell.is_today) {
                (Some(date), true, true) => format!("[{:>2}]", date.day()),
                (Some(date), true, false) => format!("{:>4}", date.day()),
                _ => "    ".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(days.trim_end().to_string());

        if grid.has_probabilities {
            let bands = week
                .iter()
                .map(|cell| match cell.band() {
                    Some(band) => format!("{:>4}", band.index()),
                    None => "    ".to_string(),
                })
                .collect::<Vec<_>>()
                .join(" ");
            lines.push(bands.trim_end().to_string());
        }
    }

    if grid.has_probabilities {
        lines.push(String::new());
        let legend = SeverityBand::ALL
            .iter()
            .map(|band| format!("{}={}", band.index(), band.legend_label()))
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(format!("Legend: {legend}"));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::month_window::derive_month_window;
    use crate::test_support::on_date;

    fn result_with(days: u32, hot_days: &[usize], value: f64) -> ForecastResult {
        let mut daily_percentages = vec![0.0; days as usize];
        for day in hot_days {
            daily_percentages[*day] = value;
        }
        ForecastResult {
            daily_percentages,
            monthly_chance: value,
            peak_day: hot_days.first().map(|d| *d as u32 + 1).unwrap_or(1),
            days_in_month: days,
        }
    }

    #[test]
    fn grid_spans_whole_weeks_from_sunday() {
        // February 2024 starts on a Thursday and ends on a Thursday.
        let window = MonthWindow::for_month(2024, 2).unwrap();
        let grid = CalendarGrid::build(window, None, on_date(2024, 3, 10));

        assert_eq!(grid.weeks.len(), 5);
        assert_eq!(grid.weeks[0][0].date, Some(on_date(2024, 1, 28)));
        assert!(!grid.weeks[0][0].in_month);
        assert_eq!(grid.weeks[0][4].date, Some(on_date(2024, 2, 1)));
        assert_eq!(grid.weeks[4][6].date, Some(on_date(2024, 3, 2)));
        assert!(!grid.has_probabilities);
    }

    #[test]
    fn month_starting_on_sunday_has_no_leading_days() {
        // September 2024 starts on a Sunday and ends on a Monday.
        let window = MonthWindow::for_month(2024, 9).unwrap();
        let grid = CalendarGrid::build(window, None, on_date(2024, 1, 1));

        assert_eq!(grid.weeks[0][0].date, Some(on_date(2024, 9, 1)));
        assert_eq!(grid.weeks.len(), 5);
    }

    #[test]
    fn cells_carry_percentages_for_month_days_only() {
        let window = MonthWindow::for_month(2024, 2).unwrap();
        let result = result_with(29, &[11, 12], 60.0);
        let grid = CalendarGrid::build(window, Some(&result), on_date(2024, 2, 12));

        let cells: Vec<&CalendarCell> = grid.weeks.iter().flatten().collect();
        let feb_12 = cells.iter().find(|c| c.date == Some(on_date(2024, 2, 12))).unwrap();
        assert_eq!(feb_12.percentage, Some(60.0));
        assert_eq!(feb_12.band(), Some(SeverityBand::High));
        assert!(feb_12.is_today);

        let jan_31 = cells.iter().find(|c| c.date == Some(on_date(2024, 1, 31))).unwrap();
        assert_eq!(jan_31.percentage, None);
        assert!(grid.has_probabilities);
    }

    #[test]
    fn empty_results_render_a_blank_grid() {
        let window = MonthWindow::for_month(2024, 2).unwrap();
        let result = ForecastResult {
            daily_percentages: vec![],
            monthly_chance: 0.0,
            peak_day: 1,
            days_in_month: 0,
        };
        let grid = CalendarGrid::build(window, Some(&result), on_date(2024, 1, 1));

        assert!(!grid.has_probabilities);
    }

    #[test]
    fn format_calendar_grid_shows_headers_bands_and_legend() {
        let window = MonthWindow::for_month(2024, 2).unwrap();
        let result = result_with(29, &[11], 80.0);
        let grid = CalendarGrid::build(window, Some(&result), on_date(2024, 2, 14));

        let output = format_calendar_grid(&grid);

        assert!(output.contains("February 2024"));
        assert!(output.contains(" Sun  Mon  Tue  Wed  Thu  Fri  Sat"));
        assert!(output.contains("[14]"));
        assert!(output.contains("Legend: 0=0%  1=1-25%  2=26-50%  3=51-75%  4=75%+"));
        // Week of Feb 11: band row has 4 under Monday the 12th.
        assert!(output.contains("   0    4    0    0    0    0    0"));
    }

    #[test]
    fn format_calendar_grid_omits_legend_without_probabilities() {
        let window = MonthWindow::for_month(2024, 2).unwrap();
        let grid = CalendarGrid::build(window, None, on_date(2024, 1, 1));

        let output = format_calendar_grid(&grid);
        assert!(!output.contains("Legend"));
        assert!(output.contains("  29"));
    }

    #[test]
    fn grid_for_the_latest_month_leaves_unrepresentable_days_blank() {
        let window = derive_month_window(on_date(2024, 1, 15), i64::MAX);
        let result = result_with(window.day_count, &[window.day_count as usize - 1], 50.0);

        let grid = CalendarGrid::build(window, Some(&result), on_date(2024, 1, 15));

        let cells: Vec<&CalendarCell> = grid.weeks.iter().flatten().collect();
        assert_eq!(cells.iter().filter(|c| c.in_month).count(), window.day_count as usize);
        let last = cells.iter().rfind(|c| c.in_month).unwrap();
        assert_eq!(last.date, Some(window.last_day));
        assert_eq!(last.percentage, Some(50.0));
        assert!(
            cells
                .iter()
                .skip_while(|c| !c.in_month)
                .skip(window.day_count as usize)
                .all(|c| c.date.is_none() && c.percentage.is_none())
        );
        assert!(format_calendar_grid(&grid).contains(&window.label()));
    }

    #[test]
    fn grid_for_the_earliest_month_leaves_unrepresentable_days_blank() {
        let window = derive_month_window(on_date(2024, 1, 15), i64::MIN);

        let grid = CalendarGrid::build(window, None, on_date(2024, 1, 15));

        let cells: Vec<&CalendarCell> = grid.weeks.iter().flatten().collect();
        assert_eq!(cells.len() % 7, 0);
        assert_eq!(cells.iter().filter(|c| c.in_month).count(), window.day_count as usize);
        let first = cells.iter().find(|c| c.in_month).unwrap();
        assert_eq!(first.date, Some(window.first_day));
        assert!(cells.iter().take_while(|c| !c.in_month).all(|c| c.date.is_none()));
    }
}
