use std::path::Path;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::commands::base_commands::{Commands, DEFAULT_SIMULATIONS};
use crate::commands::report_format::format_forecast_report;
use crate::domain::cycle::{ForecastInputs, SimulationParameters};
use crate::domain::forecast::{ForecastError, ForecastResult};
use crate::domain::month_window::MonthWindow;
use crate::services::calendar_grid::{CalendarGrid, format_calendar_grid};
use crate::services::forecast_engine::{
    ForecastOptions, ForecastProgress, JitterMode, run_forecast_with_options,
};
use crate::services::forecast_types::ForecastReport;
use crate::services::forecast_yaml::{ReportFormat, serialize_forecast_reports};
use crate::services::heatmap_plot::write_heatmap_png;
use crate::services::profile_yaml::load_cycle_profile_from_yaml_file;
use crate::services::session::ForecastSession;

/// One forecast month ready for printing and writing.
pub struct MonthForecast {
    pub report: ForecastReport,
    pub grid: CalendarGrid,
}

pub async fn forecast_command(cmd: Commands) -> ExitCode {
    let Commands::Forecast {
        last_period,
        cycle_length,
        period_length,
        simulations,
        profile,
        month,
        months,
        seed,
        no_jitter,
        threads,
        output,
        plot,
        progress,
    } = cmd
    else {
        return ExitCode::SUCCESS;
    };

    let flags = ForecastInputs {
        last_period,
        cycle_length,
        period_length,
        simulations,
    };
    let mut inputs = match profile {
        Some(path) => match load_cycle_profile_from_yaml_file(&path) {
            Ok(profile) => profile.overridden_by(flags),
            Err(e) => {
                eprintln!("Failed to load cycle profile: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => flags,
    };
    if inputs.simulations.is_none() {
        inputs.simulations = Some(DEFAULT_SIMULATIONS.to_string());
    }

    let today = Local::now().date_naive();
    let session = match month {
        Some(month) => match MonthWindow::parse(&month) {
            Ok(window) => ForecastSession::starting_at(today, &window, inputs),
            Err(e) => {
                eprintln!("Failed to parse month: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => ForecastSession::new(today, inputs),
    };
    let options = ForecastOptions {
        jitter: if no_jitter {
            JitterMode::Disabled
        } else {
            JitterMode::Uniform
        },
        seed,
        threads,
    };

    let forecasts = match tokio::task::spawn_blocking(move || {
        forecast_months(session, months.max(1), &options, progress, today)
    })
    .await
    {
        Ok(Ok(forecasts)) => forecasts,
        Ok(Err(ForecastError::InvalidInput(reason))) => {
            eprintln!("Please fill all inputs correctly. ({reason})");
            return ExitCode::FAILURE;
        }
        Ok(Err(e)) => {
            eprintln!("Failed to run forecast: {e}");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("Failed to run forecast: {e}");
            return ExitCode::FAILURE;
        }
    };

    for forecast in &forecasts {
        println!("{}", format_forecast_report(&forecast.report));
        println!();
        println!("{}", format_calendar_grid(&forecast.grid));
        println!();
    }

    if let Some(output) = output {
        let reports: Vec<ForecastReport> = forecasts.iter().map(|f| f.report.clone()).collect();
        let mut contents = Vec::new();
        if let Err(e) =
            serialize_forecast_reports(&mut contents, &reports, ReportFormat::from_path(&output))
        {
            eprintln!("Failed to serialize forecast report: {e}");
            return ExitCode::FAILURE;
        }
        if let Err(e) = tokio::fs::write(&output, contents).await {
            eprintln!("Failed to write forecast report: {e}");
            return ExitCode::FAILURE;
        }
        println!("Forecast report written to {output}");
    }

    if let Some(plot) = plot {
        for forecast in &forecasts {
            let path = heatmap_path(&plot, &forecast.grid.window, forecasts.len() > 1);
            if let Err(e) = write_heatmap_png(&path, &forecast.grid).await {
                eprintln!("Failed to write heat map: {e}");
                return ExitCode::FAILURE;
            }
            println!("Heat map written to {path}");
        }
    }

    ExitCode::SUCCESS
}

/// Forecasts `months` consecutive months starting at the session's month.
pub fn forecast_months(
    mut session: ForecastSession,
    months: usize,
    options: &ForecastOptions,
    show_progress: bool,
    today: NaiveDate,
) -> Result<Vec<MonthForecast>, ForecastError> {
    let engine = |params: &SimulationParameters, window: &MonthWindow| {
        run_with_progress_bar(params, window, options, show_progress)
    };

    let mut forecasts = Vec::with_capacity(months);
    for index in 0..months {
        if index == 0 {
            session.calculate(engine)?;
        } else {
            session.change_month(1, engine)?;
        }

        let params = session.inputs().parse()?;
        let window = session.window();
        if let Some(result) = session.last_result() {
            info!(month = %window.label(), "forecast ready");
            forecasts.push(MonthForecast {
                report: ForecastReport::new(&params, &window, result),
                grid: session.calendar(today),
            });
        }
    }
    Ok(forecasts)
}

fn run_with_progress_bar(
    params: &SimulationParameters,
    window: &MonthWindow,
    options: &ForecastOptions,
    show_progress: bool,
) -> Result<ForecastResult, ForecastError> {
    let bar = if show_progress {
        let bar = ProgressBar::new(params.trial_count as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.red/white}] {pos}/{len} simulations {msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar.set_message(window.label());
        Some(bar)
    } else {
        None
    };

    let on_progress = |progress: ForecastProgress| {
        if let Some(bar) = &bar {
            bar.set_position(progress.completed_trials as u64);
        }
    };
    let result = run_forecast_with_options(params, window, options, Some(&on_progress), None);

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    result
}

/// With several months, `calendar.png` becomes `calendar-2024-02.png`.
fn heatmap_path(plot: &str, window: &MonthWindow, multiple: bool) -> String {
    if !multiple {
        return plot.to_string();
    }
    let path = Path::new(plot);
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("heatmap");
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("png");
    let file_name = format!(
        "{stem}-{:04}-{:02}.{extension}",
        window.year(),
        window.month()
    );
    path.with_file_name(file_name).to_string_lossy().into_owned()
}
