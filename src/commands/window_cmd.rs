use std::process::ExitCode;

use chrono::NaiveDate;

use crate::commands::base_commands::Commands;
use crate::domain::month_window::{MonthWindow, derive_month_window};

pub fn window_command(cmd: Commands) -> ExitCode {
    if let Commands::Window { anchor, offset } = cmd {
        let anchor = match NaiveDate::parse_from_str(&anchor, "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                eprintln!("Failed to parse anchor date: {anchor} (expected YYYY-MM-DD)");
                return ExitCode::FAILURE;
            }
        };
        let window = derive_month_window(anchor, offset);
        println!("{}", format_month_window(&window));
    }
    ExitCode::SUCCESS
}

pub fn format_month_window(window: &MonthWindow) -> String {
    [
        format!("Month: {}", window.label()),
        format!("First day: {}", window.first_day.format("%Y-%m-%d")),
        format!("Last day: {}", window.last_day.format("%Y-%m-%d")),
        format!("Days: {}", window.day_count),
    ]
    .join("\n")
}
