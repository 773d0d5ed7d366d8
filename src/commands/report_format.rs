use crate::services::forecast_types::ForecastReport;

pub fn format_forecast_report(report: &ForecastReport) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Forecast for {}", report.month));
    lines.push(format!("Last period: {}", report.last_period));
    lines.push(format!("Cycle length: {:.2} days", report.cycle_length));
    lines.push(format!("Period length: {:.2} days", report.period_length));
    lines.push(format!("Simulations: {}", report.simulations));
    lines.push(String::new());
    lines.push(format!("Chance of period: {:.1}%", report.monthly_chance));
    lines.push(format!(
        "Peak probability: Day {} ({:.1}%)",
        report.peak_day, report.peak_percentage
    ));

    lines.join("\n")
}
