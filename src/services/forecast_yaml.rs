use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;

use crate::services::forecast_types::ForecastReport;

#[derive(Error, Debug)]
pub enum ForecastReportError {
    #[error("failed to serialize forecast yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to serialize forecast json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write forecast report: {0}")]
    Write(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Yaml,
    Json,
}

impl ReportFormat {
    /// JSON for `.json` paths, YAML otherwise.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ReportFormat::Json,
            _ => ReportFormat::Yaml,
        }
    }
}

pub fn forecast_reports_to_string(
    reports: &[ForecastReport],
    format: ReportFormat,
) -> Result<String, ForecastReportError> {
    Ok(match format {
        ReportFormat::Yaml => serde_yaml::to_string(reports)?,
        ReportFormat::Json => serde_json::to_string_pretty(reports)?,
    })
}

pub fn serialize_forecast_reports<W: Write>(
    writer: &mut W,
    reports: &[ForecastReport],
    format: ReportFormat,
) -> Result<(), ForecastReportError> {
    let contents = forecast_reports_to_string(reports, format)?;
    writer.write_all(contents.as_bytes())?;
    Ok(())
}
