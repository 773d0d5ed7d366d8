use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::Value;
use thiserror::Error;

use crate::domain::cycle::ForecastInputs;

#[derive(Error, Debug)]
pub enum CycleProfileYamlError {
    #[error("failed to read cycle profile {path}: {source}")]
    ReadFile { path: PathBuf, source: io::Error },
    #[error("failed to parse cycle profile {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("invalid value for {field} in {path}: expected a date, number or string")]
    InvalidValue { path: PathBuf, field: &'static str },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CycleProfileRecord {
    last_period: Option<Value>,
    cycle_length: Option<Value>,
    period_length: Option<Value>,
    simulations: Option<Value>,
}

/// Loads a cycle profile such as
///
/// ```yaml
/// last_period: 2024-01-15
/// cycle_length: 28
/// period_length: 5
/// simulations: 10000
/// ```
///
/// Every key is optional. Values are kept as text and validated only when a
/// forecast runs, like values typed into the command line.
pub fn load_cycle_profile_from_yaml_file<P: AsRef<Path>>(
    path: P,
) -> Result<ForecastInputs, CycleProfileYamlError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| {
        CycleProfileYamlError::ReadFile {
            path: path.to_path_buf(),
            source,
        }
    })?;
    deserialize_cycle_profile_from_yaml_str(&contents, path)
}

pub fn deserialize_cycle_profile_from_yaml_str(
    input: &str,
    origin_path: &Path,
) -> Result<ForecastInputs, CycleProfileYamlError> {
    // An empty document is an empty profile.
    if input.trim().is_empty() {
        return Ok(ForecastInputs::default());
    }
    let record: CycleProfileRecord =
        serde_yaml::from_str(input).map_err(|source| CycleProfileYamlError::Parse {
            path: origin_path.to_path_buf(),
            source,
        })?;

    Ok(ForecastInputs {
        last_period: scalar_to_string(record.last_period, "last_period", origin_path)?,
        cycle_length: scalar_to_string(record.cycle_length, "cycle_length", origin_path)?,
        period_length: scalar_to_string(record.period_length, "period_length", origin_path)?,
        simulations: scalar_to_string(record.simulations, "simulations", origin_path)?,
    })
}

fn scalar_to_string(
    value: Option<Value>,
    field: &'static str,
    origin_path: &Path,
) -> Result<Option<String>, CycleProfileYamlError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(_) => Err(CycleProfileYamlError::InvalidValue {
            path: origin_path.to_path_buf(),
            field,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<ForecastInputs, CycleProfileYamlError> {
        deserialize_cycle_profile_from_yaml_str(input, Path::new("profile.yaml"))
    }

    #[test]
    fn numbers_and_dates_become_text_inputs() {
        let inputs = parse(
            "last_period: 2024-01-15\ncycle_length: 28\nperiod_length: 4.5\nsimulations: 10000\n",
        )
        .unwrap();

        assert_eq!(inputs.last_period.as_deref(), Some("2024-01-15"));
        assert_eq!(inputs.cycle_length.as_deref(), Some("28"));
        assert_eq!(inputs.period_length.as_deref(), Some("4.5"));
        assert_eq!(inputs.simulations.as_deref(), Some("10000"));
        assert!(inputs.is_complete());
    }

    #[test]
    fn missing_keys_stay_empty() {
        let inputs = parse("cycle_length: 30\nperiod_length: ~\n").unwrap();

        assert_eq!(inputs.cycle_length.as_deref(), Some("30"));
        assert_eq!(inputs.period_length, None);
        assert!(!inputs.is_complete());
    }

    #[test]
    fn empty_document_is_an_empty_profile() {
        assert_eq!(parse("").unwrap(), ForecastInputs::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = parse("cycle_lenght: 28\n").unwrap_err();
        assert!(matches!(error, CycleProfileYamlError::Parse { .. }));
    }

    #[test]
    fn nested_values_are_rejected() {
        let error = parse("cycle_length: [28, 30]\n").unwrap_err();
        assert!(matches!(
            error,
            CycleProfileYamlError::InvalidValue {
                field: "cycle_length",
                ..
            }
        ));
    }
}
