//! Configuration validation.
//!
//! Checks every recognised key before an evaluation runs. Unknown sections
//! and keys are ignored.

use crate::domain::error::StockscopeError;
use crate::domain::evaluator::EvaluationSettings;
use crate::domain::fusion::WeightingPolicy;
use crate::domain::ohlcv::WeekAnchor;
use crate::ports::config_port::ConfigPort;

pub const OUTPUT_FORMATS: [&str; 2] = ["text", "json"];

/// Full check used by `validate`: the data directory must be configured.
pub fn validate_config(config: &dyn ConfigPort) -> Result<(), StockscopeError> {
    validate_data_dir(config)?;
    validate_evaluation_keys(config)?;
    validate_format(config)?;
    Ok(())
}

/// Keys that shape an evaluation; each is optional and defaulted.
pub fn validate_evaluation_keys(config: &dyn ConfigPort) -> Result<(), StockscopeError> {
    week_anchor(config)?;
    policy(config)?;
    include_chart(config)?;
    Ok(())
}

/// Validated evaluation settings, defaults filled in for absent keys.
pub fn evaluation_settings(config: &dyn ConfigPort) -> Result<EvaluationSettings, StockscopeError> {
    Ok(EvaluationSettings {
        week_anchor: week_anchor(config)?,
        policy: policy(config)?,
        include_chart: include_chart(config)?,
    })
}

/// `[data] dir`, if configured and non-blank.
pub fn data_dir(config: &dyn ConfigPort) -> Option<String> {
    config
        .get_string("data", "dir")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// `[output] format`, lowercased, if configured.
pub fn output_format(config: &dyn ConfigPort) -> Result<Option<String>, StockscopeError> {
    validate_format(config)?;
    Ok(config
        .get_string("output", "format")
        .map(|s| s.trim().to_lowercase()))
}

fn invalid(section: &str, key: &str, reason: String) -> StockscopeError {
    StockscopeError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    }
}

fn validate_data_dir(config: &dyn ConfigPort) -> Result<(), StockscopeError> {
    match data_dir(config) {
        Some(_) => Ok(()),
        None => Err(StockscopeError::ConfigMissing {
            section: "data".to_string(),
            key: "dir".to_string(),
        }),
    }
}

fn week_anchor(config: &dyn ConfigPort) -> Result<WeekAnchor, StockscopeError> {
    match config.get_string("data", "week_anchor") {
        None => Ok(WeekAnchor::default()),
        Some(s) => WeekAnchor::parse(&s).ok_or_else(|| {
            invalid(
                "data",
                "week_anchor",
                format!("unknown week anchor '{}', expected sunday or friday", s),
            )
        }),
    }
}

fn policy(config: &dyn ConfigPort) -> Result<WeightingPolicy, StockscopeError> {
    match config.get_string("fusion", "policy") {
        None => Ok(WeightingPolicy::default()),
        Some(s) => WeightingPolicy::parse(&s).ok_or_else(|| {
            invalid(
                "fusion",
                "policy",
                format!(
                    "unknown policy '{}', expected four_domain or legacy_three_domain",
                    s
                ),
            )
        }),
    }
}

fn include_chart(config: &dyn ConfigPort) -> Result<bool, StockscopeError> {
    match config.get_string("output", "chart") {
        None => Ok(true),
        Some(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            _ => Err(invalid(
                "output",
                "chart",
                format!("'{}' is not a boolean", s),
            )),
        },
    }
}

fn validate_format(config: &dyn ConfigPort) -> Result<(), StockscopeError> {
    match config.get_string("output", "format") {
        Some(s) if !OUTPUT_FORMATS.contains(&s.trim().to_lowercase().as_str()) => Err(invalid(
            "output",
            "format",
            format!("unknown format '{}', expected text or json", s),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn valid_config_passes() {
        let config = make_config(
            r#"
[data]
dir = ./data
week_anchor = friday

[fusion]
policy = legacy_three_domain

[output]
format = json
chart = false
"#,
        );
        assert!(validate_config(&config).is_ok());
        let settings = evaluation_settings(&config).unwrap();
        assert_eq!(settings.week_anchor, WeekAnchor::Friday);
        assert_eq!(settings.policy, WeightingPolicy::LegacyThreeDomain);
        assert!(!settings.include_chart);
        assert_eq!(output_format(&config).unwrap().as_deref(), Some("json"));
    }

    #[test]
    fn defaults_for_absent_keys() {
        let config = make_config("[data]\ndir = ./data\n");
        let settings = evaluation_settings(&config).unwrap();
        assert_eq!(settings, EvaluationSettings::default());
        assert_eq!(output_format(&config).unwrap(), None);
    }

    #[test]
    fn missing_data_dir_fails() {
        let config = make_config("[fusion]\npolicy = four_domain\n");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, StockscopeError::ConfigMissing { key, .. } if key == "dir"));
    }

    #[test]
    fn blank_data_dir_fails() {
        let config = make_config("[data]\ndir =   \n");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, StockscopeError::ConfigMissing { key, .. } if key == "dir"));
    }

    #[test]
    fn unknown_week_anchor_fails() {
        let config = make_config("[data]\ndir = x\nweek_anchor = monday\n");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, StockscopeError::ConfigInvalid { key, .. } if key == "week_anchor"));
    }

    #[test]
    fn unknown_policy_fails() {
        let config = make_config("[data]\ndir = x\n[fusion]\npolicy = five_domain\n");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, StockscopeError::ConfigInvalid { key, .. } if key == "policy"));
    }

    #[test]
    fn unknown_format_fails() {
        let config = make_config("[data]\ndir = x\n[output]\nformat = html\n");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, StockscopeError::ConfigInvalid { key, .. } if key == "format"));
    }

    #[test]
    fn non_boolean_chart_fails() {
        let config = make_config("[data]\ndir = x\n[output]\nchart = maybe\n");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, StockscopeError::ConfigInvalid { key, .. } if key == "chart"));
    }

    #[test]
    fn evaluation_keys_do_not_require_data_dir() {
        let config = make_config("[fusion]\npolicy = four_domain\n");
        assert!(validate_evaluation_keys(&config).is_ok());
    }
}
