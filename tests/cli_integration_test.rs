//! CLI integration tests for the analyze and validate commands.
//!
//! Tests cover:
//! - Config loading and validation with real INI files on disk
//! - Data directory resolution (flag over config, missing both)
//! - Full analyze pipeline over CSV fixtures in a temp directory
//! - Output format selection and CLI overrides of config values

mod common;

use common::*;
use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use stockscope::cli::{self, AnalyzeArgs, KindArg, OutputFormat};
use stockscope::domain::error::StockscopeError;
use stockscope::domain::evaluator::AnalysisKind;
use stockscope::domain::fusion::WeightingPolicy;
use tempfile::TempDir;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Prices for `code` as CSV with 70 rising closes.
fn write_prices(dir: &Path, code: &str) {
    let mut csv = String::from("date,open,high,low,close,volume\n");
    for bar in bars_from_closes(&rising(70)) {
        writeln!(
            csv,
            "{},{},{},{},{},{}",
            bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
        )
        .unwrap();
    }
    fs::write(dir.join(format!("{code}_prices.csv")), csv).unwrap();
}

fn data_dir_with_prices() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_prices(dir.path(), "2330");
    fs::write(
        dir.path().join("2330_institutional.csv"),
        "date,name,net\n\
         2024-03-08,Foreign_Investor,1000000\n\
         2024-03-08,Investment_Trust,2000000\n",
    )
    .unwrap();
    dir
}

fn args(code: &str, kind: AnalysisKind, data_dir: Option<PathBuf>) -> AnalyzeArgs {
    AnalyzeArgs {
        code: code.to_string(),
        kind: KindArg::One(kind),
        cost: None,
        config: None,
        data_dir,
        format: None,
        policy: None,
        week_anchor: None,
        no_chart: false,
    }
}

mod config_loading {
    use super::*;

    #[test]
    fn load_config_reads_ini() {
        let file = write_temp_ini("[data]\ndir = /tmp/prices\n");
        let config = cli::load_config(file.path()).unwrap();
        assert_eq!(
            stockscope::domain::config_validation::data_dir(&config).as_deref(),
            Some("/tmp/prices")
        );
    }

    #[test]
    fn load_config_missing_file_is_config_error() {
        let err = cli::load_config(Path::new("/nonexistent/stockscope.ini")).unwrap_err();
        assert!(matches!(err, StockscopeError::ConfigParse { .. }));
        assert_eq!(err.exit_status(), 2);
    }
}

mod analyze {
    use super::*;

    #[test]
    fn analyze_with_data_dir_flag() {
        let dir = data_dir_with_prices();
        let output = cli::run_analyze(args(
            "2330",
            AnalysisKind::Macd,
            Some(dir.path().to_path_buf()),
        ))
        .unwrap();
        assert!(output.starts_with("== 2330 | "));
        assert!(output.contains("Price:  169.00"));
        assert!(output.contains("Chart: 70 closes"));
    }

    #[test]
    fn data_dir_from_config() {
        let dir = data_dir_with_prices();
        let ini = write_temp_ini(&format!(
            "[data]\ndir = {}\n[output]\nformat = json\nchart = false\n",
            dir.path().display()
        ));
        let mut request = args("2330", AnalysisKind::Chips, None);
        request.config = Some(ini.path().to_path_buf());

        let output = cli::run_analyze(request).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["kind"], "chips");
        assert_eq!(value["result"]["values"][1]["value"], "2000 lots");
        assert!(value["chart"].is_null());
    }

    #[test]
    fn flags_override_config() {
        let dir = data_dir_with_prices();
        let ini = write_temp_ini(
            "[data]\ndir = /does/not/exist\n[fusion]\npolicy = four_domain\n[output]\nformat = text\n",
        );
        let mut request = args("2330", AnalysisKind::Summary, Some(dir.path().to_path_buf()));
        request.config = Some(ini.path().to_path_buf());
        request.format = Some(OutputFormat::Json);
        request.policy = Some(WeightingPolicy::LegacyThreeDomain);
        request.no_chart = true;

        let output = cli::run_analyze(request).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["kind"], "summary");
        let values = value["result"]["values"].as_array().unwrap();
        let policy = values
            .iter()
            .find(|row| row["label"] == "Policy")
            .map(|row| row["value"].clone());
        assert_eq!(policy, Some(serde_json::json!("legacy_three_domain")));
        assert!(value["chart"].is_null());
    }

    #[test]
    fn cost_basis_decorates_output() {
        let dir = data_dir_with_prices();
        let mut request = args("2330", AnalysisKind::Rsi, Some(dir.path().to_path_buf()));
        request.cost = Some(130.0);
        let output = cli::run_analyze(request).unwrap();
        assert!(output.contains("Your cost"));
        assert!(output.contains("+30.00%"));
        assert!(output.contains("Scale out"));
    }

    #[test]
    fn all_kinds_in_one_run() {
        let dir = data_dir_with_prices();
        let mut request = args("2330", AnalysisKind::Kd, Some(dir.path().to_path_buf()));
        request.kind = KindArg::All;
        request.format = Some(OutputFormat::Json);
        let output = cli::run_analyze(request).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            value.as_array().map(|a| a.len()),
            Some(AnalysisKind::ALL.len())
        );
    }

    #[test]
    fn missing_data_dir_is_config_error() {
        let err = cli::run_analyze(args("2330", AnalysisKind::Kd, None)).unwrap_err();
        assert!(matches!(err, StockscopeError::ConfigMissing { key, .. } if key == "dir"));
    }

    #[test]
    fn unknown_code_is_no_data() {
        let dir = data_dir_with_prices();
        let err = cli::run_analyze(args(
            "9999",
            AnalysisKind::Kd,
            Some(dir.path().to_path_buf()),
        ))
        .unwrap_err();
        assert_eq!(err.exit_status(), 5);
    }

    #[test]
    fn invalid_config_value_rejected_before_loading_data() {
        let ini = write_temp_ini("[data]\ndir = x\nweek_anchor = tuesday\n");
        let mut request = args("2330", AnalysisKind::Kd, None);
        request.config = Some(ini.path().to_path_buf());
        let err = cli::run_analyze(request).unwrap_err();
        assert!(matches!(err, StockscopeError::ConfigInvalid { key, .. } if key == "week_anchor"));
    }
}

mod validate {
    use super::*;

    #[test]
    fn valid_config_reports_ok() {
        let file = write_temp_ini(
            "[data]\ndir = ./data\nweek_anchor = friday\n[fusion]\npolicy = legacy_three_domain\n",
        );
        let message = cli::run_validate(file.path()).unwrap();
        assert!(message.contains("configuration is valid"));
    }

    #[test]
    fn missing_data_dir_fails_validation() {
        let file = write_temp_ini("[output]\nformat = json\n");
        let err = cli::run_validate(file.path()).unwrap_err();
        assert!(matches!(err, StockscopeError::ConfigMissing { .. }));
    }

    #[test]
    fn bad_format_fails_validation() {
        let file = write_temp_ini("[data]\ndir = ./data\n[output]\nformat = pdf\n");
        let err = cli::run_validate(file.path()).unwrap_err();
        assert_eq!(err.exit_status(), 2);
    }
}
