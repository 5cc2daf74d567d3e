//! CLI definition and dispatch.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report::JsonReport;
use crate::adapters::text_report::TextReport;
use crate::domain::config_validation::{
    data_dir, evaluation_settings, output_format, validate_config,
};
use crate::domain::error::StockscopeError;
use crate::domain::evaluator::{evaluate, AnalysisKind, EvaluationRequest};
use crate::domain::fusion::WeightingPolicy;
use crate::domain::ohlcv::WeekAnchor;
use crate::ports::data_port::MarketDataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "stockscope",
    about = "Indicator scoring, signal fusion and position advice for one security"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate one security from local CSV files
    Analyze {
        #[arg(long)]
        code: String,
        /// Analysis kind (see `kinds`), or `all`
        #[arg(short, long, default_value = "summary", value_parser = parse_kind_arg)]
        kind: KindArg,
        /// Cost basis per share, enables position advice
        #[arg(long)]
        cost: Option<f64>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
        /// Weighting policy override (four_domain | legacy_three_domain)
        #[arg(long, value_parser = parse_policy_arg)]
        policy: Option<WeightingPolicy>,
        /// Week anchor override for weekly resampling (sunday | friday)
        #[arg(long, value_parser = parse_anchor_arg)]
        week_anchor: Option<WeekAnchor>,
        /// Leave the (dates, closes) chart payload out
        #[arg(long)]
        no_chart: bool,
    },
    /// List the available analysis kinds
    Kinds,
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    One(AnalysisKind),
    All,
}

impl KindArg {
    fn kinds(self) -> Vec<AnalysisKind> {
        match self {
            KindArg::One(kind) => vec![kind],
            KindArg::All => AnalysisKind::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }

    fn reporter(self) -> Box<dyn ReportPort> {
        match self {
            OutputFormat::Text => Box::new(TextReport),
            OutputFormat::Json => Box::new(JsonReport { pretty: true }),
        }
    }
}

fn parse_kind_arg(value: &str) -> Result<KindArg, String> {
    if value.eq_ignore_ascii_case("all") {
        return Ok(KindArg::All);
    }
    AnalysisKind::parse(value)
        .map(KindArg::One)
        .ok_or_else(|| format!("unknown analysis kind '{}' (run `stockscope kinds`)", value))
}

fn parse_policy_arg(value: &str) -> Result<WeightingPolicy, String> {
    WeightingPolicy::parse(value).ok_or_else(|| format!("unknown weighting policy '{}'", value))
}

fn parse_anchor_arg(value: &str) -> Result<WeekAnchor, String> {
    WeekAnchor::parse(value).ok_or_else(|| format!("unknown week anchor '{}'", value))
}

/// Everything `analyze` needs beyond the config file.
#[derive(Debug)]
pub struct AnalyzeArgs {
    pub code: String,
    pub kind: KindArg,
    pub cost: Option<f64>,
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub policy: Option<WeightingPolicy>,
    pub week_anchor: Option<WeekAnchor>,
    pub no_chart: bool,
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Analyze {
            code,
            kind,
            cost,
            config,
            data_dir,
            format,
            policy,
            week_anchor,
            no_chart,
        } => run_analyze(AnalyzeArgs {
            code,
            kind,
            cost,
            config,
            data_dir,
            format,
            policy,
            week_anchor,
            no_chart,
        }),
        Command::Kinds => Ok(list_kinds()),
        Command::Validate { config } => run_validate(&config),
    };

    match outcome {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, StockscopeError> {
    eprintln!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

/// Run `analyze` and return the rendered report.
pub fn run_analyze(args: AnalyzeArgs) -> Result<String, StockscopeError> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => FileConfigAdapter::empty(),
    };

    let mut settings = evaluation_settings(&config)?;
    if let Some(policy) = args.policy {
        settings.policy = policy;
    }
    if let Some(anchor) = args.week_anchor {
        settings.week_anchor = anchor;
    }
    if args.no_chart {
        settings.include_chart = false;
    }

    let dir = match args.data_dir {
        Some(dir) => dir,
        None => data_dir(&config)
            .map(PathBuf::from)
            .ok_or_else(|| StockscopeError::ConfigMissing {
                section: "data".to_string(),
                key: "dir".to_string(),
            })?,
    };

    let format = match args.format {
        Some(format) => format,
        None => output_format(&config)?
            .as_deref()
            .and_then(OutputFormat::parse)
            .unwrap_or(OutputFormat::Text),
    };

    eprintln!("Loading market data for {} from {}", args.code, dir.display());
    let adapter = CsvAdapter::new(dir);
    let inputs = adapter.load_inputs(&args.code)?;

    let kinds = args.kind.kinds();
    eprintln!(
        "Running {} analysis kind(s) on {} bars",
        kinds.len(),
        inputs.prices.len()
    );
    let evaluations: Vec<_> = kinds
        .into_iter()
        .map(|kind| {
            let request = EvaluationRequest {
                kind,
                cost_basis: args.cost,
                settings,
            };
            evaluate(&inputs, &request)
        })
        .collect();

    let reporter = format.reporter();
    let mut output = match evaluations.as_slice() {
        [single] => reporter.render(single)?,
        many => reporter.render_all(many)?,
    };
    if !output.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}

fn list_kinds() -> String {
    AnalysisKind::ALL
        .iter()
        .map(|kind| format!("{:<10} {}\n", kind.name(), kind.title()))
        .collect()
}

pub fn run_validate(path: &Path) -> Result<String, StockscopeError> {
    let config = load_config(path)?;
    validate_config(&config)?;
    Ok(format!("{}: configuration is valid\n", path.display()))
}
