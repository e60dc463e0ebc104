//! StockGuard CLI — analysis and report commands.
//!
//! Commands:
//! - `analyze` — run the full pipeline for a symbol and date range, print a
//!   summary, and write the JSON response
//! - `report` — write the anomaly-row CSV from a saved JSON response

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use stockguard_core::analyzer::{AnalyzeRequest, Analyzer, AnalysisResponse};
use stockguard_core::config::AnalyzeConfig;
use stockguard_core::data::{SyntheticProvider, YahooProvider};
use stockguard_core::narrative::TemplateNarrator;
use stockguard_core::report;

#[derive(Parser)]
#[command(
    name = "stockguard",
    about = "StockGuard CLI — daily OHLCV analysis and anomaly detection"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the analysis pipeline for one symbol and date range.
    Analyze {
        /// Ticker symbol (e.g., AAPL).
        symbol: String,

        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        start: String,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Expected fraction of anomalous bars, open interval (0, 0.5).
        #[arg(long)]
        contamination: Option<f64>,

        /// Master seed for the anomaly model.
        #[arg(long)]
        seed: Option<u64>,

        /// Narrative language code (passed through opaquely).
        #[arg(long)]
        language: Option<String>,

        /// Path to a TOML config file; flags override its values.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Use deterministic synthetic data instead of Yahoo Finance.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Output path for the JSON response.
        #[arg(long, default_value = "analysis.json")]
        output: PathBuf,
    },
    /// Write the anomaly-row CSV from a saved JSON response.
    Report {
        /// Path to a JSON response written by `analyze`.
        response: PathBuf,

        /// Output path for the CSV report.
        #[arg(long, default_value = "anomalies.csv")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            symbol,
            start,
            end,
            contamination,
            seed,
            language,
            config,
            synthetic,
            output,
        } => run_analyze(
            symbol,
            start,
            end,
            contamination,
            seed,
            language,
            config,
            synthetic,
            output,
        ),
        Commands::Report { response, output } => run_report(&response, &output),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_analyze(
    symbol: String,
    start: String,
    end: Option<String>,
    contamination: Option<f64>,
    seed: Option<u64>,
    language: Option<String>,
    config_path: Option<PathBuf>,
    synthetic: bool,
    output: PathBuf,
) -> Result<()> {
    let start_date = NaiveDate::parse_from_str(&start, "%Y-%m-%d")
        .context("--start must be YYYY-MM-DD")?;
    let end_date = end
        .as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("--end must be YYYY-MM-DD")?
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    if end_date < start_date {
        bail!("--end ({end_date}) is before --start ({start_date})");
    }

    let mut config = match config_path {
        Some(path) => AnalyzeConfig::from_file(&path)?,
        None => AnalyzeConfig::default(),
    };
    if let Some(c) = contamination {
        config.contamination = c;
    }
    if let Some(s) = seed {
        config.seed = s;
    }
    if let Some(lang) = language {
        config.language = lang;
    }
    config.validate()?;

    let request = AnalyzeRequest {
        symbol,
        start: start_date,
        end: end_date,
    };

    let response = if synthetic {
        // Synthetic coverage extends a lookback window before the request so
        // indicators warm up, exactly as a real provider's history would.
        let coverage_start = start_date - chrono::Duration::days(config.lookback_days);
        let provider = SyntheticProvider::new(coverage_start, end_date);
        Analyzer::new(provider, config).respond(&request, &TemplateNarrator)?
    } else {
        let provider = YahooProvider::new()?;
        Analyzer::new(provider, config).respond(&request, &TemplateNarrator)?
    };

    print_summary(&response);

    let json = serde_json::to_string_pretty(&response)?;
    std::fs::write(&output, json)
        .with_context(|| format!("cannot write {}", output.display()))?;
    println!("Response saved to: {}", output.display());

    Ok(())
}

fn run_report(response_path: &PathBuf, output: &PathBuf) -> Result<()> {
    let text = std::fs::read_to_string(response_path)
        .with_context(|| format!("cannot read {}", response_path.display()))?;
    let response: AnalysisResponse =
        serde_json::from_str(&text).context("response file is not a valid analysis response")?;

    let rows = report::anomaly_rows(&response.series);
    if rows.is_empty() {
        println!("No anomalies in {} — nothing to report.", response.symbol);
        return Ok(());
    }

    report::write_csv_file(output, &rows)?;
    println!(
        "Wrote {} anomaly row(s) for {} to {}",
        rows.len(),
        response.symbol,
        output.display()
    );

    Ok(())
}

fn print_summary(response: &AnalysisResponse) {
    println!();
    println!("=== Analysis Result ===");
    println!("Symbol:         {}", response.symbol);
    if let (Some(first), Some(last)) = (response.series.first(), response.series.last()) {
        println!("Period:         {} to {}", first.date, last.date);
        println!("Latest Close:   {:.2}", last.close);
        if let Some(rsi) = last.rsi {
            println!("Latest RSI:     {rsi:.1}");
        }
    }
    println!("Bars:           {}", response.series.len());
    println!("Anomalies:      {}", response.anomalies_count);
    println!();
    println!("--- Assessment ---");
    println!("Sentiment:      {:?}", response.overall_sentiment);
    println!("Action:         {:?}", response.overall_action);
    println!();
    println!("{}", response.narrative_text);
    println!();
}
