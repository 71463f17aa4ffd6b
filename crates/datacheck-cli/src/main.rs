//! datacheck CLI - verification runs for heterogeneous database migrations.

use clap::{Parser, Subcommand};
use datacheck::core::TableProjection;
use datacheck::verify::{fingerprint_rows, KEY_DELIMITER};
use datacheck::{
    CheckError, CheckResult, CheckService, Config, DataSet, Dialect, DialectImpl, Orchestrator,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(name = "datacheck")]
#[command(about = "Verification core for heterogeneous database migrations")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a source and a sink data file in one verification run
    Compare {
        /// JSON data file extracted from the source
        #[arg(long)]
        source_data: PathBuf,

        /// JSON data file extracted from the sink
        #[arg(long)]
        sink_data: PathBuf,

        /// Override number of workers
        #[arg(long)]
        workers: Option<usize>,
    },

    /// Print the composite key and fingerprint of every row in a data file
    Fingerprint {
        /// JSON data file
        #[arg(long)]
        data: PathBuf,
    },

    /// Show identifier quoting and condition conversion for a database type
    Dialect {
        /// Database type: mysql, opengauss, mssql
        #[arg(long)]
        db_type: String,

        /// Identifier to quote
        #[arg(long)]
        ident: Option<String>,

        /// Condition with backtick-quoted identifiers to convert
        #[arg(long)]
        condition: Option<String>,
    },
}

#[derive(Serialize)]
struct RowOutput {
    table: String,
    key: String,
    fingerprint: String,
}

#[derive(Serialize)]
struct DialectOutput {
    dialect: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    quoted: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    condition: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), CheckError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format).map_err(CheckError::Config)?;

    match cli.command {
        Commands::Compare {
            source_data,
            sink_data,
            workers,
        } => {
            let mut config = Config::load(&cli.config)?;
            info!("Loaded configuration from {:?}", cli.config);
            if let Some(w) = workers {
                config.check.workers = Some(w);
                config.validate()?;
            }

            let source = DataSet::load(&source_data)?;
            let sink = DataSet::load(&sink_data)?;

            let (service, _increment_logs) = CheckService::new(config.check.untracked_tables);
            let orchestrator = Orchestrator::new(config, Arc::new(service));
            let result = orchestrator.run(source, sink).await?;

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_summary(&result);
            }
        }

        Commands::Fingerprint { data } => {
            let data = DataSet::load(&data)?;
            let mut rows = Vec::new();
            for table in &data.tables {
                let projection = TableProjection::from_metadata(&table.metadata);
                for fp in fingerprint_rows(&table.rows, &projection) {
                    rows.push(RowOutput {
                        table: table.metadata.table_name.clone(),
                        key: display_key(&fp.key),
                        fingerprint: format!("{:016x}", fp.hash),
                    });
                }
            }

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for row in &rows {
                    println!("{}\t{}\t{}", row.table, row.key, row.fingerprint);
                }
            }
        }

        Commands::Dialect {
            db_type,
            ident,
            condition,
        } => {
            let dialect = DialectImpl::from_db_type(&db_type)?;
            let output = DialectOutput {
                dialect: dialect.name().to_string(),
                quoted: ident.map(|i| dialect.quote_ident(&i)),
                condition: condition.map(|c| dialect.convert_condition(&c)),
            };

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("Dialect: {}", output.dialect);
                if let Some(ref quoted) = output.quoted {
                    println!("  Identifier: {}", quoted);
                }
                if let Some(ref condition) = output.condition {
                    println!("  Condition: {}", condition);
                }
            }
        }
    }

    Ok(())
}

fn print_summary(result: &CheckResult) {
    println!("\nCheck Summary:");
    if let Some(ref run_id) = result.run_id {
        println!("  Run ID: {}", run_id);
    }
    println!("  Tables checked: {}", result.tables.len());
    println!("  Tables consistent: {}", result.tables_consistent);
    println!(
        "  Tables with differences: {}",
        result.tables_with_differences
    );
    for table in result.tables.iter().filter(|t| !t.is_consistent()) {
        println!(
            "    {}: {} missing in sink, {} missing in source, {} mismatched",
            table.table_name,
            table.diff.missing_in_sink.len(),
            table.diff.missing_in_source.len(),
            table.diff.mismatched.len()
        );
    }
    println!(
        "  Run complete: {}",
        if result.run_complete { "yes" } else { "no" }
    );
    println!("  Duration: {:.2}s", result.duration_ms as f64 / 1000.0);
}

/// Composite keys use a control character as delimiter; show it as `|`.
fn display_key(key: &str) -> String {
    key.replace(KEY_DELIMITER, "|")
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => return Err(format!("Unknown verbosity: '{}'", other)),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        "json" => subscriber.json().init(),
        "text" => subscriber.init(),
        other => return Err(format!("Unknown log format: '{}'", other)),
    }

    Ok(())
}
