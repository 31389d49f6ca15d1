//! CLI entry point for the county education choropleth generator.
//!
//! Provides subcommands for rendering the SVG map and for exporting the
//! joined county data as CSV.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use edu_choropleth::{
    chart::ChartBuilder,
    fetch::{BasicClient, load_datasets},
    join::{JoinPolicy, join_counties},
    output::export_joined,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Public dataset endpoints used when no source override is given.
const COUNTIES_URL: &str = "https://raw.githubusercontent.com/no-stack-dub-sack/testable-projects-fcc/master/src/data/choropleth_map/counties.json";
const EDUCATION_URL: &str = "https://raw.githubusercontent.com/no-stack-dub-sack/testable-projects-fcc/master/src/data/choropleth_map/for_user_education.json";

#[derive(Parser)]
#[command(name = "edu_choropleth")]
#[command(about = "Renders a US county educational attainment choropleth", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum JoinPolicyArg {
    /// Fail if any county geometry has no education record
    Strict,
    /// Drop unmatched counties with a warning
    Lenient,
}

impl From<JoinPolicyArg> for JoinPolicy {
    fn from(arg: JoinPolicyArg) -> Self {
        match arg {
            JoinPolicyArg::Strict => JoinPolicy::Strict,
            JoinPolicyArg::Lenient => JoinPolicy::Lenient,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch both datasets, join them, and render the SVG chart
    Render {
        /// County topology source (URL or local file)
        #[arg(long, default_value = COUNTIES_URL)]
        counties: String,

        /// Education dataset source (URL or local file)
        #[arg(long, default_value = EDUCATION_URL)]
        education: String,

        /// Output SVG file
        #[arg(short, long, default_value = "choropleth.svg")]
        output: PathBuf,

        /// How to handle counties with no education record
        #[arg(long, value_enum, default_value = "strict")]
        join_policy: JoinPolicyArg,
    },
    /// Fetch both datasets, join them, and append the rows to a CSV file
    Export {
        /// County topology source (URL or local file)
        #[arg(long, default_value = COUNTIES_URL)]
        counties: String,

        /// Education dataset source (URL or local file)
        #[arg(long, default_value = EDUCATION_URL)]
        education: String,

        /// CSV file to append joined rows to
        #[arg(short, long, default_value = "joined.csv")]
        output: String,

        /// How to handle counties with no education record
        #[arg(long, value_enum, default_value = "strict")]
        join_policy: JoinPolicyArg,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/edu_choropleth.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("edu_choropleth.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            counties,
            education,
            output,
            join_policy,
        } => {
            let policy = join_policy.into();
            let client = BasicClient::new();

            let (topology, education_records) =
                load_datasets(&client, &counties, &education).await?;

            let decoded = topology.decode()?;
            let joined = join_counties(&decoded.counties, &education_records, policy)?;
            info!(joined = joined.len(), "counties joined");

            let svg = ChartBuilder::new(decoded, joined, policy)
                .make_canvas()
                .draw_map()?
                .paint_colors()?
                .make_legend()?
                .make_tooltips()?
                .finish()?;

            std::fs::write(&output, svg)?;
            info!(output = %output.display(), "choropleth written");
        }
        Commands::Export {
            counties,
            education,
            output,
            join_policy,
        } => {
            let policy = join_policy.into();
            let client = BasicClient::new();

            let (topology, education_records) =
                load_datasets(&client, &counties, &education).await?;

            let decoded = topology.decode()?;
            let joined = join_counties(&decoded.counties, &education_records, policy)?;

            export_joined(&output, &joined)?;
            info!(rows = joined.len(), output, "joined data exported");
        }
    }

    Ok(())
}
