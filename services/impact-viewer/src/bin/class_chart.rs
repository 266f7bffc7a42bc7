//! Offline report: polar chart of the most frequent meteorite class groups.
//!
//! Reads the meteorite array from a file or from the live API, groups the
//! records by class family and writes the chart as SVG.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use impact_pipeline::{class_frequencies, PolarChart, CHART_TITLE};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use impact_viewer::config::{DEFAULT_METEORITE_LIMIT, DEFAULT_METEORITE_URL};
use impact_viewer::loader::{decode_meteorites, MeteoriteLoader};

#[derive(Parser, Debug)]
#[command(name = "class-chart")]
#[command(about = "Render the top meteorite class groups as a polar chart")]
struct Args {
    /// Read the meteorite array from this JSON file instead of the API
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Meteorite API endpoint
    #[arg(long, default_value = DEFAULT_METEORITE_URL, env = "METEORITE_API_URL")]
    url: String,

    /// Row limit sent to the API
    #[arg(long, default_value_t = DEFAULT_METEORITE_LIMIT)]
    limit: usize,

    /// Output SVG path
    #[arg(short, long, default_value = "class_chart.svg")]
    output: PathBuf,

    /// Number of groups to chart
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt().with_env_filter(filter).with_target(false).json().init();

    let records = match &args.input {
        Some(path) => {
            let body = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            decode_meteorites(&body)?
        }
        None => MeteoriteLoader::new(args.url.clone(), args.limit)?
            .fetch()
            .await
            .with_context(|| format!("Failed to fetch meteorites from {}", args.url))?,
    };

    let mut groups = class_frequencies(&records);
    groups.truncate(args.top);

    info!(records = records.len(), "{}", CHART_TITLE);
    for group in &groups {
        info!(
            group = %group.group,
            count = group.count,
            percentage = group.percentage,
            "Class group"
        );
    }

    let svg = PolarChart::default().render_svg(&groups);
    std::fs::write(&args.output, svg)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!(path = %args.output.display(), "Chart written");

    Ok(())
}
