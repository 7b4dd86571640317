//! CLI application for the health facility performance dashboard.

mod pass;
mod server;

use clap::{Parser, Subcommand, ValueEnum};
use health_perf_ingestion::{DataFiles, DatasetCache};
use health_perf_render::{HtmlPresenter, JsonPresenter, Presenter, TextPresenter};
use health_perf_telemetry::{init_logging, Metrics};
use pass::{run_render_pass, PassOutput};
use server::AppState;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "health-perf")]
#[command(about = "Performance dashboard over facility, clinical, governance and operations data")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard over HTTP
    Serve {
        /// Directory holding the four CSV files
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,

        /// Address to bind the dashboard server to
        #[arg(long, default_value = "127.0.0.1:8501")]
        bind_address: String,

        /// Log level
        #[arg(long)]
        log_level: Option<String>,

        /// Load the datasets at startup instead of on the first request
        #[arg(long, default_value = "false")]
        preload: bool,
    },
    /// Render the dashboard once and exit
    Report {
        /// Directory holding the four CSV files
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Log level
        #[arg(long)]
        log_level: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Html,
    Text,
    Json,
}

impl OutputFormat {
    fn presenter(self) -> Box<dyn Presenter> {
        match self {
            OutputFormat::Html => Box::new(HtmlPresenter),
            OutputFormat::Text => Box::new(TextPresenter),
            OutputFormat::Json => Box::new(JsonPresenter),
        }
    }

    fn view(self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            data_dir,
            bind_address,
            log_level,
            preload,
        } => {
            init_logging(log_level.as_deref())?;
            run_server(&data_dir, &bind_address, preload).await?;
        }
        Commands::Report {
            data_dir,
            format,
            output,
            log_level,
        } => {
            init_logging(log_level.as_deref())?;
            write_report(&data_dir, format, output.as_deref())?;
        }
    }

    Ok(())
}

async fn run_server(data_dir: &Path, bind_address: &str, preload: bool) -> anyhow::Result<()> {
    info!("Starting dashboard server with data from {}", data_dir.display());

    let metrics = Metrics::new()?;
    let cache = Arc::new(DatasetCache::new(DataFiles::in_dir(data_dir), metrics.clone()));

    if preload {
        let warm = cache.clone();
        let loaded = tokio::task::spawn_blocking(move || warm.get().is_ok()).await?;
        if !loaded {
            warn!("Datasets failed to load; the dashboard will show the error");
        }
    }

    server::serve(bind_address, AppState { cache, metrics }).await
}

fn write_report(data_dir: &Path, format: OutputFormat, output: Option<&Path>) -> anyhow::Result<()> {
    let metrics = Metrics::new()?;
    let cache = DatasetCache::new(DataFiles::in_dir(data_dir), metrics.clone());
    let presenter = format.presenter();

    match run_render_pass(&cache, &metrics, presenter.as_ref(), format.view())? {
        PassOutput::Page(body) => match output {
            Some(path) => {
                std::fs::write(path, body)?;
                info!("Wrote {} report to {}", format.view(), path.display());
            }
            None => print!("{}", body),
        },
        PassOutput::LoadFailed { error, .. } => return Err(error.into()),
    }

    Ok(())
}
