// ghcal command line entry point.
// Renders one user's contribution calendar to stdout or a file.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::error;

use ghcal::calendar::{CalendarLoader, HtmlContainer, LoaderConfig, RetryPolicy};
use ghcal::github::{DEFAULT_PROXY_BASE, HttpProxy};
use ghcal::{FileStore, Result, telemetry};

#[derive(Parser, Debug)]
#[command(
    name = "ghcal",
    version,
    about = "Render a GitHub contribution calendar with streak statistics"
)]
struct Args {
    /// GitHub username
    username: String,

    /// Cache lifetime in seconds (0 disables the cache)
    #[arg(long, default_value_t = 86_400)]
    cache: u64,

    /// Scale the graph with its container
    #[arg(long)]
    responsive: bool,

    /// Label day cells and include the hover tooltip script
    #[arg(long)]
    tooltips: bool,

    /// Skip the total/longest/current streak columns
    #[arg(long)]
    no_global_stats: bool,

    /// Footer text under the graph (HTML allowed)
    #[arg(long)]
    summary_text: Option<String>,

    /// Endpoint serving the contributions page
    #[arg(long, default_value = DEFAULT_PROXY_BASE)]
    proxy_url: String,

    /// Cache store file (defaults to the user cache directory)
    #[arg(long)]
    cache_file: Option<PathBuf>,

    /// Retries when the page comes back without calendar data
    #[arg(long, default_value_t = RetryPolicy::DEFAULT_MAX_RETRIES)]
    retries: u32,

    /// Delay between retries in milliseconds
    #[arg(long, default_value_t = 500)]
    retry_delay_ms: u64,

    /// Id of the wrapping container element
    #[arg(long)]
    container_id: Option<String>,

    /// Write the markup here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the streak summary as JSON instead of markup
    #[arg(long)]
    json: bool,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn loader_config(&self) -> LoaderConfig {
        let mut config = LoaderConfig::new()
            .with_cache(self.cache)
            .with_responsive(self.responsive)
            .with_tooltips(self.tooltips)
            .with_global_stats(!self.no_global_stats)
            .with_retry(RetryPolicy::new(
                self.retries,
                Duration::from_millis(self.retry_delay_ms),
            ));
        if let Some(text) = &self.summary_text {
            config = config.with_summary_text(text.clone());
        }
        config
    }

    fn store(&self) -> Result<FileStore> {
        match &self.cache_file {
            Some(path) => Ok(FileStore::new(path)),
            None => FileStore::open_default(),
        }
    }
}

async fn run(args: &Args) -> Result<()> {
    let proxy = HttpProxy::with_base_url(&args.proxy_url)?;
    let loader = CalendarLoader::new(proxy, args.store()?);
    let mut container = match &args.container_id {
        Some(id) => HtmlContainer::with_id(id),
        None => HtmlContainer::new(),
    };

    let summary = loader
        .try_load(&mut container, &args.username, &args.loader_config())
        .await?;

    let output = if args.json {
        serde_json::to_string_pretty(&summary)?
    } else {
        container.outer_html()
    };

    match &args.output {
        Some(path) => fs::write(path, output)?,
        None => println!("{}", output),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    telemetry::init(&args.log_level);

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(username = %args.username, error = %e, "Failed to render GitHub calendar");
            ExitCode::FAILURE
        }
    }
}
