use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use gallery_downloader::app::{App, LogSink};
use gallery_downloader::client::GalleryHttpClient;
use gallery_downloader::config::ConfigLoader;
use gallery_downloader::error::GalleryError;
use gallery_downloader::output::{JsonOutput, OutputMode, TextOutput};
use gallery_downloader::store::Store;

#[derive(Parser)]
#[command(name = "gallery-downloader")]
#[command(about = "Download new gallery albums into a year-partitioned directory tree")]
#[command(version, author)]
struct Cli {
    /// Config file (defaults to config.json in the current directory)
    #[arg(long)]
    config: Option<String>,

    /// Directory holding <year>/<album> trees
    #[arg(long)]
    working_dir: Option<Utf8PathBuf>,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Seconds to wait before exiting
    #[arg(long, default_value_t = 10)]
    exit_delay: u64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let delay = Duration::from_secs(cli.exit_delay);
    let code = match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            eprintln!("{report:?}");
            match report.downcast_ref::<GalleryError>() {
                Some(err) => ExitCode::from(map_exit_code(err)),
                None => ExitCode::from(2),
            }
        }
    };
    thread::sleep(delay);
    code
}

fn map_exit_code(error: &GalleryError) -> u8 {
    if error.is_configuration() { 1 } else { 2 }
}

fn run(cli: Cli) -> miette::Result<()> {
    let config = ConfigLoader::resolve(cli.config.as_deref()).inspect_err(|err| {
        tracing::error!("cannot read configuration, giving up: {err}");
    })?;
    tracing::debug!(?config, "configuration loaded");

    let store = match cli.working_dir {
        Some(root) => Store::new_with_root(root),
        None => Store::new()?,
    };
    store.ensure_root()?;

    let client = GalleryHttpClient::new(&config)?;
    let app = App::new(store, client, config.username.clone());
    let report = app.sync(&config.metadata_url, &LogSink);

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };
    match output_mode {
        OutputMode::Json => JsonOutput::print_sync(&report).into_diagnostic()?,
        OutputMode::Text => TextOutput::print_sync(&report).into_diagnostic()?,
    }
    Ok(())
}
