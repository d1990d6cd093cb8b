use std::path::PathBuf;

use anyhow::Result;
use beanwatch::{logging, runner, Settings};
use beanwatch_collector::{Output, Shutdown};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "beanwatch")]
#[command(about = "Samples managed attributes from JMX endpoints and streams them as measurements")]
#[command(version)]
struct Args {
    /// Path to the settings file (TOML, JSON or YAML)
    #[arg(short, long, default_value = "beanwatch.toml")]
    config: PathBuf,

    /// Log filter, e.g. "debug" or "beanwatch_collector=trace" (overrides RUST_LOG)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the settings, print a summary and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.log_level.as_deref())?;

    let settings = Settings::load(&args.config)?;
    let catalogue = settings.load_catalogue()?;

    if args.check {
        print!("{}", settings.summary(&catalogue));
        return Ok(());
    }

    info!(
        "{} {} starting {} collector(s)",
        settings.plugin.name,
        settings.plugin.version,
        settings.collectors.len()
    );

    let (shutdown, signal) = Shutdown::new();
    let collectors = tokio::spawn(async move {
        runner::run(&settings, catalogue, Output::stdout(), signal).await
    });

    runner::until_interrupted(collectors, tokio::signal::ctrl_c(), shutdown).await
}
