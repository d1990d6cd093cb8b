//! Runs every configured collector until shutdown.

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use beanwatch_collector::jolokia::JolokiaClient;
use beanwatch_collector::{
    local_hostname, Collector, Diagnostics, Output, Reporter, Shutdown, ShutdownSignal,
};
use beanwatch_types::ManagedEntry;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{error, info};

use crate::settings::{CollectorItem, Settings};

/// HTTP timeout for requests to a Jolokia agent.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Spawn one task per collector and wait until all of them have exited.
///
/// All collectors share `catalogue`, `output` and `shutdown`; triggering the
/// shutdown stops them all.
pub async fn run(
    settings: &Settings,
    catalogue: Vec<ManagedEntry>,
    output: Output,
    shutdown: ShutdownSignal,
) -> Result<()> {
    let catalogue = Arc::new(catalogue);
    let output = Arc::new(output);
    let hostname = local_hostname();
    let diagnostics: Arc<dyn Diagnostics> = Arc::new(Reporter::new(
        settings.plugin.clone(),
        hostname.clone(),
        output.clone(),
    ));

    let mut tasks = JoinSet::new();
    for item in &settings.collectors {
        let collector = Collector::builder(item.name.clone(), item.to_config()?, client_for(item)?)
            .catalogue(catalogue.clone())
            .measurements(output.clone())
            .diagnostics(diagnostics.clone())
            .hostname(hostname.clone())
            .retry_delay(settings.retry_delay())
            .build(shutdown.clone());

        info!(
            "Starting collector {} for {}:{}",
            item.name, item.host, item.port
        );
        tasks.spawn(collector.run());
    }

    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result {
            error!("Collector task failed: {}", e);
        }
    }
    info!("All collectors stopped");
    Ok(())
}

/// Wait for `collectors` to finish, triggering `shutdown` when `interrupt`
/// resolves first. An early failure of the collectors is returned at once.
pub async fn until_interrupted<F>(
    mut collectors: JoinHandle<Result<()>>,
    interrupt: F,
    shutdown: Shutdown,
) -> Result<()>
where
    F: Future<Output = io::Result<()>>,
{
    tokio::select! {
        interrupted = interrupt => {
            interrupted.context("Failed to listen for Ctrl-C")?;
            info!("Interrupted, stopping collectors");
            shutdown.trigger();
            collectors.await.context("Collector supervisor panicked")?
        }
        finished = &mut collectors => {
            finished.context("Collector supervisor panicked")?
        }
    }
}

fn client_for(item: &CollectorItem) -> Result<JolokiaClient> {
    let mut builder = JolokiaClient::builder().timeout(REQUEST_TIMEOUT);
    if let Some(base_path) = &item.base_path {
        builder = builder.base_path(base_path.clone());
    }
    builder
        .build()
        .with_context(|| format!("Failed to create HTTP client for collector '{}'", item.name))
}
