//! # Design Viewer
//!
//! Opens a design document, runs scripted interaction steps, and prints
//! the composed visual tree as JSON.

use anyhow::Context;
use clap::Parser;
use design_core::LoadState;
use design_viewer::{CliArgs, FileSource, Viewer, ViewerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,design_viewer=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    // Use JSON format in production (RUST_LOG_FORMAT=json)
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ViewerConfig::from(CliArgs::parse());
    let key = config
        .key
        .clone()
        .context("either --id or --share-token is required")?;
    tracing::info!(
        "Starting design-viewer {} ({:?} mode, {:?} platform)",
        design_viewer::VERSION,
        config.mode,
        config.platform
    );

    let source = FileSource::new(&config.docs_dir);
    let mut viewer = Viewer::new(&config);

    match viewer.open(&source, key.clone()).await {
        LoadState::Ready(_) => {}
        LoadState::NotFound => anyhow::bail!("no document for {key}"),
        LoadState::Failed { message, retryable } => {
            anyhow::bail!("could not load {key}: {message} (retryable: {retryable})")
        }
        LoadState::Loading => anyhow::bail!("lookup for {key} did not finish"),
    }
    tracing::info!(
        "Mounted {} component(s) on the {:?} backend",
        viewer.instances().len(),
        viewer.backend()
    );

    for step in &config.steps {
        viewer
            .run_step(&source, step)
            .await
            .with_context(|| format!("step '{step}' failed"))?;
    }

    let composition = viewer.compose().context("failed to compose document")?;
    println!("{}", serde_json::to_string_pretty(&composition)?);

    viewer.close();
    Ok(())
}
