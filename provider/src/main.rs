//! KubeVirt Provider command-line harness
//!
//! Loads configuration from the environment, connects to the cluster using
//! the local kubeconfig (or the in-cluster service account) and runs one
//! command.

use clap::Parser;
use kubevirt_client::KubeVirtClient;
use kubevirt_provider::cli::Cli;
use kubevirt_provider::{ProviderConfig, Reconciler};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if rustls::crypto::ring::default_provider().install_default().is_err() {
        warn!("A rustls crypto provider was already installed");
    }

    let cli = Cli::parse();

    // Load configuration from environment variables
    let mut config = ProviderConfig::from_env()?;
    if cli.no_wait {
        config.wait = false;
    }

    info!("Configuration:");
    info!("  Default namespace: {}", config.namespace);
    info!("  Wait for changes: {}", config.wait);
    info!("  Poll interval: {:?}", config.poll_interval);

    let client = KubeVirtClient::try_default().await?;
    let reconciler = Reconciler::new(Arc::new(client), config);

    let mut stdout = std::io::stdout().lock();
    cli.command.execute(&reconciler, &mut stdout).await?;
    Ok(())
}
