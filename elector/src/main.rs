use anyhow::Context;
use clap::Parser;
use elector::{logging, make_client, Cli, ElectorConfig, ShutdownSignal, Supervisor};
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_format);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ElectorConfig::from_env(cli).context("invalid configuration")?;
    info!(
        "Participant {} joining election {} in namespace {}",
        config.participant, config.election, config.namespace
    );

    let client = make_client(&config.credentials)
        .await
        .context("creating Kubernetes client")?;

    let signal = ShutdownSignal::install().context("installing signal handlers")?;
    let supervisor = Supervisor::start(&config, client)
        .await
        .context("starting elector")?;
    if let Some(addr) = supervisor.http_addr() {
        info!("Reporting leader state on http://{}", addr);
    }

    signal.wait().await?;

    supervisor.shutdown().await.context("shutdown failed")?;
    Ok(())
}
