use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;

use cattery_site::app::{AppState, router};
use cattery_site::contact::ContactSettings;
use cattery_site::mailer::{Mailer, MailerSendClient, MailerSendConfig};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct AppArgs {
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Snapshot JSON served at `/api/content`.
    #[arg(long, default_value = "generated/content-snapshot.json")]
    snapshot: PathBuf,

    /// Built frontend directory (served if it contains `index.html`).
    #[arg(long, default_value = "dist")]
    web_dir: PathBuf,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    cattery_site::logging::init("info")?;

    let args = AppArgs::parse();
    tracing::info!(?args, "starting cattery-site-app");

    let mailer_config = MailerSendConfig::from_env().context("load MailerSend config")?;
    tracing::info!(base_url = %mailer_config.base_url, "using MailerSend");
    let mailer: Arc<dyn Mailer> = Arc::new(MailerSendClient::new(mailer_config)?);
    let contact = ContactSettings::from_env().context("load contact settings")?;

    let state = AppState {
        mailer,
        contact: Arc::new(contact),
        snapshot_path: args.snapshot,
    };
    let app = router(state, Some(&args.web_dir));

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .map_err(|err| anyhow::anyhow!("bind {}: {err}", args.addr))?;
    tracing::info!(addr = %args.addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(%err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
