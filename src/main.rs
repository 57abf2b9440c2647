use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use deploy_relay::{api, config, notification, AppState};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env must be applied before RUST_LOG / RELAY_LOG_FORMAT are read.
    dotenvy::dotenv().ok();
    init_tracing();

    let args = cli::Cli::parse();

    let result = match args.command {
        Some(cli::Commands::Serve { port }) => run_server(config::load()?, port).await,
        Some(cli::Commands::Preview { file }) => run_preview(file),
        None => run_server(config::load()?, None).await,
    };

    if let Err(ref e) = result {
        eprintln!("Error: {:?}", e);
    }
    result
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "deploy_relay=debug,tower_http=debug".into()),
    );

    let fmt_layer = if std::env::var("RELAY_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

async fn run_server(cfg: config::Config, port: Option<u16>) -> anyhow::Result<()> {
    let port = port.unwrap_or(cfg.port);
    let state = Arc::new(AppState::from_config(&cfg)?);
    let app = api::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(
        discord_configured = cfg.discord_webhook_url.is_some(),
        "deploy-relay listening on {}",
        addr
    );
    axum::serve(listener, app).await?;

    Ok(())
}

fn run_preview(file: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let raw = match file {
        Some(path) => std::fs::read(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    match notification::embed::preview(&raw)? {
        Some(body) => println!("{}", body),
        None => println!("Event type not handled"),
    }
    Ok(())
}
