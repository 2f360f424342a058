//! promptcraft: rewrites rough prompts into structured ones, one mode at a time.

use clap::Parser;
use promptcraft::config::{CredentialRegistry, Credentials};
use promptcraft::{ai, api, AppState};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "promptcraft", version, about = "Prompt optimizer backed by Gemini")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3918", env = "PROMPTCRAFT_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    let ai_cfg = match ai::AiConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    let creds = Credentials::from_env();
    let generation = if creds.has_generation() { "configured" } else { "missing" };
    let store = if creds.has_store() { "configured" } else { "disabled" };

    let api_key = std::env::var("PROMPTCRAFT_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    let auth_status = if api_key.is_some() { "enabled" } else { "disabled" };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = args.port,
        model = %ai_cfg.model,
        generation,
        store,
        auth = auth_status,
        "promptcraft starting"
    );

    let state = AppState {
        ai: ai_cfg,
        credentials: CredentialRegistry::new(creds),
        api_key,
        started_at: std::time::Instant::now(),
    };
    let app = api::router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(%addr, "failed to bind: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("server error: {e}");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(_) => {
            let _ = tokio::signal::ctrl_c().await;
        }
    }
    info!("shutting down");
}
