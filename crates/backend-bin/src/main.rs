use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use anyhow::Context;
use clap::Parser;
use campus_backend_lib::{
    config::{Settings, DEFAULT_CONFIG_FILE},
    create_router,
    storage::FlatFileStorage,
    AppState,
};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::time::{interval, Duration};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// How often expired sessions are swept
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(15 * 60);

#[derive(Parser, Debug)]
#[command(author, version, about = "Campus community backend")]
struct Args {
    /// Path to the TOML config file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Address to bind, overriding the config file
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Port to bind on the configured host
    #[arg(long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load_from(&args.config)
        .with_context(|| format!("loading settings from {}", args.config.display()))?;
    if let Some(bind) = args.bind {
        settings.bind_addr = bind;
    }
    if let Some(port) = args.port {
        settings.bind_addr.set_port(port);
    }

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let storage = FlatFileStorage::new(&settings.data_dir)
        .with_context(|| format!("opening data directory {}", settings.data_dir.display()))?;
    let state = AppState::new(storage, &settings).context("initializing application state")?;
    let state = Arc::new(state);

    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut interval = interval(SESSION_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let removed = sessions.purge_expired().await;
            if removed > 0 {
                info!(removed, "purged expired sessions");
            }
        }
    });

    let app = create_router(state);

    let listener = TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("binding {}", settings.bind_addr))?;
    info!(addr = %settings.bind_addr, production = settings.production, "server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            },
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
