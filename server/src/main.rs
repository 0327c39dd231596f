use routemap::assets::AssetResolver;
use routemap::catalog::Catalog;
use routemap::config::Config;
use routemap::dispatcher::Dispatcher;
use routemap::navigation::Navigator;
use routemap::presentation::Renderer;
use routemap::session::InMemorySessionStore;
use routemap::telegram::TelegramClient;
use server_lib::poller::Poller;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            eprintln!("❌ Ошибка: {e}");
            std::process::exit(1);
        }
    };

    let assets = AssetResolver::new(&config.photos_dir);
    assets.ensure_dir()?;
    info!("Serving route photos from {}", assets.dir().display());

    let catalog = Catalog::builtin();
    let client = TelegramClient::new(&config.api_url, &config.bot_token)?;
    let navigator = Navigator::new(catalog, assets, Renderer::new(config.protect_content));
    let dispatcher = Dispatcher::new(navigator, InMemorySessionStore::new());
    let poller = Poller::new(client, dispatcher, config.poll_timeout_secs);

    info!(
        "🚀 Bot started: {} districts, {} routes",
        catalog.districts().count(),
        catalog.route_count()
    );

    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(());
    });

    poller.run_with_shutdown(shutdown_rx).await;

    info!("Shutdown complete");
    Ok(())
}

#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutting down gracefully...");
}
