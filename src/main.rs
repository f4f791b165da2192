use std::future::IntoFuture;
use std::sync::Arc;

use track_search::backend::SearchBackend;
use track_search::backend::memory::MemoryBackend;
use track_search::backend::redis_search::RedisBackend;
use track_search::config::{BackendKind, ServiceConfig};
use track_search::search::engine::SearchService;
use track_search::search::handlers::{FatalSignal, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        // .with_max_level(tracing::Level::DEBUG)
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = ServiceConfig::from_env()?.apply_args(&args)?;

    // 1. Backend:
    let backend: Arc<dyn SearchBackend> = match config.backend {
        BackendKind::Redis => Arc::new(RedisBackend::connect(&config.redis_url()).await?),
        BackendKind::Memory => {
            let memory = MemoryBackend::new();
            if let Some(path) = &config.seed_file {
                memory.load_seed(path)?;
            }
            Arc::new(memory)
        }
    };
    tracing::info!("Using {} search backend", backend.name());

    // 2. Provision the index before accepting requests:
    let service = Arc::new(SearchService::tracks(backend)?);
    match service.provision().await {
        Ok(outcome) => tracing::info!("Index {} ready ({:?})", service.descriptor(), outcome),
        Err(e) => {
            tracing::error!("Something went wrong, perhaps the search module isn't installed: {}", e);
            return Err(e.into());
        }
    }

    // 3. HTTP server, stopped by ctrl-c or a fatal backend failure:
    let (fatal, mut fatal_rx) = FatalSignal::new();
    let app = router(service, fatal);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("REST API listening on http://{}", config.bind_addr);

    tokio::select! {
        result = axum::serve(listener, app).into_future() => {
            result?;
        }
        Some(reason) = fatal_rx.recv() => {
            anyhow::bail!("stopping after fatal index failure: {}", reason);
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
        }
    }

    Ok(())
}
