//! # Fiscald - Fiscal Document Platform Daemon
//!
//! Single-process deployment of the whole platform: HTTP gateway, ingestion
//! pipeline, in-memory broker, and the downstream consumer worker.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging
//! 2. Load configuration (env overrides, key validation)
//! 3. Declare and bind the broker queue
//! 4. Wire store, cipher, coordinator, and CRUD service
//! 5. Spawn the consumer worker
//! 6. Serve HTTP until Ctrl-C
//!
//! Shutdown is graceful: the HTTP server drains, then the worker is
//! signalled and joined. A delivery mid-retry finishes its attempts before
//! the worker exits.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use fd_bus::{InMemoryBroker, MessagePublisher};
use fd_gateway::{router, AppState};
use fd_ingest::{DocumentService, DocumentStore, IngestCoordinator, InMemoryDocumentStore};
use fd_worker::{ConsumerWorker, RetryPolicy, SummaryHandler};
use shared_crypto::PayloadCipher;
use shared_types::constants::routing;
use tokio::sync::watch;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = AppConfig::from_env()?;
    info!(http_port = config.http_port, "Starting fiscald");

    let broker = Arc::new(InMemoryBroker::new());
    broker.declare_queue(routing::QUEUE);
    broker
        .bind_queue(routing::QUEUE, routing::BINDING_PATTERN)
        .context("Failed to bind worker queue")?;
    info!(
        exchange = routing::EXCHANGE,
        queue = routing::QUEUE,
        binding = routing::BINDING_PATTERN,
        "Broker topology declared"
    );

    let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
    let cipher = Arc::new(PayloadCipher::new(
        config.encryption_key,
        config.encryption_nonce,
    ));
    let coordinator = Arc::new(IngestCoordinator::new(
        Arc::clone(&store),
        cipher,
        Arc::clone(&broker) as Arc<dyn MessagePublisher>,
    ));
    let service = Arc::new(DocumentService::new(Arc::clone(&store)));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = ConsumerWorker::new(
        broker.consumer(routing::QUEUE)?,
        Arc::new(SummaryHandler),
        RetryPolicy::default(),
        shutdown_rx,
    );
    let worker_task = tokio::spawn(worker.run());

    let app = router(AppState {
        coordinator,
        service,
    });
    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "HTTP gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("HTTP server stopped, signalling worker");
    let _ = shutdown_tx.send(true);
    worker_task.await.context("Worker task panicked")?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Ctrl-C received, shutting down");
    }
}
