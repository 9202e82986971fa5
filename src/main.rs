//! # League Trades Service
//!
//! Main entry point for the trade negotiation service.
//!
//! Wires the in-memory reference stack: roster directory, trade store,
//! delivery queues with their workers, the queue-depth scheduled job, and
//! the REST API with JWT authentication.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use league_trades::api::middleware::auth::AuthConfig;
use league_trades::api::rest::{AppState, create_router};
use league_trades::application::services::{
    NotificationDispatcher, QUEUE_CHAT_ANNOUNCE, QUEUE_EMAIL, RetryPolicy,
};
use league_trades::application::use_cases::{
    AcceptTradeUseCase, CreateTradeUseCase, DeleteTradeUseCase, GetTradeUseCase,
    RejectTradeUseCase, RosterDirectory, SubmitTradeUseCase, UpdateTradeUseCase,
};
use league_trades::config::{AppConfig, LogFormat};
use league_trades::infrastructure::events::TracingEventPublisher;
use league_trades::infrastructure::notify::{
    ChatWebhookTransport, LoggingEmailTransport, PlainTextRenderer, Transport,
};
use league_trades::infrastructure::persistence::{InMemoryRosterDirectory, InMemoryTradeStore};
use league_trades::infrastructure::queue::{
    DeliveryWorker, InMemoryDeliveryQueue, JobError, JobScheduler, ScheduledJob,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Scheduled job reporting queue depths for operators.
#[derive(Debug)]
struct QueueDepthJob {
    queue: Arc<InMemoryDeliveryQueue>,
}

#[async_trait]
impl ScheduledJob for QueueDepthJob {
    fn name(&self) -> &str {
        "queue-depth"
    }

    async fn run(&self) -> Result<(), JobError> {
        for name in [QUEUE_EMAIL, QUEUE_CHAT_ANNOUNCE] {
            let depth = self
                .queue
                .depth(name)
                .await
                .map_err(|e| JobError::transient(e.to_string()))?;
            let unacked = self
                .queue
                .unacked(name)
                .await
                .map_err(|e| JobError::transient(e.to_string()))?;
            info!(queue = name, depth, unacked, "queue depth");
        }
        Ok(())
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.level));

    match config.log.format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .pretty()
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config);

    info!(
        service = %config.service_name,
        environment = %config.environment,
        "starting league trades service v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Persistence and event stack
    let directory = Arc::new(InMemoryRosterDirectory::default());
    let dir: Arc<dyn RosterDirectory> = directory;
    let store = Arc::new(InMemoryTradeStore::new(Arc::clone(&dir)));
    let events = Arc::new(TracingEventPublisher::new());

    // Delivery queues
    let queue = Arc::new(InMemoryDeliveryQueue::new(config.queue.prefetch));
    queue.declare(QUEUE_EMAIL).await;
    queue.declare(QUEUE_CHAT_ANNOUNCE).await;

    let dispatcher = Arc::new(NotificationDispatcher::new(
        store.clone(),
        Arc::clone(&dir),
        queue.clone(),
        config.queue.announce_channel.clone(),
    ));

    // Workers
    let shutdown = CancellationToken::new();
    let renderer = Arc::new(PlainTextRenderer::new());
    let poll_interval = Duration::from_millis(config.queue.poll_interval_ms);

    let email_worker = DeliveryWorker::new(
        queue.clone(),
        renderer.clone(),
        Arc::new(LoggingEmailTransport::new()),
        QUEUE_EMAIL,
        config.queue.batch_size,
        poll_interval,
    );
    let email_handle = tokio::spawn(email_worker.run(shutdown.clone()));

    let chat_transport: Arc<dyn Transport> = match &config.queue.chat_webhook_url {
        Some(url) => Arc::new(ChatWebhookTransport::new(url)),
        None => Arc::new(LoggingEmailTransport::new()),
    };
    let chat_worker = DeliveryWorker::new(
        queue.clone(),
        renderer,
        chat_transport,
        QUEUE_CHAT_ANNOUNCE,
        config.queue.batch_size,
        poll_interval,
    );
    let chat_handle = tokio::spawn(chat_worker.run(shutdown.clone()));

    // Scheduled jobs
    let scheduler = JobScheduler::new(
        Duration::from_secs(config.scheduler.run_interval_secs),
        Duration::from_secs(config.scheduler.stall_timeout_secs),
        RetryPolicy::default(),
    );
    let job_handle = scheduler.spawn(
        Arc::new(QueueDepthJob {
            queue: queue.clone(),
        }),
        shutdown.clone(),
    );

    // REST API
    let state = Arc::new(AppState {
        create_trade: Arc::new(CreateTradeUseCase::new(
            store.clone(),
            Arc::clone(&dir),
            events.clone(),
        )),
        get_trade: Arc::new(GetTradeUseCase::new(store.clone(), Arc::clone(&dir))),
        update_trade: Arc::new(UpdateTradeUseCase::new(
            store.clone(),
            Arc::clone(&dir),
            events.clone(),
        )),
        accept_trade: Arc::new(AcceptTradeUseCase::new(
            store.clone(),
            Arc::clone(&dir),
            events.clone(),
        )),
        reject_trade: Arc::new(RejectTradeUseCase::new(
            store.clone(),
            Arc::clone(&dir),
            events.clone(),
        )),
        submit_trade: Arc::new(SubmitTradeUseCase::new(
            store.clone(),
            Arc::clone(&dir),
            events,
        )),
        delete_trade: Arc::new(DeleteTradeUseCase::new(store, dir)),
        dispatcher,
    });
    let auth = Arc::new(AuthConfig::new(config.auth.secret.clone()));
    let router = create_router(state, auth);

    let addr = config.rest.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "REST server listening");

    let server_shutdown = shutdown.clone();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
            server_shutdown.cancel();
        })
        .await?;

    // Workers recover their unacked deliveries on the way out.
    shutdown.cancel();
    let _ = tokio::join!(email_handle, chat_handle, job_handle);

    info!("league trades service stopped");
    Ok(())
}
