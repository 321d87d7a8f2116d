//! Wiring of the dispatcher process from configuration

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use mc_core::repositories::{DeliveryQueue, MemoryDeliveryQueue};
use mc_core::services::{
    EmailDispatcher, EmailDispatcherConfig, EmailServiceTrait, WorkerPool, WorkerPoolConfig,
};
use mc_infra::email::create_email_service;
use mc_infra::queue::SqsDeliveryQueue;
use mc_shared::config::{AppConfig, QueueBackend, QueueConfig};

pub type DynDispatcher = EmailDispatcher<dyn DeliveryQueue, dyn EmailServiceTrait>;
pub type DynWorkerPool = WorkerPool<dyn DeliveryQueue, dyn EmailServiceTrait>;

/// Connect the queue and email provider and assemble the worker pool
pub async fn build(config: &AppConfig) -> Result<DynWorkerPool> {
    let queue = build_queue(&config.queue).await?;
    let email = create_email_service(&config.email, config.environment)
        .await
        .context("Failed to initialize email provider")?;
    Ok(assemble(config, queue, email))
}

pub async fn build_queue(config: &QueueConfig) -> Result<Arc<dyn DeliveryQueue>> {
    match config.backend {
        QueueBackend::Sqs => {
            let queue = SqsDeliveryQueue::new(config)
                .await
                .context("Failed to initialize SQS delivery queue")?;
            Ok(Arc::new(queue))
        }
        QueueBackend::Memory => {
            warn!(
                event = "memory_queue_selected",
                "Using in-process delivery queue; requests enqueued by other processes are not seen"
            );
            Ok(Arc::new(MemoryDeliveryQueue::new(config.visibility_timeout())))
        }
    }
}

/// Build the pool over already constructed clients
pub fn assemble(
    config: &AppConfig,
    queue: Arc<dyn DeliveryQueue>,
    email: Arc<dyn EmailServiceTrait>,
) -> DynWorkerPool {
    let dispatcher_config = EmailDispatcherConfig::from(config);
    let pool_config = WorkerPoolConfig::from(config);

    info!(
        provider = email.provider_name(),
        workers = pool_config.workers,
        max_attempts = dispatcher_config.max_attempts,
        dispatch_timeout_ms = dispatcher_config.dispatch_timeout.as_millis() as u64,
        "Dispatcher configured"
    );

    let dispatcher: Arc<DynDispatcher> = Arc::new(EmailDispatcher::new(queue, email, dispatcher_config));
    WorkerPool::new(dispatcher, pool_config)
}
