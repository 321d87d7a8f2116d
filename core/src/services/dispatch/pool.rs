//! Fixed-size worker pool polling the delivery queue

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex, Semaphore};

use mc_shared::config::MAX_RECEIVE_BATCH;

use crate::repositories::DeliveryQueue;

use super::config::WorkerPoolConfig;
use super::service::EmailDispatcher;
use super::traits::EmailServiceTrait;
use super::types::DispositionCounts;

/// Runs an [`EmailDispatcher`] over a delivery queue with N concurrent workers
///
/// Each worker slot is a semaphore permit and owns one message at a time.
/// The poller only asks the queue for as many messages as there are free
/// slots, so a saturated pool stops receiving and leaves messages to other
/// consumers.
///
/// ```ignore
/// let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
/// let pool = WorkerPool::new(Arc::new(dispatcher), WorkerPoolConfig::default());
/// let handle = tokio::spawn(pool.run(shutdown_rx));
/// // ...
/// shutdown_tx.send(true)?;
/// let totals = handle.await?;
/// ```
pub struct WorkerPool<Q: ?Sized, E: ?Sized> {
    dispatcher: Arc<EmailDispatcher<Q, E>>,
    config: WorkerPoolConfig,
}

impl<Q, E> WorkerPool<Q, E>
where
    Q: DeliveryQueue + ?Sized + 'static,
    E: EmailServiceTrait + ?Sized + 'static,
{
    pub fn new(dispatcher: Arc<EmailDispatcher<Q, E>>, config: WorkerPoolConfig) -> Self {
        Self { dispatcher, config }
    }

    /// Poll and dispatch until `shutdown` flips or its sender is dropped
    ///
    /// On shutdown no further messages are received; in-flight dispatches
    /// run to completion before this returns the totals.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> DispositionCounts {
        let workers = self.config.workers.clamp(1, Semaphore::MAX_PERMITS);
        let batch_size = self.config.batch_size.clamp(1, MAX_RECEIVE_BATCH);
        let poll_interval = self.config.poll_interval;

        let semaphore = Arc::new(Semaphore::new(workers));
        let counts = Arc::new(Mutex::new(DispositionCounts::default()));
        let mut idle_streak: u32 = 0;

        tracing::info!(
            workers = workers,
            batch_size = batch_size,
            event = "worker_pool_started",
            "Dispatch worker pool running"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            let first = tokio::select! {
                permit = semaphore.clone().acquire_owned() => permit,
                _ = shutdown.changed() => break,
            };
            let Ok(first) = first else { break };

            let mut permits = vec![first];
            while permits.len() < batch_size {
                match semaphore.clone().try_acquire_owned() {
                    Ok(permit) => permits.push(permit),
                    Err(_) => break,
                }
            }

            let received = tokio::select! {
                received = self.dispatcher.queue().receive(permits.len()) => received,
                _ = shutdown.changed() => break,
            };

            match received {
                Ok(messages) if messages.is_empty() => {
                    drop(permits);
                    idle_streak = idle_streak.saturating_add(1);
                    let backoff = idle_backoff(poll_interval, idle_streak);
                    if sleep_or_shutdown(backoff, &mut shutdown).await {
                        break;
                    }
                }
                Ok(messages) => {
                    idle_streak = 0;
                    let received_count = messages.len();
                    let mut permits = permits.into_iter();

                    for message in messages {
                        let Some(permit) = permits.next() else {
                            tracing::warn!(
                                requested = batch_size,
                                received = received_count,
                                event = "receive_overflow",
                                "Queue returned more messages than requested; extras will be redelivered"
                            );
                            break;
                        };

                        let dispatcher = self.dispatcher.clone();
                        let counts = counts.clone();
                        tokio::spawn(async move {
                            let _permit = permit;
                            let disposition = dispatcher.handle_message(&message).await;
                            counts.lock().await.record(disposition);
                        });
                    }
                }
                Err(e) => {
                    drop(permits);
                    tracing::error!(
                        error = %e,
                        event = "queue_receive_failed",
                        "Failed to poll delivery queue"
                    );
                    if sleep_or_shutdown(poll_interval, &mut shutdown).await {
                        break;
                    }
                }
            }
        }

        tracing::info!(
            in_flight = workers - semaphore.available_permits(),
            event = "worker_pool_draining",
            "Dispatch worker pool stopping, waiting for in-flight deliveries"
        );
        // Every permit back means every spawned dispatch finished
        let _drained = semaphore.acquire_many(workers as u32).await;

        let totals = counts.lock().await.clone();
        tracing::info!(
            delivered = totals.delivered,
            rejected = totals.rejected,
            malformed = totals.malformed,
            abandoned = totals.abandoned,
            retried = totals.retried,
            event = "worker_pool_stopped",
            "Dispatch worker pool stopped"
        );
        totals
    }
}

/// Poll interval stretched by 10% per empty poll, up to 1.5x
pub(crate) fn idle_backoff(poll_interval: Duration, idle_streak: u32) -> Duration {
    let tenths = 10 + idle_streak.min(5);
    poll_interval.saturating_mul(tenths) / 10
}

/// Sleep for `duration`; true if shutdown was signalled first
async fn sleep_or_shutdown(duration: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(duration) => false,
        _ = shutdown.changed() => true,
    }
}
