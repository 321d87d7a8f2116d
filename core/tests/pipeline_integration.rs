//! Integration tests running the generator and dispatcher end to end on
//! the in-memory code store and delivery queue

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::watch;

    use mc_core::domain::value_objects::EmailContent;
    use mc_core::errors::{ProviderError, ProviderErrorCode};
    use mc_core::repositories::{CodeStore, DeliveryQueue, MemoryCodeStore, MemoryDeliveryQueue};
    use mc_core::services::{
        CodeGeneratorConfig, CodeGeneratorService, Disposition, EmailDispatcher,
        EmailDispatcherConfig, EmailServiceTrait, WorkerPool, WorkerPoolConfig,
    };

    // Records delivered emails; fails the first `failures` sends transiently
    struct RecordingEmailService {
        inbox: Mutex<Vec<(String, String)>>,
        failures: Mutex<u32>,
    }

    impl RecordingEmailService {
        fn new(failures: u32) -> Self {
            Self {
                inbox: Mutex::new(Vec::new()),
                failures: Mutex::new(failures),
            }
        }

        fn inbox(&self) -> Vec<(String, String)> {
            self.inbox.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EmailServiceTrait for RecordingEmailService {
        async fn send_email(&self, to: &str, content: &EmailContent) -> Result<String, ProviderError> {
            {
                let mut failures = self.failures.lock().unwrap();
                if *failures > 0 {
                    *failures -= 1;
                    return Err(ProviderError::new(
                        "recording",
                        ProviderErrorCode::Throttled,
                        "slow down",
                    ));
                }
            }
            self.inbox
                .lock()
                .unwrap()
                .push((to.to_string(), content.text_body.clone()));
            Ok(format!("msg-{}", uuid::Uuid::new_v4()))
        }

        fn provider_name(&self) -> &str {
            "recording"
        }
    }

    struct Pipeline {
        generator: CodeGeneratorService<MemoryCodeStore, MemoryDeliveryQueue>,
        dispatcher: Arc<EmailDispatcher<MemoryDeliveryQueue, RecordingEmailService>>,
        store: Arc<MemoryCodeStore>,
        queue: Arc<MemoryDeliveryQueue>,
        email: Arc<RecordingEmailService>,
    }

    fn pipeline(failures: u32) -> Pipeline {
        let store = Arc::new(MemoryCodeStore::new());
        let queue = Arc::new(MemoryDeliveryQueue::new(Duration::from_secs(60)));
        let email = Arc::new(RecordingEmailService::new(failures));

        let generator = CodeGeneratorService::new(store.clone(), queue.clone(), CodeGeneratorConfig::default());
        let dispatcher = Arc::new(EmailDispatcher::new(
            queue.clone(),
            email.clone(),
            EmailDispatcherConfig::default(),
        ));

        Pipeline {
            generator,
            dispatcher,
            store,
            queue,
            email,
        }
    }

    #[tokio::test]
    async fn test_code_request_is_stored_and_delivered() {
        let p = pipeline(0);

        let code = p.generator.generate_code("a@example.com").await.unwrap();
        assert_eq!(p.store.get("a@example.com").await.unwrap(), Some(code.value.clone()));
        assert_eq!(p.store.ttl("a@example.com").await.unwrap(), Some(300));
        assert_eq!(p.queue.len().await, 1);

        let messages = p.queue.receive(10).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(p.dispatcher.handle_message(&messages[0]).await, Disposition::Delivered);

        assert!(p.queue.is_empty().await);
        let inbox = p.email.inbox();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].0, "a@example.com");
        assert!(inbox[0].1.ends_with(&code.value));
    }

    #[tokio::test]
    async fn test_superseded_code_is_still_delivered() {
        let p = pipeline(0);

        let first = p.generator.generate_code("a@example.com").await.unwrap();
        let second = p.generator.generate_code("a@example.com").await.unwrap();

        let report = p.dispatcher.process_batch(&p.queue.receive(10).await.unwrap()).await;
        assert_eq!(report.counts.delivered, 2);

        // Only the second code is live, but both emails went out
        assert_eq!(p.store.get("a@example.com").await.unwrap(), Some(second.value.clone()));
        let bodies: Vec<String> = p.email.inbox().into_iter().map(|(_, body)| body).collect();
        assert!(bodies.iter().any(|b| b.ends_with(&first.value)));
        assert!(bodies.iter().any(|b| b.ends_with(&second.value)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_are_retried_by_redelivery() {
        let p = pipeline(2);
        let code = p.generator.generate_code("a@example.com").await.unwrap();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let pool = WorkerPool::new(
            p.dispatcher.clone(),
            WorkerPoolConfig {
                workers: 2,
                batch_size: 10,
                poll_interval: Duration::from_millis(200),
            },
        );
        let handle = tokio::spawn(pool.run(shutdown_rx));

        while !p.queue.is_empty().await {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        shutdown_tx.send(true).unwrap();
        let totals = handle.await.unwrap();

        assert_eq!(totals.retried, 2);
        assert_eq!(totals.delivered, 1);
        assert_eq!(p.email.inbox().len(), 1);
        assert!(p.email.inbox()[0].1.ends_with(&code.value));
    }

    #[tokio::test(start_paused = true)]
    async fn test_worker_pool_handles_many_identifiers() {
        let p = pipeline(0);
        for i in 0..25 {
            p.generator
                .generate_code(&format!("user{}@example.com", i))
                .await
                .unwrap();
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(
            WorkerPool::new(p.dispatcher.clone(), WorkerPoolConfig::default()).run(shutdown_rx),
        );

        while !p.queue.is_empty().await {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        shutdown_tx.send(true).unwrap();
        let totals = handle.await.unwrap();

        assert_eq!(totals.delivered, 25);
        assert_eq!(p.email.inbox().len(), 25);
    }
}
