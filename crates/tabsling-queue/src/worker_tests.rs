
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    use crate::pending::OpenSource;
    use tabsling_config::QueueConfig;

    #[derive(Default)]
    struct RecordingHandler {
        opened: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        fail_url: Option<String>,
        stop_after: Option<usize>,
    }

    #[async_trait]
    impl OpenHandler for RecordingHandler {
        async fn open(&self, open: &PendingOpen) -> Result<(), QueueError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(2)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail_url.as_deref() == Some(open.url.as_str()) {
                return Err(QueueError::OpenFailed {
                    url: open.url.clone(),
                    reason: "host refused".to_string(),
                });
            }
            self.opened.lock().unwrap().push(open.url.clone());
            Ok(())
        }

        async fn may_continue(&self) -> bool {
            match self.stop_after {
                Some(limit) => self.opened.lock().unwrap().len() < limit,
                None => true,
            }
        }
    }

    fn queue_with_delay(open_delay_ms: u64) -> Arc<OpenQueue> {
        Arc::new(OpenQueue::new(QueueConfig {
            open_delay_ms,
            ..Default::default()
        }))
    }

    async fn fill(queue: &OpenQueue, urls: &[&str]) {
        for url in urls {
            queue
                .enqueue(PendingOpen::new(*url, OpenSource::MultiUrl))
                .await
                .unwrap();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_opens_in_fifo_order() {
        let queue = queue_with_delay(100);
        let handler = Arc::new(RecordingHandler::default());
        let processor = QueueProcessor::new(queue.clone(), handler.clone());

        fill(&queue, &["https://c.example", "https://a.example", "https://b.example"]).await;
        processor.drain().await;

        assert_eq!(
            *handler.opened.lock().unwrap(),
            vec!["https://c.example", "https://a.example", "https://b.example"]
        );
        assert_eq!(processor.opened(), 3);
        assert!(!processor.is_draining());
        assert!(queue.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_open_does_not_stop_processing() {
        let queue = queue_with_delay(10);
        let handler = Arc::new(RecordingHandler {
            fail_url: Some("https://bad.example".to_string()),
            ..Default::default()
        });
        let processor = QueueProcessor::new(queue.clone(), handler.clone());

        fill(&queue, &["https://bad.example", "https://good.example"]).await;
        processor.drain().await;

        assert_eq!(*handler.opened.lock().unwrap(), vec!["https://good.example"]);
        assert_eq!(processor.failed(), 1);
        assert_eq!(processor.opened(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_discards_remaining() {
        let queue = queue_with_delay(10);
        let handler = Arc::new(RecordingHandler {
            stop_after: Some(1),
            ..Default::default()
        });
        let processor = QueueProcessor::new(queue.clone(), handler.clone());

        fill(&queue, &["https://1.example", "https://2.example", "https://3.example"]).await;
        processor.drain().await;

        assert_eq!(*handler.opened.lock().unwrap(), vec!["https://1.example"]);
        assert_eq!(processor.discarded(), 2);
        assert!(queue.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_handler_opens_nothing() {
        let queue = queue_with_delay(10);
        let handler = Arc::new(RecordingHandler {
            stop_after: Some(0),
            ..Default::default()
        });
        let processor = QueueProcessor::new(queue.clone(), handler.clone());

        fill(&queue, &["https://late.example", "https://later.example"]).await;
        processor.drain().await;

        assert!(handler.opened.lock().unwrap().is_empty());
        assert_eq!(processor.opened(), 0);
        assert_eq!(processor.discarded(), 2);
        assert!(queue.is_empty().await);
        assert!(!processor.is_draining());
    }

    #[tokio::test(start_paused = true)]
    async fn test_kick_is_single_flight() {
        let queue = queue_with_delay(50);
        let handler = Arc::new(RecordingHandler::default());
        let processor = Arc::new(QueueProcessor::new(queue.clone(), handler.clone()));

        fill(&queue, &["https://1.example", "https://2.example"]).await;
        let first = processor.kick().expect("first kick starts a drain");
        tokio::task::yield_now().await;
        assert!(processor.is_draining());
        assert!(processor.kick().is_none());

        first.await.unwrap();
        assert_eq!(handler.opened.lock().unwrap().len(), 2);
        assert!(processor.kick().is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_bursts_never_overlap() {
        let queue = queue_with_delay(1);
        let handler = Arc::new(RecordingHandler::default());
        let processor = Arc::new(QueueProcessor::new(queue.clone(), handler.clone()));

        let mut producers = Vec::new();
        for producer in 0..8 {
            let queue = queue.clone();
            let processor = processor.clone();
            producers.push(tokio::spawn(async move {
                for i in 0..5 {
                    let url = format!("https://p{}-{}.example", producer, i);
                    queue
                        .enqueue(PendingOpen::new(url, OpenSource::LinkClick))
                        .await
                        .unwrap();
                    processor.kick();
                    tokio::task::yield_now().await;
                }
            }));
        }
        for producer in producers {
            producer.await.unwrap();
        }

        for _ in 0..500 {
            if handler.opened.lock().unwrap().len() == 40 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert_eq!(handler.opened.lock().unwrap().len(), 40);
        assert_eq!(handler.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_delay_drain() {
        let queue = queue_with_delay(0);
        let handler = Arc::new(RecordingHandler::default());
        let processor = QueueProcessor::new(queue.clone(), handler.clone());

        fill(&queue, &["https://x.example"]).await;
        processor.drain().await;
        assert_eq!(processor.opened(), 1);
    }
