//! Endless poll loop: poll, report, sleep, repeat.

use std::{sync::Arc, time::Duration};

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::Level;

use crate::{
    config::Config,
    domain::{ChatId, Cursor},
    poll::{poll_once, PollContext},
    ports::{HomeworkSource, MessagingPort},
    verdict::VerdictTable,
    Error,
};

/// Result of one loop iteration, after failures have been reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cycle {
    Completed { sent: usize },
    Failed { diagnostic: String, relayed: bool },
}

pub struct Notifier {
    source: Arc<dyn HomeworkSource>,
    messenger: Arc<dyn MessagingPort>,
    chat_id: ChatId,
    verdicts: VerdictTable,
    interval: Duration,
    cursor: Cursor,
}

impl Notifier {
    pub fn new(
        cfg: &Config,
        source: Arc<dyn HomeworkSource>,
        messenger: Arc<dyn MessagingPort>,
    ) -> Self {
        Self {
            source,
            messenger,
            chat_id: cfg.telegram_chat_id,
            verdicts: VerdictTable::default(),
            interval: cfg.retry_interval,
            cursor: Cursor::now(),
        }
    }

    pub fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Poll until `shutdown` is cancelled.
    ///
    /// Cancellation also abandons a cycle in flight, so a hung fetch cannot
    /// keep the process alive.
    pub async fn run(mut self, shutdown: CancellationToken) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            cursor = self.cursor.0,
            "poll loop started"
        );
        loop {
            tokio::select! {
                biased;
                _ = self.tick() => {}
                _ = shutdown.cancelled() => {
                    tracing::info!("shutdown requested, poll cycle abandoned");
                    return;
                }
            }

            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("shutdown requested, poll loop stopped");
                    return;
                }
                _ = sleep(self.interval) => {}
            }
        }
    }

    /// One POLLING step. Failures are logged and relayed here, never returned.
    pub async fn tick(&mut self) -> Cycle {
        let ctx = PollContext {
            source: self.source.as_ref(),
            messenger: self.messenger.as_ref(),
            chat_id: self.chat_id,
            verdicts: &self.verdicts,
        };

        match poll_once(&ctx, self.cursor, Cursor::now()).await {
            Ok(outcome) => {
                self.cursor = outcome.cursor;
                if outcome.sent == 0 {
                    tracing::info!(cursor = self.cursor.0, "no updates");
                } else {
                    tracing::info!(
                        sent = outcome.sent,
                        cursor = self.cursor.0,
                        "poll cycle completed"
                    );
                }
                Cycle::Completed { sent: outcome.sent }
            }
            Err(e) => self.report_failure(e).await,
        }
    }

    async fn report_failure(&self, e: Error) -> Cycle {
        let diagnostic = format!("Сбой в работе программы: {e}");
        if failure_level(&e) == Level::ERROR {
            tracing::error!(kind = e.kind(), cursor = self.cursor.0, "{diagnostic}");
        } else {
            tracing::warn!(kind = e.kind(), cursor = self.cursor.0, "{diagnostic}");
        }

        let relayed = match self.messenger.send_text(self.chat_id, &diagnostic).await {
            Ok(()) => true,
            Err(send_err) => {
                tracing::warn!("failed to relay diagnostic: {send_err}");
                false
            }
        };

        Cycle::Failed {
            diagnostic,
            relayed,
        }
    }
}

/// Log level for a failed cycle.
///
/// Remote-side hiccups (unreachable endpoint, non-200 reply) and a failed
/// send are expected to clear on a later cycle and log at warn. Payloads the
/// notifier cannot understand log at error.
fn failure_level(e: &Error) -> Level {
    match e {
        Error::EndpointUnreachable { .. }
        | Error::UnexpectedStatusCode { .. }
        | Error::NotificationFailure(_) => Level::WARN,
        Error::InvalidPayload(_)
        | Error::MalformedResponse(_)
        | Error::UnknownStatus(_)
        | Error::Config(_) => Level::ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HttpReply;
    use crate::poll::tests::{FakeMessenger, FakeSource, ENDPOINT};

    fn cfg() -> Config {
        Config {
            practicum_token: "p".to_string(),
            telegram_token: "t".to_string(),
            telegram_chat_id: ChatId(7),
            endpoint: ENDPOINT.to_string(),
            request_timeout: None,
            retry_interval: Duration::from_secs(600),
        }
    }

    fn notifier(source: &Arc<FakeSource>, messenger: &Arc<FakeMessenger>) -> Notifier {
        Notifier::new(&cfg(), source.clone(), messenger.clone()).with_cursor(Cursor(1_700_000_000))
    }

    #[tokio::test]
    async fn success_advances_cursor() {
        let source = Arc::new(FakeSource::with(vec![FakeSource::json(
            r#"{"homeworks": [{"homework_name": "task1", "status": "approved"}], "current_date": 1700000100}"#,
        )]));
        let messenger = Arc::new(FakeMessenger::default());
        let mut n = notifier(&source, &messenger);

        assert_eq!(n.tick().await, Cycle::Completed { sent: 1 });
        assert_eq!(n.cursor(), Cursor(1_700_000_100));
    }

    #[tokio::test]
    async fn unknown_status_is_relayed_and_cursor_kept() {
        let source = Arc::new(FakeSource::with(vec![FakeSource::json(
            r#"{"homeworks": [{"homework_name": "task2", "status": "in_review"}], "current_date": 1700000900}"#,
        )]));
        let messenger = Arc::new(FakeMessenger::default());
        let mut n = notifier(&source, &messenger);

        let (diagnostic, relayed) = match n.tick().await {
            Cycle::Failed {
                diagnostic,
                relayed,
            } => (diagnostic, relayed),
            other => panic!("expected failure, got {other:?}"),
        };
        assert!(relayed);
        assert!(diagnostic.starts_with("Сбой в работе программы: "));
        assert!(diagnostic.contains("in_review"));
        assert_eq!(messenger.texts(), vec![diagnostic]);
        assert_eq!(n.cursor(), Cursor(1_700_000_000));
    }

    #[tokio::test]
    async fn failed_relay_is_swallowed() {
        let source = Arc::new(FakeSource::with(vec![Ok(HttpReply {
            status: 503,
            body: String::new(),
        })]));
        let messenger = Arc::new(FakeMessenger::failing_on("Сбой"));
        let mut n = notifier(&source, &messenger);

        let cycle = n.tick().await;
        assert!(matches!(cycle, Cycle::Failed { relayed: false, .. }));
        assert!(messenger.texts().is_empty());
    }

    #[tokio::test]
    async fn keeps_polling_after_failures() {
        let source = Arc::new(FakeSource::with(vec![
            Ok(HttpReply {
                status: 500,
                body: String::new(),
            }),
            FakeSource::json(r#"{"homeworks": [], "current_date": 1700000200}"#),
        ]));
        let messenger = Arc::new(FakeMessenger::default());
        let mut n = notifier(&source, &messenger);

        assert!(matches!(n.tick().await, Cycle::Failed { .. }));
        assert_eq!(n.tick().await, Cycle::Completed { sent: 0 });
        assert_eq!(n.cursor(), Cursor(1_700_000_200));
        assert_eq!(
            *source.requested.lock().unwrap(),
            vec![Cursor(1_700_000_000), Cursor(1_700_000_000)]
        );
    }

    #[tokio::test]
    async fn run_stops_on_shutdown_after_current_cycle() {
        let source = Arc::new(FakeSource::with(vec![FakeSource::json(
            r#"{"homeworks": [{"homework_name": "task1", "status": "reviewing"}]}"#,
        )]));
        let messenger = Arc::new(FakeMessenger::default());
        let n = notifier(&source, &messenger);

        let shutdown = CancellationToken::new();
        shutdown.cancel();
        n.run(shutdown).await;

        assert_eq!(source.requested.lock().unwrap().len(), 1);
        assert_eq!(messenger.texts().len(), 1);
    }

    /// Source whose fetch never completes.
    struct HungSource;

    #[async_trait::async_trait]
    impl HomeworkSource for HungSource {
        fn endpoint(&self) -> &str {
            ENDPOINT
        }

        async fn fetch(&self, _from_date: Cursor) -> crate::Result<HttpReply> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn run_stops_on_shutdown_while_fetch_hangs() {
        let messenger = Arc::new(FakeMessenger::default());
        let n = Notifier::new(&cfg(), Arc::new(HungSource), messenger.clone());

        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(n.run(shutdown.clone()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.cancel();

        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("run ignored shutdown during a hung fetch")
            .unwrap();
        assert!(messenger.texts().is_empty());
    }

    #[test]
    fn failure_levels_follow_error_kind() {
        assert_eq!(
            failure_level(&Error::UnexpectedStatusCode {
                endpoint: ENDPOINT.to_string(),
                code: 503
            }),
            Level::WARN
        );
        assert_eq!(
            failure_level(&Error::NotificationFailure("x".to_string())),
            Level::WARN
        );
        assert_eq!(
            failure_level(&Error::UnknownStatus("in_review".to_string())),
            Level::ERROR
        );
        assert_eq!(
            failure_level(&Error::MalformedResponse("x".to_string())),
            Level::ERROR
        );
    }
}
