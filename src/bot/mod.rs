use crate::auth::{AuthError, Authenticator};
use crate::browser::Browser;
use crate::discovery::OrderLister;
use crate::events::{BotEvent, EventSink};
use crate::execution::OrderAcceptor;
use crate::filter::KeywordFilter;
use crate::models::{AcceptOutcome, CycleStats, Credentials};
use crate::persistence::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Orchestrates the whole flow: one login, then unbounded
/// discover → filter → accept cycles on a fixed interval
///
/// Deliberately no backoff, jitter, or circuit breaking between cycles:
/// every cycle runs regardless of what the previous one did. The only way
/// out is process termination or a fatal login failure before cycle one.
pub struct OrderBot<B: Browser, S: SessionStore> {
    browser: B,
    store: S,
    credentials: Credentials,
    filter: KeywordFilter,
    poll_interval: Duration,
    sink: Arc<dyn EventSink>,
}

impl<B: Browser, S: SessionStore> OrderBot<B, S> {
    pub fn new(
        browser: B,
        store: S,
        credentials: Credentials,
        filter: KeywordFilter,
        poll_interval: Duration,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            browser,
            store,
            credentials,
            filter,
            poll_interval,
            sink,
        }
    }

    /// Runs until the process is killed. A failed login is the one fatal
    /// path and aborts before any cycle starts.
    pub async fn run(&self) -> Result<(), AuthError> {
        Authenticator::new(&self.browser, &self.store, &self.credentials)
            .login(self.sink.as_ref())
            .await?;

        loop {
            if let Err(e) = self.run_cycle().await {
                // Availability over strictness: a broken cycle is logged
                // and the next one is attempted anyway
                tracing::error!("Cycle aborted: {}", e);
            }

            sleep(self.poll_interval).await;
        }
    }

    /// One full pass over the currently visible orders
    pub async fn run_cycle(&self) -> crate::Result<CycleStats> {
        let lister = OrderLister::new(&self.browser);
        let acceptor = OrderAcceptor::new(&self.browser);

        let orders = lister.list().await?;
        self.sink.emit(&BotEvent::OrdersFound {
            count: orders.len(),
        });

        let mut stats = CycleStats {
            found: orders.len(),
            ..CycleStats::default()
        };

        for order in &orders {
            if !self.filter.matches(&order.title) {
                self.sink.emit(&BotEvent::OrderSkipped {
                    title: order.title.clone(),
                });
                continue;
            }

            stats.matched += 1;

            match acceptor.accept(order).await {
                Ok(AcceptOutcome::Accepted) => {
                    stats.accepted += 1;
                    self.sink.emit(&BotEvent::OrderAccepted {
                        title: order.title.clone(),
                    });
                }
                Ok(AcceptOutcome::Failed) => {
                    stats.failed += 1;
                    self.sink.emit(&BotEvent::OrderFailed {
                        title: order.title.clone(),
                    });
                }
                Ok(AcceptOutcome::Skipped) => {
                    // Skipping is the filter's call, made above; the acceptor
                    // reporting it would be a bug worth seeing in the logs
                    tracing::debug!(
                        "Acceptor unexpectedly skipped '{}', not counting it",
                        order.title
                    );
                }
                Err(e) => {
                    // Abandon this order, keep the cycle going
                    tracing::warn!("Accept attempt for '{}' errored: {}", order.title, e);
                    stats.failed += 1;
                    self.sink.emit(&BotEvent::OrderFailed {
                        title: order.title.clone(),
                    });
                }
            }
        }

        self.sink.emit(&BotEvent::CycleComplete { stats });
        Ok(stats)
    }
}
