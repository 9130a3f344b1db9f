use crate::models::CycleStats;

/// Discrete progress events emitted by the bot
///
/// The core never prints; it reports through an injected sink so the log
/// layer stays at the edge and tests can record what actually happened.
#[derive(Debug, Clone, PartialEq)]
pub enum BotEvent {
    /// `resumed` is true when a stored cookie set was accepted,
    /// false when credentials were submitted
    LoginSucceeded { resumed: bool },
    OrdersFound { count: usize },
    OrderSkipped { title: String },
    OrderAccepted { title: String },
    /// Accept attempt abandoned: the confirmation modal never appeared
    OrderFailed { title: String },
    CycleComplete { stats: CycleStats },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: &BotEvent);
}

/// Sink that forwards events to `tracing`
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: &BotEvent) {
        match event {
            BotEvent::LoginSucceeded { resumed: true } => {
                tracing::info!("✅ Logged in (resumed stored session)");
            }
            BotEvent::LoginSucceeded { resumed: false } => {
                tracing::info!("✅ Logged in with credentials");
            }
            BotEvent::OrdersFound { count } => {
                tracing::info!("Found {} open orders", count);
            }
            BotEvent::OrderSkipped { title } => {
                tracing::debug!("Skipping '{}': no keyword match", title);
            }
            BotEvent::OrderAccepted { title } => {
                tracing::info!("✅ Accepted: {}", title);
            }
            BotEvent::OrderFailed { title } => {
                tracing::warn!(
                    "Confirmation modal did not appear for '{}', leaving it for the next cycle",
                    title
                );
            }
            BotEvent::CycleComplete { stats } => {
                tracing::info!(
                    "Cycle complete: {} found, {} matched, {} accepted, {} failed",
                    stats.found,
                    stats.matched,
                    stats.accepted,
                    stats.failed
                );
            }
        }
    }
}
