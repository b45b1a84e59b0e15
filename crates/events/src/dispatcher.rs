//! Background forwarding of revalidation signals to a webhook.
//!
//! [`RevalidationDispatcher`] consumes the bus until every sender is gone.
//! Delivery failures are logged and never stop the loop.

use tokio::sync::broadcast;

use crate::bus::RevalidationSignal;
use crate::webhook::RevalidationWebhook;

pub struct RevalidationDispatcher;

impl RevalidationDispatcher {
    /// Run the dispatch loop. Exits when the bus is dropped.
    pub async fn run(
        webhook: RevalidationWebhook,
        mut receiver: broadcast::Receiver<RevalidationSignal>,
    ) {
        tracing::info!(url = webhook.url(), "Revalidation dispatcher started");
        loop {
            match receiver.recv().await {
                Ok(signal) => {
                    if let Err(e) = webhook.send(&signal).await {
                        tracing::warn!(
                            error = %e,
                            path = %signal.path,
                            "Revalidation webhook failed"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Revalidation dispatcher lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Revalidation bus closed, dispatcher shutting down");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::bus::RevalidationBus;

    #[tokio::test]
    async fn stops_when_bus_is_dropped() {
        let bus = RevalidationBus::default();
        let webhook = RevalidationWebhook::new("http://127.0.0.1:9/revalidate").unwrap();
        let handle = tokio::spawn(RevalidationDispatcher::run(webhook, bus.subscribe()));

        drop(bus);

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("dispatcher should exit")
            .expect("dispatcher task should not panic");
    }

    #[tokio::test]
    async fn delivery_failure_does_not_stop_the_loop() {
        let bus = RevalidationBus::default();
        let webhook = RevalidationWebhook::new("http://127.0.0.1:9/revalidate").unwrap();
        let handle = tokio::spawn(RevalidationDispatcher::run(webhook, bus.subscribe()));

        bus.revalidate(1, "/a");
        bus.revalidate(1, "/b");
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!handle.is_finished());

        drop(bus);
        tokio::time::timeout(Duration::from_secs(15), handle)
            .await
            .expect("dispatcher should exit")
            .expect("dispatcher task should not panic");
    }
}
