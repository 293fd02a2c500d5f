//! Background task that puts due launches live.

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::LaunchService;

/// Polls for due launches on a fixed interval until shut down.
pub struct LaunchPoller {
    service: LaunchService,
    interval: Duration,
    shutdown: watch::Sender<bool>,
}

impl LaunchPoller {
    pub fn new(service: LaunchService, interval: Duration) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            service,
            interval: interval.max(Duration::from_millis(10)),
            shutdown,
        }
    }

    /// Run one poll. Failures are logged and the poller carries on.
    pub async fn tick(&self) -> usize {
        match self.service.activate_due_launches().await {
            Ok(activated) => {
                if !activated.is_empty() {
                    tracing::debug!(count = activated.len(), "Activated due launches");
                }
                activated.len()
            }
            Err(e) => {
                e.log();
                0
            }
        }
    }

    /// Start polling on the runtime. The handle resolves after [`shutdown`](Self::shutdown).
    pub fn spawn(self: std::sync::Arc<Self>) -> JoinHandle<()> {
        let mut stop = self.shutdown.subscribe();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            tracing::info!(interval_ms = self.interval.as_millis() as u64, "Launch poller started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.tick().await;
                    }
                    changed = stop.changed() => {
                        if changed.is_err() || *stop.borrow() {
                            break;
                        }
                    }
                }
            }

            tracing::info!("Launch poller stopped");
        })
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }
}
