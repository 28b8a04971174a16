use crate::errors::Result;
use crate::http::{self, ApiClient};
use crate::model::ReceivedPacket;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, trace, warn};

/// Default polling period when a caller does not pick one.
pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_secs(30);

/// Fetches the most recent telemetry packet, once or on a fixed interval.
#[derive(Debug, Clone)]
pub struct LatestService {
    api: ApiClient,
}

impl LatestService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn latest(&self) -> Result<ReceivedPacket> {
        debug!("requesting latest packet");
        self.api.get(http::LATEST).await
    }

    /// Polls `/latest`, sending each response down `tx` until the receiver
    /// is dropped.
    ///
    /// The first request fires immediately, then one per `period`. A tick
    /// that arrives while the previous request is still in flight drops it
    /// and starts a fresh one, so at most one request is outstanding and
    /// the newest tick always wins.
    pub async fn poll(&self, period: Duration, tx: mpsc::Sender<ReceivedPacket>) {
        info!("starting polling every {:?}", period);

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // The first tick of an interval completes immediately.
        ticker.tick().await;

        loop {
            trace!("polling tick, fetching latest packet");
            let fetch = self.latest();
            tokio::pin!(fetch);

            tokio::select! {
                result = &mut fetch => {
                    match result {
                        Ok(packet) => {
                            if tx.send(packet).await.is_err() {
                                debug!("receiver dropped, stopping poll");
                                break;
                            }
                        }
                        // Terminal for this tick; the next one retries.
                        Err(e) => error!("latest packet request failed: {}", e),
                    }

                    ticker.tick().await;
                }
                _ = ticker.tick() => {
                    warn!("in-flight request superseded by next tick");
                }
            }
        }

        info!("polling stopped");
    }
}
