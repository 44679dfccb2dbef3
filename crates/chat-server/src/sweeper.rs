//! Background eviction of idle sessions.

use chat_session::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Every `interval`, drop sessions idle for longer than `ttl`.
pub fn spawn_idle_sweeper(store: Arc<SessionStore>, ttl: Duration, interval: Duration) -> JoinHandle<()> {
    let max_idle = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::weeks(5200));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = store.evict_idle(max_idle);
            if !evicted.is_empty() {
                tracing::debug!(?evicted, "sweep finished");
            }
        }
    })
}
