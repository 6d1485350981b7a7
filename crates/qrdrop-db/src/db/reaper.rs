use crate::db::HandoffStore;
use qrdrop_core::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// Starts a background task that drops expired upload sessions every `period`.
///
/// Live sessions are never touched; a submit against an expired token is
/// rejected whether or not the reaper got to it first.
pub fn spawn_session_reaper(
    store: HandoffStore,
    clock: Arc<dyn Clock>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let removed = store.reap_expired(clock.now()).await;
            if removed > 0 {
                tracing::debug!(removed = removed, "Reaped expired upload sessions");
            }
        }
    })
}
