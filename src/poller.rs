/// Repeating timer driving one poll callback per tick
use std::future::Future;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Handle to a running poller.
///
/// `stop` aborts the ticking task, so no further tick fires after it
/// returns. Work already spawned by an earlier tick is neither awaited nor
/// cancelled; a slow response can still update state after `stop`.
pub struct PollerHandle {
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn stop(&self) {
        self.task.abort();
    }
}

/// Start a poller that invokes `tick` once immediately and then on every
/// period boundary. Each invocation runs on its own task, so a tick slower
/// than the period overlaps the next one and the last writer wins.
pub fn spawn<F, Fut>(period: Duration, mut tick: F) -> PollerHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let task = tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            tokio::spawn(tick());
        }
    });

    PollerHandle { task }
}
