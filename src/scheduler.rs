use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

/// A page component that can run one fetch-then-render pass.
pub trait Refresh: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    fn refresh(&self) -> impl Future<Output = ()> + Send;
}

/// Runs `page.refresh()` right away and then every `period`, for as long as
/// the runtime lives. Each pass runs in its own task, so a slow pass does not
/// hold back the next tick and two passes of the same page may overlap; the
/// last one to finish wins.
pub fn spawn_refresh_loop<P: Refresh>(page: Arc<P>, period: Duration) -> JoinHandle<()> {
    info!(page = page.name(), period_ms = period.as_millis() as u64, "starting refresh loop");
    tokio::spawn(async move {
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let page = Arc::clone(&page);
            tokio::spawn(async move {
                debug!(page = page.name(), "refresh pass");
                page.refresh().await;
            });
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter {
        passes: AtomicUsize,
    }

    impl Refresh for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }

        async fn refresh(&self) {
            self.passes.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_pass_is_immediate_then_periodic() {
        let page = Arc::new(Counter {
            passes: AtomicUsize::new(0),
        });
        let handle = spawn_refresh_loop(Arc::clone(&page), Duration::from_secs(30));

        time::sleep(Duration::from_millis(1)).await;
        assert_eq!(page.passes.load(Ordering::SeqCst), 1);

        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(page.passes.load(Ordering::SeqCst), 2);

        time::sleep(Duration::from_secs(60)).await;
        assert_eq!(page.passes.load(Ordering::SeqCst), 4);

        handle.abort();
    }
}
