use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::prober::Prober;
use crate::report::ConsoleReporter;
use crate::store::StatusStore;
use crate::targets::PortTarget;

/// Pause between the end of one cycle and the start of the next.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Background loop probing every target and publishing the verdicts.
pub struct Poller<P> {
    targets: Arc<[PortTarget]>,
    store: StatusStore,
    prober: P,
    interval: Duration,
    reporter: Option<ConsoleReporter>,
}

/// Owned handle to a running poller task.
pub struct PollerHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Request the loop to stop and wait for it.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            tracing::error!("poller task failed: {e}");
        }
    }
}

impl<P: Prober + 'static> Poller<P> {
    pub fn new(targets: Vec<PortTarget>, store: StatusStore, prober: P) -> Self {
        Self {
            targets: targets.into(),
            store,
            prober,
            interval: POLL_INTERVAL,
            reporter: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_reporter(mut self, reporter: ConsoleReporter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Probe every target under one held write lock, then report.
    pub async fn run_cycle(&self) {
        let mut open = 0usize;
        {
            let mut cycle = self.store.begin_cycle().await;
            for t in self.targets.iter() {
                let verdict = self.prober.probe(t.port).await;
                if verdict.is_open() {
                    open += 1;
                }
                cycle.record(&t.name, verdict);
            }
        }
        tracing::debug!(
            open,
            closed = self.targets.len() - open,
            "poll cycle complete"
        );

        if let Some(reporter) = &self.reporter {
            reporter.report(&self.store).await;
        }
    }

    /// Run cycles until `cancel` fires. The first cycle starts immediately.
    /// A cycle in progress always completes; cancellation is seen between cycles.
    pub async fn run(self, cancel: CancellationToken) {
        loop {
            if cancel.is_cancelled() {
                break;
            }
            self.run_cycle().await;
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
        tracing::info!("poller stopped");
    }

    pub fn spawn(self, cancel: CancellationToken) -> PollerHandle {
        let task = tokio::spawn(self.run(cancel.clone()));
        PollerHandle { cancel, task }
    }
}
