// Watch mode: run a cycle, sleep, repeat
use crate::{models::CycleReport, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info};

/// Fixed-interval repeater for scan cycles
///
/// Plain sleep-then-repeat: no jitter, no backoff, no drift correction.
/// A failed cycle is logged and the next one runs on schedule.
#[derive(Debug, Clone)]
pub struct Scheduler {
    interval: Duration,
    max_cycles: Option<u64>,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_cycles: None,
        }
    }

    /// Stop after this many cycles instead of running forever
    pub fn with_max_cycles(mut self, max_cycles: u64) -> Self {
        self.max_cycles = Some(max_cycles);
        self
    }

    /// Returns the number of cycles run, which only happens when bounded
    pub async fn run<F, Fut>(&self, mut cycle: F) -> u64
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<CycleReport>>,
    {
        let mut completed = 0;

        loop {
            match cycle().await {
                Ok(report) => info!(
                    "Cycle {} done: {} new notifications",
                    completed + 1,
                    report.total_notified()
                ),
                Err(e) => error!("Cycle {} failed: {}", completed + 1, e),
            }
            completed += 1;

            if self.max_cycles.is_some_and(|max| completed >= max) {
                return completed;
            }

            info!("Sleeping {} minutes until next scan...", self.interval.as_secs() / 60);
            sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_runs_bounded_number_of_cycles() {
        let calls = Cell::new(0);
        let ran = Scheduler::new(Duration::ZERO)
            .with_max_cycles(3)
            .run(|| {
                calls.set(calls.get() + 1);
                async { Ok(CycleReport::default()) }
            })
            .await;

        assert_eq!(ran, 3);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_failed_cycle_does_not_stop_the_loop() {
        let calls = Cell::new(0);
        let ran = Scheduler::new(Duration::from_millis(1))
            .with_max_cycles(2)
            .run(|| {
                calls.set(calls.get() + 1);
                let first = calls.get() == 1;
                async move {
                    if first {
                        Err(Error::ExportError("disk full".into()))
                    } else {
                        Ok(CycleReport::default())
                    }
                }
            })
            .await;

        assert_eq!(ran, 2);
        assert_eq!(calls.get(), 2);
    }
}
