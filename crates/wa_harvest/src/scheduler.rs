use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{error, info};
use wa_core::HarvestRequest;

use crate::queue::TaskQueue;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Source of scheduler ticks.
#[async_trait]
pub trait Ticker: Send {
    async fn tick(&mut self);
}

/// Wall-clock ticker. The first tick fires one period after creation.
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

/// Submits a fixed harvest request to the queue on every tick.
pub struct HarvestScheduler<T> {
    queue: TaskQueue,
    request: HarvestRequest,
    ticker: T,
}

impl HarvestScheduler<IntervalTicker> {
    pub fn hourly(queue: TaskQueue) -> Self {
        Self::new(queue, IntervalTicker::new(DEFAULT_INTERVAL))
    }
}

impl<T: Ticker + 'static> HarvestScheduler<T> {
    pub fn new(queue: TaskQueue, ticker: T) -> Self {
        Self {
            queue,
            request: HarvestRequest::scheduled(),
            ticker,
        }
    }

    pub fn with_request(mut self, request: HarvestRequest) -> Self {
        self.request = request;
        self
    }

    /// Runs the timer loop on its own task until [`SchedulerHandle::stop`].
    pub fn spawn(self) -> SchedulerHandle {
        let (shutdown, mut shutdown_rx) = oneshot::channel();
        let Self {
            queue,
            request,
            mut ticker,
        } = self;

        let task = tokio::spawn(async move {
            info!(keywords = ?request.keywords, "Harvest scheduler started");
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        match queue.submit(request.clone()).await {
                            Ok(handle) => info!(job_id = %handle.id, "Scheduled harvest submitted"),
                            Err(e) => error!(error = %e, "Failed to submit scheduled harvest"),
                        }
                    }
                }
            }
            info!("Harvest scheduler stopped");
        });

        SchedulerHandle {
            shutdown: Some(shutdown),
            task,
        }
    }
}

pub struct SchedulerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        let _ = (&mut self.task).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::JobRunner;
    use std::sync::Arc;
    use tokio::sync::mpsc;
    use wa_core::{Category, HarvestJob, JobStatus, Result};

    /// Ticks only when the test says so.
    struct ManualTicker(mpsc::UnboundedReceiver<()>);

    #[async_trait]
    impl Ticker for ManualTicker {
        async fn tick(&mut self) {
            if self.0.recv().await.is_none() {
                std::future::pending::<()>().await;
            }
        }
    }

    struct CountingRunner;

    #[async_trait]
    impl JobRunner for CountingRunner {
        async fn run(&self, job: &HarvestJob) -> Result<usize> {
            Ok(job.request.keywords.len())
        }
    }

    async fn wait_for_jobs(queue: &TaskQueue, expected: usize) -> Vec<HarvestJob> {
        for _ in 0..200 {
            let jobs = queue.jobs().await;
            if jobs.len() >= expected && jobs.iter().all(|j| j.status.is_terminal()) {
                return jobs;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("jobs did not finish");
    }

    #[tokio::test]
    async fn test_each_tick_submits_scheduled_request() {
        let queue = TaskQueue::start(Arc::new(CountingRunner), 1);
        let (ticks, rx) = mpsc::unbounded_channel();
        let handle = HarvestScheduler::new(queue.clone(), ManualTicker(rx)).spawn();

        ticks.send(()).unwrap();
        ticks.send(()).unwrap();
        let jobs = wait_for_jobs(&queue, 2).await;

        assert_eq!(jobs.len(), 2);
        for job in jobs {
            assert_eq!(job.request, HarvestRequest::scheduled());
            assert_eq!(job.status, JobStatus::Completed);
            assert_eq!(job.count, Some(3));
        }
        handle.stop().await;
    }

    #[tokio::test]
    async fn test_stop_ends_the_loop() {
        let queue = TaskQueue::start(Arc::new(CountingRunner), 1);
        let (ticks, rx) = mpsc::unbounded_channel();
        let request = HarvestRequest::new(vec!["理财".into()], Category::Finance, 10_000);
        let handle = HarvestScheduler::new(queue.clone(), ManualTicker(rx))
            .with_request(request)
            .spawn();

        handle.stop().await;
        let _ = ticks.send(());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(queue.jobs().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_ticker_waits_a_full_period() {
        let start = Instant::now();
        let mut ticker = IntervalTicker::new(DEFAULT_INTERVAL);
        ticker.tick().await;
        assert!(start.elapsed() >= DEFAULT_INTERVAL);
    }
}
