//! Asynchronous harvest job queue.
//!
//! `submit` records a queued job and hands its id to a pool of worker tasks,
//! returning at once. Workers run jobs through a [`JobRunner`] and publish
//! every status change on a per-job watch channel, which doubles as the
//! status store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex, RwLock};
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use wa_core::{ArticleStorage, Error, HarvestJob, HarvestRequest, Result};

use crate::harvester::Harvester;
use crate::logging::Logger;

pub const DEFAULT_WORKERS: usize = 4;

/// Finished jobs kept for status queries before the oldest are evicted.
pub const DEFAULT_JOB_RETENTION: usize = 1000;

#[async_trait]
pub trait JobRunner: Send + Sync {
    /// Executes one job and returns the number of articles persisted.
    async fn run(&self, job: &HarvestJob) -> Result<usize>;
}

/// Harvests a request and upserts every kept article.
pub struct HarvestPipeline {
    harvester: Harvester,
    storage: Arc<dyn ArticleStorage>,
}

impl HarvestPipeline {
    pub fn new(harvester: Harvester, storage: Arc<dyn ArticleStorage>) -> Self {
        Self { harvester, storage }
    }
}

#[async_trait]
impl JobRunner for HarvestPipeline {
    async fn run(&self, job: &HarvestJob) -> Result<usize> {
        let logger = Logger::new().with_prefix(format!("[job {}]", job.id));
        let articles = self.harvester.harvest(&job.request, &logger).await;

        let mut stored = 0;
        let mut last_error = None;
        for article in &articles {
            match self.storage.upsert_article(article).await {
                Ok(()) => stored += 1,
                Err(e) => {
                    logger.warn(&format!("Failed to store article {}: {}", article.id, e));
                    last_error = Some(e);
                }
            }
        }

        // Nothing could be written at all: report the storage failure.
        if stored == 0 {
            if let Some(e) = last_error {
                return Err(e);
            }
        }

        logger.info(&format!("Stored {} of {} harvested articles", stored, articles.len()));
        Ok(stored)
    }
}

/// Handle to a submitted job.
#[derive(Debug, Clone)]
pub struct JobHandle {
    pub id: Uuid,
    receiver: watch::Receiver<HarvestJob>,
}

impl JobHandle {
    pub fn snapshot(&self) -> HarvestJob {
        self.receiver.borrow().clone()
    }

    /// Waits until the job completes or fails.
    pub async fn wait(mut self) -> HarvestJob {
        loop {
            {
                let job = self.receiver.borrow_and_update();
                if job.status.is_terminal() {
                    return job.clone();
                }
            }
            if self.receiver.changed().await.is_err() {
                return self.receiver.borrow().clone();
            }
        }
    }
}

type JobStore = Arc<RwLock<HashMap<Uuid, watch::Sender<HarvestJob>>>>;

#[derive(Clone)]
pub struct TaskQueue {
    sender: mpsc::UnboundedSender<Uuid>,
    jobs: JobStore,
    retention: usize,
}

impl TaskQueue {
    /// Spawns `workers` worker tasks (at least one) on the current runtime.
    pub fn start(runner: Arc<dyn JobRunner>, workers: usize) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let receiver = Arc::new(Mutex::new(receiver));
        let jobs: JobStore = Arc::new(RwLock::new(HashMap::new()));

        for worker in 0..workers.max(1) {
            tokio::spawn(worker_loop(worker, receiver.clone(), runner.clone(), jobs.clone()));
        }

        Self {
            sender,
            jobs,
            retention: DEFAULT_JOB_RETENTION,
        }
    }

    /// Keep at most `retention` completed or failed jobs. Queued and running
    /// jobs are never evicted.
    pub fn with_retention(mut self, retention: usize) -> Self {
        self.retention = retention;
        self
    }

    pub async fn submit(&self, request: HarvestRequest) -> Result<JobHandle> {
        let job = HarvestJob::queued(request, Utc::now());
        let id = job.id;
        let (tx, receiver) = watch::channel(job);
        {
            let mut jobs = self.jobs.write().await;
            evict_finished(&mut jobs, self.retention);
            jobs.insert(id, tx);
        }

        if self.sender.send(id).is_err() {
            self.jobs.write().await.remove(&id);
            return Err(Error::Job("Task queue is shut down".to_string()));
        }
        info!(job_id = %id, "Harvest job queued");
        Ok(JobHandle { id, receiver })
    }

    pub async fn status(&self, id: &Uuid) -> Option<HarvestJob> {
        self.jobs.read().await.get(id).map(|tx| tx.borrow().clone())
    }

    pub async fn handle(&self, id: &Uuid) -> Option<JobHandle> {
        self.jobs.read().await.get(id).map(|tx| JobHandle {
            id: *id,
            receiver: tx.subscribe(),
        })
    }

    /// All known jobs, most recently submitted first.
    pub async fn jobs(&self) -> Vec<HarvestJob> {
        let mut jobs: Vec<HarvestJob> = self
            .jobs
            .read()
            .await
            .values()
            .map(|tx| tx.borrow().clone())
            .collect();
        jobs.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        jobs
    }
}

fn evict_finished(jobs: &mut HashMap<Uuid, watch::Sender<HarvestJob>>, retention: usize) {
    let mut finished: Vec<(DateTime<Utc>, Uuid)> = jobs
        .values()
        .filter_map(|tx| {
            let job = tx.borrow();
            let finished = job.status.is_terminal();
            let key = (job.finished_at.unwrap_or(job.submitted_at), job.id);
            finished.then_some(key)
        })
        .collect();
    if finished.len() <= retention {
        return;
    }

    finished.sort();
    let excess = finished.len() - retention;
    for (_, id) in finished.into_iter().take(excess) {
        jobs.remove(&id);
    }
    debug!(evicted = excess, "Evicted finished jobs");
}

async fn worker_loop(
    worker: usize,
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<Uuid>>>,
    runner: Arc<dyn JobRunner>,
    jobs: JobStore,
) {
    loop {
        let next = receiver.lock().await.recv().await;
        let Some(id) = next else {
            break;
        };

        let Some(tx) = jobs.read().await.get(&id).cloned() else {
            warn!(job_id = %id, "Dequeued unknown job");
            continue;
        };
        execute(worker, &tx, runner.clone()).await;
    }
}

async fn execute(worker: usize, tx: &watch::Sender<HarvestJob>, runner: Arc<dyn JobRunner>) {
    tx.send_modify(|job| job.start(Utc::now()));
    let job = tx.borrow().clone();
    info!(job_id = %job.id, worker, keywords = ?job.request.keywords, "Harvest job started");

    // A separate task so a panicking runner fails the job, not the worker.
    let outcome = tokio::spawn(async move { runner.run(&job).await }).await;

    match outcome {
        Ok(Ok(count)) => {
            tx.send_modify(|job| job.complete(count, Utc::now()));
            info!(job_id = %tx.borrow().id, count, "Harvest job completed");
        }
        Ok(Err(e)) => {
            error!(job_id = %tx.borrow().id, error = %e, "Harvest job failed");
            tx.send_modify(|job| job.fail(e.to_string(), Utc::now()));
        }
        Err(e) => {
            error!(job_id = %tx.borrow().id, error = %e, "Harvest job aborted");
            tx.send_modify(|job| job.fail(format!("Job aborted: {}", e), Utc::now()));
        }
    }
}
