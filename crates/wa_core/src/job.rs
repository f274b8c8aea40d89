use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Category;

pub const DEFAULT_MIN_READS: u64 = 10_000;

/// Keywords harvested on every scheduler tick.
pub const SCHEDULED_KEYWORDS: [&str; 3] = ["热门", "爆款", "干货"];

/// Keyword used when a trigger omits keywords entirely.
pub const FALLBACK_KEYWORD: &str = "热门";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestRequest {
    pub keywords: Vec<String>,
    pub category: Category,
    pub min_reads: u64,
}

impl HarvestRequest {
    pub fn new(keywords: Vec<String>, category: Category, min_reads: u64) -> Self {
        Self {
            keywords,
            category,
            min_reads,
        }
    }

    /// The request the scheduler submits each interval.
    pub fn scheduled() -> Self {
        Self::new(
            SCHEDULED_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            Category::All,
            DEFAULT_MIN_READS,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestJob {
    pub id: Uuid,
    #[serde(flatten)]
    pub request: HarvestRequest,
    pub status: JobStatus,
    pub submitted_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub count: Option<usize>,
    pub error: Option<String>,
}

impl HarvestJob {
    pub fn queued(request: HarvestRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
            status: JobStatus::Queued,
            submitted_at: now,
            started_at: None,
            finished_at: None,
            count: None,
            error: None,
        }
    }

    // Transitions are no-ops once the job is terminal.

    pub fn start(&mut self, now: DateTime<Utc>) {
        if self.status == JobStatus::Queued {
            self.status = JobStatus::Running;
            self.started_at = Some(now);
        }
    }

    pub fn complete(&mut self, count: usize, now: DateTime<Utc>) {
        if !self.status.is_terminal() {
            self.status = JobStatus::Completed;
            self.count = Some(count);
            self.finished_at = Some(now);
        }
    }

    /// A failed job still reports a count, always zero.
    pub fn fail(&mut self, error: impl Into<String>, now: DateTime<Utc>) {
        if !self.status.is_terminal() {
            self.status = JobStatus::Failed;
            self.count = Some(0);
            self.error = Some(error.into());
            self.finished_at = Some(now);
        }
    }
}
