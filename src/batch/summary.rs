use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

use super::plan::{BatchPlan, RunConfiguration};
use crate::demux::DemuxStats;
use crate::error::{CutbenchError, Result};
use crate::subprocess::ExitStatus;

#[derive(Debug, Clone, Serialize)]
pub struct IterationRecord {
    pub iteration: u32,
    pub status: ExitStatus,
    #[serde(flatten)]
    pub stats: DemuxStats,
    #[serde(with = "humantime_serde")]
    pub duration: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    #[serde(flatten)]
    pub run: RunConfiguration,
    pub iterations: Vec<IterationRecord>,
}

impl RunRecord {
    pub fn new(run: &RunConfiguration) -> Self {
        Self {
            run: run.clone(),
            iterations: Vec::new(),
        }
    }

    pub fn failed_iterations(&self) -> impl Iterator<Item = &IterationRecord> {
        self.iterations.iter().filter(|it| !it.status.success())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub planned_invocations: usize,
    pub runs: Vec<RunRecord>,
    pub abort_reason: Option<String>,
}

impl BatchSummary {
    pub fn start(plan: &BatchPlan) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            planned_invocations: plan.total_invocations(),
            runs: Vec::new(),
            abort_reason: None,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn abort(&mut self, reason: impl Into<String>) {
        self.abort_reason = Some(reason.into());
        self.finish();
    }

    pub fn is_aborted(&self) -> bool {
        self.abort_reason.is_some()
    }

    pub fn total_invocations(&self) -> usize {
        self.runs.iter().map(|r| r.iterations.len()).sum()
    }

    pub fn failed_invocations(&self) -> usize {
        self.runs.iter().map(|r| r.failed_iterations().count()).sum()
    }

    pub fn runs_without_sentinel(&self) -> usize {
        self.runs
            .iter()
            .flat_map(|r| r.iterations.iter())
            .filter(|it| !it.stats.sentinel_seen)
            .count()
    }

    pub async fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CutbenchError::io(parent, e))?;
        }
        tokio::fs::write(path, json)
            .await
            .map_err(|e| CutbenchError::io(path, e))?;
        tracing::info!("Wrote batch summary to {}", path.display());
        Ok(())
    }
}
