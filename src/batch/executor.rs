use std::time::Instant;

use super::layout::{prepare_output_folder, OutputLayout};
use super::plan::{BatchPlan, RunConfiguration};
use super::summary::{BatchSummary, IterationRecord, RunRecord};
use crate::config::{BenchConfig, FailurePolicy};
use crate::demux::SinkPair;
use crate::error::{CutbenchError, Result};
use crate::subprocess::{ProcessCommand, ProcessCommandBuilder, ProcessStream, SubprocessManager};

/// Runs a [`BatchPlan`] one invocation at a time.
///
/// Each run configuration gets its own sink pair, opened once and shared
/// by all of that configuration's iterations.
pub struct BatchExecutor {
    subprocess: SubprocessManager,
    config: BenchConfig,
    layout: OutputLayout,
    program: String,
    leading_args: Vec<String>,
}

impl BatchExecutor {
    pub fn new(subprocess: SubprocessManager, config: BenchConfig) -> Result<Self> {
        config.validate()?;
        let (program, leading_args) = config.command_parts()?;
        Ok(Self {
            subprocess,
            layout: OutputLayout::from_config(&config),
            config,
            program,
            leading_args,
        })
    }

    pub fn command_for(&self, run: &RunConfiguration) -> ProcessCommand {
        let mut builder = ProcessCommandBuilder::new(&self.program)
            .args(&self.leading_args)
            .args(run.positional_args())
            .envs(&self.config.env);
        if let Some(dir) = &self.config.working_dir {
            builder = builder.current_dir(dir);
        }
        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    /// Execute every run configuration in order.
    ///
    /// Unsuccessful invocations are handled per [`FailurePolicy`]; an abort
    /// is reported through [`BatchSummary::abort_reason`]. Spawn errors and
    /// sink failures end the batch with an error.
    pub async fn execute(&self, plan: &BatchPlan) -> Result<BatchSummary> {
        let mut summary = BatchSummary::start(plan);
        tracing::info!(
            "Starting batch: {} run configurations x {} iterations",
            plan.len(),
            plan.iterations()
        );

        for run in plan.runs() {
            let record = self.execute_run(run, plan.iterations()).await?;
            let first_failure = record
                .failed_iterations()
                .next()
                .map(|it| format!("{} iteration {} {}", run.label(), it.iteration, it.status));
            summary.runs.push(record);

            if let (FailurePolicy::Abort, Some(reason)) = (self.config.on_failure, first_failure) {
                tracing::error!("Aborting batch: {}", reason);
                summary.abort(reason);
                return Ok(summary);
            }
        }

        summary.finish();
        tracing::info!(
            "Batch finished: {} invocations, {} failed",
            summary.total_invocations(),
            summary.failed_invocations()
        );
        Ok(summary)
    }

    async fn execute_run(&self, run: &RunConfiguration, iterations: u32) -> Result<RunRecord> {
        prepare_output_folder(&run.output_folder, &self.layout).await?;
        let mut sinks = SinkPair::open(self.layout.sink_paths(&run.output_folder)).await?;
        let mut record = RunRecord::new(run);

        let outcome = self
            .run_iterations(run, iterations, &mut sinks, &mut record)
            .await;
        let closed = sinks.close().await;
        outcome?;
        closed?;

        Ok(record)
    }

    async fn run_iterations(
        &self,
        run: &RunConfiguration,
        iterations: u32,
        sinks: &mut SinkPair,
        record: &mut RunRecord,
    ) -> Result<()> {
        for iteration in 1..=iterations {
            tracing::info!(
                "Running {} (iteration {}/{})",
                run.label(),
                iteration,
                iterations
            );
            let result = self.run_iteration(run, iteration, sinks).await?;
            let failed = !result.status.success();
            record.iterations.push(result);

            if failed && self.config.on_failure == FailurePolicy::Abort {
                break;
            }
        }
        Ok(())
    }

    async fn run_iteration(
        &self,
        run: &RunConfiguration,
        iteration: u32,
        sinks: &mut SinkPair,
    ) -> Result<IterationRecord> {
        let command = self.command_for(run);
        let started = Instant::now();

        let ProcessStream { stdout, status } =
            self.subprocess.runner().run_streaming(command).await?;

        let sentinel = self.config.sentinel.as_str();
        let (stats, status) = tokio::try_join!(
            async { sinks.demux(stdout, sentinel).await.map_err(CutbenchError::from) },
            async { status.await.map_err(CutbenchError::from) },
        )?;
        sinks.flush().await?;

        if !status.success() {
            tracing::warn!(
                "{} iteration {} failed: {}",
                run.label(),
                iteration,
                status
            );
        }
        if !stats.sentinel_seen {
            tracing::debug!(
                "{} iteration {} produced no sentinel line; all output went to {}",
                run.label(),
                iteration,
                self.layout.primary_file
            );
        }

        Ok(IterationRecord {
            iteration,
            status,
            stats,
            duration: started.elapsed(),
        })
    }
}
