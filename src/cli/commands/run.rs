use anyhow::Result;

use super::load_config;
use crate::batch::{BatchExecutor, BatchPlan, COMPLETION_MESSAGE};
use crate::cli::args::RunArgs;
use crate::config::{BenchConfig, FailurePolicy};
use crate::error::CutbenchError;
use crate::subprocess::SubprocessManager;

pub async fn run_batch(args: RunArgs) -> Result<()> {
    let mut config = load_config(&args.selection).await?;
    apply_run_overrides(&mut config, &args);

    let plan = BatchPlan::from_config(&config);
    let summary_path = config.summary_path.clone();
    let executor = BatchExecutor::new(SubprocessManager::production(), config)?;

    if args.dry_run {
        println!(
            "Dry run: {} run configurations x {} iterations",
            plan.len(),
            plan.iterations()
        );
        for run in plan.runs() {
            println!("  {}", executor.command_for(run).display());
        }
        return Ok(());
    }

    let summary = executor.execute(&plan).await?;

    if let Some(path) = summary_path {
        summary.write_json(&path).await?;
    }

    if let Some(reason) = &summary.abort_reason {
        return Err(CutbenchError::Aborted(reason.clone()).into());
    }

    let failed = summary.failed_invocations();
    if failed > 0 {
        tracing::warn!(
            "{} of {} invocations failed",
            failed,
            summary.planned_invocations
        );
    }
    println!("{}", COMPLETION_MESSAGE);
    Ok(())
}

fn apply_run_overrides(config: &mut BenchConfig, args: &RunArgs) {
    if let Some(command) = &args.command {
        config.command = command.clone();
    }
    if let Some(timeout) = args.timeout {
        config.timeout = Some(timeout);
    }
    if args.fail_fast {
        config.on_failure = FailurePolicy::Abort;
    }
    if let Some(path) = &args.summary {
        config.summary_path = Some(path.clone());
    }
}
