use anyhow::Result;

use super::load_config;
use crate::batch::BatchPlan;
use crate::cli::args::PlanArgs;

pub async fn show_plan(args: PlanArgs) -> Result<()> {
    let config = load_config(&args.selection).await?;
    config.validate()?;
    let plan = BatchPlan::from_config(&config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!(
        "{} run configurations x {} iterations = {} invocations",
        plan.len(),
        plan.iterations(),
        plan.total_invocations()
    );
    for run in plan.runs() {
        println!(
            "  {:<20} {:>4}  ->  {}",
            run.circuit_type,
            run.circuit_size,
            run.output_folder.display()
        );
    }
    Ok(())
}
