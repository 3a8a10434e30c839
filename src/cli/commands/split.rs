use anyhow::{Context, Result};

use crate::cli::args::SplitArgs;
use crate::demux::{SinkPair, SinkPaths};
use crate::subprocess::line_stream;

/// Demultiplex this process's stdin, for use at the end of a shell pipe
pub async fn split_stdin(args: SplitArgs) -> Result<()> {
    let paths = SinkPaths::new(&args.primary, &args.secondary);
    let mut sinks = SinkPair::open(paths).await?;

    let outcome = sinks
        .demux(line_stream(tokio::io::stdin()), &args.sentinel)
        .await;
    let closed = sinks.close().await;
    let stats = outcome.context("Failed to split standard input")?;
    closed?;

    tracing::info!(
        "Split {} lines: {} to {}, {} to {}{}",
        stats.lines_read,
        stats.primary_lines,
        args.primary.display(),
        stats.secondary_lines,
        args.secondary.display(),
        if stats.sentinel_seen {
            ""
        } else {
            " (no sentinel seen)"
        }
    );
    Ok(())
}
