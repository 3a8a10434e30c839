use futures::stream::{Stream, StreamExt};
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::error::DemuxError;
use super::router::{Route, SentinelRouter};
use super::SENTINEL;

/// Counts from one pass over a producer's output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DemuxStats {
    pub lines_read: usize,
    pub primary_lines: usize,
    pub secondary_lines: usize,
    pub sentinel_seen: bool,
}

/// Split `lines` between `primary` and `secondary` at the first
/// [`SENTINEL`] line.
pub async fn demultiplex<S, E, P, Q>(
    lines: S,
    primary: &mut P,
    secondary: &mut Q,
) -> Result<DemuxStats, DemuxError>
where
    S: Stream<Item = Result<String, E>>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
    P: AsyncWrite + Unpin + ?Sized,
    Q: AsyncWrite + Unpin + ?Sized,
{
    demultiplex_with(lines, SENTINEL, primary, secondary).await
}

/// Same as [`demultiplex`] with a caller-chosen sentinel line.
///
/// Each routed line is written followed by `\n`. A fresh routing latch is
/// used for every call, so sinks shared across calls always start each
/// pass on the primary side.
pub async fn demultiplex_with<S, E, P, Q>(
    lines: S,
    sentinel: &str,
    primary: &mut P,
    secondary: &mut Q,
) -> Result<DemuxStats, DemuxError>
where
    S: Stream<Item = Result<String, E>>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
    P: AsyncWrite + Unpin + ?Sized,
    Q: AsyncWrite + Unpin + ?Sized,
{
    let mut router = SentinelRouter::new(sentinel);
    let mut stats = DemuxStats::default();

    futures::pin_mut!(lines);
    while let Some(item) = lines.next().await {
        let line = item.map_err(|e| DemuxError::read(stats.lines_read + 1, e))?;
        stats.lines_read += 1;

        match router.route(&line) {
            Route::Drop => {
                tracing::debug!("Sentinel seen at line {}, switching sinks", stats.lines_read);
                stats.sentinel_seen = true;
            }
            Route::Primary => {
                write_line(primary, &line)
                    .await
                    .map_err(|e| DemuxError::write("primary", e))?;
                stats.primary_lines += 1;
            }
            Route::Secondary => {
                write_line(secondary, &line)
                    .await
                    .map_err(|e| DemuxError::write("secondary", e))?;
                stats.secondary_lines += 1;
            }
        }
    }

    tracing::trace!(
        "Demultiplexed {} lines ({} primary, {} secondary)",
        stats.lines_read,
        stats.primary_lines,
        stats.secondary_lines
    );
    Ok(stats)
}

async fn write_line<W>(sink: &mut W, line: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    sink.write_all(line.as_bytes()).await?;
    sink.write_all(b"\n").await
}
