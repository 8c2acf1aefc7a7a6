//! Run coordinator: generate → probe → fetch → tally.

use std::path::Path;

use crate::candidates::{SelectionSpec, SitePaths, generate};
use crate::remote::{Fetcher, Prober};
use crate::scheduler::{FetchSummary, ProgressSink, fetch_phase, probe_phase};

/// Totals for one complete invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTally {
    pub total_candidates: usize,
    pub total_probed: usize,
    pub total_queued: usize,
    pub total_downloaded: usize,
    pub total_failed: usize,
}

/// Tally plus the names of failed downloads, for the final report.
#[derive(Debug)]
pub struct RunReport {
    pub tally: RunTally,
    pub failed: Vec<String>,
}

/// Runs the whole pipeline once. Each phase executes exactly once; there is
/// no cross-phase retry — re-running the command is the retry mechanism,
/// and it is cheap because files already on disk are skipped up front.
pub async fn execute<C, S>(
    spec: &SelectionSpec,
    site: &SitePaths,
    client: &C,
    sink: &S,
    probe_workers: usize,
    fetch_workers: usize,
) -> RunReport
where
    C: Prober + Fetcher,
    S: ProgressSink,
{
    let candidates = generate(spec, site);
    let total_candidates = candidates.len();

    let probe = probe_phase(
        candidates,
        client,
        |path: &Path| path.is_file(),
        sink,
        probe_workers,
    )
    .await;
    let total_probed = probe.probed;
    let total_queued = probe.queued.len();

    // Nothing confirmed means nothing to fetch; that is a normal outcome,
    // not an error.
    let fetched = if probe.queued.is_empty() {
        FetchSummary::default()
    } else {
        fetch_phase(probe.queued, client, sink, fetch_workers).await
    };

    RunReport {
        tally: RunTally {
            total_candidates,
            total_probed,
            total_queued,
            total_downloaded: fetched.downloaded,
            total_failed: fetched.failed.len(),
        },
        failed: fetched.failed,
    }
}
