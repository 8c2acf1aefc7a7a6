//! The two bounded worker pools: probe fan-out and fetch fan-out.
//!
//! Both phases follow the same discipline: spread work over at most
//! `workers` in-flight futures with `buffer_unordered`, and aggregate every
//! completion on the single consuming task. No shared counters, no locks;
//! results arrive in completion order, which is deliberately unspecified.

use std::path::Path;

use futures::stream::{self, StreamExt};

use crate::candidates::Candidate;
use crate::remote::{Fetcher, Prober};

/// Receives one terminal event per candidate per phase. Purely
/// informational: implementations must not influence control flow.
pub trait ProgressSink {
    fn probe_phase_started(&self, _total: usize) {}
    fn candidate_skipped(&self, _label: &str) {}
    fn probe_done(&self, _label: &str, _exists: bool) {}
    fn fetch_phase_started(&self, _total: usize) {}
    fn fetch_done(&self, _label: &str, _ok: bool) {}
}

/// Sink that swallows everything; used by tests.
#[cfg(test)]
pub struct SilentSink;

#[cfg(test)]
impl ProgressSink for SilentSink {}

/// Outcome of the probe phase.
pub struct ProbeSummary {
    /// Candidates confirmed to exist remotely and not yet present locally.
    pub queued: Vec<Candidate>,
    /// Number of probe requests actually issued.
    pub probed: usize,
    /// Candidates dropped because their local file already exists.
    pub skipped: usize,
}

/// Outcome of the fetch phase.
#[derive(Debug, Default)]
pub struct FetchSummary {
    pub downloaded: usize,
    /// File names of candidates whose fetch failed.
    pub failed: Vec<String>,
}

/// Runs the existence probe over all candidates with at most `workers`
/// requests in flight.
///
/// Candidates whose local path already exists are dropped before any
/// network call — re-runs must never re-probe files already on disk. A
/// probe error counts as "absent" and never aborts the run, so every
/// candidate is processed exactly once regardless of its neighbours.
pub async fn probe_phase<P: Prober>(
    candidates: Vec<Candidate>,
    prober: &P,
    local_exists: impl Fn(&Path) -> bool,
    sink: &impl ProgressSink,
    workers: usize,
) -> ProbeSummary {
    sink.probe_phase_started(candidates.len());

    let mut skipped = 0;
    let mut to_probe = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if local_exists(&candidate.local_path) {
            skipped += 1;
            sink.candidate_skipped(&candidate.file_name);
        } else {
            to_probe.push(candidate);
        }
    }

    let probed = to_probe.len();
    let mut results = stream::iter(to_probe.into_iter().map(|candidate| async move {
        let exists = prober.probe(&candidate).await;
        (candidate, exists)
    }))
    .buffer_unordered(workers.max(1));

    let mut queued = Vec::new();
    while let Some((candidate, exists)) = results.next().await {
        sink.probe_done(&candidate.file_name, exists);
        if exists {
            queued.push(candidate);
        }
    }

    ProbeSummary {
        queued,
        probed,
        skipped,
    }
}

/// Downloads every queued candidate with at most `workers` transfers in
/// flight. A failed item is recorded by name and its siblings carry on;
/// this is a best-effort bulk job, not a transaction.
pub async fn fetch_phase<F: Fetcher>(
    queue: Vec<Candidate>,
    fetcher: &F,
    sink: &impl ProgressSink,
    workers: usize,
) -> FetchSummary {
    sink.fetch_phase_started(queue.len());

    let mut results = stream::iter(queue.into_iter().map(|candidate| async move {
        let outcome = fetcher.fetch(&candidate).await;
        (candidate, outcome)
    }))
    .buffer_unordered(workers.max(1));

    let mut summary = FetchSummary::default();
    while let Some((candidate, outcome)) = results.next().await {
        match outcome {
            Ok(()) => {
                summary.downloaded += 1;
                sink.fetch_done(&candidate.file_name, true);
            }
            Err(_) => {
                summary.failed.push(candidate.file_name.clone());
                sink.fetch_done(&candidate.file_name, false);
            }
        }
    }
    summary
}
