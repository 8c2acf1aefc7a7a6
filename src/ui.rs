//! Terminal output — progress bars and the final summary.
//!
//! Uses `indicatif` for per-phase progress bars and `console` for colour.
//! [`RunProgress`] is the terminal-backed [`ProgressSink`]: one bar for the
//! probe phase, a fresh one for the fetch phase, failures echoed in red
//! above the bar.

use std::path::Path;
use std::sync::Mutex;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::run::RunReport;
use crate::scheduler::ProgressSink;

pub struct RunProgress {
    // Replaced at each phase boundary; sink methods take &self.
    bar: Mutex<Option<ProgressBar>>,
    red: Style,
}

impl RunProgress {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
            red: Style::new().red().bold(),
        }
    }

    fn start_phase(&self, verb: &str, total: usize) {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40.cyan/blue} {pos}/{len} {msg}")
                .expect("invalid template"),
        );
        pb.set_message(verb.to_string());
        let mut slot = self.bar.lock().expect("progress bar lock poisoned");
        if let Some(old) = slot.take() {
            old.finish_and_clear();
        }
        *slot = Some(pb);
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Some(pb) = self.bar.lock().expect("progress bar lock poisoned").as_ref() {
            f(pb);
        }
    }

    /// Clears whatever bar is still active.
    pub fn finish(&self) {
        if let Some(pb) = self.bar.lock().expect("progress bar lock poisoned").take() {
            pb.finish_and_clear();
        }
    }
}

impl Default for RunProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for RunProgress {
    fn probe_phase_started(&self, total: usize) {
        self.start_phase("Probing for papers", total);
    }

    fn candidate_skipped(&self, label: &str) {
        self.with_bar(|pb| {
            pb.set_message(format!("on disk: {label}"));
            pb.inc(1);
        });
    }

    fn probe_done(&self, label: &str, exists: bool) {
        self.with_bar(|pb| {
            if exists {
                pb.set_message(format!("found {label}"));
            }
            pb.inc(1);
        });
    }

    fn fetch_phase_started(&self, total: usize) {
        self.start_phase("Downloading", total);
    }

    fn fetch_done(&self, label: &str, ok: bool) {
        self.with_bar(|pb| {
            if ok {
                pb.set_message(format!("downloaded {label}"));
            } else {
                pb.println(format!("  {} failed: {label}", self.red.apply_to("✗")));
            }
            pb.inc(1);
        });
    }
}

/// Prints the end-of-run report: tallies, failed names so the user knows a
/// re-run will retry them, and where everything landed.
pub fn print_summary(report: &RunReport, output_root: &Path) {
    let green = Style::new().green().bold();
    let red = Style::new().red().bold();
    let dim = Style::new().dim();
    let t = &report.tally;

    println!();
    println!("{}", dim.apply_to("─── Run Summary ───"));
    println!("  candidates generated: {}", t.total_candidates);
    println!(
        "  probes issued:        {} ({} already on disk)",
        t.total_probed,
        t.total_candidates - t.total_probed
    );
    println!("  confirmed remote:     {}", t.total_queued);
    println!(
        "  {} downloaded {} new files",
        green.apply_to("✓"),
        t.total_downloaded
    );
    if t.total_failed > 0 {
        println!(
            "  {} {} failed (re-run to retry):",
            red.apply_to("✗"),
            t.total_failed
        );
        for name in &report.failed {
            println!("      {name}");
        }
    }
    let shown = output_root
        .canonicalize()
        .unwrap_or_else(|_| output_root.to_path_buf());
    println!("  saved under: {}", shown.display());
}
