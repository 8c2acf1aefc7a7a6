//! Command-line interface of papergrab, based on clap.
//!
//! A single-purpose tool, so no subcommands: the flags mirror the selection
//! the candidate generator expands (syllabus, years, papers, seasons are
//! fixed, document kinds, layout) plus the two worker-pool sizes.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::candidates::{DEFAULT_BASE_URL, Layout, Season, SelectionSpec};
use crate::error::PapergrabError;

/// papergrab — brute-force downloader for Cambridge A-Level past papers.
#[derive(Debug, Parser)]
#[command(name = "papergrab", version, about)]
pub struct Cli {
    /// The 4-digit syllabus code (e.g. 9231). Must exist in the syllabus map.
    #[arg(long, short = 's')]
    pub syllabus: String,

    /// Starting year of the range (inclusive).
    #[arg(long)]
    pub start_year: u16,

    /// Ending year of the range (inclusive). Defaults to the start year.
    #[arg(long)]
    pub end_year: Option<u16>,

    /// Comma-separated paper numbers to check (e.g. "1,3"). Defaults to 1-9.
    #[arg(long, short = 'p')]
    pub papers: Option<String>,

    /// Include mark schemes in the download.
    #[arg(long)]
    pub ms: bool,

    /// Include grade thresholds in the download.
    #[arg(long)]
    pub gt: bool,

    /// Output directory structure.
    #[arg(long, short = 'f', value_enum, default_value_t = LayoutArg::YearMonthPaper)]
    pub file_structure: LayoutArg,

    /// Concurrent existence checks (HEAD requests).
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u16).range(1..))]
    pub probe_workers: u16,

    /// Concurrent downloads. Kept lower than the probe pool since each
    /// transfer moves a full file.
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..))]
    pub fetch_workers: u16,

    /// Root directory the downloaded tree is written under.
    #[arg(long, default_value = "CIE_OUT")]
    pub output: PathBuf,

    /// Path to the syllabus map file.
    #[arg(long, default_value = "syllabus.toml")]
    pub syllabus_file: PathBuf,

    /// Remote base URL (override for mirrors).
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

/// Layout accepted on the command line, mapped to [`Layout`] internally.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LayoutArg {
    /// May-June/2024/Paper 1/...
    MonthYearPaper,
    /// 2024/May-June/Paper 1/...
    YearMonthPaper,
    /// May-June/2024/...
    MonthYear,
    /// 2024/May-June/...
    YearMonth,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::MonthYearPaper => Layout::MonthYearPaper,
            LayoutArg::YearMonthPaper => Layout::YearMonthPaper,
            LayoutArg::MonthYear => Layout::MonthYear,
            LayoutArg::YearMonth => Layout::YearMonth,
        }
    }
}

impl Cli {
    /// Builds the selection the generator expands. Rejects an empty year
    /// range here, before any candidate exists.
    pub fn selection_spec(&self) -> Result<SelectionSpec, PapergrabError> {
        let start = self.start_year;
        let end = self.end_year.unwrap_or(start);
        if start > end {
            return Err(PapergrabError::EmptyYearRange { start, end });
        }

        let papers = match &self.papers {
            Some(list) => list
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            None => SelectionSpec::default_papers(),
        };
        let papers = if papers.is_empty() {
            SelectionSpec::default_papers()
        } else {
            papers
        };

        Ok(SelectionSpec {
            code: self.syllabus.clone(),
            years: start..=end,
            papers,
            seasons: Season::ALL.to_vec(),
            variants: 1..=9,
            mark_schemes: self.ms,
            grade_thresholds: self.gt,
            layout: self.file_structure.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_minimal_invocation() {
        let cli = Cli::parse_from(["papergrab", "-s", "9231", "--start-year", "2020"]);
        assert_eq!(cli.syllabus, "9231");
        assert_eq!(cli.start_year, 2020);
        assert!(cli.end_year.is_none());
        assert!(!cli.ms);
        assert_eq!(cli.probe_workers, 16);
        assert_eq!(cli.fetch_workers, 4);
    }

    #[test]
    fn cli_parses_full_invocation() {
        let cli = Cli::parse_from([
            "papergrab",
            "-s",
            "9702",
            "--start-year",
            "2018",
            "--end-year",
            "2022",
            "-p",
            "1,3",
            "--ms",
            "--gt",
            "-f",
            "month-year",
            "--probe-workers",
            "32",
            "--fetch-workers",
            "8",
        ]);
        assert!(cli.ms && cli.gt);
        assert!(matches!(cli.file_structure, LayoutArg::MonthYear));
        assert_eq!(cli.probe_workers, 32);
        assert_eq!(cli.fetch_workers, 8);
    }

    #[test]
    fn spec_defaults_papers_to_one_through_nine() {
        let cli = Cli::parse_from(["papergrab", "-s", "9231", "--start-year", "2020"]);
        let spec = cli.selection_spec().unwrap();
        assert_eq!(spec.papers.len(), 9);
        assert_eq!(spec.papers[0], "1");
        assert_eq!(spec.years, 2020..=2020);
    }

    #[test]
    fn spec_splits_paper_list() {
        let cli = Cli::parse_from([
            "papergrab",
            "-s",
            "9231",
            "--start-year",
            "2020",
            "-p",
            "1, 3,5",
        ]);
        let spec = cli.selection_spec().unwrap();
        assert_eq!(spec.papers, vec!["1", "3", "5"]);
    }

    #[test]
    fn spec_rejects_inverted_year_range() {
        let cli = Cli::parse_from([
            "papergrab",
            "-s",
            "9231",
            "--start-year",
            "2022",
            "--end-year",
            "2020",
        ]);
        let err = cli.selection_spec().unwrap_err();
        assert!(matches!(
            err,
            PapergrabError::EmptyYearRange {
                start: 2022,
                end: 2020
            }
        ));
    }

    #[test]
    fn zero_workers_is_rejected_by_clap() {
        let res = Cli::try_parse_from([
            "papergrab",
            "-s",
            "9231",
            "--start-year",
            "2020",
            "--probe-workers",
            "0",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
