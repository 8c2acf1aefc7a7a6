//! Candidate generation — the pure heart of the brute-force approach.
//!
//! pastpapers.co publishes no index, but its file names follow a strict
//! convention, so the full set of URLs a selection *could* correspond to is
//! enumerable up front. [`generate`] expands a [`SelectionSpec`] into every
//! (remote URL, local path) pair implied by it, with no network or
//! filesystem access, so the expansion is trivially testable.

use std::ops::RangeInclusive;
use std::path::PathBuf;

/// Default remote root for all candidate URLs.
pub const DEFAULT_BASE_URL: &str = "https://pastpapers.co/cie/A-Level";

/// An exam season, in the fixed order the site publishes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    MayJune,
    OctNov,
    March,
}

impl Season {
    pub const ALL: [Season; 3] = [Season::MayJune, Season::OctNov, Season::March];

    /// Single-letter tag used in file names (`9231_s20_qp_11.pdf`).
    pub fn tag(self) -> char {
        match self {
            Season::MayJune => 's',
            Season::OctNov => 'w',
            Season::March => 'm',
        }
    }

    /// Directory label used in both remote and local paths.
    pub fn folder(self) -> &'static str {
        match self {
            Season::MayJune => "May-June",
            Season::OctNov => "Oct-Nov",
            Season::March => "March",
        }
    }
}

/// Arrangement of the year/season/paper directory segments under the
/// subject directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    MonthYearPaper,
    YearMonthPaper,
    MonthYear,
    YearMonth,
}

impl Layout {
    /// Whether a `Paper N` directory sits between the season segments and
    /// the file name.
    pub fn has_paper_segment(self) -> bool {
        matches!(self, Layout::MonthYearPaper | Layout::YearMonthPaper)
    }

    fn month_first(self) -> bool {
        matches!(self, Layout::MonthYearPaper | Layout::MonthYear)
    }
}

/// Which of the three document families a candidate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocKind {
    QuestionPaper,
    MarkScheme,
    GradeThreshold,
}

impl DocKind {
    fn type_tag(self) -> &'static str {
        match self {
            DocKind::QuestionPaper => "qp",
            DocKind::MarkScheme => "ms",
            DocKind::GradeThreshold => "gt",
        }
    }
}

/// Everything that determines the candidate set. Immutable once built;
/// two identical specs always expand to identical candidate sequences.
#[derive(Debug, Clone)]
pub struct SelectionSpec {
    /// 4-digit syllabus code, e.g. "9231".
    pub code: String,
    pub years: RangeInclusive<u16>,
    /// Paper identifiers as printed in file names ("1".."9" normally).
    pub papers: Vec<String>,
    pub seasons: Vec<Season>,
    pub variants: RangeInclusive<u8>,
    pub mark_schemes: bool,
    pub grade_thresholds: bool,
    pub layout: Layout,
}

impl SelectionSpec {
    /// Default paper identifiers when the user does not narrow the list.
    pub fn default_papers() -> Vec<String> {
        (1..=9).map(|p| p.to_string()).collect()
    }
}

/// Where candidates live on the remote host and on disk. Built once from
/// the base URL, the per-subject path segment from the syllabus map, and
/// the output root.
#[derive(Debug, Clone)]
pub struct SitePaths {
    base_url: String,
    subject_path: String,
    subject_dir: String,
    output_root: PathBuf,
}

impl SitePaths {
    pub fn new(base_url: &str, subject_path: &str, output_root: impl Into<PathBuf>) -> Self {
        let trimmed = subject_path.trim_matches('/');
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            subject_path: format!("/{trimmed}"),
            subject_dir: trimmed.to_string(),
            output_root: output_root.into(),
        }
    }

    pub fn output_root(&self) -> &PathBuf {
        &self.output_root
    }
}

/// A hypothesized (remote URL, local path) pair. The remote resource may or
/// may not exist; the probe phase decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub remote_url: String,
    pub local_path: PathBuf,
    pub file_name: String,
    pub kind: DocKind,
}

impl Candidate {
    fn new(
        spec: &SelectionSpec,
        site: &SitePaths,
        year: u16,
        season: Season,
        paper: Option<&str>,
        kind: DocKind,
        file_name: String,
    ) -> Self {
        let remote_url = format!(
            "{}{}/{}-{}/{}",
            site.base_url,
            site.subject_path,
            year,
            season.folder(),
            file_name
        );

        let mut local_path = site.output_root.join(&site.subject_dir);
        if spec.layout.month_first() {
            local_path.push(season.folder());
            local_path.push(year.to_string());
        } else {
            local_path.push(year.to_string());
            local_path.push(season.folder());
        }
        // Grade thresholds are season-wide, never paper-specific.
        if let Some(paper) = paper
            && spec.layout.has_paper_segment()
        {
            local_path.push(format!("Paper {paper}"));
        }
        local_path.push(&file_name);

        Self {
            remote_url,
            local_path,
            file_name,
            kind,
        }
    }
}

/// Expands a selection into the full candidate sequence.
///
/// Generation order is total and stable: year ascending, season in declared
/// order, the grade-threshold candidate (if enabled) before any paper of
/// that season, then papers in the order given, question-paper variants
/// ascending, and mark-scheme variants (if enabled) after all question
/// papers of that paper. An empty year range or paper list yields an empty
/// sequence rather than an error; rejecting those is the caller's job.
pub fn generate(spec: &SelectionSpec, site: &SitePaths) -> Vec<Candidate> {
    let mut out = Vec::new();
    for year in spec.years.clone() {
        let yy = year % 100;
        for &season in &spec.seasons {
            let stem = format!("{}_{}{yy:02}", spec.code, season.tag());
            if spec.grade_thresholds {
                let name = format!("{stem}_{}.pdf", DocKind::GradeThreshold.type_tag());
                out.push(Candidate::new(
                    spec,
                    site,
                    year,
                    season,
                    None,
                    DocKind::GradeThreshold,
                    name,
                ));
            }
            for paper in &spec.papers {
                for kind in [DocKind::QuestionPaper, DocKind::MarkScheme] {
                    if kind == DocKind::MarkScheme && !spec.mark_schemes {
                        continue;
                    }
                    for variant in spec.variants.clone() {
                        let name = format!("{stem}_{}_{paper}{variant}.pdf", kind.type_tag());
                        out.push(Candidate::new(
                            spec,
                            site,
                            year,
                            season,
                            Some(paper.as_str()),
                            kind,
                            name,
                        ));
                    }
                }
            }
        }
    }
    out
}
