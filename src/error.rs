use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PapergrabError {
    #[error("syllabus code '{0}' not found in the syllabus map")]
    UnknownSyllabus(String),

    #[error("syllabus map file not found: {}", .0.display())]
    SyllabusFileMissing(PathBuf),

    #[error("empty year range: start year {start} is after end year {end}")]
    EmptyYearRange { start: u16, end: u16 },

    #[error("server returned status {status} for {url}")]
    Download { status: u16, url: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
