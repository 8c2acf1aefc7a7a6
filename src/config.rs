//! Syllabus code → subject path lookup, loaded from `syllabus.toml`.
//!
//! The remote host groups papers under per-subject path segments that cannot
//! be derived from the 4-digit code alone, so the mapping ships as a small
//! TOML file the user maintains:
//!
//! ```toml
//! [syllabus]
//! 9231 = "/Mathematics-Further-9231"
//! 9702 = "/Physics-9702"
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::PapergrabError;

/// The code → path table from `syllabus.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SyllabusMap {
    #[serde(default)]
    syllabus: HashMap<String, String>,
}

impl SyllabusMap {
    /// Loads the map from `path`. A missing file is a fatal configuration
    /// error: without it no URL can be built.
    pub fn load(path: &Path) -> Result<Self, PapergrabError> {
        if !path.exists() {
            return Err(PapergrabError::SyllabusFileMissing(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str::<SyllabusMap>(&contents)?)
    }

    /// Resolves a syllabus code to its subject path segment.
    pub fn path_for(&self, code: &str) -> Result<&str, PapergrabError> {
        self.syllabus
            .get(code)
            .map(|s| s.as_str())
            .ok_or_else(|| PapergrabError::UnknownSyllabus(code.to_string()))
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.syllabus.is_empty()
    }
}
