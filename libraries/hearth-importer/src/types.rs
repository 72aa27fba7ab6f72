//! Common types for the importer

use hearth_core::SongId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for import operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Flat directory that receives managed copies
    pub managed_root: PathBuf,

    /// Upper bound on imports running at once in a batch
    pub max_concurrent_imports: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            managed_root: PathBuf::from("library"),
            max_concurrent_imports: 4,
        }
    }
}

/// Outcome of one file in a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImportOutcome {
    Imported { song_id: SongId, title: String },
    Failed { reason: String },
}

/// Progress update sent after each file in a batch completes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportProgress {
    /// Source that just finished
    pub source: PathBuf,

    pub outcome: ImportOutcome,

    /// Files finished so far, including this one
    pub completed: usize,

    pub total: usize,
}

impl ImportProgress {
    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }

    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            return 100.0;
        }
        (self.completed as f32 / self.total as f32) * 100.0
    }
}

/// Aggregate result of a batch import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total: usize,
    pub imported: usize,
    pub failed: usize,
}

impl ImportSummary {
    pub fn summary_text(&self) -> String {
        format!(
            "Import complete: {} of {} imported, {} failed",
            self.imported, self.total, self.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percentage() {
        let progress = ImportProgress {
            source: PathBuf::from("a.mp3"),
            outcome: ImportOutcome::Failed {
                reason: "nope".to_string(),
            },
            completed: 1,
            total: 4,
        };
        assert!((progress.percentage() - 25.0).abs() < f32::EPSILON);
        assert!(!progress.is_complete());
    }

    #[test]
    fn test_summary_text() {
        let summary = ImportSummary {
            total: 3,
            imported: 2,
            failed: 1,
        };
        assert_eq!(
            summary.summary_text(),
            "Import complete: 2 of 3 imported, 1 failed"
        );
    }
}
