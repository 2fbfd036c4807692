use serde::Serialize;

/// One flashcard candidate extracted from a source table row.
#[derive(Debug, Clone, Serialize)]
pub struct Card {
    /// Source row identifier. Non-empty and unique within a run.
    pub id: String,
    /// Plain-text question side, all markup stripped.
    pub front: String,
    /// Cleaned HTML answer side.
    pub back: String,
    /// Normalized tag tokens, deduplicated, insertion order preserved.
    pub tags: Vec<String>,
}

/// Result of a complete conversion run.
#[derive(Debug, Serialize)]
pub struct ConversionReport {
    pub total_rows: usize,
    pub converted: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
    pub output_file: String,
}
