use crate::config::Config;
use crate::emit;
use crate::error::Result;
use crate::extract;
use crate::record::ConversionReport;
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

/// Run the complete conversion for one export file.
///
/// Records are buffered in memory and the output file is only written
/// after extraction has fully succeeded, so a failed run never leaves a
/// partial CSV behind.
#[instrument(skip_all, fields(input = %input.display()))]
pub fn convert_file(input: &Path, output: &Path, config: &Config) -> Result<ConversionReport> {
    info!("Reading Notion export");
    let html = fs::read_to_string(input)?;

    info!("Extracting records");
    let extraction = extract::extract_records(&html, config)?;
    info!(
        "Extracted {} records ({} skipped)",
        extraction.records.len(),
        extraction.skipped.len()
    );

    emit::write_csv(&extraction.records, output, config)?;
    info!("Wrote {}", output.display());

    Ok(ConversionReport {
        total_rows: extraction.total_rows,
        converted: extraction.records.len(),
        skipped: extraction.skipped.len(),
        errors: extraction.skipped,
        output_file: output.to_string_lossy().to_string(),
    })
}
