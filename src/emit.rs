use crate::config::Config;
use crate::error::Result;
use crate::record::Card;
use std::path::Path;

const HEADER: [&str; 4] = ["Notion-ID", "Front", "Back", "Tags"];

/// Serialize buffered records to a CSV file.
///
/// Field order is fixed: Notion-ID, Front, Back, Tags. Tags are joined
/// into a single field with the configured separator. Quoting and
/// escaping follow standard CSV rules so embedded commas, quotes, and
/// newlines in Front/Back never corrupt row boundaries.
pub fn write_csv(records: &[Card], output: &Path, config: &Config) -> Result<()> {
    let mut writer = csv::Writer::from_path(output)?;

    if config.include_header {
        writer.write_record(HEADER)?;
    }

    for card in records {
        let tags = card.tags.join(&config.tag_separator);
        writer.write_record([
            card.id.as_str(),
            card.front.as_str(),
            card.back.as_str(),
            tags.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
