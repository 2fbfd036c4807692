use crate::config::Config;
use crate::error::{ConvertError, Result};
use crate::record::Card;
use crate::{fence, sanitize, tags};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Outcome of table extraction: buffered records plus per-row defect notes.
#[derive(Debug)]
pub struct Extraction {
    pub records: Vec<Card>,
    pub total_rows: usize,
    pub skipped: Vec<String>,
}

/// Column indices resolved from the table header.
struct ColumnMap {
    id: usize,
    front: usize,
    back: usize,
    tags: Option<usize>,
}

/// Locate the export table and produce one record per data row.
///
/// Defective rows (empty or duplicate id, missing mapped cell, unterminated
/// fence) are skipped with a warning by default, or abort the run when
/// `config.strict` is set. A defective row never reaches the output.
pub fn extract_records(html: &str, config: &Config) -> Result<Extraction> {
    let document = Html::parse_document(html);

    let table_selector = Selector::parse("table").unwrap();
    let tbody_selector = Selector::parse("tbody").unwrap();
    let tr_selector = Selector::parse("tr").unwrap();
    let td_selector = Selector::parse("td").unwrap();

    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| ConvertError::MalformedTable {
            expected: "a <table> element".to_string(),
            found: "no table in document".to_string(),
        })?;

    let columns = map_columns(&table)?;

    let tbody = table
        .select(&tbody_selector)
        .next()
        .ok_or_else(|| ConvertError::MalformedTable {
            expected: "<tbody> with data rows".to_string(),
            found: "table without <tbody>".to_string(),
        })?;

    let mut records = Vec::new();
    let mut skipped = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut total_rows = 0;

    for (row_index, row) in tbody.select(&tr_selector).enumerate() {
        let cells: Vec<ElementRef> = row.select(&td_selector).collect();
        if cells.is_empty() {
            // Spacer rows in Notion exports carry no <td> cells
            continue;
        }
        total_rows += 1;

        match build_card(&cells, &columns, &mut seen_ids) {
            Ok(card) => {
                debug!(id = %card.id, "Extracted row");
                records.push(card);
            }
            Err(reason) => {
                if config.strict {
                    return Err(ConvertError::RowDefect {
                        row: row_index + 1,
                        reason,
                    });
                }
                warn!("Skipping row {}: {}", row_index + 1, reason);
                skipped.push(format!("row {}: {}", row_index + 1, reason));
            }
        }
    }

    Ok(Extraction {
        records,
        total_rows,
        skipped,
    })
}

/// Resolve column positions from the `<thead>` header texts.
fn map_columns(table: &ElementRef) -> Result<ColumnMap> {
    let thead_selector = Selector::parse("thead").unwrap();
    let th_selector = Selector::parse("th").unwrap();

    let thead = table
        .select(&thead_selector)
        .next()
        .ok_or_else(|| ConvertError::MalformedTable {
            expected: "<thead> with column headers".to_string(),
            found: "table without <thead>".to_string(),
        })?;

    let mut id = None;
    let mut front = None;
    let mut back = None;
    let mut tags = None;

    for (index, header) in thead.select(&th_selector).enumerate() {
        let name = cell_text(&header).to_lowercase();
        if name.contains("notion-id") {
            id.get_or_insert(index);
        } else if name == "front" {
            front.get_or_insert(index);
        } else if name == "back" {
            back.get_or_insert(index);
        } else if name.contains("tags") {
            tags.get_or_insert(index);
        }
    }

    Ok(ColumnMap {
        id: id.ok_or_else(|| ConvertError::MissingColumn("notion-id".to_string()))?,
        front: front.ok_or_else(|| ConvertError::MissingColumn("front".to_string()))?,
        back: back.ok_or_else(|| ConvertError::MissingColumn("back".to_string()))?,
        tags,
    })
}

/// Build one record from a row's cells. Errors are row-defect reasons.
fn build_card(
    cells: &[ElementRef],
    columns: &ColumnMap,
    seen_ids: &mut HashSet<String>,
) -> std::result::Result<Card, String> {
    let id_cell = cells
        .get(columns.id)
        .ok_or_else(|| "missing Notion-ID cell".to_string())?;
    let id = cell_text(id_cell);
    if id.is_empty() {
        return Err("empty Notion-ID".to_string());
    }
    if !seen_ids.insert(id.clone()) {
        return Err(format!("duplicate Notion-ID '{id}'"));
    }

    let front_cell = cells
        .get(columns.front)
        .ok_or_else(|| "missing Front cell".to_string())?;
    let back_cell = cells
        .get(columns.back)
        .ok_or_else(|| "missing Back cell".to_string())?;

    let front = sanitize::plain_text(&front_cell.inner_html());
    let back = sanitize::sanitize_fragment(&back_cell.inner_html()).map_err(|e| e.to_string())?;
    let back = fence::transform_fences(&back).map_err(|e| e.to_string())?;

    let tags = match columns.tags {
        Some(index) => cells
            .get(index)
            .map(|cell| tags::normalize_tags(&cell_text(cell)))
            .unwrap_or_default(),
        None => Vec::new(),
    };

    Ok(Card {
        id,
        front,
        back,
        tags,
    })
}

/// Text content of a cell: text nodes trimmed and joined by single spaces.
fn cell_text(cell: &ElementRef) -> String {
    cell.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
