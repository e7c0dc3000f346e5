//! CSV export of the currently filtered card list.
//!
//! Fixed column order `Company,Subject,Status,Date,Sender`. Every field is
//! quoted with embedded quotes doubled, so commas or quotes in any column
//! cannot corrupt the row structure.

use std::path::Path;

use crate::error::Result;
use crate::models::EmailRecord;

const HEADERS: [&str; 5] = ["Company", "Subject", "Status", "Date", "Sender"];

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Serialize `records` (the filtered view, not the full set) to CSV text
pub fn to_csv<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a EmailRecord>,
{
    let mut rows = vec![HEADERS.join(",")];
    rows.extend(records.into_iter().map(|record| {
        [
            quote(&record.company),
            quote(&record.subject),
            quote(record.status.as_str()),
            quote(&record.date.to_string()),
            quote(&record.sender),
        ]
        .join(",")
    }));
    rows.join("\n")
}

/// Write the export to a file, for shells without a browser download
pub async fn write_csv<'a, I>(records: I, path: &Path) -> Result<()>
where
    I: IntoIterator<Item = &'a EmailRecord>,
{
    tokio::fs::write(path, to_csv(records)).await?;
    tracing::info!("Exported CSV to {:?}", path);
    Ok(())
}
