//! Load exported mail metadata.
//!
//! The mail client exports one row per message with the header
//! `id,from,subject,date,snippet`. Fetching and paging stay on the client side.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use tracing::warn;

use crate::types::EmailMessage;

/// Read a mail export CSV file, keeping at most `limit` messages.
pub fn parse_mail_export_csv(path: impl AsRef<Path>, limit: usize) -> Result<Vec<EmailMessage>> {
    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("opening {}", path.as_ref().display()))?;
    read_mail_export(file, limit)
}

pub fn read_mail_export<R: Read>(reader: R, limit: usize) -> Result<Vec<EmailMessage>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let mut out = Vec::new();
    for (row, result) in rdr.deserialize::<EmailMessage>().enumerate() {
        if out.len() >= limit {
            break;
        }
        match result {
            Ok(msg) if !msg.id.trim().is_empty() => out.push(msg),
            Ok(_) => warn!(row = row + 1, "skipping message without id"),
            Err(e) => warn!(row = row + 1, error = %e, "skipping malformed message row"),
        }
    }

    Ok(out)
}
