//! Recipient roster loading.

use anyhow::{Context, Result, bail};
use std::io::Read;
use std::path::Path;

/// Reads the recipient list from a CSV file.
///
/// No header row is assumed; the first field of every record is the
/// address, any further fields are ignored. A malformed file - including a
/// record with an empty first field - fails the whole load rather than
/// skipping rows, so a broken export is noticed before any mail goes out.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or any record is
/// malformed.
pub fn load(path: &Path) -> Result<Vec<String>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening recipient file {}", path.display()))?;
    read_from(file).with_context(|| format!("reading recipient file {}", path.display()))
}

fn read_from<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(reader);

    let mut recipients = Vec::new();
    for (index, result) in csv_reader.records().enumerate() {
        let record = result.with_context(|| format!("record {}", index + 1))?;
        match record.get(0) {
            Some(address) if !address.is_empty() => recipients.push(address.to_string()),
            _ => bail!("record {} has no address field", index + 1),
        }
    }

    Ok(recipients)
}
