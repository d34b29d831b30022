use std::{io::Read, path::Path};

use crate::{db, models::Entry, store::SqliteStore};

const COL_NAME: usize = 0;
const COL_CODE: usize = 1;
const COL_FREQ: usize = 2;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("store error: {0}")]
    Store(#[from] crate::store::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Validation(String),
}

/// Import a CSV file of `name,code[,frequency]` rows into the database.
/// Existing states with the same name are overwritten.
pub async fn import_csv(file_path: &Path, db_path: &str) -> Result<(), ImportError> {
    log::info!("importing data from {} ...", file_path.display());

    let file = std::fs::File::open(file_path)?;
    let store = SqliteStore::new(db::init(db_path, 1).await?);
    let n = import(&store, file).await?;

    log::info!("finished. imported {} entries", n);
    Ok(())
}

/// Validate every row, then write them all in one transaction. A bad row
/// anywhere in the input leaves the database untouched.
async fn import<R: Read>(store: &SqliteStore, r: R) -> Result<usize, ImportError> {
    let entries = read_entries(r)?;
    store.upsert_all(&entries).await?;
    Ok(entries.len())
}

/// Parse and validate CSV rows. A first row of `name,code,...` is treated
/// as a header and skipped.
fn read_entries<R: Read>(r: R) -> Result<Vec<Entry>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(r);

    let mut entries = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let line = i + 1;

        if line == 1 && is_header(&record) {
            continue;
        }
        entries.push(read_entry(&record, line)?);
    }

    Ok(entries)
}

fn is_header(record: &csv::StringRecord) -> bool {
    record
        .get(COL_NAME)
        .map(|s| s.trim().eq_ignore_ascii_case("name"))
        .unwrap_or(false)
}

fn read_entry(record: &csv::StringRecord, line: usize) -> Result<Entry, ImportError> {
    let get = |i: usize| clean_string(record.get(i).unwrap_or(""));

    if record.len() < 2 || record.len() > 3 {
        return Err(ImportError::Validation(format!(
            "line {}: expected 2 or 3 columns (name, code, frequency). Found {}",
            line,
            record.len()
        )));
    }

    let name = get(COL_NAME);
    if name.is_empty() {
        return Err(ImportError::Validation(format!(
            "line {}: empty name at column 0",
            line
        )));
    }

    let freq = get(COL_FREQ);
    let frequency = if freq.is_empty() {
        0
    } else {
        // SQLite stores integers as i64.
        freq.parse::<u64>()
            .ok()
            .filter(|f| *f <= i64::MAX as u64)
            .ok_or_else(|| {
                ImportError::Validation(format!(
                    "line {}: column 2, frequency should be a non-negative integer. Found '{}'",
                    line, freq
                ))
            })?
    };

    Ok(Entry::new(name, get(COL_CODE), frequency))
}

/// Trim and collapse runs of whitespace.
fn clean_string(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
