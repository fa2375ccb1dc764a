//! CSV export
//!
//! Append-only record of provisioned accounts:
//! `email,password,team,status,crs_id,timestamp`, header written once on
//! file creation. Presentation-only; nothing reads this back.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::{CoreError, CoreResult};
use crate::utils::datetime::format_timestamp;

const HEADER: &str = "email,password,team,status,crs_id,timestamp";

/// One exported row.
#[derive(Debug, Clone)]
pub struct ExportRecord {
    pub email: String,
    pub password: String,
    pub team: String,
    pub status: String,
    pub pool_id: String,
}

#[derive(Debug)]
pub struct CsvExporter {
    path: PathBuf,
}

impl CsvExporter {
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Append one row, writing the header first when the file is new.
    pub fn append(&self, record: &ExportRecord) -> CoreResult<()> {
        let is_new = !self.path.exists();

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| CoreError::Storage(format!("{}: {e}", self.path.display())))?;

        let mut write_line = |line: &str| -> CoreResult<()> {
            writeln!(file, "{line}")
                .map_err(|e| CoreError::Storage(format!("{}: {e}", self.path.display())))
        };

        if is_new {
            write_line(HEADER)?;
        }

        let row = [
            record.email.as_str(),
            record.password.as_str(),
            record.team.as_str(),
            record.status.as_str(),
            record.pool_id.as_str(),
            &format_timestamp(&Utc::now()),
        ]
        .map(quote_field)
        .join(",");
        write_line(&row)?;

        log::info!("Saved to {}", self.path.display());
        Ok(())
    }
}

/// Quote a field only when it needs it (embedded comma, quote or newline).
fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
