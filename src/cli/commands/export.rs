//! `lpreport export` — flat CSV of per-secret rotation state.
//!
//! Unlike the report, the export walks the vault's folder structure
//! unaggregated: every sub-folder's secrets appear as individual rows.
//! The target file is overwritten if it exists.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};

use crate::cli::output;
use crate::cli::{retrieve_snapshot, Cli};
use crate::errors::Result;
use crate::metrics::is_secret_in_warning;
use crate::vault::{VaultClient, VaultSnapshot};

/// Column order; row fields match positionally.
const HEADER: [&str; 10] = [
    "full_path",
    "id",
    "name",
    "url",
    "username",
    "last_modified",
    "last_touched",
    "last_password_modified",
    "status",
    "warning",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Execute the `export` command.
pub fn execute<C: VaultClient>(client: &C, cli: &Cli, filename: &str) -> Result<()> {
    let snapshot = retrieve_snapshot(client, cli)?;

    let file = std::fs::File::create(filename)?;
    write_csv(file, &snapshot, cli.cutoff_date, &cli.whitelist())?;

    output::success(&format!("Exported secret data to {filename}."));
    Ok(())
}

/// Write the header plus one row per secret across every folder.
pub fn write_csv<W: Write>(
    writer: W,
    snapshot: &VaultSnapshot,
    cutoff: DateTime<Utc>,
    whitelist: &HashSet<String>,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADER)?;

    for folder in &snapshot.folders {
        let full_path = folder.full_path();
        for secret in &folder.secrets {
            let status = if secret.password_changed < cutoff {
                "NOT_OK"
            } else {
                "OK"
            };
            let warning = is_secret_in_warning(secret, cutoff, whitelist);
            csv_writer.write_record([
                full_path.clone(),
                secret.id.clone(),
                secret.name.clone(),
                secret.url.clone(),
                secret.username_or_type().to_string(),
                secret.last_modified.format(TIMESTAMP_FORMAT).to_string(),
                secret.last_touched.format(TIMESTAMP_FORMAT).to_string(),
                secret.password_changed.format(TIMESTAMP_FORMAT).to_string(),
                status.to_string(),
                warning.to_string(),
            ])?;
        }
    }

    csv_writer.flush()?;
    Ok(())
}
