//! Folder aggregation for reporting.
//!
//! Two construction modes: the detailed view keeps the vault's folder
//! tree as-is, the summary view rolls every secret up into one folder
//! per root folder plus the personal root bucket.  Either way the
//! result is one `FolderMetrics` per folder, ordered by full path.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};

use crate::errors::{ReportError, Result};
use crate::metrics::FolderMetrics;
use crate::vault::{Folder, VaultSnapshot, ROOT_PATH};

/// Build per-folder metrics from a vault snapshot.
///
/// With `details` set, every folder of the vault (nested included)
/// gets its own metrics entry.  Otherwise secrets are rolled up: each
/// shared secret lands in the root folder named by its share, and all
/// personal secrets land in the root path bucket.  A shared secret
/// naming a share with no matching root folder is a data-consistency
/// violation and fails the whole aggregation.
///
/// `filter_folders` keeps only folders whose full path starts with one
/// of the given prefixes.
pub fn collect_folder_metrics(
    snapshot: &VaultSnapshot,
    cutoff: DateTime<Utc>,
    whitelist: &HashSet<String>,
    details: bool,
    filter_folders: &[String],
) -> Result<Vec<FolderMetrics>> {
    let mut folders = if details {
        snapshot.folders.clone()
    } else {
        rollup(snapshot)?
    };

    if !filter_folders.is_empty() {
        folders.retain(|folder| {
            let full_path = folder.full_path();
            filter_folders
                .iter()
                .any(|prefix| full_path.starts_with(prefix.as_str()))
        });
    }

    let mut metrics: Vec<FolderMetrics> = folders
        .into_iter()
        .map(|folder| FolderMetrics::new(folder, cutoff, whitelist.clone()))
        .collect();
    metrics.sort_by_key(FolderMetrics::full_path);

    tracing::debug!(folders = metrics.len(), details, "collected folder metrics");
    Ok(metrics)
}

/// Collapse the snapshot into one aggregate folder per root folder.
fn rollup(snapshot: &VaultSnapshot) -> Result<Vec<Folder>> {
    let mut aggregates: BTreeMap<String, Folder> = snapshot
        .folders
        .iter()
        .filter(|folder| folder.is_in_root())
        .map(|folder| {
            (
                folder.full_path(),
                Folder::new(folder.name.clone(), folder.path.clone(), folder.is_personal),
            )
        })
        .collect();

    for secret in snapshot.secrets() {
        let key = secret.shared_folder.as_deref().unwrap_or(ROOT_PATH);
        let target = aggregates
            .get_mut(key)
            .ok_or_else(|| ReportError::UnknownSharedFolder(key.to_string()))?;
        target.add_secret(secret.clone());
    }

    Ok(aggregates.into_values().collect())
}
