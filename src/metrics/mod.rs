//! Rotation metrics over one folder of secrets.
//!
//! `FolderMetrics` is a read-only view: it wraps a folder together
//! with the cutoff date and the warning whitelist and derives every
//! count on read.  Nothing here mutates the folder or colors the
//! output; presentation lives entirely in the CLI layer.

pub mod aggregate;

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::vault::{Folder, Secret, SecretKind};

pub use aggregate::collect_folder_metrics;

/// A secret whose metadata says it was touched after the cutoff while
/// the password field itself was never rotated.
#[derive(Debug, Clone)]
pub struct WarningSecret<'a> {
    pub folder_name: &'a str,
    pub secret: &'a Secret,
}

impl fmt::Display for WarningSecret<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: '{}' ({}) last modified '{}', but secret field last modified '{}' (id:'{}')",
            self.folder_name,
            self.secret.name,
            self.secret.url,
            self.secret.last_modified,
            self.secret.password_changed,
            self.secret.id
        )
    }
}

/// Whether a secret looks rotated without its password actually having
/// changed.
///
/// True only when all of the following hold: some field changed at a
/// different time than the password field, the password change predates
/// the cutoff, the modification is at or after the cutoff, the secret
/// is a password with a non-empty value, and the id is not whitelisted.
pub fn is_secret_in_warning(
    secret: &Secret,
    cutoff: DateTime<Utc>,
    whitelist: &HashSet<String>,
) -> bool {
    let has_password_value = matches!(
        &secret.kind,
        SecretKind::Password { password, .. } if !password.is_empty()
    );
    secret.last_modified != secret.password_changed
        && secret.password_changed < cutoff
        && secret.last_modified >= cutoff
        && has_password_value
        && !whitelist.contains(&secret.id)
}

/// Read-only rotation metrics for one folder.
#[derive(Debug, Clone)]
pub struct FolderMetrics {
    folder: Folder,
    cutoff: DateTime<Utc>,
    whitelist: HashSet<String>,
}

impl FolderMetrics {
    pub fn new(folder: Folder, cutoff: DateTime<Utc>, whitelist: HashSet<String>) -> Self {
        Self {
            folder,
            cutoff,
            whitelist,
        }
    }

    pub fn full_path(&self) -> String {
        self.folder.full_path()
    }

    pub fn is_in_root(&self) -> bool {
        self.folder.is_in_root()
    }

    pub fn is_personal(&self) -> bool {
        self.folder.is_personal
    }

    pub fn number_of_secrets(&self) -> usize {
        self.folder.secrets.len()
    }

    /// Secrets whose general modification time is after the cutoff.
    /// An update to any field counts, not just the password field.
    pub fn number_of_updated_secrets(&self) -> usize {
        self.folder
            .secrets
            .iter()
            .filter(|secret| secret.last_modified > self.cutoff)
            .count()
    }

    pub fn number_of_secrets_to_update(&self) -> usize {
        self.number_of_secrets() - self.number_of_updated_secrets()
    }

    /// Percentage of updated secrets, rounded to two decimals.
    ///
    /// An empty folder is complete by definition (100), and rounding
    /// overshoot is clamped to exactly 100.
    pub fn percentage_done(&self) -> f64 {
        let total = self.number_of_secrets();
        if total == 0 {
            return 100.0;
        }
        let percentage =
            round2(self.number_of_updated_secrets() as f64 / total as f64 * 100.0);
        percentage.min(100.0)
    }

    /// Complement of `percentage_done`; an empty folder reports 0.
    pub fn percentage_left(&self) -> f64 {
        let total = self.number_of_secrets();
        if total == 0 {
            return 0.0;
        }
        round2(100.0 - self.number_of_updated_secrets() as f64 / total as f64 * 100.0)
    }

    pub fn is_secret_in_warning(&self, secret: &Secret) -> bool {
        is_secret_in_warning(secret, self.cutoff, &self.whitelist)
    }

    pub fn warnings(&self) -> Vec<WarningSecret<'_>> {
        self.folder
            .secrets
            .iter()
            .filter(|secret| self.is_secret_in_warning(secret))
            .map(|secret| WarningSecret {
                folder_name: &self.folder.name,
                secret,
            })
            .collect()
    }

    pub fn number_of_warnings(&self) -> usize {
        self.warnings().len()
    }

    pub fn has_warnings(&self) -> bool {
        self.number_of_warnings() > 0
    }
}

/// Round to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
