//! Folder tree as retrieved from the vault.
//!
//! LastPass separates folder path components with a backslash, and the
//! personal root (secrets with no folder at all) is represented by the
//! single-backslash marker path.

use crate::vault::secret::Secret;

/// Path separator between folder components.
pub const PATH_SEPARATOR: &str = "\\";

/// Full path of the personal root folder (secrets without a folder).
pub const ROOT_PATH: &str = "\\";

/// A folder holding an ordered collection of secrets.
#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    /// Last path component (the root marker folder's name is `\`).
    pub name: String,

    /// Parent path, empty for folders directly in the root.
    pub path: String,

    /// Personal folders belong to the user; shared folders to a team.
    pub is_personal: bool,

    /// Secrets stored directly in this folder.
    pub secrets: Vec<Secret>,
}

impl Folder {
    /// Create an empty folder.
    pub fn new(name: impl Into<String>, path: impl Into<String>, is_personal: bool) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_personal,
            secrets: Vec::new(),
        }
    }

    /// Parent path joined with the folder name.
    ///
    /// The personal root marker folder reports `\` rather than an
    /// empty string.
    pub fn full_path(&self) -> String {
        if self.path.is_empty() {
            self.name.clone()
        } else {
            format!("{}{}{}", self.path, PATH_SEPARATOR, self.name)
        }
    }

    /// Whether this folder sits directly in the root of the vault.
    pub fn is_in_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Append one secret to this folder.
    pub fn add_secret(&mut self, secret: Secret) {
        self.secrets.push(secret);
    }

    /// Append a batch of secrets to this folder.
    pub fn add_secrets(&mut self, secrets: impl IntoIterator<Item = Secret>) {
        self.secrets.extend(secrets);
    }
}

/// The full decrypted view of a vault: every folder with its secrets.
///
/// Always contains the personal root marker folder, so rollup
/// aggregation has a destination for unfiled personal secrets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VaultSnapshot {
    pub folders: Vec<Folder>,
}

impl VaultSnapshot {
    /// Iterate over every secret across all folders.
    pub fn secrets(&self) -> impl Iterator<Item = &Secret> {
        self.folders.iter().flat_map(|folder| folder.secrets.iter())
    }

    /// Total number of secrets across all folders.
    pub fn secret_count(&self) -> usize {
        self.folders.iter().map(|folder| folder.secrets.len()).sum()
    }
}
