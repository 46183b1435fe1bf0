//! `VaultClient` implementation backed by the official `lpass(1)`
//! command-line client.
//!
//! All protocol work (authentication, blob sync, decryption) happens
//! inside `lpass`; this module only drives the binary and maps its
//! JSON output onto the crate's data model.  Pinentry is disabled so
//! credentials can be fed over stdin.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::vault::client::{Credentials, VaultClient, VaultError};
use crate::vault::folder::{Folder, VaultSnapshot, PATH_SEPARATOR, ROOT_PATH};
use crate::vault::secret::{Secret, SecretKind};

/// URL value `lpass` uses for folder placeholder accounts.
const GROUP_PLACEHOLDER_URL: &str = "http://group";

/// URL value `lpass` uses for secure notes.
const SECURE_NOTE_URL: &str = "http://sn";

/// Name prefix that marks a shared (team) folder.
const SHARED_PREFIX: &str = "Shared-";

/// Vault client that shells out to the `lpass` binary.
pub struct LpassClient {
    binary: PathBuf,
}

impl LpassClient {
    /// Client driving the `lpass` binary found on `PATH`.
    pub fn new() -> Self {
        Self::with_binary("lpass")
    }

    /// Client driving a specific `lpass` binary.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for LpassClient {
    fn default() -> Self {
        Self::new()
    }
}

impl VaultClient for LpassClient {
    fn login(&self, credentials: &Credentials) -> Result<(), VaultError> {
        tracing::debug!(binary = %self.binary.display(), "running lpass login");

        let mut child = Command::new(&self.binary)
            .args(["login", "--trust", &credentials.username])
            .env("LPASS_DISABLE_PINENTRY", "1")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| VaultError::Backend(format!("failed to run lpass: {e}")))?;

        // With pinentry disabled, lpass reads the master password and
        // then the MFA code from stdin, one per line.
        if let Some(stdin) = child.stdin.as_mut() {
            let feed = format!("{}\n{}\n", credentials.password.as_str(), credentials.mfa.as_str());
            stdin
                .write_all(feed.as_bytes())
                .map_err(|e| VaultError::Backend(format!("failed to write credentials: {e}")))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| VaultError::Backend(format!("lpass login did not complete: {e}")))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(classify_login_failure(&String::from_utf8_lossy(
                &output.stderr,
            )))
        }
    }

    fn fetch(&self) -> Result<VaultSnapshot, VaultError> {
        tracing::debug!(binary = %self.binary.display(), "running lpass show");

        let output = Command::new(&self.binary)
            .args(["show", "--sync=now", "--expand-multi", "--json", "--basic-regexp", ""])
            .env("LPASS_DISABLE_PINENTRY", "1")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| VaultError::Backend(format!("failed to run lpass: {e}")))?;

        if !output.status.success() {
            return Err(VaultError::Backend(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let accounts = parse_accounts(&String::from_utf8_lossy(&output.stdout))?;
        Ok(build_snapshot(accounts))
    }
}

/// Map an `lpass login` stderr message to the credential that failed.
fn classify_login_failure(stderr: &str) -> VaultError {
    let message = stderr.to_lowercase();
    if message.contains("unknown email") || message.contains("unknown login") {
        VaultError::UnknownUsername
    } else if message.contains("invalid password") || message.contains("incorrect password") {
        VaultError::InvalidPassword
    } else if message.contains("multifactor")
        || message.contains("authenticator")
        || message.contains("out-of-band")
        || message.contains("otp")
    {
        VaultError::InvalidMfa
    } else {
        VaultError::Backend(stderr.trim().to_string())
    }
}

/// One account entry as emitted by `lpass show --json`.
#[derive(Debug, Deserialize)]
struct RawAccount {
    id: String,
    name: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    group: String,
    #[serde(default)]
    share: Option<String>,
    #[serde(default)]
    url: String,
    #[serde(default)]
    last_modified_gmt: String,
    #[serde(default)]
    last_touch: String,
    #[serde(default)]
    last_pwchange_gmt: Option<String>,
}

impl RawAccount {
    /// Full folder path of this account, share name included.
    ///
    /// Empty group and no share means the personal root.
    fn folder_path(&self) -> String {
        match (&self.share, self.group.is_empty()) {
            (Some(share), true) => share.clone(),
            (Some(share), false) => format!("{share}{PATH_SEPARATOR}{}", self.group),
            (None, _) => self.group.clone(),
        }
    }

    /// Folder placeholder accounts mark (possibly empty) folders and
    /// are not secrets themselves.
    fn is_folder_placeholder(&self) -> bool {
        self.url == GROUP_PLACEHOLDER_URL
    }

    fn into_secret(self, shared_folder: Option<String>) -> Secret {
        let kind = if self.url == SECURE_NOTE_URL {
            SecretKind::SecureNote
        } else {
            SecretKind::Password {
                username: self.username,
                password: self.password,
            }
        };
        let last_modified = parse_epoch(&self.last_modified_gmt);
        // Older lpass releases omit the password-change timestamp;
        // fall back to the general modification time.
        let password_changed = self
            .last_pwchange_gmt
            .as_deref()
            .map(parse_epoch)
            .unwrap_or(last_modified);
        Secret {
            id: self.id,
            name: self.name,
            url: self.url,
            kind,
            shared_folder,
            last_modified,
            last_touched: parse_epoch(&self.last_touch),
            password_changed,
        }
    }
}

/// Parse an epoch-seconds string; `lpass` emits `"0"` for
/// never-touched entries, and anything unparsable degrades to the
/// epoch as well.
fn parse_epoch(value: &str) -> DateTime<Utc> {
    let seconds = value.trim().parse::<i64>().unwrap_or(0);
    Utc.timestamp_opt(seconds, 0).single().unwrap_or_default()
}

fn parse_accounts(json: &str) -> Result<Vec<RawAccount>, VaultError> {
    serde_json::from_str(json)
        .map_err(|e| VaultError::Backend(format!("unparsable lpass output: {e}")))
}

/// Name of the shared root folder a path belongs to, if any.
fn shared_root(path: &str) -> Option<String> {
    let first = path.split(PATH_SEPARATOR).next().unwrap_or_default();
    first.starts_with(SHARED_PREFIX).then(|| first.to_string())
}

/// Insert a folder and all its ancestors into the folder map.
fn ensure_folder_chain(folders: &mut BTreeMap<String, Folder>, path: &str) {
    if path.is_empty() || path == ROOT_PATH {
        return;
    }
    let is_personal = shared_root(path).is_none();
    let components: Vec<&str> = path.split(PATH_SEPARATOR).collect();
    for depth in 1..=components.len() {
        let full_path = components[..depth].join(PATH_SEPARATOR);
        folders.entry(full_path).or_insert_with(|| {
            Folder::new(
                components[depth - 1],
                components[..depth - 1].join(PATH_SEPARATOR),
                is_personal,
            )
        });
    }
}

/// Assemble the folder tree and file every secret into its folder.
fn build_snapshot(accounts: Vec<RawAccount>) -> VaultSnapshot {
    let mut folders: BTreeMap<String, Folder> = BTreeMap::new();
    folders.insert(ROOT_PATH.into(), Folder::new(ROOT_PATH, "", true));

    for account in accounts {
        let path = account.folder_path();
        ensure_folder_chain(&mut folders, &path);
        if account.is_folder_placeholder() {
            continue;
        }
        let shared_folder = shared_root(&path);
        let key = if path.is_empty() { ROOT_PATH } else { path.as_str() };
        let secret = account.into_secret(shared_folder);
        if let Some(folder) = folders.get_mut(key) {
            folder.add_secret(secret);
        }
    }

    VaultSnapshot {
        folders: folders.into_values().collect(),
    }
}
