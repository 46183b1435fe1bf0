//! Secret types as retrieved from the vault.
//!
//! Each secret carries its identity, display fields, the three
//! timestamps the rotation report works with, and a kind tag.  The
//! kind is a closed enum rather than optional fields so callers
//! pattern-match instead of probing for attribute presence.

use chrono::{DateTime, Utc};

/// What kind of record a secret is, with the fields that kind carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretKind {
    /// A regular site credential with a decrypted password value.
    Password { username: String, password: String },

    /// A free-form encrypted note. No username or password fields.
    SecureNote,

    /// Anything else the vault stores (applications, attachments, ...).
    /// Carries the vault's own type name for display.
    Other(String),
}

impl SecretKind {
    /// The vault's type name for this kind, used as the username
    /// fallback column in the CSV export.
    pub fn type_name(&self) -> &str {
        match self {
            SecretKind::Password { .. } => "Password",
            SecretKind::SecureNote => "Secure Note",
            SecretKind::Other(name) => name,
        }
    }
}

/// A single decrypted secret retrieved from the vault.
#[derive(Debug, Clone, PartialEq)]
pub struct Secret {
    /// The vault's opaque numeric id for this secret.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Associated URL (empty for notes).
    pub url: String,

    /// Kind tag with the kind-specific fields.
    pub kind: SecretKind,

    /// Name of the shared root folder this secret lives under,
    /// or `None` for personal secrets.
    pub shared_folder: Option<String>,

    /// When any field of the secret was last modified.
    pub last_modified: DateTime<Utc>,

    /// When the secret was last accessed.
    pub last_touched: DateTime<Utc>,

    /// When the password field itself was last changed.
    pub password_changed: DateTime<Utc>,
}

impl Secret {
    /// Username for display, falling back to the kind's type name for
    /// kinds that have no username field.
    pub fn username_or_type(&self) -> &str {
        match &self.kind {
            SecretKind::Password { username, .. } => username,
            other => other.type_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn secret_with_kind(kind: SecretKind) -> Secret {
        let ts = Utc.with_ymd_and_hms(2023, 1, 15, 12, 0, 0).unwrap();
        Secret {
            id: "123456789012345678".into(),
            name: "example".into(),
            url: "https://example.com".into(),
            kind,
            shared_folder: None,
            last_modified: ts,
            last_touched: ts,
            password_changed: ts,
        }
    }

    #[test]
    fn password_kind_exposes_username() {
        let secret = secret_with_kind(SecretKind::Password {
            username: "alice".into(),
            password: "hunter2".into(),
        });
        assert_eq!(secret.username_or_type(), "alice");
    }

    #[test]
    fn note_kind_falls_back_to_type_name() {
        let secret = secret_with_kind(SecretKind::SecureNote);
        assert_eq!(secret.username_or_type(), "Secure Note");
    }

    #[test]
    fn other_kind_falls_back_to_vault_type_name() {
        let secret = secret_with_kind(SecretKind::Other("Application".into()));
        assert_eq!(secret.username_or_type(), "Application");
    }
}
