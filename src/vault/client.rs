//! The seam between this tool and the actual vault backend.
//!
//! Everything hard — authentication protocol, decryption, retrieval —
//! lives behind [`VaultClient`].  The CLI only ever talks to this
//! trait, so tests can substitute an in-memory client.

use thiserror::Error;
use zeroize::Zeroizing;

use crate::vault::folder::VaultSnapshot;

/// Credentials for one authentication attempt.
pub struct Credentials {
    pub username: String,
    pub password: Zeroizing<String>,
    pub mfa: Zeroizing<String>,
}

/// Failures the vault backend can report.
///
/// The first three identify which credential was wrong so the caller
/// can re-request exactly that one.  Everything else is `Backend` and
/// is not retried.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("unknown username")]
    UnknownUsername,

    #[error("invalid password")]
    InvalidPassword,

    #[error("invalid or missing MFA code")]
    InvalidMfa,

    #[error("vault backend failure: {0}")]
    Backend(String),
}

/// Authenticated access to the vault's folders and secrets.
pub trait VaultClient {
    /// Authenticate against the vault service.
    fn login(&self, credentials: &Credentials) -> Result<(), VaultError>;

    /// Retrieve and decrypt the full folder/secret structure.
    ///
    /// Only valid after a successful [`login`](Self::login).
    fn fetch(&self) -> Result<VaultSnapshot, VaultError>;
}
