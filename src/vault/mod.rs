//! Vault module — authenticated access to folders and secrets.
//!
//! This module provides:
//! - `Secret` and `SecretKind` types (`secret`)
//! - `Folder` and `VaultSnapshot` types (`folder`)
//! - The `VaultClient` trait and typed auth errors (`client`)
//! - The `lpass(1)`-backed production client (`lpass`)

pub mod client;
pub mod folder;
pub mod lpass;
pub mod secret;

// Re-export the most commonly used items.
pub use client::{Credentials, VaultClient, VaultError};
pub use folder::{Folder, VaultSnapshot, PATH_SEPARATOR, ROOT_PATH};
pub use lpass::LpassClient;
pub use secret::{Secret, SecretKind};
