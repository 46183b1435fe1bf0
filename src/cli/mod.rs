//! CLI module — Clap argument parser, output helpers, and command implementations.
//!
//! Every flag has a `LASTPASS_*` environment-variable mirror, handled
//! by clap's `env` feature.  Credentials missing from both flags and
//! environment are requested interactively.

pub mod commands;
pub mod output;

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::Parser;
use zeroize::Zeroizing;

use crate::errors::{ReportError, Result};
use crate::logging::LogLevel;
use crate::vault::{Credentials, VaultClient, VaultError, VaultSnapshot};

/// Secret ids are purely numeric strings of this length range.
const SECRET_ID_LEN: std::ops::RangeInclusive<usize> = 18..=19;

/// lpreport CLI: report on the state of secret rotation against a
/// cutoff date — by default the day of the LastPass incident.
#[derive(Parser)]
#[command(
    name = "lpreport",
    about = "Report on the state of LastPass secret rotation based on a cutoff day",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log verbosity level
    #[arg(
        short = 'L',
        long,
        value_enum,
        default_value_t = LogLevel::Info,
        env = "LASTPASS_LOG_LEVEL",
        global = true
    )]
    pub log_level: LogLevel,

    /// Path to a JSON logging config file (overrides --log-level)
    #[arg(short = 'l', long, env = "LASTPASS_LOG_CONFIG", global = true)]
    pub log_config: Option<String>,

    /// LastPass username (prompted interactively if omitted)
    #[arg(short, long, env = "LASTPASS_USERNAME", global = true)]
    pub username: Option<String>,

    /// LastPass master password (prompted interactively if omitted)
    #[arg(short, long, env = "LASTPASS_PASSWORD", global = true)]
    pub password: Option<String>,

    /// LastPass MFA code (prompted interactively if omitted)
    #[arg(short, long, env = "LASTPASS_MFA", global = true)]
    pub mfa: Option<String>,

    /// Comma-delimited secret ids to exempt from warnings
    #[arg(
        short = 'w',
        long,
        env = "LASTPASS_WARNING_WHITELIST",
        value_delimiter = ',',
        value_parser = parse_secret_id,
        global = true
    )]
    pub warning_whitelist: Vec<String>,

    /// Cutoff date (YYYY-MM-DD); secrets modified after it count as updated
    #[arg(
        long,
        env = "LASTPASS_CUTOFF_DATE",
        default_value = "2022-09-22",
        value_parser = parse_cutoff_date,
        global = true
    )]
    pub cutoff_date: DateTime<Utc>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Report on the current state of secret rotation
    Report(ReportArgs),

    /// Export all secret rotation state for processing
    Export {
        /// The filename to export the secret status report to
        #[arg(short, long, env = "LASTPASS_EXPORT_FILENAME")]
        filename: String,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

/// Flags of the `report` subcommand.
#[derive(clap::Args)]
pub struct ReportArgs {
    /// Which categories of secrets to report on
    #[arg(
        short = 'r',
        long,
        value_enum,
        default_value_t = ReportScope::All,
        env = "LASTPASS_REPORT_ON"
    )]
    pub report_on: ReportScope,

    /// Sort the report by folder name or percentage done
    #[arg(
        short = 's',
        long,
        value_enum,
        default_value_t = SortKey::Name,
        env = "LASTPASS_SORT_ON"
    )]
    pub sort_on: SortKey,

    /// Reverse the sorting order on the chosen key
    #[arg(long, env = "LASTPASS_SORT_REVERSE")]
    pub reverse_sort: bool,

    /// Show every vault folder instead of the per-root rollup
    #[arg(short, long, env = "LASTPASS_REPORT_DETAIL")]
    pub details: bool,

    /// Comma-delimited folder path prefixes to keep
    #[arg(
        short = 'f',
        long,
        env = "LASTPASS_REPORT_FILTER_FOLDERS",
        value_delimiter = ','
    )]
    pub filter_folders: Vec<String>,
}

/// Report scope: personal secrets, shared secrets, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportScope {
    All,
    Personal,
    Shared,
}

/// Report sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortKey {
    Name,
    Percentage,
}

impl Cli {
    /// The warning whitelist as a lookup set.
    pub fn whitelist(&self) -> HashSet<String> {
        self.warning_whitelist.iter().cloned().collect()
    }
}

// ---------------------------------------------------------------------------
// Argument value parsers
// ---------------------------------------------------------------------------

/// Validate one warning-whitelist entry: a purely numeric string of
/// 18-19 characters.  Runs at argument-parse time, before any vault
/// contact.
pub fn parse_secret_id(value: &str) -> std::result::Result<String, String> {
    let numeric = !value.is_empty() && value.chars().all(|c| c.is_ascii_digit());
    if numeric && SECRET_ID_LEN.contains(&value.len()) {
        Ok(value.to_string())
    } else {
        Err(format!(
            "'{value}' is not a valid secret id — expected an 18-19 digit number"
        ))
    }
}

/// Parse the cutoff date as midnight UTC of the given calendar day.
pub fn parse_cutoff_date(value: &str) -> std::result::Result<DateTime<Utc>, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
        .map_err(|e| format!("'{value}' is not a valid date (expected YYYY-MM-DD): {e}"))
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Ask for a visible value (username, MFA code).
///
/// An aborted prompt is a cancellation and terminates the run.
fn prompt_input(name: &str) -> Result<String> {
    dialoguer::Input::new()
        .with_prompt(format!("LastPass {name}"))
        .interact_text()
        .map_err(|_| ReportError::UserCancelled)
}

/// Ask for a hidden value (master password).
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
fn prompt_secret(name: &str) -> Result<Zeroizing<String>> {
    dialoguer::Password::new()
        .with_prompt(format!("LastPass {name}"))
        .interact()
        .map(Zeroizing::new)
        .map_err(|_| ReportError::UserCancelled)
}

/// Build the initial credentials from flags/environment, prompting for
/// whatever is missing.
fn initial_credentials(cli: &Cli) -> Result<Credentials> {
    Ok(Credentials {
        username: match &cli.username {
            Some(username) => username.clone(),
            None => prompt_input("username")?,
        },
        password: match &cli.password {
            Some(password) => Zeroizing::new(password.clone()),
            None => prompt_secret("password")?,
        },
        mfa: match &cli.mfa {
            Some(mfa) => Zeroizing::new(mfa.clone()),
            None => prompt_input("MFA").map(Zeroizing::new)?,
        },
    })
}

/// Authenticate and retrieve the full vault snapshot.
///
/// Credential-specific failures re-prompt for exactly the credential
/// that failed, looping until login succeeds or the user cancels.
/// Anything else is fatal without retry.
pub fn retrieve_snapshot<C: VaultClient>(client: &C, cli: &Cli) -> Result<VaultSnapshot> {
    let mut credentials = initial_credentials(cli)?;

    loop {
        match client.login(&credentials) {
            Ok(()) => break,
            Err(VaultError::UnknownUsername) => {
                output::warning("Username is not correct, please try again.");
                credentials.username = prompt_input("username")?;
            }
            Err(VaultError::InvalidPassword) => {
                output::warning("Password is not correct, please try again.");
                credentials.password = prompt_secret("password")?;
            }
            Err(VaultError::InvalidMfa) => {
                output::warning("MFA is not correct, please try again.");
                credentials.mfa = prompt_input("MFA").map(Zeroizing::new)?;
            }
            Err(error) => {
                tracing::debug!(%error, "unclassified backend failure during authentication");
                return Err(ReportError::AuthenticationFailed);
            }
        }
    }

    output::info("Please wait while retrieving and decrypting secrets from LastPass...");
    let snapshot = client.fetch()?;
    output::success(&format!(
        "Retrieved {} secrets in {} folders.",
        snapshot.secret_count(),
        snapshot.folders.len()
    ));
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_secret_ids() {
        assert!(parse_secret_id("123456789012345678").is_ok());
        assert!(parse_secret_id("1234567890123456789").is_ok());
    }

    #[test]
    fn rejects_non_numeric_id() {
        assert!(parse_secret_id("abc").is_err());
        assert!(parse_secret_id("12345678901234567a").is_err());
        assert!(parse_secret_id("").is_err());
    }

    #[test]
    fn rejects_wrong_length_id() {
        assert!(parse_secret_id("12345678901234567").is_err());
        assert!(parse_secret_id("12345678901234567890").is_err());
    }

    #[test]
    fn error_message_names_the_offending_id() {
        let err = parse_secret_id("abc").unwrap_err();
        assert!(err.contains("'abc'"));
    }

    #[test]
    fn cutoff_date_parses_as_midnight_utc() {
        let parsed = parse_cutoff_date("2022-09-22").unwrap();
        assert_eq!(
            parsed,
            Utc.with_ymd_and_hms(2022, 9, 22, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn rejects_malformed_cutoff_date() {
        assert!(parse_cutoff_date("not-a-date").is_err());
        assert!(parse_cutoff_date("22-09-2022").is_err());
    }

    mod retrieval {
        use super::*;
        use clap::Parser;

        use crate::vault::{Folder, ROOT_PATH};

        /// Client scripted with fixed results; never touches a network.
        struct FakeClient {
            login_result: fn() -> std::result::Result<(), VaultError>,
        }

        impl VaultClient for FakeClient {
            fn login(&self, _credentials: &Credentials) -> std::result::Result<(), VaultError> {
                (self.login_result)()
            }

            fn fetch(&self) -> std::result::Result<VaultSnapshot, VaultError> {
                Ok(VaultSnapshot {
                    folders: vec![Folder::new(ROOT_PATH, "", true)],
                })
            }
        }

        fn cli_with_credentials() -> Cli {
            Cli::parse_from([
                "lpreport",
                "--username",
                "alice@example.com",
                "--password",
                "pw",
                "--mfa",
                "000000",
                "report",
            ])
        }

        #[test]
        fn successful_login_returns_the_snapshot() {
            let client = FakeClient {
                login_result: || Ok(()),
            };
            let snapshot = retrieve_snapshot(&client, &cli_with_credentials()).unwrap();
            assert_eq!(snapshot.folders.len(), 1);
        }

        #[test]
        fn backend_failure_is_fatal_without_retry() {
            let client = FakeClient {
                login_result: || Err(VaultError::Backend("boom".into())),
            };
            let result = retrieve_snapshot(&client, &cli_with_credentials());
            assert!(matches!(result, Err(ReportError::AuthenticationFailed)));
        }
    }
}
