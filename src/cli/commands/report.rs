//! `lpreport report` — rotation-progress tables plus a summary line.
//!
//! Folders split into a personal and a shared table (scope permitting),
//! each sorted by folder path or percentage done.  The summary line
//! always aggregates exactly the folders that were rendered.

use crate::cli::output;
use crate::cli::{retrieve_snapshot, Cli, ReportArgs, ReportScope, SortKey};
use crate::errors::Result;
use crate::metrics::{collect_folder_metrics, FolderMetrics};
use crate::vault::VaultClient;

/// Execute the `report` command.
pub fn execute<C: VaultClient>(client: &C, cli: &Cli, args: &ReportArgs) -> Result<()> {
    let snapshot = retrieve_snapshot(client, cli)?;
    let metrics = collect_folder_metrics(
        &snapshot,
        cli.cutoff_date,
        &cli.whitelist(),
        args.details,
        &args.filter_folders,
    )?;
    render(&metrics, args);
    Ok(())
}

/// Sort, bucket, and print the report. Infallible by design: once the
/// metrics exist, rendering always completes.
fn render(metrics: &[FolderMetrics], args: &ReportArgs) {
    let mut rendered: Vec<&FolderMetrics> = Vec::new();

    for bucket in buckets(args.report_on) {
        let mut table_metrics: Vec<&FolderMetrics> = metrics
            .iter()
            .filter(|folder| folder.is_personal() == (*bucket == ReportScope::Personal))
            .collect();
        sort_metrics(&mut table_metrics, args.sort_on, args.reverse_sort);

        let title = format!("LastPass secret rotation progress - {}", bucket_title(bucket));
        output::print_metrics_table(&title, &table_metrics);
        rendered.extend(table_metrics);
    }

    for folder in &rendered {
        for warning in folder.warnings() {
            tracing::debug!("{warning}");
        }
    }

    println!("{}", output::summary_line(&rendered));
}

/// The buckets a scope renders, in display order.
fn buckets(scope: ReportScope) -> &'static [ReportScope] {
    match scope {
        ReportScope::All => &[ReportScope::Personal, ReportScope::Shared],
        ReportScope::Personal => &[ReportScope::Personal],
        ReportScope::Shared => &[ReportScope::Shared],
    }
}

fn bucket_title(bucket: &ReportScope) -> &'static str {
    match bucket {
        ReportScope::Personal => "Personal",
        ReportScope::Shared => "Shared",
        ReportScope::All => "All",
    }
}

/// Stable sort on the chosen key; ties keep the aggregator's
/// full-path-ascending order.
fn sort_metrics(metrics: &mut [&FolderMetrics], sort_on: SortKey, reverse: bool) {
    match (sort_on, reverse) {
        (SortKey::Name, false) => metrics.sort_by(|a, b| a.full_path().cmp(&b.full_path())),
        (SortKey::Name, true) => metrics.sort_by(|a, b| b.full_path().cmp(&a.full_path())),
        (SortKey::Percentage, false) => {
            metrics.sort_by(|a, b| a.percentage_done().total_cmp(&b.percentage_done()));
        }
        (SortKey::Percentage, true) => {
            metrics.sort_by(|a, b| b.percentage_done().total_cmp(&a.percentage_done()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use chrono::{DateTime, TimeZone, Utc};

    use crate::vault::{Folder, Secret, SecretKind};

    fn cutoff() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 9, 22, 0, 0, 0).unwrap()
    }

    /// A folder whose percentage_done lands exactly on `percent`.
    fn folder_at(name: &str, percent: usize) -> FolderMetrics {
        let mut folder = Folder::new(name, "", true);
        for i in 0..10 {
            let ts = if i * 10 < percent {
                Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
            } else {
                Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap()
            };
            folder.add_secret(Secret {
                id: format!("10000000000000000{i}"),
                name: format!("secret-{i}"),
                url: String::new(),
                kind: SecretKind::Password {
                    username: "user".into(),
                    password: "value".into(),
                },
                shared_folder: None,
                last_modified: ts,
                last_touched: ts,
                password_changed: ts,
            });
        }
        FolderMetrics::new(folder, cutoff(), HashSet::new())
    }

    #[test]
    fn percentage_sort_reversed_orders_descending() {
        let (a, b, c) = (folder_at("a", 30), folder_at("b", 90), folder_at("c", 60));
        let mut metrics = vec![&a, &b, &c];
        sort_metrics(&mut metrics, SortKey::Percentage, true);
        let done: Vec<f64> = metrics.iter().map(|m| m.percentage_done()).collect();
        assert_eq!(done, vec![90.0, 60.0, 30.0]);
    }

    #[test]
    fn percentage_sort_orders_ascending() {
        let (a, b, c) = (folder_at("a", 30), folder_at("b", 90), folder_at("c", 60));
        let mut metrics = vec![&a, &b, &c];
        sort_metrics(&mut metrics, SortKey::Percentage, false);
        let done: Vec<f64> = metrics.iter().map(|m| m.percentage_done()).collect();
        assert_eq!(done, vec![30.0, 60.0, 90.0]);
    }

    #[test]
    fn name_sort_is_lexicographic_by_full_path() {
        let (a, b, c) = (folder_at("beta", 0), folder_at("alpha", 0), folder_at("gamma", 0));
        let mut metrics = vec![&a, &b, &c];
        sort_metrics(&mut metrics, SortKey::Name, false);
        let names: Vec<String> = metrics.iter().map(|m| m.full_path()).collect();
        assert_eq!(names, vec!["alpha", "beta", "gamma"]);

        sort_metrics(&mut metrics, SortKey::Name, true);
        let names: Vec<String> = metrics.iter().map(|m| m.full_path()).collect();
        assert_eq!(names, vec!["gamma", "beta", "alpha"]);
    }

    #[test]
    fn percentage_ties_keep_existing_order() {
        let (a, b, c) = (folder_at("alpha", 50), folder_at("beta", 50), folder_at("gamma", 50));
        let mut metrics = vec![&a, &b, &c];
        sort_metrics(&mut metrics, SortKey::Percentage, true);
        let names: Vec<String> = metrics.iter().map(|m| m.full_path()).collect();
        assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn all_scope_renders_both_buckets() {
        assert_eq!(
            buckets(ReportScope::All),
            &[ReportScope::Personal, ReportScope::Shared]
        );
        assert_eq!(buckets(ReportScope::Shared), &[ReportScope::Shared]);
    }
}
