//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.  Metrics stay raw numbers;
//! the color thresholds live here and only here.

use comfy_table::{Cell, Color, ContentArrangement, Table};
use console::style;

use crate::metrics::FolderMetrics;

/// Percentages in this band render yellow; at 100 green, below red.
const WARN_BAND_LOW: f64 = 70.0;
const WARN_BAND_HIGH: f64 = 99.0;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print one rotation-progress table with a styled title line.
pub fn print_metrics_table(title: &str, metrics: &[&FolderMetrics]) {
    println!();
    println!("{}", style(title).bold());

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Path",
        "Percentage Done",
        "(Updated/Total) Still left",
        "Warnings",
    ]);

    for folder in metrics {
        table.add_row(vec![
            path_cell(folder),
            percentage_cell(folder),
            Cell::new(progress_text(folder)),
            warnings_cell(folder),
        ]);
    }

    println!("{table}");
    println!();
}

/// Root folders stand out in blue.
fn path_cell(folder: &FolderMetrics) -> Cell {
    let cell = Cell::new(folder.full_path());
    if folder.is_in_root() {
        cell.fg(Color::Blue)
    } else {
        cell
    }
}

fn percentage_cell(folder: &FolderMetrics) -> Cell {
    Cell::new(format!("{}", folder.percentage_done())).fg(percentage_color(folder.percentage_done()))
}

fn warnings_cell(folder: &FolderMetrics) -> Cell {
    let color = if folder.has_warnings() {
        Color::Yellow
    } else {
        Color::Green
    };
    Cell::new(folder.number_of_warnings().to_string()).fg(color)
}

/// Color threshold for a percentage-done value.
fn percentage_color(percentage: f64) -> Color {
    if percentage == 100.0 {
        Color::Green
    } else if (WARN_BAND_LOW..=WARN_BAND_HIGH).contains(&percentage) {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// The "(updated/total) N left" column text.
fn progress_text(folder: &FolderMetrics) -> String {
    format!(
        "({}/{}) {} left",
        folder.number_of_updated_secrets(),
        folder.number_of_secrets(),
        folder.number_of_secrets_to_update()
    )
}

/// One-line rollup across all rendered folders.
///
/// An empty universe is reported as 0% done / 0% left rather than
/// dividing by zero.
pub fn summary_line(metrics: &[&FolderMetrics]) -> String {
    let total: usize = metrics.iter().map(|m| m.number_of_secrets()).sum();
    let updated: usize = metrics.iter().map(|m| m.number_of_updated_secrets()).sum();
    let left = total - updated;
    let (percent_done, percent_left) = if total == 0 {
        (0.0, 0.0)
    } else {
        let done = updated as f64 / total as f64 * 100.0;
        (done, 100.0 - done)
    };
    format!(
        "There are {total} artifacts in {} folders. {updated} ({percent_done:.2}%) artifacts \
         have been updated and {left} ({percent_left:.2}%) still need attention",
        metrics.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use chrono::{TimeZone, Utc};

    use crate::vault::{Folder, Secret, SecretKind};

    fn metrics_with(updated: usize, total: usize) -> FolderMetrics {
        let cutoff = Utc.with_ymd_and_hms(2022, 9, 22, 0, 0, 0).unwrap();
        let mut folder = Folder::new("Personal", "", true);
        for i in 0..total {
            let ts = if i < updated {
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
        FolderMetrics::new(folder, cutoff, HashSet::new())
    }

    #[test]
    fn percentage_color_thresholds() {
        assert_eq!(percentage_color(100.0), Color::Green);
        assert_eq!(percentage_color(99.0), Color::Yellow);
        assert_eq!(percentage_color(70.0), Color::Yellow);
        assert_eq!(percentage_color(69.99), Color::Red);
        assert_eq!(percentage_color(0.0), Color::Red);
    }

    #[test]
    fn progress_text_shows_updated_total_and_remaining() {
        let metrics = metrics_with(1, 3);
        assert_eq!(progress_text(&metrics), "(1/3) 2 left");
    }

    #[test]
    fn summary_line_aggregates_rendered_folders() {
        let a = metrics_with(1, 2);
        let b = metrics_with(2, 2);
        let line = summary_line(&[&a, &b]);
        assert_eq!(
            line,
            "There are 4 artifacts in 2 folders. 3 (75.00%) artifacts have been updated \
             and 1 (25.00%) still need attention"
        );
    }

    #[test]
    fn summary_line_guards_the_empty_universe() {
        let line = summary_line(&[]);
        assert!(line.contains("0 artifacts in 0 folders"));
        assert!(line.contains("0 (0.00%)"));
    }
}
