//! Usage summary rendering for `--report`.

use std::path::Path;

use color_eyre::eyre::Result;

use crate::event::Section;
use crate::store::{UsageEntry, UsageStore};

/// Aggregated view of the store, ready for display.
#[derive(Debug, Clone)]
pub struct UsageReport {
    /// Store-level `timestamp` metadata, if present.
    pub updated_at: Option<String>,
    pub agents: Vec<UsageEntry>,
    pub commands: Vec<UsageEntry>,
}

impl UsageReport {
    /// Build a report from the store: entries per section, busiest first.
    pub fn from_store(store: &UsageStore) -> Self {
        Self {
            updated_at: store.updated_at().map(str::to_string),
            agents: sorted(store.entries(Section::Agents)),
            commands: sorted(store.entries(Section::Commands)),
        }
    }

    /// Invocations summed across both sections.
    pub fn total_invocations(&self) -> i64 {
        self.agents
            .iter()
            .chain(&self.commands)
            .map(|e| e.invocations)
            .sum()
    }
}

fn sorted(mut entries: Vec<UsageEntry>) -> Vec<UsageEntry> {
    entries.sort_by(|a, b| {
        b.invocations
            .cmp(&a.invocations)
            .then_with(|| a.name.cmp(&b.name))
    });
    entries
}

/// Trait for formatting usage reports.
/// Implement this trait to add new output formats (JSON, CSV, etc.).
pub trait ReportFormatter {
    fn format(&self, report: &UsageReport) -> String;
}

/// Text table formatter for terminal output.
#[derive(Debug, Clone)]
pub struct TextFormatter {
    /// Minimum width for the name column.
    pub min_name_width: usize,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self { min_name_width: 24 }
    }
}

impl ReportFormatter for TextFormatter {
    fn format(&self, report: &UsageReport) -> String {
        let name_width = report
            .agents
            .iter()
            .chain(&report.commands)
            .map(|e| e.name.len())
            .max()
            .unwrap_or(0)
            .max(self.min_name_width)
            .max(5); // "TOTAL"

        let separator = "─".repeat(name_width + 33);
        let mut output = String::new();

        let updated = report.updated_at.as_deref().unwrap_or("never");
        output.push_str(&format!("Usage report (updated: {})\n", updated));

        section_block(&mut output, "Agents", &report.agents, name_width, &separator);
        section_block(&mut output, "Commands", &report.commands, name_width, &separator);

        output.push_str(&separator);
        output.push('\n');
        output.push_str(&format!(
            "{:<name_width$} {:>11}\n",
            "TOTAL",
            report.total_invocations(),
        ));

        output
    }
}

fn section_block(
    output: &mut String,
    title: &str,
    entries: &[UsageEntry],
    name_width: usize,
    separator: &str,
) {
    output.push_str(separator);
    output.push('\n');
    output.push_str(&format!(
        "{:<name_width$} {:>11} {:>20}\n",
        title, "Invocations", "Last used",
    ));

    if entries.is_empty() {
        output.push_str(&format!("{:<name_width$}\n", "(none)"));
        return;
    }

    for entry in entries {
        output.push_str(&format!(
            "{:<name_width$} {:>11} {:>20}\n",
            entry.name, entry.invocations, entry.last_used,
        ));
    }
}

/// Load the store at `path` and print the summary table.
/// A missing file renders as an empty store rather than an error.
pub fn print(path: &Path) -> Result<()> {
    let store = UsageStore::load(path)?;
    let report = UsageReport::from_store(&store);
    let formatter = TextFormatter::default();
    print!("{}", formatter.format(&report));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Target;
    use chrono::TimeZone;

    fn sample_store() -> UsageStore {
        let mut store = UsageStore::default();
        let now = chrono::Utc.with_ymd_and_hms(2026, 8, 7, 9, 0, 0).unwrap();
        let reviewer = Target {
            section: Section::Agents,
            key: "code-reviewer".to_string(),
        };
        let planner = Target {
            section: Section::Agents,
            key: "planner".to_string(),
        };
        let finish = Target {
            section: Section::Commands,
            key: "finish-session".to_string(),
        };
        for _ in 0..3 {
            store.record(&reviewer, now);
        }
        store.record(&planner, now);
        store.record(&finish, now);
        store.touch(now);
        store
    }

    #[test]
    fn test_rows_sorted_by_invocations() {
        let report = UsageReport::from_store(&sample_store());
        let agents: Vec<&str> = report.agents.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(agents, vec!["code-reviewer", "planner"]);
        assert_eq!(report.total_invocations(), 5);
    }

    #[test]
    fn test_ties_break_by_name() {
        let mut store = UsageStore::default();
        let now = chrono::Utc.with_ymd_and_hms(2026, 8, 7, 9, 0, 0).unwrap();
        for key in ["zeta", "alpha"] {
            store.record(
                &Target {
                    section: Section::Agents,
                    key: key.to_string(),
                },
                now,
            );
        }
        let report = UsageReport::from_store(&store);
        let agents: Vec<&str> = report.agents.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(agents, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_text_formatter_structure() {
        let report = UsageReport::from_store(&sample_store());
        let output = TextFormatter::default().format(&report);

        assert!(output.contains("2026-08-07T09:00:00Z"), "should show updated stamp");
        assert!(output.contains("Agents"), "should contain agents header");
        assert!(output.contains("Commands"), "should contain commands header");
        assert!(output.contains("code-reviewer"), "should list agent names");
        assert!(output.contains("finish-session"), "should list command names");
        assert!(output.contains("TOTAL"), "should contain total row");
    }

    #[test]
    fn test_text_formatter_empty_store() {
        let report = UsageReport::from_store(&UsageStore::default());
        let output = TextFormatter::default().format(&report);
        assert!(output.contains("(updated: never)"));
        assert!(output.contains("(none)"));
    }
}
