//! The on-disk usage store.
//!
//! A TOML document holding one `[agent_usage.<name>]` or
//! `[command_usage.<name>]` table per tracked agent/command, plus top-level
//! `timestamp` / `updated_by` metadata. The whole document is parsed,
//! mutated in place, and written back atomically; tables this tool does not
//! own ride along untouched.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use color_eyre::eyre::{Result, WrapErr};
use tempfile::NamedTempFile;
use toml::{Table, Value};

use crate::event::{Section, Target};

/// Value written to the store's `updated_by` metadata field.
pub const UPDATED_BY: &str = "hook";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Second-precision UTC timestamp, e.g. `2026-08-07T09:41:00Z`.
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Resolve the stats file for a project root.
///
/// Hooks run with `CLAUDE_PROJECT_DIR` exported by Claude Code; when that is
/// absent, fall back to the supplied root (the event's `cwd` or `--project`),
/// then the current directory.
pub fn stats_path(root: Option<&Path>) -> PathBuf {
    let base = std::env::var_os("CLAUDE_PROJECT_DIR")
        .map(PathBuf::from)
        .or_else(|| root.map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(".claude").join("metrics").join("usage-stats.toml")
}

/// One tracked agent or command, as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageEntry {
    pub name: String,
    pub invocations: i64,
    pub last_used: String,
}

/// In-memory copy of the stats file.
#[derive(Debug, Clone, Default)]
pub struct UsageStore {
    doc: Table,
}

impl UsageStore {
    /// Load the store, treating a missing file as empty.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        let doc = text
            .parse::<Table>()
            .wrap_err_with(|| format!("failed to parse {}", path.display()))?;
        Ok(Self { doc })
    }

    /// Increment the entry for `target`, creating it on first sight.
    pub fn record(&mut self, target: &Target, now: DateTime<Utc>) {
        let section = self
            .doc
            .entry(target.section.table_key())
            .or_insert_with(|| Value::Table(Table::new()));
        if !section.is_table() {
            // Hand-edited junk under our key; reclaim it rather than bail.
            *section = Value::Table(Table::new());
        }
        let Some(section) = section.as_table_mut() else {
            return;
        };

        let entry = section
            .entry(target.key.clone())
            .or_insert_with(|| Value::Table(Table::new()));
        if !entry.is_table() {
            *entry = Value::Table(Table::new());
        }
        let Some(entry) = entry.as_table_mut() else {
            return;
        };

        let invocations = entry
            .get("invocations")
            .and_then(Value::as_integer)
            .unwrap_or(0);
        entry.insert("invocations".to_string(), Value::Integer(invocations + 1));
        entry.insert(
            "last_used".to_string(),
            Value::String(format_timestamp(now)),
        );
    }

    /// Refresh the store-wide metadata fields.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.doc.insert(
            "timestamp".to_string(),
            Value::String(format_timestamp(now)),
        );
        self.doc.insert(
            "updated_by".to_string(),
            Value::String(UPDATED_BY.to_string()),
        );
    }

    /// Look up a single entry.
    pub fn entry(&self, section: Section, key: &str) -> Option<UsageEntry> {
        let table = self.doc.get(section.table_key())?.as_table()?;
        let entry = table.get(key)?.as_table()?;
        Some(entry_from_table(key, entry))
    }

    /// All entries in a section, in file order.
    pub fn entries(&self, section: Section) -> Vec<UsageEntry> {
        let Some(table) = self.doc.get(section.table_key()).and_then(Value::as_table) else {
            return Vec::new();
        };
        table
            .iter()
            .filter_map(|(name, value)| value.as_table().map(|t| entry_from_table(name, t)))
            .collect()
    }

    /// Top-level `timestamp` metadata, if the store has been written before.
    pub fn updated_at(&self) -> Option<&str> {
        self.doc.get("timestamp").and_then(Value::as_str)
    }

    /// Top-level `updated_by` metadata.
    pub fn updated_by(&self) -> Option<&str> {
        self.doc.get("updated_by").and_then(Value::as_str)
    }

    /// Raw access to a top-level key, for tables this tool does not own.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.doc.get(key)
    }

    /// Serialize and atomically replace the file at `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text =
            toml::to_string_pretty(&self.doc).wrap_err("failed to serialize usage store")?;

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)
            .wrap_err_with(|| format!("failed to create {}", dir.display()))?;

        // Write-to-temp-then-rename so concurrent readers never see a torn file.
        let mut tmp = NamedTempFile::new_in(dir)
            .wrap_err_with(|| format!("failed to create temp file in {}", dir.display()))?;
        tmp.write_all(text.as_bytes())
            .wrap_err("failed to write usage store")?;
        tmp.persist(path)
            .wrap_err_with(|| format!("failed to replace {}", path.display()))?;
        Ok(())
    }
}

fn entry_from_table(name: &str, table: &Table) -> UsageEntry {
    UsageEntry {
        name: name.to_string(),
        invocations: table
            .get("invocations")
            .and_then(Value::as_integer)
            .unwrap_or(0),
        last_used: table
            .get("last_used")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
    }
}
