//! Hook payload parsing and event classification.
//!
//! Claude Code delivers PostToolUse events as a JSON object on stdin. Only
//! two shapes matter here: `Task` calls (sub-agent dispatch, tracked by
//! `subagent_type`) and `Bash` calls whose command line mentions a known
//! slash command.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

/// Slash commands recognized in Bash command lines. Closed list; adding a
/// command means editing this table.
pub const KNOWN_COMMANDS: &[&str] = &[
    "start-session",
    "finish-session",
    "create-pr",
    "directive",
    "update-roadmap",
    "review-code",
    "quick-test",
    "build-quiet",
    "verify-quiet",
    "docker-start",
    "docker-stop",
    "api-doc",
    "resume-session",
    "save-response",
    "test-service",
    "write-spec",
    "implement-spec",
    "review-pr",
];

/// A PostToolUse hook payload. Fields beyond these are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct HookEvent {
    #[serde(default)]
    pub tool_name: String,
    #[serde(default)]
    pub tool_input: Value,
    /// Working directory of the session, when the host includes it.
    #[serde(default)]
    pub cwd: Option<String>,
}

/// Which half of the store an event lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Agents,
    Commands,
}

impl Section {
    /// Top-level table name in the stats file.
    pub fn table_key(&self) -> &'static str {
        match self {
            Section::Agents => "agent_usage",
            Section::Commands => "command_usage",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table_key())
    }
}

/// Classification result: the store entry an event increments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub section: Section,
    pub key: String,
}

/// Map an event to the store entry it updates, if any.
pub fn classify(event: &HookEvent) -> Option<Target> {
    match event.tool_name.as_str() {
        "Task" => {
            let agent = event
                .tool_input
                .get("subagent_type")
                .and_then(Value::as_str)?
                .trim();
            if agent.is_empty() {
                return None;
            }
            Some(Target {
                section: Section::Agents,
                key: agent.to_string(),
            })
        }
        "Bash" => {
            let command = event.tool_input.get("command").and_then(Value::as_str)?;
            detect_command(command).map(|name| Target {
                section: Section::Commands,
                key: name.to_string(),
            })
        }
        _ => None,
    }
}

/// Find the first known slash command mentioned in a Bash command line.
/// Whole-word match, so `finish-session` hits in `run /finish-session now`
/// but not in `finish-sessions`.
pub fn detect_command(command: &str) -> Option<&'static str> {
    KNOWN_COMMANDS.iter().copied().find(|name| {
        Regex::new(&format!(r"\b{}\b", regex::escape(name)))
            .map(|re| re.is_match(command))
            .unwrap_or(false)
    })
}
