use std::path::{Path, PathBuf};

/// Build a Task PostToolUse payload for a sub-agent dispatch.
pub fn task_payload(agent: &str) -> String {
    format!(
        r#"{{"tool_name":"Task","tool_input":{{"subagent_type":"{agent}","prompt":"do the thing"}},"cwd":"/tmp/project"}}"#
    )
}

/// Build a Bash PostToolUse payload.
pub fn bash_payload(command: &str) -> String {
    format!(r#"{{"tool_name":"Bash","tool_input":{{"command":"{command}"}}}}"#)
}

/// Payload for a tool the tracker ignores.
pub fn read_payload(path: &str) -> String {
    format!(r#"{{"tool_name":"Read","tool_input":{{"file_path":"{path}"}}}}"#)
}

/// Stats file contents seeded with entries this tool does not own.
pub const SEEDED_STORE: &str = r#"timestamp = "2026-01-01T00:00:00Z"
updated_by = "manual"

[agent_usage.planner]
invocations = 4
last_used = "2026-01-01T00:00:00Z"

[productivity]
sessions = 9
focus_minutes = 412
"#;

/// Stats file location inside a test directory.
pub fn stats_path(dir: &Path) -> PathBuf {
    dir.join("usage-stats.toml")
}
