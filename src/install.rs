//! Registers the hook in a project's `.claude/settings.json`.

use std::fs;
use std::path::PathBuf;

use color_eyre::eyre::{Result, WrapErr};
use serde_json::{json, Value};

/// PostToolUse matcher covering the two tools the hook classifies.
const HOOK_MATCHER: &str = "Task|Bash";

/// Add a PostToolUse registration for this binary to the project's
/// `.claude/settings.json`, creating the file if needed. Running it twice
/// is a no-op.
pub fn register(project: Option<PathBuf>) -> Result<()> {
    let root = project.unwrap_or_else(|| PathBuf::from("."));
    let settings_path = root.join(".claude").join("settings.json");

    let mut settings: Value = if settings_path.exists() {
        let text = fs::read_to_string(&settings_path)
            .wrap_err_with(|| format!("failed to read {}", settings_path.display()))?;
        serde_json::from_str(&text)
            .wrap_err_with(|| format!("failed to parse {}", settings_path.display()))?
    } else {
        json!({})
    };

    let command = hook_command();
    if !register_in(&mut settings, &command) {
        println!("Hook already registered in:");
        println!("  {}", settings_path.display());
        return Ok(());
    }

    if let Some(dir) = settings_path.parent() {
        fs::create_dir_all(dir)
            .wrap_err_with(|| format!("failed to create {}", dir.display()))?;
    }
    let text = serde_json::to_string_pretty(&settings)
        .wrap_err("failed to serialize settings")?;
    fs::write(&settings_path, text + "\n")
        .wrap_err_with(|| format!("failed to write {}", settings_path.display()))?;

    println!("Registered PostToolUse hook in:");
    println!("  {}", settings_path.display());
    println!();
    println!("Tool usage will be tracked in .claude/metrics/usage-stats.toml.");

    Ok(())
}

/// Command line the host should run for each event. Absolute path to the
/// current binary when it can be resolved, the bare name otherwise.
fn hook_command() -> String {
    std::env::current_exe()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "tally".to_string())
}

/// Insert the registration into the settings document. Returns false when an
/// entry invoking `command` already exists.
fn register_in(settings: &mut Value, command: &str) -> bool {
    if !settings.is_object() {
        *settings = json!({});
    }
    let Some(obj) = settings.as_object_mut() else {
        return false;
    };

    let hooks = obj.entry("hooks").or_insert_with(|| json!({}));
    if !hooks.is_object() {
        *hooks = json!({});
    }
    let Some(hooks) = hooks.as_object_mut() else {
        return false;
    };

    let post = hooks.entry("PostToolUse").or_insert_with(|| json!([]));
    if !post.is_array() {
        *post = json!([]);
    }
    let Some(entries) = post.as_array_mut() else {
        return false;
    };

    if entries.iter().any(|e| entry_invokes(e, command)) {
        return false;
    }

    entries.push(json!({
        "matcher": HOOK_MATCHER,
        "hooks": [{ "type": "command", "command": command }]
    }));
    true
}

fn entry_invokes(entry: &Value, command: &str) -> bool {
    entry
        .get("hooks")
        .and_then(Value::as_array)
        .map(|hooks| {
            hooks
                .iter()
                .any(|h| h.get("command").and_then(Value::as_str) == Some(command))
        })
        .unwrap_or(false)
}
