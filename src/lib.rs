//! Usage tracking hook for Claude Code.
//!
//! `tally` runs as a PostToolUse hook: each tool invocation arrives as a
//! JSON payload on stdin, gets classified as an agent or slash command
//! invocation, and bumps a counter in a TOML stats file. The binary also
//! ships a `--report` summary view and an `--install` helper that registers
//! the hook in a project's `.claude/settings.json`.

pub mod event;
pub mod hook;
pub mod install;
pub mod report;
pub mod store;
