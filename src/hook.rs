//! One-shot hook processing: a raw stdin payload in, at most one store
//! write out.

use std::path::Path;

use chrono::Utc;
use color_eyre::eyre::Result;

use crate::event::{self, HookEvent, Target};
use crate::store::{self, UsageStore};

/// What a single hook invocation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The event matched an agent or command; its counter was incremented.
    Recorded(Target),
    /// The event was irrelevant or unreadable; the store was not touched.
    Skipped,
}

/// Process one PostToolUse payload.
///
/// Anything that is not a classifiable event returns `Skipped` without
/// touching the filesystem; errors only come from the store itself, and the
/// binary's hook mode maps those to a silent successful exit.
pub fn process(raw: &str, stats_override: Option<&Path>) -> Result<Outcome> {
    if raw.trim().is_empty() {
        return Ok(Outcome::Skipped);
    }

    let event: HookEvent = match serde_json::from_str(raw) {
        Ok(event) => event,
        Err(err) => {
            tracing::debug!("unparseable hook payload: {err}");
            return Ok(Outcome::Skipped);
        }
    };

    let Some(target) = event::classify(&event) else {
        return Ok(Outcome::Skipped);
    };

    let path = match stats_override {
        Some(p) => p.to_path_buf(),
        None => store::stats_path(event.cwd.as_deref().map(Path::new)),
    };

    let now = Utc::now();
    let mut store = UsageStore::load(&path)?;
    store.record(&target, now);
    store.touch(now);
    store.save(&path)?;

    Ok(Outcome::Recorded(target))
}
