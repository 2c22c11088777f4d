//! Session state discovery and plan document lookup.
//!
//! The filesystem is both the persistence layer and the channel the
//! orchestrator and reviewing agents communicate through. This module is
//! the single place that reads it; decision logic elsewhere operates on
//! the loaded values. Nothing here writes: session state is owned and
//! mutated by external actors at times uncorrelated with gate runs, so
//! every read tolerates files that do not exist yet ("not found") and
//! files caught mid-write (a parse failure, reported distinctly).

use crate::core::error::WardenError;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Directory under a project root holding per-session state.
pub const SESSION_DIR_NAME: &str = ".planwarden";
/// State record filename inside a session directory.
pub const STATE_FILE_NAME: &str = "state.json";

/// Session state as persisted by the orchestrator.
///
/// Version fields stay raw JSON: hosts write both native integers and
/// numeric strings, and coercion is a contract-verification concern.
/// Unknown fields (schema version, timestamps, ids) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub phase: String,
    #[serde(default)]
    pub draft_version: Option<JsonValue>,
    #[serde(default)]
    pub validation_version: Option<JsonValue>,
}

pub fn session_dir(root: &Path, session_id: &str) -> PathBuf {
    root.join(SESSION_DIR_NAME).join(session_id)
}

/// Walk `start` and its ancestors for the first root whose session
/// directory carries a state record. `None` means the gate has no
/// jurisdiction here.
pub fn find_session_dir(start: &Path, session_id: &str) -> Option<PathBuf> {
    start.ancestors().find_map(|root| {
        let dir = session_dir(root, session_id);
        dir.join(STATE_FILE_NAME).is_file().then_some(dir)
    })
}

/// First session directory reachable from any of the candidate roots,
/// in the order the candidates were given.
pub fn locate_session(candidates: &[PathBuf], session_id: &str) -> Option<PathBuf> {
    candidates
        .iter()
        .find_map(|start| find_session_dir(start, session_id))
}

/// Load the state record from a located session directory.
///
/// A record that exists but cannot be read or parsed is a hard error,
/// distinct from "not found": callers translate it into a blocking
/// verdict rather than a pass-through.
pub fn load_state(session_dir: &Path) -> Result<SessionState, WardenError> {
    let path = session_dir.join(STATE_FILE_NAME);
    let raw = fs::read_to_string(&path).map_err(WardenError::IoError)?;
    serde_json::from_str(&raw)
        .map_err(|e| WardenError::CorruptState(format!("{}: {e}", path.display())))
}

/// Plan documents live in the host-owned plans directory.
pub fn plans_dir(root: &Path) -> PathBuf {
    root.join(".claude").join("plans")
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Most recently modified `*.md` under the project's plan directory,
/// falling back to the home plan directory when the project has none.
pub fn find_plan_file(root: &Path) -> Option<PathBuf> {
    let mut dir = plans_dir(root);
    if !dir.is_dir() {
        dir = plans_dir(&home_dir()?);
        if !dir.is_dir() {
            return None;
        }
    }

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in fs::read_dir(&dir).ok()?.flatten() {
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        if newest.as_ref().is_none_or(|(best, _)| modified > *best) {
            newest = Some((modified, path));
        }
    }
    newest.map(|(_, path)| path)
}

/// Plan text, or `None` when the document is unreadable or empty. Either
/// way the caller has no review context and must pass through.
pub fn read_plan(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok().filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn write_state(root: &Path, session_id: &str, body: &str) -> PathBuf {
        let dir = session_dir(root, session_id);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(STATE_FILE_NAME), body).unwrap();
        dir
    }

    #[test]
    fn find_session_dir_walks_ancestors() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = write_state(tmp.path(), "s1", "{}");
        let nested = tmp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_session_dir(&nested, "s1"), Some(dir));
    }

    #[test]
    fn find_session_dir_requires_state_record() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(session_dir(tmp.path(), "s1")).unwrap();

        assert_eq!(find_session_dir(tmp.path(), "s1"), None);
        assert_eq!(find_session_dir(tmp.path(), "other"), None);
    }

    #[test]
    fn locate_session_honors_candidate_order() {
        let tmp_a = tempfile::tempdir().unwrap();
        let tmp_b = tempfile::tempdir().unwrap();
        let dir_a = write_state(tmp_a.path(), "s1", "{}");
        write_state(tmp_b.path(), "s1", "{}");

        let candidates = vec![tmp_a.path().to_path_buf(), tmp_b.path().to_path_buf()];
        assert_eq!(locate_session(&candidates, "s1"), Some(dir_a));
    }

    #[test]
    fn load_state_parses_versions_as_raw_values() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = write_state(
            tmp.path(),
            "s1",
            r#"{"phase":"VALIDATE","draft_version":5,"validation_version":"2","schema_version":1}"#,
        );

        let state = load_state(&dir).unwrap();
        assert_eq!(state.phase, "VALIDATE");
        assert_eq!(state.draft_version, Some(serde_json::json!(5)));
        assert_eq!(state.validation_version, Some(serde_json::json!("2")));
    }

    #[test]
    fn load_state_rejects_corrupt_record() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = write_state(tmp.path(), "s1", "{truncated");

        match load_state(&dir) {
            Err(WardenError::CorruptState(msg)) => assert!(msg.contains(STATE_FILE_NAME)),
            other => panic!("expected CorruptState, got {other:?}"),
        }
    }

    #[test]
    fn find_plan_file_picks_newest_markdown() {
        let tmp = tempfile::tempdir().unwrap();
        let plans = plans_dir(tmp.path());
        fs::create_dir_all(&plans).unwrap();
        fs::write(plans.join("old.md"), "old").unwrap();
        fs::write(plans.join("new.md"), "new").unwrap();
        fs::write(plans.join("ignored.txt"), "not a plan").unwrap();

        let past = SystemTime::now() - Duration::from_secs(600);
        fs::File::options()
            .write(true)
            .open(plans.join("old.md"))
            .unwrap()
            .set_modified(past)
            .unwrap();

        let found = find_plan_file(tmp.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "new.md");
    }

    #[test]
    fn find_plan_file_without_plan_dir_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        // Point the home fallback somewhere empty too.
        let prev = std::env::var_os("HOME");
        unsafe { std::env::set_var("HOME", tmp.path()) };
        let found = find_plan_file(tmp.path());
        match prev {
            Some(v) => unsafe { std::env::set_var("HOME", v) },
            None => unsafe { std::env::remove_var("HOME") },
        }
        assert_eq!(found, None);
    }

    #[test]
    fn read_plan_filters_empty_documents() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("plan.md");
        fs::write(&path, "").unwrap();
        assert_eq!(read_plan(&path), None);
        fs::write(&path, "content").unwrap();
        assert_eq!(read_plan(&path).as_deref(), Some("content"));
    }
}
