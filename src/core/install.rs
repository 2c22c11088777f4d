//! Hook registration in the host settings file.
//!
//! `planwarden install` merges the two gate hooks into the host's local
//! settings. Every entry this engine writes carries a marker in its
//! description, and reinstall/removal only ever touch marked entries;
//! hooks installed by the operator or other tools are left alone.

use crate::core::error::WardenError;
use serde_json::{Value as JsonValue, json};
use std::fs;
use std::path::{Path, PathBuf};

/// Default settings file, relative to the project root.
pub const SETTINGS_FILE: &str = ".claude/settings.local.json";
/// Marker identifying engine-owned hook entries.
pub const HOOK_MARKER: &str = "(from planwarden)";

const HOOK_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    pub dry_run: bool,
    pub remove: bool,
    pub settings_path: Option<PathBuf>,
}

#[derive(Debug)]
pub struct InstallReport {
    pub path: PathBuf,
    pub changed: bool,
}

/// The hook registrations this engine owns, as `(event, matcher-config)`
/// pairs keyed the way the host settings file expects them.
fn hook_entries(bin: &str) -> Vec<(&'static str, JsonValue)> {
    vec![
        (
            "SubagentStop",
            json!({
                "hooks": [{
                    "type": "command",
                    "command": format!("{bin} hook subagent-stop"),
                    "timeout": HOOK_TIMEOUT_SECS,
                    "description": format!("Verify phase output contracts {HOOK_MARKER}"),
                }]
            }),
        ),
        (
            "PreToolUse",
            json!({
                "matcher": "ExitPlanMode",
                "hooks": [{
                    "type": "command",
                    "command": format!("{bin} hook plan-exit"),
                    "timeout": HOOK_TIMEOUT_SECS,
                    "description": format!("Require plan review before execution {HOOK_MARKER}"),
                }]
            }),
        ),
    ]
}

fn is_managed_hook(hook: &JsonValue) -> bool {
    hook.get("description")
        .and_then(JsonValue::as_str)
        .is_some_and(|d| d.contains(HOOK_MARKER))
}

/// Drop engine-owned hooks from a matcher array, pruning matchers left
/// empty. Foreign entries pass through untouched.
fn strip_managed(matchers: JsonValue) -> JsonValue {
    let JsonValue::Array(items) = matchers else {
        return matchers;
    };
    let kept: Vec<JsonValue> = items
        .into_iter()
        .filter_map(|mut matcher| {
            if let Some(hooks) = matcher.get_mut("hooks").and_then(JsonValue::as_array_mut) {
                hooks.retain(|hook| !is_managed_hook(hook));
                if hooks.is_empty() {
                    return None;
                }
            }
            Some(matcher)
        })
        .collect();
    JsonValue::Array(kept)
}

/// Apply (or remove) the engine's hook entries in a settings document.
/// Existing engine entries are stripped first so reinstall is clean.
pub fn apply_hooks(settings: &mut JsonValue, bin: &str, remove: bool) -> Result<(), WardenError> {
    let root = settings.as_object_mut().ok_or_else(|| {
        WardenError::SettingsError("settings root must be a JSON object".to_string())
    })?;
    let hooks = root
        .entry("hooks")
        .or_insert_with(|| json!({}))
        .as_object_mut()
        .ok_or_else(|| WardenError::SettingsError("'hooks' must be a JSON object".to_string()))?;

    for (event, entry) in hook_entries(bin) {
        let matchers = hooks.entry(event).or_insert_with(|| json!([]));
        let mut kept = strip_managed(matchers.take());
        if !remove && let JsonValue::Array(items) = &mut kept {
            items.push(entry);
        }
        *matchers = kept;
    }
    Ok(())
}

fn load_settings(path: &Path) -> Result<JsonValue, WardenError> {
    if !path.exists() {
        return Ok(json!({}));
    }
    let raw = fs::read_to_string(path).map_err(WardenError::IoError)?;
    serde_json::from_str(&raw)
        .map_err(|e| WardenError::SettingsError(format!("{}: {e}", path.display())))
}

fn save_settings(path: &Path, settings: &JsonValue) -> Result<(), WardenError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(WardenError::IoError)?;
    }
    // Temp file + rename so the host never reads a half-written settings
    // file.
    let tmp = path.with_extension("json.tmp");
    let body = format!("{:#}\n", settings);
    fs::write(&tmp, body).map_err(WardenError::IoError)?;
    fs::rename(&tmp, path).map_err(WardenError::IoError)?;
    Ok(())
}

pub fn run_install(
    root: &Path,
    bin: &str,
    options: &InstallOptions,
) -> Result<InstallReport, WardenError> {
    let path = options
        .settings_path
        .clone()
        .unwrap_or_else(|| root.join(SETTINGS_FILE));

    let mut settings = load_settings(&path)?;
    let before = settings.clone();
    apply_hooks(&mut settings, bin, options.remove)?;
    let changed = settings != before;

    if changed && !options.dry_run {
        save_settings(&path, &settings)?;
    }
    Ok(InstallReport { path, changed })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_adds_both_hook_events() {
        let mut settings = json!({});
        apply_hooks(&mut settings, "planwarden", false).unwrap();

        let stop = &settings["hooks"]["SubagentStop"][0]["hooks"][0];
        assert_eq!(stop["command"], "planwarden hook subagent-stop");
        let exit = &settings["hooks"]["PreToolUse"][0];
        assert_eq!(exit["matcher"], "ExitPlanMode");
        assert_eq!(exit["hooks"][0]["command"], "planwarden hook plan-exit");
    }

    #[test]
    fn reinstall_is_idempotent() {
        let mut settings = json!({});
        apply_hooks(&mut settings, "planwarden", false).unwrap();
        let once = settings.clone();
        apply_hooks(&mut settings, "planwarden", false).unwrap();
        assert_eq!(settings, once);
    }

    #[test]
    fn remove_strips_only_managed_entries() {
        let mut settings = json!({
            "hooks": {
                "PreToolUse": [{
                    "matcher": "Bash",
                    "hooks": [{ "type": "command", "command": "lint-check" }]
                }]
            }
        });
        apply_hooks(&mut settings, "planwarden", false).unwrap();
        apply_hooks(&mut settings, "planwarden", true).unwrap();

        let pre = settings["hooks"]["PreToolUse"].as_array().unwrap();
        assert_eq!(pre.len(), 1);
        assert_eq!(pre[0]["matcher"], "Bash");
        assert!(
            settings["hooks"]["SubagentStop"]
                .as_array()
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn non_object_settings_root_is_a_hard_error() {
        let mut settings = json!([1, 2, 3]);
        assert!(apply_hooks(&mut settings, "planwarden", false).is_err());
    }

    #[test]
    fn run_install_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let options = InstallOptions::default();
        let report = run_install(tmp.path(), "planwarden", &options).unwrap();
        assert!(report.changed);
        assert!(report.path.exists());

        // Second run changes nothing.
        let report = run_install(tmp.path(), "planwarden", &options).unwrap();
        assert!(!report.changed);

        let remove = InstallOptions {
            remove: true,
            ..Default::default()
        };
        let report = run_install(tmp.path(), "planwarden", &remove).unwrap();
        assert!(report.changed);
        let raw = fs::read_to_string(&report.path).unwrap();
        assert!(!raw.contains(HOOK_MARKER));
    }

    #[test]
    fn dry_run_never_writes() {
        let tmp = tempfile::tempdir().unwrap();
        let options = InstallOptions {
            dry_run: true,
            ..Default::default()
        };
        let report = run_install(tmp.path(), "planwarden", &options).unwrap();
        assert!(report.changed);
        assert!(!report.path.exists());
    }

    #[test]
    fn corrupt_settings_file_is_a_hard_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, "{oops").unwrap();
        let options = InstallOptions {
            settings_path: Some(path),
            ..Default::default()
        };
        match run_install(tmp.path(), "planwarden", &options) {
            Err(WardenError::SettingsError(_)) => {}
            other => panic!("expected settings error, got {other:?}"),
        }
    }
}
