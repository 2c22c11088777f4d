//! Hook wire protocol shared by all gate surfaces.
//!
//! The host delivers one JSON request per event on stdin and consumes the
//! verdict through the process exit status: 0 allows, 2 blocks with a
//! justification on stderr. An allow-with-warning verdict additionally
//! emits a `systemMessage` object on stdout.

use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;

/// One gate request as delivered by the host on stdin.
///
/// Every field is optional and unknown fields are ignored: a broken request
/// can never represent a deliberate contract violation, so nothing here is
/// allowed to make parsing fail hard.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub project_root: Option<String>,
    #[serde(default)]
    pub repo_root: Option<String>,
    #[serde(default)]
    pub workspace_root: Option<String>,
}

impl HookRequest {
    /// Root directories to search for session state, in priority order.
    ///
    /// Hosts sometimes invoke hooks from a subdirectory of the project, so
    /// the request's own path fields come first and the process working
    /// directory is the fallback of last resort.
    pub fn root_candidates(&self) -> Vec<PathBuf> {
        let mut candidates: Vec<PathBuf> = [
            &self.cwd,
            &self.project_root,
            &self.repo_root,
            &self.workspace_root,
        ]
        .into_iter()
        .flatten()
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect();
        if let Ok(cwd) = std::env::current_dir() {
            candidates.push(cwd);
        }
        candidates
    }
}

/// Read one hook request from `input`.
///
/// Empty or malformed input yields `None`; callers treat that as allow
/// (fail-open).
pub fn read_request(input: &mut dyn Read) -> Option<HookRequest> {
    let mut raw = String::new();
    input.read_to_string(&mut raw).ok()?;
    if raw.trim().is_empty() {
        return None;
    }
    serde_json::from_str(&raw).ok()
}

/// Terminal outcome of one gate invocation. Produced fresh every time,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    AllowWithWarning(String),
    Block(String),
}

impl Verdict {
    pub fn exit_code(&self) -> i32 {
        match self {
            Verdict::Allow | Verdict::AllowWithWarning(_) => 0,
            Verdict::Block(_) => 2,
        }
    }

    /// Write the verdict on the hook protocol streams and return the exit
    /// code the process must finish with.
    pub fn emit(&self) -> i32 {
        match self {
            Verdict::Allow => {}
            Verdict::AllowWithWarning(message) => {
                println!("{}", serde_json::json!({ "systemMessage": message }));
            }
            Verdict::Block(reason) => {
                eprintln!("{reason}");
            }
        }
        self.exit_code()
    }
}
