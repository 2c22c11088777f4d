//! Phase completion contracts.
//!
//! Each gated phase binds a stopping worker to one artifact it must leave
//! behind in the session directory. The registry is an immutable table
//! handed to the verifier at construction; phases outside the table have
//! no contract and pass through.

use crate::core::hook::Verdict;
use crate::core::output;
use crate::core::session::SessionState;
use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;

/// Substitution slot in artifact-name templates for the zero-padded
/// artifact version.
pub const VERSION_SLOT: &str = "{version}";

/// Phases whose end is gated on a contract artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Explore,
    Scout,
    Validate,
}

impl Phase {
    /// Recognize a state-record phase name. `None` is pass-through, not
    /// an error: the orchestrator runs phases this engine does not gate.
    pub fn parse(name: &str) -> Option<Phase> {
        match name {
            "EXPLORE" => Some(Phase::Explore),
            "SCOUT" => Some(Phase::Scout),
            "VALIDATE" => Some(Phase::Validate),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Explore => "EXPLORE",
            Phase::Scout => "SCOUT",
            Phase::Validate => "VALIDATE",
        }
    }
}

/// Immutable phase → artifact-name template table.
pub struct ContractRegistry {
    entries: Vec<(Phase, String)>,
}

impl ContractRegistry {
    /// The standard contract table. Exactly one artifact template per
    /// gated phase.
    pub fn standard() -> Self {
        Self::new(vec![
            (Phase::Explore, "explore.md".to_string()),
            (Phase::Scout, "scout.md".to_string()),
            (Phase::Validate, "validation-v{version}.json".to_string()),
        ])
    }

    pub fn new(entries: Vec<(Phase, String)>) -> Self {
        Self { entries }
    }

    pub fn template(&self, phase: Phase) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| *p == phase)
            .map(|(_, template)| template.as_str())
    }
}

/// Coerce a version field to an integer, accepting native numbers and
/// numeric strings.
pub fn coerce_version(value: Option<&JsonValue>) -> Option<i64> {
    match value? {
        JsonValue::Number(n) => n.as_i64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Validates phase contracts against a filesystem snapshot.
pub struct ContractVerifier {
    registry: ContractRegistry,
}

impl ContractVerifier {
    pub fn new(registry: ContractRegistry) -> Self {
        Self { registry }
    }

    /// Check the session's phase contract. Total and deterministic for a
    /// given snapshot: every failure mode maps to a blocking verdict,
    /// nothing propagates past this boundary.
    pub fn verify(&self, state: &SessionState, session_dir: &Path) -> Verdict {
        let Some(phase) = Phase::parse(&state.phase) else {
            return Verdict::Allow;
        };
        let Some(template) = self.registry.template(phase) else {
            return Verdict::Allow;
        };

        let artifact = if template.contains(VERSION_SLOT) {
            // Without a usable version the expected filename cannot even
            // be computed, so this blocks rather than passes.
            match coerce_version(state.validation_version.as_ref()) {
                Some(version) if version >= 1 => {
                    template.replace(VERSION_SLOT, &format!("{version:03}"))
                }
                _ => {
                    return Verdict::Block(format!(
                        "CONTRACT UNFULFILLED: state.validation_version must be >= 1 for {}",
                        phase.name()
                    ));
                }
            }
        } else {
            template.to_string()
        };

        let path = session_dir.join(&artifact);
        match fs::metadata(&path) {
            Err(_) => {
                return Verdict::Block(format!(
                    "CONTRACT UNFULFILLED: {} must write {artifact}",
                    phase.name()
                ));
            }
            Ok(meta) if meta.len() == 0 => {
                return Verdict::Block(format!(
                    "CONTRACT UNFULFILLED: {} artifact {artifact} is empty",
                    phase.name()
                ));
            }
            Ok(_) => {}
        }

        if phase == Phase::Validate {
            let doc: JsonValue = match fs::read_to_string(&path)
                .ok()
                .and_then(|raw| serde_json::from_str(&raw).ok())
            {
                Some(doc) => doc,
                None => {
                    return Verdict::Block(format!(
                        "CONTRACT UNFULFILLED: {artifact} is not valid JSON"
                    ));
                }
            };
            if let Err(reason) = check_validation_artifact(&doc, state.draft_version.as_ref()) {
                return Verdict::Block(reason);
            }
        }

        Verdict::Allow
    }
}

/// Structural checks for the validation artifact, pure over loaded values:
/// `draft_version` must coerce to an integer on both sides and match
/// numerically, and `status` must be present.
pub fn check_validation_artifact(
    doc: &JsonValue,
    state_draft: Option<&JsonValue>,
) -> Result<(), String> {
    let file_draft = doc.get("draft_version");
    match (coerce_version(file_draft), coerce_version(state_draft)) {
        (Some(file), Some(state)) if file == state => {}
        (Some(file), Some(state)) => {
            return Err(format!(
                "CONTRACT UNFULFILLED: validation draft_version ({file}) != state ({state})"
            ));
        }
        _ => {
            return Err(format!(
                "CONTRACT UNFULFILLED: draft_version must be an integer (got {} vs {})",
                output::quote_value(file_draft),
                output::quote_value(state_draft),
            ));
        }
    }

    if doc.get("status").is_none() {
        return Err(
            "CONTRACT UNFULFILLED: validation JSON missing required field 'status'".to_string(),
        );
    }
    Ok(())
}
