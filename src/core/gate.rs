//! Gate decisions composed from session state, contracts, and review
//! policy.
//!
//! Two independent decision paths live here: the phase-stop contract gate
//! and the plan-exit review gate. They share only the session repository
//! and the verdict convention. Each invocation computes its verdict fresh
//! from the filesystem snapshot; the engine persists nothing, so running
//! a gate twice against an unchanged snapshot yields the same verdict.

use crate::core::bypass;
use crate::core::config::GateConfig;
use crate::core::contract::ContractVerifier;
use crate::core::hook::{HookRequest, Verdict};
use crate::core::ledger;
use crate::core::session;
use std::path::{Path, PathBuf};

/// Tool name whose invocation marks the planning → execution transition.
pub const PLAN_EXIT_TOOL: &str = "ExitPlanMode";

/// Phase-stop gate: hold a stopping worker to its phase contract.
///
/// Missing session context at any step is a jurisdiction miss, not a
/// failure; only a located session with a readable contract problem
/// blocks.
pub fn subagent_stop_verdict(request: &HookRequest, verifier: &ContractVerifier) -> Verdict {
    let Some(session_id) = request.session_id.as_deref().filter(|id| !id.is_empty()) else {
        return Verdict::Allow;
    };
    let Some(session_dir) = session::locate_session(&request.root_candidates(), session_id) else {
        return Verdict::Allow;
    };
    contract_verdict_at(&session_dir, verifier)
}

/// Contract verdict for a located session directory. A state record that
/// exists but cannot be parsed blocks; a record that was never written
/// never reaches here.
pub fn contract_verdict_at(session_dir: &Path, verifier: &ContractVerifier) -> Verdict {
    match session::load_state(session_dir) {
        Ok(state) => verifier.verify(&state, session_dir),
        Err(err) => Verdict::Block(format!("CONTRACT UNFULFILLED: invalid state record ({err})")),
    }
}

/// Plan-exit gate entry point for a host hook request.
pub fn plan_exit_for_request(request: &HookRequest) -> Verdict {
    if request.tool_name.as_deref() != Some(PLAN_EXIT_TOOL) {
        return Verdict::Allow;
    }
    let root = request
        .cwd
        .as_deref()
        .filter(|cwd| !cwd.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::current_dir().ok());
    let Some(root) = root else {
        return Verdict::Allow;
    };
    let config = GateConfig::load(&root);
    let Some(path) = session::find_plan_file(&root) else {
        return Verdict::Allow;
    };
    let Some(text) = session::read_plan(&path) else {
        return Verdict::Allow;
    };
    plan_exit_verdict(Some((&path, &text)), &config)
}

/// Plan-exit review state machine over one document snapshot.
///
/// In order: no plan context passes; a bypass waiver passes; recorded
/// approval passes; exhausted review rounds pass with a warning; anything
/// else blocks with the next round number and the review procedure.
pub fn plan_exit_verdict(plan: Option<(&Path, &str)>, config: &GateConfig) -> Verdict {
    let Some((path, text)) = plan else {
        return Verdict::Allow;
    };

    if bypass::evaluate(text, config).is_some() {
        return Verdict::Allow;
    }

    let review = ledger::parse_review_ledger(text);
    if review.approved {
        return Verdict::Allow;
    }
    if review.review_count >= config.max_review_rounds {
        return Verdict::AllowWithWarning(format!(
            "Plan proceeding after {} review rounds without full consensus.",
            review.review_count
        ));
    }

    Verdict::Block(render_review_instructions(path, review.review_count, config))
}

/// Blocking message for a pending review: names the plan, the next round,
/// the multi-round procedure, and both bypass escape hatches.
fn render_review_instructions(plan_path: &Path, review_count: u32, config: &GateConfig) -> String {
    let next_round = review_count + 1;
    let max = config.max_review_rounds;
    format!(
        "\
BLOCKED: plan requires review before execution.

Plan file: {path}
Review round: {next_round}/{max}

## Multi-round review procedure

### Round 1: independent review (parallel)
Spawn TWO review agents in parallel and keep their agent ids for round 2.
1. Architecture reviewer: give it the full plan content. It challenges
   design decisions and returns findings ranked HIGH/MEDIUM/LOW with a
   verdict.
2. Simplification reviewer: give it the full plan content. It hunts for
   over-engineering and unnecessary complexity and proposes simpler
   alternatives.

### Round 2: cross-review debate (parallel)
Resume each round 1 agent with the OTHER agent's findings. Each must
AGREE, DISAGREE, or ADD NUANCE to every point, note anything it now
reconsiders, and state a final position.

### Round 3: consensus (you synthesize)
Address every aligned HIGH-severity finding, make documented judgment
calls on disputed ones, skip withdrawn ones, then append the ledger to
the plan:

## Plan Review Status
Reviews: {next_round}/{max}
Status: APPROVED

Then retry the plan exit.

Bypass options:
- add {marker} to the plan for trivial changes
- plans under {min_lines} lines skip review automatically",
        path = plan_path.display(),
        marker = config.bypass_marker,
        min_lines = config.min_lines_for_review,
    )
}
