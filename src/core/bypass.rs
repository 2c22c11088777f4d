//! Review bypass policy.
//!
//! Evaluated before the ledger is ever consulted: a trivial plan should
//! not need a review ledger at all. First match wins, and every waiver
//! carries a rationale string so the decision is auditable after the
//! fact.

use crate::core::config::GateConfig;

/// Returns the waiver rationale when review is bypassed, `None` when the
/// review requirement stands.
pub fn evaluate(plan: &str, config: &GateConfig) -> Option<String> {
    if plan.contains(&config.bypass_marker) {
        return Some(format!(
            "explicit bypass marker {} present",
            config.bypass_marker
        ));
    }

    let line_count = plan.trim().lines().count();
    if line_count < config.min_lines_for_review {
        return Some(format!(
            "plan is {line_count} lines (review threshold: {})",
            config.min_lines_for_review
        ));
    }

    None
}
