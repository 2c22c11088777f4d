//! Planwarden: gate enforcement for agentic coding sessions.
//!
//! **Planwarden is a daemonless gate engine the host calls per event.**
//!
//! Before a worker phase is allowed to stop, or before a proposed plan is
//! allowed to move from planning to execution, the engine inspects
//! persisted session state and on-disk artifacts and answers with an
//! allow/block decision and a justification. It owns no state of its own:
//! every invocation is a pure read-and-decide pass over files written by
//! the orchestrator and the reviewing agents.
//!
//! # Core Principles
//!
//! - **Read-only**: the engine never creates, mutates, or deletes session
//!   state, artifacts, or plans
//! - **Deterministic**: the same filesystem snapshot always produces the
//!   same verdict
//! - **Fail predictably**: a broken request passes (the host produced it),
//!   a corrupt state record blocks (the orchestrator produced it)
//! - **No jurisdiction, no opinion**: missing session or plan context is a
//!   pass-through, never an error
//!
//! # Gates
//!
//! - *Phase-stop contract gate*: each gated phase must leave its required
//!   artifact behind (`EXPLORE` → `explore.md`, `SCOUT` → `scout.md`,
//!   `VALIDATE` → `validation-vNNN.json` structurally consistent with the
//!   session's draft version).
//! - *Plan-exit review gate*: a plan may execute once its review ledger
//!   records approval, its review rounds are exhausted (flagged with a
//!   warning), or a bypass applies (inline marker, or a plan below the
//!   size threshold).
//!
//! # Wire Contract
//!
//! One JSON request per event on stdin; exit 0 allows (optionally with a
//! `systemMessage` object on stdout), exit 2 blocks with a justification
//! on stderr.
//!
//! ```bash
//! # Register the hooks with the host
//! planwarden install
//!
//! # Dry-run a gate against the current filesystem state
//! planwarden check plan
//! planwarden check contract --session 7f2a9c
//! ```

pub mod cli;
pub mod core;
