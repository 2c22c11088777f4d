//! CLI struct definitions for the planwarden command-line interface.
//!
//! All clap-derived types live here. Dispatch logic lives in `main`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "planwarden",
    version = env!("CARGO_PKG_VERSION"),
    about = "Planwarden is the daemonless gate engine that agentic coding hosts call per event to enforce phase-output contracts and multi-round plan review before work is allowed to proceed."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a gate against a host hook request read from stdin.
    Hook(HookCli),
    /// Evaluate a gate against the current filesystem state and report the verdict.
    Check(CheckCli),
    /// Register the gate hooks in the host settings file.
    Install(InstallCli),
}

#[derive(clap::Args, Debug)]
pub struct HookCli {
    #[clap(subcommand)]
    pub command: HookCommand,
}

#[derive(Subcommand, Debug)]
pub enum HookCommand {
    /// Verify the phase-output contract when a worker phase stops.
    SubagentStop,
    /// Gate the planning-to-execution transition on review status.
    PlanExit,
}

#[derive(clap::Args, Debug)]
pub struct CheckCli {
    #[clap(subcommand)]
    pub command: CheckCommand,
}

#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Check the phase contract for a session.
    Contract {
        /// Session identifier (name of the state subdirectory).
        #[clap(long)]
        session: String,
        /// Directory to search from (defaults to the current directory).
        #[clap(long)]
        dir: Option<PathBuf>,
    },
    /// Check the plan review gate.
    Plan {
        /// Project root holding the plan directory (defaults to the current directory).
        #[clap(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
pub struct InstallCli {
    /// Show what would change without writing.
    #[clap(long)]
    pub dry_run: bool,
    /// Remove previously installed planwarden hooks instead of installing.
    #[clap(long)]
    pub remove: bool,
    /// Settings file to edit (defaults to .claude/settings.local.json).
    #[clap(long)]
    pub settings: Option<PathBuf>,
    /// Command used to invoke the hooks (defaults to this binary's path).
    #[clap(long)]
    pub bin: Option<String>,
}
