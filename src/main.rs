//! Planwarden binary entrypoint.
//!
//! Translates CLI invocations into gate verdicts and verdicts into the
//! hook wire contract: exit 0 allows, exit 2 blocks with a justification
//! on stderr. Operational faults outside the gates (a corrupt settings
//! file, an unreachable directory) exit 1.

use anyhow::{Context, Result};
use clap::Parser;
use planwarden::cli::{CheckCommand, Cli, Command, HookCommand, InstallCli};
use planwarden::core::config::GateConfig;
use planwarden::core::contract::{ContractRegistry, ContractVerifier};
use planwarden::core::hook::Verdict;
use planwarden::core::install::{self, InstallOptions};
use planwarden::core::{bypass, gate, hook, ledger, session};
use std::io;
use std::path::PathBuf;

fn main() {
    let cli = Cli::parse();
    let code = match dispatch(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("planwarden: {err:#}");
            1
        }
    };
    std::process::exit(code);
}

fn dispatch(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Hook(hook_cli) => match hook_cli.command {
            HookCommand::SubagentStop => Ok(run_subagent_stop()),
            HookCommand::PlanExit => Ok(run_plan_exit()),
        },
        Command::Check(check_cli) => run_check(check_cli.command),
        Command::Install(install_cli) => run_install(install_cli),
    }
}

fn run_subagent_stop() -> i32 {
    // Malformed or empty stdin is fail-open: a broken request can never
    // represent a deliberate contract violation.
    let Some(request) = hook::read_request(&mut io::stdin().lock()) else {
        return 0;
    };
    let verifier = ContractVerifier::new(ContractRegistry::standard());
    gate::subagent_stop_verdict(&request, &verifier).emit()
}

fn run_plan_exit() -> i32 {
    let Some(request) = hook::read_request(&mut io::stdin().lock()) else {
        return 0;
    };
    gate::plan_exit_for_request(&request).emit()
}

fn run_check(command: CheckCommand) -> Result<i32> {
    match command {
        CheckCommand::Contract { session, dir } => {
            let start = resolve_dir(dir)?;
            let Some(session_dir) = session::find_session_dir(&start, &session) else {
                println!("PASS: no session state for '{session}' (gate has no jurisdiction)");
                return Ok(0);
            };
            println!("Session: {}", session_dir.display());
            let verifier = ContractVerifier::new(ContractRegistry::standard());
            Ok(report(&gate::contract_verdict_at(&session_dir, &verifier)))
        }
        CheckCommand::Plan { dir } => {
            let root = resolve_dir(dir)?;
            let config = GateConfig::load(&root);
            let Some(path) = session::find_plan_file(&root) else {
                println!("PASS: no plan document found");
                return Ok(0);
            };
            let Some(text) = session::read_plan(&path) else {
                println!("PASS: plan at {} is unreadable or empty", path.display());
                return Ok(0);
            };
            println!("Plan: {}", path.display());
            if let Some(rationale) = bypass::evaluate(&text, &config) {
                println!("Bypass: {rationale}");
            } else {
                let review = ledger::parse_review_ledger(&text);
                println!(
                    "Reviews: {}/{} (status: {})",
                    review.review_count, config.max_review_rounds, review.status
                );
            }
            Ok(report(&gate::plan_exit_verdict(Some((&path, &text)), &config)))
        }
    }
}

fn run_install(cli: InstallCli) -> Result<i32> {
    let root = std::env::current_dir().context("resolve current directory")?;
    let bin = match cli.bin {
        Some(bin) => bin,
        None => std::env::current_exe()
            .ok()
            .and_then(|p| p.to_str().map(String::from))
            .unwrap_or_else(|| "planwarden".to_string()),
    };
    let options = InstallOptions {
        dry_run: cli.dry_run,
        remove: cli.remove,
        settings_path: cli.settings,
    };
    let report = install::run_install(&root, &bin, &options)?;

    let path = report.path.display();
    match (cli.dry_run, cli.remove, report.changed) {
        (_, _, false) => println!("Nothing to change in {path}"),
        (true, false, true) => println!("dry-run: would install hooks into {path}"),
        (true, true, true) => println!("dry-run: would remove hooks from {path}"),
        (false, false, true) => println!("Hooks installed into {path}"),
        (false, true, true) => println!("Hooks removed from {path}"),
    }
    Ok(0)
}

fn resolve_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir),
        None => std::env::current_dir().context("resolve current directory"),
    }
}

fn report(verdict: &Verdict) -> i32 {
    match verdict {
        Verdict::Allow => println!("PASS"),
        Verdict::AllowWithWarning(message) => println!("PASS (warning: {message})"),
        Verdict::Block(message) => println!("BLOCK: {message}"),
    }
    verdict.exit_code()
}
