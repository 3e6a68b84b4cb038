//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the interrupt handler, then
//! plans, authorizes and executes the move.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

use smartmv::cli::Args;
use smartmv::config::{self, xml};
use smartmv::output as out;
use smartmv::safety::{exceeds_threshold, render_summary};
use smartmv::{
    aggregate, fs_planner, load_config, shutdown, Config, Executor, FsProbe, GateOptions,
    GitCli, GitMover, Outcome, PlainMover, RepoResolver, SafetyGate, SmartmvError,
    TerminalConfirm, TrackingOracle,
};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    if args.print_config {
        print_config();
        return Ok(());
    }

    let mut cfg = load_config()?;
    args.apply_overrides(&mut cfg);

    let guard = init_tracing(cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;

    // Guard must be dropped on exit paths (including the interrupt handler) to flush logs.
    let guard_slot = Arc::new(Mutex::new(guard));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            if shutdown::is_prompting() {
                println!();
                out::print_error(&SmartmvError::UserAborted.to_string());
                if let Ok(mut g) = guard_slot.lock() {
                    let _ = g.take();
                }
                std::process::exit(SmartmvError::UserAborted.code());
            }
            shutdown::request();
            out::print_warn("Received interrupt; stopping before the next group...");
        })
        .context("install interrupt handler")?;
    }

    debug!(?args, "starting smartmv");
    let result = move_paths(&args, &cfg);
    if let Err(e) = &result {
        log_failure(e);
    }

    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }
    result
}

fn print_config() {
    match std::env::var_os(config::CONFIG_ENV) {
        Some(p) => out::print_info(&format!(
            "Using {} (explicit):\n  {}",
            config::CONFIG_ENV,
            Path::new(&p).display()
        )),
        None => match config::default_config_path() {
            Some(p) => {
                out::print_info(&format!("Default smartmv config path:\n  {}", p.display()));
                if !p.exists() {
                    out::print_info("No config file exists there yet. Example:");
                    out::print_user(&xml::template());
                }
            }
            None => out::print_error("Could not determine a default config path"),
        },
    }
}

fn log_failure(err: &anyhow::Error) {
    match err.downcast_ref::<SmartmvError>() {
        Some(e) => error!(code = e.code(), kind = e.kind(), "{e}"),
        None => error!(error = ?err, "smartmv failed"),
    }
}

/// Plan, authorize and execute one invocation.
fn move_paths(args: &Args, cfg: &Config) -> Result<()> {
    let (sources, destination) = args.split_sources()?;
    let cwd = std::env::current_dir().context("determine working directory")?;

    let git = GitCli::from_config(cfg);
    let tracking = cfg
        .require_tracked
        .then(|| Box::new(git.clone()) as Box<dyn TrackingOracle>);
    let mut planner = fs_planner(RepoResolver::with_probe(FsProbe, cwd.clone()), tracking);
    let plan = planner.plan(sources, destination)?;

    if plan.has_version_controlled() && !git.is_available() {
        return Err(SmartmvError::ToolNotFound(git.binary().to_path_buf()).into());
    }

    let total = plan.total_sources();
    let options = GateOptions {
        warn_threshold: cfg.warn_threshold,
        force: cfg.force,
        non_interactive: cfg.dry_run
            || cfg.assume_yes
            || (!cfg.interactive && !exceeds_threshold(total, cfg.warn_threshold)),
    };
    let mut confirm = TerminalConfirm;
    let auth = SafetyGate::new(&mut confirm).authorize(&plan, total, &options);
    // an interactive summary already showed them
    if options.non_interactive {
        for w in &auth.warnings {
            out::print_warn(w);
        }
    }
    if let Outcome::Abort(e) = auth.outcome {
        return Err(e.into());
    }

    let vcs = GitMover::new(git, cwd).verbose(cfg.verbose);
    let plain = PlainMover::new(cfg.preserve_metadata).verbose(cfg.verbose);
    let executor = Executor::new(&vcs, &plain)
        .overwrite(cfg.force)
        .verbose(cfg.verbose);

    if cfg.dry_run {
        out::print_user(&render_summary(&plan, &[]));
        for line in executor.describe(&plan) {
            out::print_run(&line);
        }
        return Ok(());
    }

    let results = executor.execute(&plan);
    for r in results.iter().filter(|r| !r.succeeded()) {
        // interruptions are reported once, by the caller
        if let Some(e @ SmartmvError::ExternalCommandFailure { .. }) = &r.error {
            out::print_error(&e.to_string());
        }
        if !r.moved.is_empty() {
            out::print_info(&format!("group {}: {} of {} item(s) moved", r.index, r.moved.len(), r.sources.len()));
        }
    }
    let moved: usize = results.iter().map(|r| r.moved.len()).sum();
    info!(groups = results.len(), moved, "done");
    aggregate(results)?;
    if cfg.verbose {
        out::print_success(&format!("moved {moved} item(s)"));
    }
    Ok(())
}
