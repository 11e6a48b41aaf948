//! plugin-release - Engine plugin packaging CLI
//!
//! Packages the plugin once per configured engine version:
//! - Newest engine version first
//! - Failed versions leave no output behind
//! - Everything the tool prints ends up in the log artifact

use anyhow::Context;
use clap::Parser;
use plugin_release::cli::CliArgs;
use plugin_release::config::ReleaseConfig;
use plugin_release::error::{AppError, EXIT_FATAL};
use plugin_release::orchestrator::{exit_code, Orchestrator};
use plugin_release::output::{create_formatter, OutputConfig};
use plugin_release::progress::Progress;
use plugin_release::toolchain::SystemCommandRunner;
use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Run the main logic and handle errors
    let code = match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            e.downcast_ref::<AppError>()
                .map(AppError::exit_code)
                .unwrap_or(EXIT_FATAL)
        }
    };

    if args.pause {
        pause();
    }

    ExitCode::from(code)
}

/// Main application logic
fn run(args: &CliArgs) -> anyhow::Result<u8> {
    let config = ReleaseConfig::from_cli(args).map_err(AppError::from)?;

    // Print configuration in verbose mode
    if args.verbose {
        eprintln!("plugin-release v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Repository: {}", config.paths.repo_root.display());
        eprintln!("Engines: {}", config.paths.install_root.display());
        if let Some(path) = &config.config_file {
            eprintln!("Config: {}", path.display());
        }
        if args.dry_run {
            eprintln!("Mode: dry-run");
        }
    }

    let mut output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet);
    output_config.color = io::stdout().is_terminal();
    let formatter = create_formatter(output_config);
    let log_file = config.paths.log_file.clone();
    let orchestrator = Orchestrator::new(config, SystemCommandRunner::new());

    if args.dry_run {
        let mut stdout = io::stdout().lock();
        formatter.format_plan(&orchestrator.plan(), &mut stdout)?;
        stdout.flush()?;
        return Ok(0);
    }

    let mut progress = Progress::new(args.show_progress() && io::stderr().is_terminal());
    let summary = orchestrator.run_logged(args.verbose, &mut progress)?;

    // Output results
    let mut stdout = io::stdout().lock();
    formatter
        .format(&summary, &mut stdout)
        .context("failed to write summary")?;
    stdout.flush()?;

    if !args.quiet && !args.json {
        eprintln!("Log written to {}", log_file.display());
    }

    Ok(exit_code(&summary, args.allow_failures))
}

/// Wait for Enter when attached to a terminal
fn pause() {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return;
    }
    eprint!("Press Enter to exit...");
    let _ = io::stderr().flush();
    let mut line = String::new();
    let _ = stdin.lock().read_line(&mut line);
}
