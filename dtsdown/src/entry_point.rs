//! Shared entry point used by every binary front end.
//!
//! Maps CLI input onto a [`Downleveler`] run and errors onto process exit
//! codes: 2 for usage errors, 1 for an unusable source directory or a run
//! that processed nothing, 0 otherwise. No error escapes as a panic or an
//! unformatted propagated exception.

use crate::cli::Cli;
use crate::config::Config;
use crate::downlevel::Downleveler;
use crate::output;
use crate::version::TargetVersion;
use anyhow::Result;
use clap::Parser;
use colored::Colorize;

/// Runs the tool with the given command-line arguments (program name
/// excluded) and returns the process exit code.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    let cli = match Cli::try_parse_from(std::iter::once("dtsdown".to_owned()).chain(args)) {
        Ok(cli) => cli,
        Err(err) => {
            // clap renders its own message (including --help/--version).
            err.print()?;
            return Ok(if err.use_stderr() { 2 } else { 0 });
        }
    };

    if !cli.src.is_dir() {
        eprintln!(
            "{} source directory {} does not exist or is not a directory",
            "error:".red().bold(),
            cli.src.display()
        );
        return Ok(1);
    }

    let config = Config::load_from_dir(&cli.src);

    // CLI flag wins over config; both are validated strictly.
    let version_input = cli.target.clone().or_else(|| config.dtsdown.target.clone());
    let target = match version_input {
        Some(input) => match input.parse::<TargetVersion>() {
            Ok(target) => target,
            Err(err) => {
                eprintln!("{} {err}", "error:".red().bold());
                return Ok(2);
            }
        },
        None => TargetVersion::BASELINE,
    };

    let mut downleveler = Downleveler::new(target, &config, cli.exclude.clone());
    downleveler.verbose = cli.verbose;

    let summary = downleveler.run(&cli.src, &cli.target_dir)?;

    let mut stdout = std::io::stdout();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        output::print_summary(&mut stdout, &summary, cli.quiet)?;
        if cli.stats && !summary.rule_fires.is_empty() {
            output::print_stats_table(&mut stdout, &summary)?;
        }
    }

    // Nothing processed and at least one failure: the run was useless.
    if summary.files_written == 0 && !summary.errors.is_empty() {
        return Ok(1);
    }
    Ok(0)
}
