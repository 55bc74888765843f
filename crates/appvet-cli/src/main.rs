//! appvet command-line entry point.
//!
//! Binary name: `appvet`
//!
//! Parses CLI arguments, wires the filesystem loader and the schema
//! validator into the vetting pipeline, and renders the results.
//!
//! Exit codes: 0 when every candidate is accepted, 1 when at least one
//! app is rejected, 2 when the run itself fails (unreadable store root,
//! broken schema file, bad configuration).

mod cli;

use std::process::ExitCode;

use clap::Parser;
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up tracing based on verbosity. Diagnostics go to stderr so the
    // report on stdout stays machine-readable.
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,appvet=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Shell completions need nothing else
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "appvet", &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", console::style("error:").red().bold());
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Check {
            dir,
            schema,
            config,
        } => {
            let report = cli::check::run(&dir, schema.as_deref(), config.as_deref(), cli.quiet)?;
            Ok(if report.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }

        Commands::Inspect {
            app_dir,
            schema,
            json,
        } => {
            let clean = cli::inspect::run(&app_dir, schema.as_deref(), json)?;
            Ok(if clean {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }

        Commands::Graph {
            dir,
            schema,
            config,
            all,
        } => {
            cli::graph::run(&dir, schema.as_deref(), config.as_deref(), all)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Schema => {
            cli::schema::run()?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Completions { .. } => unreachable!("handled before dispatch"),
    }
}
