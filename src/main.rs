use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use colored::Colorize;
use dirsnap::cli::{Cli, Commands};
use dirsnap::output::{self, Verbosity};
use dirsnap::{DirsnapContext, commands, logging};
use std::io;
use std::process;

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        output::warning(&format!("Warning: {e}"));
    }

    if cli.quiet {
        output::set_verbosity(Verbosity::Quiet);
    } else if cli.verbose {
        output::set_verbosity(Verbosity::Verbose);
    }

    match cli.command {
        // Completions need no configuration
        Commands::Completion { shell } => {
            print_completions(shell, &mut Cli::command());
            Ok(())
        }
        command => {
            let ctx = match cli.config {
                Some(path) => DirsnapContext::with_config_path(path)?,
                None => DirsnapContext::new()?,
            };
            dispatch(&ctx, command)
        }
    }
}

fn dispatch(ctx: &DirsnapContext, command: Commands) -> Result<()> {
    match command {
        Commands::List { dir } => commands::list::execute(ctx, &dir),
        Commands::Watch {
            dir,
            interval,
            count,
        } => commands::watch::execute(ctx, &dir, interval, count),
        Commands::Config => commands::config::execute(ctx),
        Commands::Completion { shell } => {
            print_completions(shell, &mut Cli::command());
            Ok(())
        }
    }
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}
