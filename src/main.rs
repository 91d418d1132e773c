//! Git Trainer - Main entry point

use std::process::ExitCode;

use anyhow::{bail, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use git_trainer::catalog;
use git_trainer::cli::{Cli, Commands};
use git_trainer::config_file::TrainerConfig;
use git_trainer::runner::ScenarioRunner;
use git_trainer::sanity;
use git_trainer::vcs::GitCli;

/// Initialize tracing: warnings only unless `--verbose`, `RUST_LOG` wins.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);
    debug!("CLI arguments parsed: {:?}", cli);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("Exiting with error: {:?}", e);
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = TrainerConfig::resolve(cli.config.as_deref())?;
    let root = config.workspace_root(cli.root.as_deref())?;
    let tool = GitCli::new(config.git_binary.clone(), config.identity());

    match cli.command {
        Commands::List => {
            for scenario in catalog::all() {
                println!(
                    "{:>2}  {:<20} {:<24} {}",
                    scenario.id.number(),
                    scenario.id.to_string(),
                    scenario.target.display(),
                    scenario.title
                );
            }
        }
        Commands::Plan { scenario } => {
            println!("{}", catalog::scenario(scenario).summary());
        }
        Commands::Check => {
            let result = sanity::verify_environment(&tool, &root);
            println!("{}", result.render(tool.binary()));
            if !result.is_ok() {
                bail!("pre-flight checks failed");
            }
        }
        Commands::Setup {
            scenario,
            force,
            update,
        } => {
            let scenario = catalog::scenario(scenario);
            let runner = ScenarioRunner::new(&tool, root);
            if cli.dry_run {
                let plan = if update {
                    runner.plan_update(&scenario)?
                } else {
                    scenario.summary()
                };
                println!("{}", plan);
                return Ok(());
            }
            let report = if update {
                runner.update(&scenario)?
            } else {
                runner.run(&scenario, force)?
            };
            println!("{}", report);
        }
    }
    Ok(())
}
