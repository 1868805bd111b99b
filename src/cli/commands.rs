//! Command dispatch

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{Outcome, TreeSession};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::ops::TreeOp;
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::tree_traits::{render_forest, render_rows};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Show) => _show(&container(cli)?),
        Some(Commands::Flat) => _flat(&container(cli)?),
        Some(Commands::Run { ops, flat }) => _run(&container(cli)?, ops, *flat),
        Some(Commands::Config { command }) => _config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => _show(&container(cli)?),
    }
}

/// Settings from config layers, with `--seed` taking precedence.
fn container(cli: &Cli) -> CliResult<ServiceContainer> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(seed) = &cli.seed {
        settings.seed_path = Some(seed.clone());
    }
    debug!(?settings, "effective settings");
    Ok(ServiceContainer::new(settings))
}

#[instrument(skip(container))]
fn _show(container: &ServiceContainer) -> CliResult<()> {
    let session = container.session()?;
    output::info(&render_forest(session.current_tree()));
    Ok(())
}

#[instrument(skip(container))]
fn _flat(container: &ServiceContainer) -> CliResult<()> {
    let session = container.session()?;
    output::info(&render_rows(&session.flat_nodes()));
    Ok(())
}

#[instrument(skip(container))]
fn _run(container: &ServiceContainer, ops: &[String], flat: bool) -> CliResult<()> {
    // parse everything first: a typo must not leave a half-applied script
    let ops = ops
        .iter()
        .map(|op| op.parse::<TreeOp>().map_err(CliError::InvalidArgs))
        .collect::<CliResult<Vec<_>>>()?;

    let mut session = container.session()?;
    output::header("Operations");
    for op in &ops {
        report(op, op.apply(&mut session));
    }

    output::header("Result");
    print_session(&session, flat);
    Ok(())
}

fn report(op: &TreeOp, outcome: Outcome) {
    match outcome {
        Outcome::Applied => output::success_detail(op),
        Outcome::Inserted(id) => output::success_detail(&format!("{op} (new node {id})")),
        Outcome::Rejected(reason) => output::skipped_detail(&format!("{op}: ignored, {reason}")),
    }
}

fn print_session(session: &TreeSession, flat: bool) {
    if flat {
        output::info(&render_rows(&session.flat_nodes()));
    } else {
        output::info(&render_forest(session.current_tree()));
    }
}

#[instrument(skip(cli))]
fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(cli.config.as_deref())?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Init => {
            let path = global_config_path().ok_or_else(|| {
                CliError::Usage("cannot determine global config directory".to_string())
            })?;
            let container = ServiceContainer::new(Settings::default());
            if container.fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent() {
                container
                    .fs
                    .create_dir_all(parent)
                    .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
            }
            container
                .fs
                .write(&path, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Created", &path.display());
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::action("global", &"<unavailable>"),
            }
            if let Some(local) = &cli.config {
                output::action("local", &local.display());
            }
        }
    }
    Ok(())
}
