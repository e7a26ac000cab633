//! Command dispatch: maps parsed arguments onto services.

use std::io;
use std::path::Path;

use clap::CommandFactory;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::render::TreeNodeConvert;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings, LOCAL_CONFIG_FILE};
use crate::domain::LayoutKind;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::{server, InfraError};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    // needs no settings
    if let Some(Commands::Completion { shell }) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(cli.config.as_deref())?;
    let container = ServiceContainer::new(settings);
    run_command(cli, &container)
}

/// Dispatch `cli` against an already wired container.
pub fn run_command(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Serve { csv, host, port }) => {
            _serve(container, csv.as_deref(), host.as_deref(), *port)
        }
        Some(Commands::Dendrogram { csv, output, open }) => {
            _dendrogram(container, csv.as_deref(), output.as_deref(), *open)
        }
        Some(Commands::Sunburst { csv, output }) => {
            _sunburst(container, csv.as_deref(), output.as_deref())
        }
        Some(Commands::Tree { csv }) => _tree(container, csv.as_deref()),
        Some(Commands::Layout { csv }) => _layout(container, csv.as_deref()),
        Some(Commands::Config { command }) => _config(container, cli, command),
        Some(Commands::Completion { .. }) => Ok(()),
        None => Err(CliError::Usage(
            "no command given, see `organigram --help`".to_string(),
        )),
    }
}

#[instrument(skip(container))]
fn _serve(
    container: &ServiceContainer,
    csv: Option<&Path>,
    host: Option<&str>,
    port: Option<u16>,
) -> CliResult<()> {
    let service = container.organigram.clone();
    let input = service.input_path(csv);
    // fail before binding, like a missing file at startup
    service.ensure_input(&input)?;

    let host = host.unwrap_or(&container.settings.server.host);
    let port = port.unwrap_or(container.settings.server.port);
    output::action("Serving", &format!("{} on http://{}:{}", input.display(), host, port));
    server::serve(service, input, host, port)?;
    Ok(())
}

#[instrument(skip(container))]
fn _dendrogram(
    container: &ServiceContainer,
    csv: Option<&Path>,
    out: Option<&Path>,
    open: bool,
) -> CliResult<()> {
    let service = &container.organigram;
    let input = service.input_path(csv);
    let out = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| container.settings.render.output.clone());
    debug!("input: {}, output: {}", input.display(), out.display());

    service.write_dendrogram(&input, &out)?;
    output::success(&format!("wrote {}", out.display()));

    if open {
        container
            .viewer
            .open(&out)
            .map_err(|e| InfraError::Viewer {
                message: format!("{}: {}", out.display(), e),
            })?;
    }
    Ok(())
}

#[instrument(skip(container))]
fn _sunburst(container: &ServiceContainer, csv: Option<&Path>, out: Option<&Path>) -> CliResult<()> {
    let service = &container.organigram;
    let input = service.input_path(csv);
    match out {
        Some(out) => {
            service.write_sunburst_page(&input, out)?;
            output::success(&format!("wrote {}", out.display()));
        }
        None => output::info(&service.sunburst_page(&input)?),
    }
    Ok(())
}

#[instrument(skip(container))]
fn _tree(container: &ServiceContainer, csv: Option<&Path>) -> CliResult<()> {
    let service = &container.organigram;
    let hierarchy = service.build(&service.input_path(csv))?;
    output::info(&hierarchy.to_tree_string());
    let tree = hierarchy.tree();
    output::detail(&format!(
        "{} nodes, {} levels, {} without reports",
        tree.len(),
        tree.depth(),
        tree.leaf_nodes().len()
    ));
    if hierarchy.is_synthetic_root() {
        output::detail(&format!(
            "top level joined under {}: {}",
            hierarchy.root_name(),
            hierarchy.top_level().join(", ")
        ));
    }
    if hierarchy.used_fallback() {
        output::warning(&format!(
            "no top-level person found, {} chosen as root",
            hierarchy.root_name()
        ));
    }
    Ok(())
}

#[instrument(skip(container))]
fn _layout(container: &ServiceContainer, csv: Option<&Path>) -> CliResult<()> {
    let service = &container.organigram;
    let (_, layout) = service.layout(&service.input_path(csv))?;
    if layout.kind == LayoutKind::ForceDirected {
        output::warning("tree has no edges, force-directed layout used");
    }
    for (depth, nodes) in &layout.positions.iter().chunk_by(|p| p.depth) {
        output::header(&format!("level {depth}"));
        for p in nodes {
            output::detail(&format!("{:>8.3} {:>8.3}  {}", p.x, p.y, p.name));
        }
    }
    Ok(())
}

fn _config(container: &ServiceContainer, cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(p) => output::detail(&format!("global: {}", p.display())),
                None => output::detail("global: <unavailable>"),
            }
            let local = cli
                .config
                .clone()
                .unwrap_or_else(|| LOCAL_CONFIG_FILE.into());
            output::detail(&format!("local:  {}", local.display()));
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                LOCAL_CONFIG_FILE.into()
            };
            if container.fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            container
                .fs
                .ensure_parent(&path)
                .and_then(|_| container.fs.write(&path, &Settings::template()))
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
    }
}
