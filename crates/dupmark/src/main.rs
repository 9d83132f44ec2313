//! dupmark CLI
#![deny(unsafe_code)]

use std::path::Path;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Parser;
use dupmark::{Cli, Commands, commands};
use dupmark_core::config::{Config, ConfigLoader, ConfigSources};
use tracing::debug;

mod observability;

fn main() -> anyhow::Result<()> {
    let mut cli = Cli::parse();
    cli.color.apply();

    if cli.version_only {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    // Without --version-only, clap has already demanded a subcommand.
    let Some(command) = cli.command.take() else {
        return Ok(());
    };

    if let Some(ref dir) = cli.chdir {
        std::env::set_current_dir(dir)
            .with_context(|| format!("failed to change directory to {}", dir.display()))?;
    }
    let (config, sources) = load_config(cli.config.as_deref())?;

    let log_dir = config.log_dir.clone().map(Utf8PathBuf::into_std_path_buf);
    let _guard = observability::init_observability(
        &observability::ObservabilityConfig::from_env_with_overrides(log_dir),
        observability::env_filter(cli.quiet, cli.verbose, config.log_level.as_str()),
    )
    .context("failed to initialize logging")?;
    debug!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        json = cli.json,
        color = ?cli.color,
        config_file = ?sources.primary_file(),
        "CLI initialized"
    );

    let result = run(command, cli.json, &config, &sources);
    if let Err(ref err) = result {
        tracing::error!(error = %err, "fatal error");
    }
    result
}

fn run(
    command: Commands,
    json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    let stopwords = config.stopwords();
    let limit = config.input_limit();

    match command {
        Commands::Mark(args) => commands::mark::cmd_mark(args, json, config, &stopwords, limit),
        Commands::Ranges(args) => {
            commands::ranges::cmd_ranges(args, json, config.addressing, &stopwords, limit)
        }
        Commands::Check(args) => commands::check::cmd_check(args, json, &stopwords, limit),
        Commands::Info(args) => commands::info::cmd_info(args, json, config, sources),
        #[cfg(feature = "mcp")]
        Commands::Serve(args) => tokio::runtime::Runtime::new()
            .context("failed to create async runtime for MCP server")?
            .block_on(commands::serve::cmd_serve(args, stopwords, limit)),
    }
}

/// Discover config from the (possibly changed) working directory, plus an
/// explicit `--config` file.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<(Config, ConfigSources)> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let mut loader = ConfigLoader::new().with_project_search(utf8(cwd, "current directory")?);
    if let Some(path) = explicit {
        loader = loader.with_file(utf8(path.to_path_buf(), "config path")?);
    }
    loader.load().context("failed to load configuration")
}

fn utf8(path: std::path::PathBuf, what: &str) -> anyhow::Result<Utf8PathBuf> {
    Utf8PathBuf::try_from(path).map_err(|e| {
        anyhow::anyhow!(
            "{what} is not valid UTF-8: {}",
            e.into_path_buf().display()
        )
    })
}
