use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::Input;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use reposnap::config::DEFAULT_BRANCH;
use reposnap::{Config, RepoCoordinates, UpdateOutcome, Updater};

#[derive(Parser)]
#[command(name = "reposnap")]
#[command(about = "Keep a directory in sync with the latest snapshot of a GitHub branch")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path (defaults to XDG config location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory to keep in sync (defaults to the current directory)
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,

    /// GitHub username or organization
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// GitHub repository name
    #[arg(short, long, global = true)]
    repo: Option<String>,

    /// Branch to track
    #[arg(short, long, global = true)]
    branch: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace local files with the latest branch snapshot if it changed (default)
    Update,

    /// Report whether a newer snapshot is available without changing anything
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.clone())?;
    init_logging(cli.verbose, &config)?;
    info!("Starting reposnap v{}", env!("CARGO_PKG_VERSION"));

    let root = match &cli.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    let coords = resolve_coordinates(&cli, &config)?;

    match cli.command.unwrap_or(Commands::Update) {
        Commands::Update => cmd_update(&config, root, coords).await,
        Commands::Check => cmd_check(&config, root, coords).await,
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: bool, config: &Config) -> Result<()> {
    let env_directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(verbose, env_directives.as_deref(), &config.logging.level);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

/// RUST_LOG wins over the configured level; --verbose raises either to debug
fn log_filter(verbose: bool, env_directives: Option<&str>, default_level: &str) -> EnvFilter {
    let filter = EnvFilter::new(env_directives.unwrap_or(default_level));
    if verbose {
        filter.add_directive(LevelFilter::DEBUG.into())
    } else {
        filter
    }
}

/// Load configuration from specified path or default location
fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load(&path),
        None => Config::load_or_default(),
    }
}

/// Take coordinates from flags, then the config file, and prompt for the rest
fn resolve_coordinates(cli: &Cli, config: &Config) -> Result<RepoCoordinates> {
    let owner = match cli.user.clone().or_else(|| config.repository.owner.clone()) {
        Some(owner) => owner,
        None => Input::new()
            .with_prompt("Enter GitHub username")
            .interact_text()
            .context("failed to read GitHub username")?,
    };

    let repo = match cli.repo.clone().or_else(|| config.repository.name.clone()) {
        Some(repo) => repo,
        None => Input::new()
            .with_prompt("Enter GitHub repository name")
            .interact_text()
            .context("failed to read repository name")?,
    };

    let branch = match cli.branch.clone().or_else(|| config.repository.branch.clone()) {
        Some(branch) => branch,
        None => Input::new()
            .with_prompt("Enter branch name")
            .default(DEFAULT_BRANCH.to_string())
            .interact_text()
            .context("failed to read branch name")?,
    };

    Ok(RepoCoordinates::new(owner, repo, Some(branch)))
}

/// Check for a new snapshot and apply it
async fn cmd_update(config: &Config, root: PathBuf, coords: RepoCoordinates) -> Result<()> {
    let mut updater = Updater::new(config, &root, coords)?;

    let outcome = updater
        .run()
        .await
        .with_context(|| format!("Error occurred while updating {}", root.display()))?;

    match outcome {
        UpdateOutcome::UpToDate { version } => {
            println!("✅ Already up to date!");
            println!("   Version: {}", version);
        }
        UpdateOutcome::Updated {
            previous,
            current,
            removed,
            installed,
            duration,
        } => {
            println!("🎉 Update complete!");
            println!(
                "   🔄 {} -> {}",
                previous.as_deref().unwrap_or("unknown"),
                current
            );
            println!("   🗑️  Removed files: {}", removed);
            println!("   📥 Installed files: {}", installed.files_written);
            println!("   📁 Created folders: {}", installed.directories_created);
            println!("   ⏱️  Duration: {:.2}s", duration.as_secs_f64());
        }
    }

    Ok(())
}

/// Report whether the local marker matches the branch head
async fn cmd_check(config: &Config, root: PathBuf, coords: RepoCoordinates) -> Result<()> {
    let mut updater = Updater::new(config, &root, coords)?;

    let check = updater
        .check()
        .await
        .with_context(|| format!("Error occurred while checking {}", updater.coordinates()))?;

    println!("📊 {}", updater.coordinates());
    println!(
        "   Local version: {}",
        check.current.as_deref().unwrap_or("unknown")
    );
    println!("   Remote version: {}", check.latest);

    if check.is_up_to_date() {
        println!("   ✅ Already up to date!");
    } else {
        println!("   📥 New version available! Run 'reposnap update' to apply it");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_uses_configured_level() {
        let filter = log_filter(false, None, "warn");
        assert!(filter.to_string().contains("warn"));
    }

    #[test]
    fn test_log_filter_env_overrides_config() {
        let filter = log_filter(false, Some("error"), "info");
        let directives = filter.to_string();
        assert!(directives.contains("error"));
        assert!(!directives.contains("info"));
    }

    #[test]
    fn test_verbose_raises_env_level() {
        let filter = log_filter(true, Some("warn"), "info");
        assert!(filter.to_string().contains("debug"));
    }

    #[test]
    fn test_options_accepted_after_subcommand() {
        let cli = Cli::try_parse_from([
            "reposnap", "check", "--user", "octocat", "--repo", "tool", "-b", "dev", "-v",
        ])
        .expect("options after the subcommand should parse");

        assert!(matches!(cli.command, Some(Commands::Check)));
        assert_eq!(cli.user.as_deref(), Some("octocat"));
        assert_eq!(cli.repo.as_deref(), Some("tool"));
        assert_eq!(cli.branch.as_deref(), Some("dev"));
        assert!(cli.verbose);
    }
}
