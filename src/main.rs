use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

mod domain;
mod application;
mod infrastructure;
#[cfg(test)]
mod test_support;

use application::errors::{AppError, ManifestError};
use application::services::{Installer, Uninstaller, WorkerPool};
use domain::entities::PluginDescriptor;
use domain::traits::{DescriptorSource, ManifestStore};
use infrastructure::config::Settings;
use infrastructure::plugins::{DescriptorFile, Fetcher, RegistryDir};
use infrastructure::storage::YamlManifestStore;

#[derive(Parser)]
#[command(name = "cs2pm")]
#[command(about = "A package manager for game server plugins", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Manifest file path (default: ./cs2pm.yaml)
    #[arg(short, long, global = true)]
    manifest: Option<PathBuf>,

    /// Registry checkout (overrides CS2PM_REGISTRY_PATH)
    #[arg(short, long, global = true)]
    registry: Option<PathBuf>,

    /// Maximum plugins processed concurrently
    #[arg(short, long, global = true)]
    jobs: Option<usize>,

    /// Per-plugin download timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty manifest in the current directory
    Init,
    /// Install every plugin in the manifest, or add one from the registry
    Install {
        /// Plugin to add to the manifest (no download), or the name expected
        /// in --file
        name: Option<String>,

        /// Install straight from a descriptor file instead of the manifest
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Directory to install plugins to
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
    /// Add a plugin from the registry to the manifest
    Add {
        name: String,
    },
    /// Remove a plugin from the manifest (installed files are left alone)
    Remove {
        name: String,
    },
    /// List plugins in the manifest
    List,
    /// Remove files and directories owned by manifest plugins
    Uninstall {
        /// Only uninstall this plugin
        name: Option<String>,

        /// Directory the plugins were installed to
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
    /// Show version
    Version,
}

fn main() {
    let cli = Cli::parse();

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(log_filter(cli.verbose, &rust_log))
        .init();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(run(cli)) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

/// RUST_LOG directives win; `-v` only moves the default from INFO to DEBUG
fn log_filter(verbose: bool, rust_log: &str) -> EnvFilter {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(rust_log)
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let settings = settings_from(&cli)?;
    let store = YamlManifestStore::new(&settings.manifest_path);

    match cli.command {
        Commands::Init => {
            store.init().await?;
            tracing::info!("Created {}", store.path().display());
        }
        Commands::Install { name, file: Some(file), dir } => {
            let source = DescriptorFile::new(file);
            let descriptor = source.resolve(name.as_deref().unwrap_or_default()).await?;
            install_plugins(&settings, vec![descriptor], &dir).await?;
        }
        Commands::Install { name: Some(name), file: None, .. } | Commands::Add { name } => {
            let registry = RegistryDir::new(&settings.registry_path);
            add_plugin(&store, &registry, &name).await?;
        }
        Commands::Install { name: None, file: None, dir } => {
            let manifest = store.load().await?;
            if manifest.is_empty() {
                tracing::info!("No plugins in {}", store.path().display());
                return Ok(());
            }
            tracing::info!("Installing {} plugins into {}", manifest.len(), dir.display());
            install_plugins(&settings, manifest.plugins, &dir).await?;
        }
        Commands::Remove { name } => {
            match store.remove_plugin(&name).await? {
                0 => tracing::info!("Plugin {} was not in the manifest", name),
                _ => tracing::info!("Removed plugin {}", name),
            }
        }
        Commands::List => {
            let manifest = store.load().await?;
            for plugin in &manifest.plugins {
                println!("{}", plugin);
            }
        }
        Commands::Uninstall { name, dir } => {
            let manifest = store.load().await?;
            let plugins = match name {
                Some(name) => {
                    let plugin = manifest
                        .get(&name)
                        .cloned()
                        .ok_or(ManifestError::NotInManifest(name))?;
                    vec![plugin]
                }
                None => manifest.plugins,
            };
            uninstall_plugins(&settings, plugins, &dir).await?;
        }
        Commands::Version => {
            println!("cs2pm v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn settings_from(cli: &Cli) -> Result<Settings, AppError> {
    let mut settings = Settings::load_env()?;

    if let Some(path) = &cli.manifest {
        settings.manifest_path = path.clone();
    }
    if let Some(path) = &cli.registry {
        settings.registry_path = path.clone();
    }
    if let Some(jobs) = cli.jobs {
        settings.concurrency = jobs;
    }
    if let Some(secs) = cli.timeout {
        settings.download_timeout_secs = secs;
    }

    settings.validate()?;
    Ok(settings)
}

async fn add_plugin(store: &impl ManifestStore, source: &impl DescriptorSource, name: &str) -> Result<(), AppError> {
    let descriptor = source.resolve(name).await?;
    let name = descriptor.name.clone();
    store.add_plugin(descriptor).await?;
    tracing::info!("Added plugin {} to the manifest", name);
    Ok(())
}

/// Pool whose token is cancelled on Ctrl-C
fn worker_pool(settings: &Settings) -> WorkerPool {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling outstanding work");
            trigger.cancel();
        }
    });
    WorkerPool::new(settings.concurrency, cancel)
}

async fn install_plugins(settings: &Settings, plugins: Vec<PluginDescriptor>, dir: &Path) -> Result<(), AppError> {
    let fetcher = Fetcher::new(settings.connect_timeout())
        .map_err(|e| AppError::Task(e.into()))?;
    let installer = Installer::new(fetcher, settings.download_timeout());
    let pool = worker_pool(settings);

    installer
        .install_all(&pool, plugins, dir)
        .await
        .summarize("Install")?;
    Ok(())
}

async fn uninstall_plugins(settings: &Settings, plugins: Vec<PluginDescriptor>, dir: &Path) -> Result<(), AppError> {
    let pool = worker_pool(settings);
    let report = Uninstaller::new()
        .uninstall_all(&pool, plugins, dir)
        .await
        .summarize("Uninstall")?;

    for (name, plugin_report) in report.succeeded() {
        tracing::debug!(
            "Plugin {}: removed {} paths, {} already absent",
            name,
            plugin_report.removed.len(),
            plugin_report.missing.len()
        );
        if !plugin_report.is_clean() {
            tracing::warn!(
                "Plugin {}: {} paths could not be removed, {} skipped",
                name,
                plugin_report.failed.len(),
                plugin_report.skipped.len()
            );
        }
    }
    Ok(())
}
