mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use platforms_core::{
    PlatformResolver, Resolution, ResolveMode, TaskConfig, TaskPlatform, select_host,
};

#[derive(Parser)]
#[command(name = "platforms", about = "Resolve which execution platform runs a task")]
struct Cli {
    /// Extra registry layer, applied after the site and user layers (repeatable)
    #[arg(long = "config", global = true)]
    configs: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registry patterns, highest precedence first
    List,
    /// Resolve a task's platform and print it as JSON
    Resolve {
        /// Platform name to look up
        #[arg(long, conflicts_with = "task")]
        platform: Option<String>,
        /// Task configuration fragment (.json, otherwise TOML)
        #[arg(long)]
        task: Option<PathBuf>,
        /// Task identifier used in messages
        #[arg(long, default_value = "unknown task")]
        task_id: String,
        /// Report legacy host / batch-system settings instead of resolving them
        #[arg(long)]
        warn_only: bool,
        /// Also pick a host: "random" or "first"
        #[arg(long)]
        select_host: Option<String>,
    },
    /// Resolve a platform name and print one of its hosts
    Host {
        /// Platform name (omit for localhost)
        name: Option<String>,
        /// Host selection method: "random" or "first"
        #[arg(long)]
        method: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = config::load_registry(&cli.configs)?;
    tracing::debug!(platforms = registry.len(), "platform registry ready");
    let resolver = PlatformResolver::new(Arc::new(registry));

    match cli.command {
        Commands::List => {
            for entry in resolver.registry().by_precedence() {
                let template = entry.template();
                println!(
                    "{}\t{}\t{}",
                    entry.pattern(),
                    template.batch_system,
                    template.hosts.join(",")
                );
            }
        }
        Commands::Resolve {
            platform,
            task,
            task_id,
            warn_only,
            select_host: method,
        } => {
            let input = match (platform, task) {
                (Some(name), _) => Some(TaskPlatform::ByName(name)),
                (None, Some(path)) => Some(TaskPlatform::ByTaskFragment(read_task(&path)?)),
                (None, None) => None,
            };
            let mode = if warn_only {
                ResolveMode::WarnOnly
            } else {
                ResolveMode::Strict
            };

            match resolver.resolve(input.as_ref(), &task_id, mode)? {
                Resolution::Platform(platform) => {
                    println!("{}", serde_json::to_string_pretty(&platform)?);
                    if let Some(method) = method {
                        println!("{}", select_host(&platform, Some(method.as_str()))?);
                    }
                }
                Resolution::Deprecated(deprecations) => {
                    for d in deprecations {
                        println!("{d}");
                    }
                }
            }
        }
        Commands::Host { name, method } => {
            let platform = resolver.by_name(name.as_deref())?;
            println!("{}", select_host(&platform, method.as_deref())?);
        }
    }

    Ok(())
}

/// Read a task configuration fragment. `.json` files are JSON, anything else TOML.
fn read_task(path: &Path) -> Result<TaskConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read task config {}", path.display()))?;
    let conf = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&contents).context("failed to parse task config as JSON")?
    } else {
        toml::from_str(&contents).context("failed to parse task config as TOML")?
    };
    Ok(conf)
}
