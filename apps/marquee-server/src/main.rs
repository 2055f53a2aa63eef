use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use marquee_bootstrap::{AppConfig, CliOverrides, init_logging, shutdown_on_signal};
use marquee_server::runner::{self, Role};
use mimalloc::MiMalloc;
use tokio_util::sync::CancellationToken;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Marquee Server - movie, metadata and rating services with discovery
#[derive(Parser)]
#[command(name = "marquee-server")]
#[command(about = "Marquee Server - movie, metadata and rating services with discovery")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for the started service (the movie service with `all`)
    #[arg(short, long)]
    port: Option<u16>,

    /// Address of a remote registry service (selects the remote backend)
    #[arg(long, value_name = "HOST:PORT")]
    registry: Option<String>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the registry service
    Registry,
    /// Run the metadata service
    Metadata,
    /// Run the rating service
    Rating,
    /// Run the movie service
    Movie,
    /// Run every service in one process (default)
    All,
    /// Apply a JSON array of rating events through the rating service
    Ingest {
        /// File holding the events
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Validate configuration and exit
    Check,
}

impl Commands {
    fn port_target(&self) -> Option<Role> {
        match self {
            Self::Registry => Some(Role::Registry),
            Self::Metadata => Some(Role::Metadata),
            Self::Rating => Some(Role::Rating),
            Self::Movie | Self::All => Some(Role::Movie),
            Self::Ingest { .. } | Self::Check => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::All);

    // defaults -> YAML (if provided) -> env (MARQUEE__*) -> CLI overrides
    let mut config = AppConfig::load_layered(cli.config.as_deref())?;
    config.apply_cli_overrides(&CliOverrides {
        verbose: cli.verbose,
        registry_address: cli.registry,
    });
    if let (Some(port), Some(role)) = (cli.port, command.port_target()) {
        role.set_port(&mut config, port);
    }
    config.validate()?;

    init_logging(&config.logging);

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_yaml()?);
        return Ok(());
    }

    match command {
        Commands::Check => check_config(&config),
        Commands::Ingest { file } => {
            let applied = marquee_server::ingest::ingest_file(&config, &file).await?;
            println!("Applied {applied} rating events");
            Ok(())
        }
        Commands::All => serve(runner::start_all(&config).await?).await,
        Commands::Registry => serve(runner::start_single(Role::Registry, &config).await?).await,
        Commands::Metadata => serve(runner::start_single(Role::Metadata, &config).await?).await,
        Commands::Rating => serve(runner::start_single(Role::Rating, &config).await?).await,
        Commands::Movie => serve(runner::start_single(Role::Movie, &config).await?).await,
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn serve(deployment: runner::Deployment) -> Result<()> {
    for service in deployment.services() {
        tracing::info!(service = service.name(), addr = %service.local_addr(), "service ready");
    }
    let shutdown = CancellationToken::new();
    shutdown_on_signal(shutdown.clone());
    deployment.run_until(&shutdown).await?;
    tracing::info!("Marquee Server stopped");
    Ok(())
}
