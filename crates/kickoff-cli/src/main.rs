mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kickoff_core::KickoffConfig;

#[derive(Parser)]
#[command(name = "kickoff", about = "Queue staged articles for processing on Cloud Run")]
#[command(version)]
struct Cli {
    /// Directory containing kickoff.toml
    #[arg(long, global = true, default_value = ".")]
    project_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP trigger service on 0.0.0.0:$PORT
    Serve,
    /// Run one trigger pass and print the result as JSON
    Trigger,
    /// Print the container Dockerfile
    Dockerfile,
    /// Write the container Dockerfile to disk for manual customization
    Eject {
        /// Target directory (defaults to the project directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                // arch-lint: allow(no-silent-result-drop) reason="an unset or unparsable RUST_LOG falls back to the info filter"
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = KickoffConfig::from_env(&cli.project_dir)?;

    // The server gets one runtime thread per configured worker; one-shot
    // commands run on the current thread.
    let runtime = match cli.command {
        Commands::Serve => tokio::runtime::Builder::new_multi_thread()
            .worker_threads(config.server.workers)
            .enable_all()
            .build()?,
        _ => tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?,
    };

    runtime.block_on(async move {
        match cli.command {
            Commands::Serve => commands::serve(&config).await,
            Commands::Trigger => commands::trigger(&config).await,
            Commands::Dockerfile => commands::dockerfile(&config).await,
            Commands::Eject { dir } => {
                let dir = match dir {
                    Some(dir) => dir,
                    None => cli.project_dir.clone(),
                };
                commands::eject(&config, &dir).await
            }
        }
    })
}
