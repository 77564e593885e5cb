use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docweave::ConfigLoader;

#[derive(Parser)]
#[command(name = "docweave")]
#[command(
    version,
    about = "AI-generated, role-tailored repository documentation service"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, help = "Path to config file (default: docweave.toml)")]
    config: Option<PathBuf>,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        #[arg(long, help = "Override the bind address (host:port)")]
        bind: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current effective configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show the config file path
    Path,
}

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve { bind } => {
            let mut config = ConfigLoader::load(cli.config.as_deref())?;
            if let Some(bind) = bind {
                config.server.bind = bind;
            }

            let rt = Runtime::new()?;
            rt.block_on(docweave::server::run(config))?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                let config = ConfigLoader::load(cli.config.as_deref())?;
                if format == "json" {
                    println!("{}", serde_json::to_string_pretty(&config)?);
                } else {
                    println!("{}", toml::to_string_pretty(&config)?);
                }
            }
            ConfigAction::Path => {
                let path = cli
                    .config
                    .unwrap_or_else(ConfigLoader::default_config_path);
                let exists = if path.exists() { "✓" } else { "✗" };
                println!("Config: {} {}", exists, path.display());
            }
        },
    }

    Ok(())
}
