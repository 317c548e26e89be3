mod config;
mod http_server;
mod logging;
mod ports;
mod services;
mod ytmusic_rs;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::Context};

use crate::{
    config::Config,
    http_server::app::HttpServerConfig,
    logging::init_tracing,
    services::bootstrap::{INSTRUCTIONS, bootstrap},
    ytmusic_rs::SetupError,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "YTMUSIC_BRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `ytmusic_bridge=debug,tower_http=info`
    #[arg(long, global = true, env = "LOG_LEVEL")]
    log_level: Option<String>,

    /// OTLP gRPC endpoint to export traces to
    #[arg(long, global = true, env = "YTMUSIC_BRIDGE_OTLP_ENDPOINT")]
    otlp_endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert captured browser headers into a credentials file
    Setup {
        /// File containing the raw request headers
        #[arg(long, env = "YTMUSIC_BRIDGE_HEADERS_FILE")]
        headers_file: Option<PathBuf>,

        /// Where to write the credentials
        #[arg(long, env = "YTMUSIC_BRIDGE_CREDENTIALS_FILE")]
        credentials_file: Option<PathBuf>,
    },
    /// Serve the HTTP API
    Serve {
        /// The address to bind to
        #[arg(long, env = "YTMUSIC_BRIDGE_HOST")]
        host: Option<String>,

        /// The port to run the server on
        #[arg(short, long, env = "YTMUSIC_BRIDGE_PORT")]
        port: Option<u16>,

        /// Credentials written by `setup`
        #[arg(long, env = "YTMUSIC_BRIDGE_CREDENTIALS_FILE")]
        credentials_file: Option<PathBuf>,
    },
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let config = {
        if let Some(config) = &args.config {
            Config::from_file(config)
        } else {
            Config::load()
        }
    }
    .wrap_err("Failed to load ytmusic-bridge config")?;

    let log_level = args.log_level.as_deref().unwrap_or(&config.log_level);
    let otlp_endpoint = args
        .otlp_endpoint
        .as_deref()
        .or(config.otlp_endpoint.as_deref());
    let tracer_provider = init_tracing(env!("CARGO_PKG_NAME"), otlp_endpoint, log_level)?;

    let result = run(args.command, config).await;

    if let Some(tracer_provider) = tracer_provider
        && let Err(e) = tracer_provider.shutdown()
    {
        eprintln!("Failed to shut down tracer provider: {e}");
    }

    result
}

async fn run(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Setup {
            headers_file,
            credentials_file,
        } => {
            let headers_file = headers_file.unwrap_or_else(|| config.headers_path());
            let credentials_file = credentials_file.unwrap_or_else(|| config.credentials_path());

            println!("=== YouTube Music Authentication Setup ===\n");
            println!("{INSTRUCTIONS}\n");

            match bootstrap(&headers_file, &credentials_file) {
                Ok(_) => {
                    println!("YouTube Music setup completed successfully!");
                    println!("Credentials saved to {}", credentials_file.display());
                    Ok(())
                }
                Err(e) => {
                    if let Some(SetupError::HeadersFileNotFound(path)) = e.downcast_ref::<SetupError>() {
                        println!(
                            "{} not found! Create it with your YouTube Music headers and run setup again.",
                            path.display()
                        );
                    }
                    Err(e)
                }
            }
        }
        Commands::Serve {
            host,
            port,
            credentials_file,
        } => {
            let server_config = HttpServerConfig {
                host: host.unwrap_or_else(|| config.host.clone()),
                port: port.unwrap_or(config.port),
                credentials_file: credentials_file.unwrap_or_else(|| config.credentials_path()),
                request_timeout: Duration::from_secs(config.request_timeout_secs),
            };
            tracing::info!(
                "Starting HTTP server on {}:{}",
                server_config.host,
                server_config.port
            );
            http_server::app::start(server_config).await
        }
        Commands::Config(config_commands) => {
            match config_commands {
                ConfigCommands::CreateDefault => {
                    let path = Config::create_default()?;
                    println!("{}", path.display());
                }
                ConfigCommands::Path => match Config::config_path() {
                    Some(path) => println!("{}", path.display()),
                    None => println!("No default config path found"),
                },
            }
            Ok(())
        }
    }
}
