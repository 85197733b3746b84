mod client;
mod terminal_output;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use scanlens_analysis::ScanAnalyzer;
use scanlens_config::Config;
use scanlens_gateway::{start_server, GatewayState};
use scanlens_media::encode_image_file;
use scanlens_provider::OpenAiProvider;
use scanlens_render::{render_ansi, render_plain};

use client::RelayClient;
use terminal_output::{note_error, note_info, note_success, note_warn, supports_color};

#[derive(Parser)]
#[command(name = "scanlens")]
#[command(about = "scanlens — AI analysis of scan screenshots")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the relay server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Upload a scan screenshot and render the analysis report
    Analyze {
        /// Path to the screenshot image
        image: Option<PathBuf>,
        /// Relay server to talk to
        #[arg(long)]
        server: Option<String>,
        /// Print the raw report JSON instead of the rendered view
        #[arg(long)]
        json: bool,
    },
    /// Show relay status
    Status {
        /// Relay server to talk to
        #[arg(long)]
        server: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    scanlens_logging::init_logger(config.log_dir.as_deref().map(Path::new), &config.log_level);

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let config = Config {
                port: port.unwrap_or(config.port),
                ..config
            };
            run_server(config).await?;
        }
        Commands::Analyze {
            image,
            server,
            json,
        } => {
            run_analyze(image, server_url(server, &config), json).await?;
        }
        Commands::Status { server } => {
            run_status(server_url(server, &config)).await?;
        }
    }

    Ok(())
}

fn server_url(server: Option<String>, config: &Config) -> String {
    server.unwrap_or_else(|| format!("http://localhost:{}", config.port))
}

async fn run_server(config: Config) -> Result<()> {
    let report = config.validate();
    for warning in &report.warnings {
        note_warn(&warning.to_string());
    }
    if !report.is_valid() {
        for error in &report.errors {
            note_error(&error.to_string());
        }
        anyhow::bail!("Invalid configuration");
    }

    info!(
        port = config.port,
        bind = %config.bind_address,
        vision_model = %config.vision_model,
        report_model = %config.report_model,
        "Starting scanlens relay"
    );

    let api_key = config
        .api_key
        .clone()
        .context("OPENAI_API_KEY is not set")?;
    let provider = Arc::new(
        OpenAiProvider::new(api_key).with_base_url(config.api_base_url.clone()),
    );
    let analyzer = Arc::new(
        ScanAnalyzer::new(provider, config.vision_model.clone(), config.report_model.clone())
            .with_vision_max_tokens(config.vision_max_tokens),
    );

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .context("Invalid bind address")?;

    start_server(addr, GatewayState { analyzer }).await
}

/// Resolve the analyze input to an encoded photo, or the warning to show.
///
/// Runs before any client is constructed, so a missing or unusable image
/// never opens a connection.
fn prepare_photo(image: Option<&Path>) -> Result<String, String> {
    let Some(path) = image else {
        return Err("Please provide a scan screenshot to analyze.".to_string());
    };
    encode_image_file(path).map_err(|e| format!("Cannot use {}: {e}", path.display()))
}

async fn run_analyze(image: Option<PathBuf>, server: String, json: bool) -> Result<()> {
    let photo = match prepare_photo(image.as_deref()) {
        Ok(photo) => photo,
        Err(warning) => {
            note_warn(&warning);
            return Ok(());
        }
    };

    note_info("Scanning...");
    let client = RelayClient::new(server);
    match client.analyze(&photo).await {
        Ok(report) => {
            note_success("Scan complete!");
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if supports_color() {
                print!("{}", render_ansi(&report));
            } else {
                print!("{}", render_plain(&report));
            }
            Ok(())
        }
        Err(e) => {
            note_error(&format!("Failed to process the scan: {e}"));
            std::process::exit(1);
        }
    }
}

async fn run_status(server: String) -> Result<()> {
    let client = RelayClient::new(server.clone());
    match client.health().await {
        Ok(body) => {
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Err(_) => {
            note_error(&format!("scanlens relay is not reachable at {server}"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_image_warns_before_any_network_use() {
        let result = prepare_photo(None);
        assert!(result.unwrap_err().contains("provide a scan screenshot"));
    }

    #[test]
    fn non_image_path_warns() {
        let result = prepare_photo(Some(Path::new("report.pdf")));
        assert!(result.unwrap_err().contains("report.pdf"));
    }

    #[test]
    fn default_server_url_uses_configured_port() {
        let config = Config {
            port: 9000,
            ..Config::default()
        };
        assert_eq!(server_url(None, &config), "http://localhost:9000");
        assert_eq!(
            server_url(Some("http://relay:8080".into()), &config),
            "http://relay:8080"
        );
    }
}
