//! Causal Panel MCP Server
//!
//! JSON-RPC 2.0 server implementing the Model Context Protocol (MCP) for
//! causal identification and estimation over a synthetic spending panel.
//!
//! # Transport
//!
//! - stdio: Standard input/output (default)
//! - tcp: TCP socket transport for networked deployments
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration (stdio transport)
//! causal-panel-mcp
//!
//! # Run with custom config
//! causal-panel-mcp --config /path/to/config.toml
//!
//! # Run with TCP transport on a custom port
//! causal-panel-mcp --transport tcp --port 4000
//!
//! # Environment variable override (used if CLI not specified)
//! CAUSAL_PANEL_MCP__TRANSPORT=tcp causal-panel-mcp
//!
//! # Run in debug mode
//! RUST_LOG=debug causal-panel-mcp
//! ```
//!
//! CLI arguments > environment variables > config file > defaults.

mod handlers;
mod protocol;
mod server;
mod tools;

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use causal_panel_core::Config;

use server::{McpServer, TransportMode};

/// Parsed CLI arguments for the MCP server.
///
/// Manual parsing keeps the binary small; the flag surface is four options.
struct CliArgs {
    /// Path to configuration file
    config_path: Option<PathBuf>,
    /// Transport mode override (--transport)
    transport: Option<String>,
    /// TCP port override (--port)
    port: Option<u16>,
    /// TCP bind address override (--bind)
    bind_address: Option<String>,
    /// Show help
    help: bool,
}

impl CliArgs {
    /// Parse CLI arguments. Supports: --config, --transport, --port,
    /// --bind, --help, -h.
    fn parse() -> Result<Self> {
        let args: Vec<String> = env::args().collect();
        let mut cli = CliArgs {
            config_path: None,
            transport: None,
            port: None,
            bind_address: None,
            help: false,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--help" | "-h" => {
                    cli.help = true;
                    i += 1;
                }
                "--config" => {
                    cli.config_path = Some(PathBuf::from(Self::value(&args, i, "--config")?));
                    i += 2;
                }
                "--transport" => {
                    cli.transport = Some(Self::value(&args, i, "--transport")?.to_string());
                    i += 2;
                }
                "--port" => {
                    let raw = Self::value(&args, i, "--port")?;
                    cli.port = Some(raw.parse().map_err(|_| {
                        anyhow::anyhow!("--port expects a number in 1..=65535, got {raw}")
                    })?);
                    i += 2;
                }
                "--bind" => {
                    cli.bind_address = Some(Self::value(&args, i, "--bind")?.to_string());
                    i += 2;
                }
                other => {
                    anyhow::bail!("Unknown argument: {other} (try --help)");
                }
            }
        }
        Ok(cli)
    }

    fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
        args.get(i + 1)
            .map(String::as_str)
            .ok_or_else(|| anyhow::anyhow!("{flag} expects a value"))
    }
}

fn print_help() {
    println!(
        "causal-panel-mcp {}\n\
         MCP server for causal identification and estimation over a spending panel\n\n\
         USAGE:\n\
         \tcausal-panel-mcp [OPTIONS]\n\n\
         OPTIONS:\n\
         \t--config <PATH>      Load configuration from a TOML file\n\
         \t--transport <MODE>   Transport: stdio (default) or tcp\n\
         \t--port <PORT>        TCP port (tcp transport only)\n\
         \t--bind <ADDRESS>     TCP bind address (tcp transport only)\n\
         \t-h, --help           Show this help",
        env!("CARGO_PKG_VERSION")
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse()?;
    if args.help {
        print_help();
        return Ok(());
    }

    let mut config = match &args.config_path {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    // CLI overrides beat environment and file settings.
    if let Some(transport) = args.transport {
        config.mcp.transport = transport;
    }
    if let Some(port) = args.port {
        config.mcp.tcp_port = port;
    }
    if let Some(bind_address) = args.bind_address {
        config.mcp.bind_address = bind_address;
    }
    config.validate()?;

    // Log to stderr: stdout belongs to the stdio JSON-RPC transport.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mode = TransportMode::parse(&config.mcp.transport)
        .ok_or_else(|| anyhow::anyhow!("Unknown transport: {}", config.mcp.transport))?;

    let server = McpServer::new(config)?;
    server.run(mode).await
}
