//! MCP server implementation.
//!
//! Line-delimited JSON-RPC over stdio (default) or a TCP socket. One
//! request is processed at a time; handlers share the immutable
//! application context built at startup, so no locking is involved.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{info, warn};

use causal_panel_core::{AppContext, Config, CoreResult};

use crate::handlers::Handlers;
use crate::protocol::{error_codes, methods, JsonRpcRequest, JsonRpcResponse};

/// Transport selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Stdio,
    Tcp,
}

impl TransportMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "stdio" => Some(TransportMode::Stdio),
            "tcp" => Some(TransportMode::Tcp),
            _ => None,
        }
    }
}

/// MCP server state.
pub struct McpServer {
    handlers: Handlers,
    max_payload_size: usize,
    bind_address: String,
    tcp_port: u16,
}

impl McpServer {
    /// Build the process-wide context (panel, cohort, graph, descriptions)
    /// and wire up the handlers.
    pub fn new(config: Config) -> CoreResult<Self> {
        let mcp = config.mcp.clone();
        let context = Arc::new(AppContext::initialize(config)?);
        Ok(Self {
            handlers: Handlers::new(context),
            max_payload_size: mcp.max_payload_size,
            bind_address: mcp.bind_address,
            tcp_port: mcp.tcp_port,
        })
    }

    pub async fn run(&self, mode: TransportMode) -> Result<()> {
        match mode {
            TransportMode::Stdio => self.run_stdio().await,
            TransportMode::Tcp => self.run_tcp().await,
        }
    }

    async fn run_stdio(&self) -> Result<()> {
        info!("MCP server listening on stdio");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        while let Some(line) = lines.next_line().await? {
            let (response, shutdown) = self.handle_line(&line).await;
            if let Some(response) = response {
                stdout.write_all(response.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
            if shutdown {
                info!("Shutdown requested; exiting");
                break;
            }
        }
        Ok(())
    }

    async fn run_tcp(&self) -> Result<()> {
        let listener = TcpListener::bind((self.bind_address.as_str(), self.tcp_port)).await?;
        info!(
            address = %self.bind_address,
            port = self.tcp_port,
            "MCP server listening on tcp"
        );

        // One connection at a time; tool calls are strictly sequential.
        loop {
            let (socket, peer) = listener.accept().await?;
            info!(%peer, "client connected");
            let (reader, mut writer) = socket.into_split();
            let mut lines = BufReader::new(reader).lines();

            while let Some(line) = lines.next_line().await? {
                let (response, shutdown) = self.handle_line(&line).await;
                if let Some(response) = response {
                    writer.write_all(response.as_bytes()).await?;
                    writer.write_all(b"\n").await?;
                    writer.flush().await?;
                }
                if shutdown {
                    info!("Shutdown requested; exiting");
                    return Ok(());
                }
            }
            info!(%peer, "client disconnected");
        }
    }

    /// Process one line of input. Returns the serialized response (None
    /// for notifications and blank lines) and whether the request asked
    /// the server to shut down.
    async fn handle_line(&self, line: &str) -> (Option<String>, bool) {
        let line = line.trim();
        if line.is_empty() {
            return (None, false);
        }
        if line.len() > self.max_payload_size {
            warn!(size = line.len(), "request exceeds the payload limit");
            let response = JsonRpcResponse::error(
                None,
                error_codes::PAYLOAD_TOO_LARGE,
                format!(
                    "Request exceeds the {} byte payload limit",
                    self.max_payload_size
                ),
            );
            return (Some(encode(&response)), false);
        }

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                let response = JsonRpcResponse::error(
                    None,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {e}"),
                );
                return (Some(encode(&response)), false);
            }
        };
        if request.jsonrpc != "2.0" {
            let response = JsonRpcResponse::error(
                request.id,
                error_codes::INVALID_REQUEST,
                "jsonrpc must be \"2.0\"",
            );
            return (Some(encode(&response)), false);
        }

        let shutdown = request.method == methods::SHUTDOWN;
        let response = self.handlers.dispatch(request).await;
        if response.is_none() {
            (None, shutdown)
        } else {
            (Some(encode(&response)), shutdown)
        }
    }
}

fn encode(response: &JsonRpcResponse) -> String {
    serde_json::to_string(response).expect("response serializes")
}
