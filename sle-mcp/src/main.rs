//! SLE MCP Server
//!
//! Line-delimited JSON-RPC over stdio. Stdout carries protocol frames
//! only; logs go to stderr.
//!
//! Tools:
//! - solve: Solve A·x = b (gauss, lu or both; none/partial/complete pivoting)
//! - factorize: L, U, P, Q with P·A·Q = L·U
//! - check_compatibility: Unique / infinite / no solution verdict
//! - verify: A·x and the residual norm
//! - identity: Identity matrix

mod config;
mod protocol;
mod server;
mod tools;

use std::io::IsTerminal;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use config::ServerConfig;
use protocol::{McpRequest, McpResponse};
use server::{handle_request, PROTOCOL_VERSION, SERVER_VERSION};

fn init_logging(config: &ServerConfig) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::io::Result<()> {
    let config = ServerConfig::from_env();
    init_logging(&config);

    info!(version = SERVER_VERSION, protocol = PROTOCOL_VERSION, "SLE MCP server started");
    info!(
        error_correction = config.error_correction,
        min_run = config.rounding.min_run,
        max_decimals = config.rounding.max_decimals,
        "configuration loaded"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    info!("server ready, waiting for requests");

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("client disconnected (EOF)");
                break;
            }
            Err(e) => {
                error!(error = %e, "error reading input");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        debug!(bytes = line.len(), "received");

        let response = match serde_json::from_str::<McpRequest>(line) {
            Ok(request) => {
                debug!(method = %request.method, "processing");
                let response = handle_request(&config, &request);

                // Notifications (no id) get no response
                if request.id.is_none() {
                    debug!(method = %request.method, "notification processed");
                    continue;
                }
                response
            }
            Err(e) => {
                warn!(error = %e, "error parsing request");
                McpResponse::parse_error(e)
            }
        };

        let mut frame = match serde_json::to_string(&response) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "error serializing response");
                continue;
            }
        };
        frame.push('\n');

        if let Err(e) = stdout.write_all(frame.as_bytes()).await {
            error!(error = %e, "error writing response");
            break;
        }
        if let Err(e) = stdout.flush().await {
            error!(error = %e, "error flushing stdout");
            break;
        }
    }

    info!("server shutting down");
    Ok(())
}
