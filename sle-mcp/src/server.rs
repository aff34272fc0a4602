//! Request dispatch

use serde_json::{json, Value as JsonValue};
use tracing::{debug, info};
use crate::config::ServerConfig;
use crate::protocol::{McpError, McpRequest, McpResponse, METHOD_NOT_FOUND};
use crate::tools::{call_tool, tool_result};

pub const PROTOCOL_VERSION: &str = "2025-11-25";
pub const SERVER_NAME: &str = "sle";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn handle_request(config: &ServerConfig, request: &McpRequest) -> McpResponse {
    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(&request.params),
        "initialized" | "notifications/initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),

        // Tools
        "tools/list" => handle_tools_list(),
        "tools/call" => handle_tool_call(config, &request.params),

        _ => Err(McpError::new(METHOD_NOT_FOUND, format!("Method not found: {}", request.method))),
    };

    McpResponse::from_result(request.id.clone(), result)
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params.as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Use client's protocol version for compatibility
    let client_protocol = params.as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Dense linear-system solver: Gaussian elimination with pivoting and LU factorization"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "Solve square systems A·x = b of size 2 to 8 with 'solve'. Pick pivot none, partial or complete; use 'factorize' for L, U, P, Q and 'verify' to check a solution's residual."
    }))
}

fn matrix_schema(description: &str) -> JsonValue {
    json!({
        "type": "array",
        "items": { "type": "array", "items": { "type": "number" } },
        "description": description
    })
}

fn vector_schema(description: &str) -> JsonValue {
    json!({
        "type": "array",
        "items": { "type": "number" },
        "description": description
    })
}

fn pivot_schema() -> JsonValue {
    json!({
        "description": "Pivoting strategy: none (0), partial (1) or complete (2). Default: none",
        "oneOf": [
            { "type": "string", "enum": ["none", "partial", "complete"] },
            { "type": "integer", "enum": [0, 1, 2] }
        ]
    })
}

fn handle_tools_list() -> Result<JsonValue, McpError> {
    Ok(json!({
        "tools": [
            {
                "name": "solve",
                "description": "Solve A·x = b by Gaussian elimination and/or LU factorization. Returns the solution, the reduced system or factors, and the residual norm.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "A": matrix_schema("Square coefficient matrix, 2 to 8 rows"),
                        "b": vector_schema("Right-hand side, one entry per row of A"),
                        "pivot": pivot_schema(),
                        "method": {
                            "type": "string",
                            "enum": ["gauss", "lu", "both"],
                            "description": "Elimination path(s). Default: gauss"
                        },
                        "error_correction": {
                            "type": "boolean",
                            "description": "Round repeating decimals in the solution (cosmetic)"
                        }
                    },
                    "required": ["A", "b"]
                }
            },
            {
                "name": "factorize",
                "description": "LU factorization with P·A·Q = L·U.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "A": matrix_schema("Square matrix, 2 to 8 rows"),
                        "pivot": pivot_schema()
                    },
                    "required": ["A"]
                }
            },
            {
                "name": "check_compatibility",
                "description": "Check whether an (already reduced) system has exactly one solution.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "A": matrix_schema("Square coefficient matrix"),
                        "b": vector_schema("Right-hand side")
                    },
                    "required": ["A", "b"]
                }
            },
            {
                "name": "verify",
                "description": "Compute A·x and the Euclidean norm of A·x - b.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "A": matrix_schema("Original coefficient matrix"),
                        "b": vector_schema("Original right-hand side"),
                        "x": vector_schema("Candidate solution")
                    },
                    "required": ["A", "b", "x"]
                }
            },
            {
                "name": "identity",
                "description": "Identity matrix of the given size.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "size": { "type": "integer", "minimum": 2, "maximum": 8 }
                    },
                    "required": ["size"]
                }
            }
        ]
    }))
}

fn handle_tool_call(config: &ServerConfig, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let params = params.as_ref().ok_or_else(|| McpError::invalid_params("Missing params"))?;

    let name = params.get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or(json!({}));

    debug!(tool = name, "calling tool");
    match call_tool(config, name, &args) {
        Some(outcome) => Ok(tool_result(outcome)),
        None => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::INVALID_PARAMS;
    use crate::tools::TOOL_NAMES;

    fn request(method: &str, params: JsonValue) -> McpRequest {
        McpRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params: Some(params),
        }
    }

    #[test]
    fn test_initialize_echoes_protocol() {
        let resp = handle_request(&ServerConfig::default(), &request("initialize", json!({
            "protocolVersion": "2024-11-05",
            "clientInfo": { "name": "test" }
        })));
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
    }

    #[test]
    fn test_tools_list_matches_dispatch() {
        let resp = handle_request(&ServerConfig::default(), &request("tools/list", json!({})));
        let tools = resp.result.unwrap()["tools"].as_array().unwrap().clone();
        let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
        assert_eq!(names, TOOL_NAMES.to_vec());
    }

    #[test]
    fn test_tool_call_success() {
        let resp = handle_request(&ServerConfig::default(), &request("tools/call", json!({
            "name": "solve",
            "arguments": { "A": [[2, 1], [1, 1]], "b": [3, 2] }
        })));
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], false);
        assert!(result["content"][0]["text"].as_str().unwrap().contains("Ax=b result vector"));
        assert_eq!(resp.id, Some(json!(1)));
    }

    #[test]
    fn test_tool_call_solver_error_is_result() {
        let resp = handle_request(&ServerConfig::default(), &request("tools/call", json!({
            "name": "solve",
            "arguments": { "A": [[1, 1], [0, 0]], "b": [2, 5] }
        })));
        assert!(resp.error.is_none());
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["error"]["code"], "INCOMPATIBLE_SYSTEM");
    }

    #[test]
    fn test_unknown_tool_and_method() {
        let resp = handle_request(&ServerConfig::default(), &request("tools/call", json!({ "name": "eval" })));
        assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);

        let resp = handle_request(&ServerConfig::default(), &request("resources/list", json!({})));
        assert_eq!(resp.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[test]
    fn test_missing_params() {
        let mut req = request("tools/call", json!({}));
        req.params = None;
        let resp = handle_request(&ServerConfig::default(), &req);
        assert_eq!(resp.error.unwrap().message, "Missing params");
    }
}
