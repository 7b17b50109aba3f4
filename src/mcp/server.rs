/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests from stdin
/// 2. Routes tool calls to the habit and streak tools
/// 3. Sends JSON-RPC responses to stdout

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::mcp::protocol::*;
use crate::tools::{self, ToolError};
use crate::{ServerError, StreakServer};

/// MCP server that speaks JSON-RPC on behalf of a [`StreakServer`]
pub struct McpServer {
    /// The underlying streak server
    streaks: StreakServer,
    /// Whether the client has completed the handshake
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(streaks: StreakServer) -> Self {
        Self {
            streaks,
            initialized: false,
        }
    }

    /// Whether the client has sent its `initialized` notification
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response_str) = self.handle_line(&line).await? {
                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Handle one line of JSON-RPC input and return the serialized reply
    ///
    /// Blank lines and notifications produce no reply.
    pub async fn handle_line(&mut self, line: &str) -> Result<Option<String>, ServerError> {
        match self.process_line(line).await {
            Some(response) => Ok(Some(serde_json::to_string(&response)?)),
            None => Ok(None),
        }
    }

    /// Process a single line of JSON-RPC input
    async fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    json!(null),
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        self.handle_request(request).await
    }

    /// Handle a JSON-RPC request
    async fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        match request.method.as_str() {
            "initialize" => Some(self.handle_initialize(request)),
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                if request.id.is_null() {
                    None
                } else {
                    Some(JsonRpcResponse::success(request.id, json!(null)))
                }
            }
            "tools/list" => Some(self.handle_tools_list(request)),
            "tools/call" => Some(self.handle_tools_call(request)),
            _ => Some(JsonRpcResponse::error(
                request.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            )),
        }
    }

    /// Handle MCP initialization request
    fn handle_initialize(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "Habit Streaks MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        encode_success(request.id, &result)
    }

    /// Handle tools/list request
    fn handle_tools_list(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let tools = vec![
            tool_definition::<tools::CreateHabitParams>(
                "habit_create",
                "Create a new daily habit",
            ),
            tool_definition::<NoParams>(
                "habit_list",
                "List your habits, newest first, with their current and longest streaks",
            ),
            tool_definition::<tools::DeleteHabitParams>(
                "habit_delete",
                "Delete a habit together with its done records",
            ),
            tool_definition::<tools::MarkDoneParams>(
                "habit_mark_done",
                "Mark a habit as done for today or an earlier day and refresh its streaks",
            ),
            tool_definition::<tools::ListDoneParams>(
                "done_list",
                "List the done records of one habit, most recent first",
            ),
            tool_definition::<NoParams>(
                "done_list_all",
                "List the done records of all your habits",
            ),
            tool_definition::<tools::RecomputeParams>(
                "habit_recompute",
                "Recompute a habit's streaks from its done records",
            ),
        ];

        encode_success(request.id, &json!({ "tools": tools }))
    }

    /// Handle tools/call request
    fn handle_tools_call(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match request.params {
            Some(params) => match serde_json::from_value(params) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        request.id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid parameters: {}", e),
                        None,
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        let storage = self.streaks.storage();
        let user_id = self.streaks.user_id();
        let clock = self.streaks.clock();
        let arguments = tool_params.arguments;

        match tool_params.name.as_str() {
            "habit_create" => tool_response(
                request.id,
                parse_arguments(arguments)
                    .and_then(|p| tools::create_habit(storage, user_id, p, clock)),
            ),
            "habit_list" => tool_response(request.id, tools::list_habits(storage, user_id)),
            "habit_delete" => tool_response(
                request.id,
                parse_arguments(arguments).and_then(|p| tools::delete_habit(storage, user_id, p)),
            ),
            "habit_mark_done" => tool_response(
                request.id,
                parse_arguments(arguments)
                    .and_then(|p| tools::mark_done(storage, user_id, p, clock)),
            ),
            "done_list" => tool_response(
                request.id,
                parse_arguments(arguments).and_then(|p| tools::list_done(storage, user_id, p)),
            ),
            "done_list_all" => tool_response(request.id, tools::list_all_done(storage, user_id)),
            "habit_recompute" => tool_response(
                request.id,
                parse_arguments(arguments)
                    .and_then(|p| tools::recompute_streaks(storage, user_id, p, clock)),
            ),
            other => JsonRpcResponse::error(
                request.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Unknown tool: {}", other),
                None,
            ),
        }
    }
}

/// Describe a tool, deriving its input schema from the parameter type
fn tool_definition<T: JsonSchema>(name: &str, description: &str) -> ToolDefinition {
    let schema = schemars::schema_for!(T);
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: serde_json::to_value(schema).unwrap_or_else(|_| json!({ "type": "object" })),
    }
}

/// Deserialize tool arguments into the tool's parameter type
fn parse_arguments<T: DeserializeOwned>(arguments: Map<String, Value>) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|e| ToolError::Validation(format!("Invalid arguments: {}", e)))
}

/// Turn a tool outcome into a JSON-RPC response
fn tool_response<R: Serialize>(id: Value, outcome: Result<R, ToolError>) -> JsonRpcResponse {
    match outcome {
        Ok(response) => match serde_json::to_string(&response) {
            Ok(text) => JsonRpcResponse::success(id, ToolCallResult::success(text).into()),
            Err(e) => internal_error(id, e),
        },
        Err(e) => {
            if e.is_client_error() {
                debug!("Tool call rejected: {}", e);
            } else {
                error!("Tool call failed: {}", e);
            }
            JsonRpcResponse::tool_error(id, &e)
        }
    }
}

fn encode_success<R: Serialize>(id: Value, result: &R) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => internal_error(id, e),
    }
}

fn internal_error(id: Value, e: serde_json::Error) -> JsonRpcResponse {
    error!("Failed to encode response: {}", e);
    JsonRpcResponse::error(
        id,
        error_codes::INTERNAL_ERROR,
        format!("Failed to encode response: {}", e),
        None,
    )
}
