/// MCP (Model Context Protocol) message structures and JSON-RPC handling
///
/// This module defines the JSON-RPC message format that MCP clients use to
/// talk to the habit stats server, and the tool catalogue served on
/// `tools/list`.

use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use jsonrpc_core::{Error as JsonRpcError, ErrorCode};

use crate::storage::StorageError;
use crate::tools::{self, ToolError};
use crate::analytics::AnalyticsError;

/// MCP protocol version we support
pub const MCP_VERSION: &str = "2024-11-05";

/// JSON-RPC 2.0 request message
///
/// Requests without an `id` are notifications and get no response.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// Unique identifier for this request
    #[serde(default)]
    pub id: Option<Value>,
    /// The method to call (e.g., "tools/call")
    pub method: String,
    /// Parameters for the method call
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC 2.0 response message
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// Request ID that we're responding to
    pub id: Value,
    /// Successful result (if no error occurred)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error information (if something went wrong)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Create a successful response
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// MCP tool call parameters
#[derive(Debug, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call (e.g., "habit_create")
    pub name: String,
    /// Arguments to pass to the tool
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// MCP tool call result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// Tool execution results
    pub content: Vec<ToolContent>,
    /// Whether this is an error result
    pub is_error: bool,
    /// Machine-readable details, e.g. `{"errorCode": -32002}` on failures
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl ToolCallResult {
    /// Create a successful tool result with text content
    pub fn success(text: String) -> Self {
        Self {
            content: vec![ToolContent {
                content_type: "text".to_string(),
                text,
            }],
            is_error: false,
            meta: None,
        }
    }

    /// Create an error tool result
    pub fn error(error_message: String) -> Self {
        Self {
            content: vec![ToolContent {
                content_type: "text".to_string(),
                text: format!("Error: {}", error_message),
            }],
            is_error: true,
            meta: None,
        }
    }

    /// Create an error tool result carrying the error's code in `_meta`
    pub fn tool_error(error: &ToolError) -> Self {
        Self {
            meta: Some(serde_json::json!({ "errorCode": tool_error_code(error).code() })),
            ..Self::error(error.to_string())
        }
    }
}

/// Content returned by a tool
#[derive(Debug, Serialize)]
pub struct ToolContent {
    /// Type of content (always "text" here)
    #[serde(rename = "type")]
    pub content_type: String,
    /// The actual content/result
    pub text: String,
}

/// MCP tool definition
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Tool name (e.g., "habit_create")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON schema for the tool's input parameters
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Build a definition whose input schema is derived from `P`
    pub fn for_params<P: JsonSchema>(name: &str, description: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema: serde_json::to_value(schema_for!(P))?,
        })
    }
}

/// Every tool this server exposes, in `tools/list` order
pub fn tool_definitions() -> Result<Vec<ToolDefinition>, serde_json::Error> {
    Ok(vec![
        ToolDefinition::for_params::<tools::CreateHabitParams>(
            "habit_create",
            "Create a new daily or weekly habit to track",
        )?,
        ToolDefinition::for_params::<tools::UpdateHabitParams>(
            "habit_update",
            "Rename a habit or change its cadence and weekly target",
        )?,
        ToolDefinition::for_params::<tools::DeleteHabitParams>(
            "habit_delete",
            "Delete a habit together with its whole log history",
        )?,
        ToolDefinition::for_params::<tools::ListHabitsParams>(
            "habit_list",
            "List all habits with their goal and current streak",
        )?,
        ToolDefinition::for_params::<tools::LogHabitParams>(
            "habit_log",
            "Log a habit for today or a past date (once per day)",
        )?,
        ToolDefinition::for_params::<tools::ToggleTodayParams>(
            "habit_toggle",
            "Mark a habit done for today, or unmark it if already logged",
        )?,
        ToolDefinition::for_params::<tools::UnlogParams>(
            "habit_unlog",
            "Remove a single log by its ID",
        )?,
        ToolDefinition::for_params::<tools::ListLogsParams>(
            "habit_logs",
            "List logs, optionally filtered by habit and date range",
        )?,
        ToolDefinition::for_params::<tools::StatsParams>(
            "habit_stats",
            "Current and longest streaks plus 7 and 30 day success ratios",
        )?,
    ])
}

/// MCP server capabilities
#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    /// Tools that this server provides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

/// Tools capability information
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    pub list_changed: bool,
}

/// MCP initialization response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// MCP protocol version we support
    pub protocol_version: String,
    /// Our server capabilities
    pub capabilities: ServerCapabilities,
    /// Information about our server
    pub server_info: ServerInfo,
}

/// Information about our server
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// Application-specific error codes (JSON-RPC reserves -32000 to -32099 for servers)
pub mod error_codes {
    /// The specified habit or log doesn't exist
    pub const HABIT_NOT_FOUND: i64 = -32001;
    /// The habit is already logged for this date
    pub const DUPLICATE_ENTRY: i64 = -32002;
    /// Input validation failed
    pub const VALIDATION_ERROR: i64 = -32003;
    /// Database or storage operation failed
    pub const STORAGE_ERROR: i64 = -32004;
}

/// Map a storage error to a JSON-RPC error code
pub fn storage_error_code(error: &StorageError) -> ErrorCode {
    let code = match error {
        StorageError::HabitNotFound { .. } | StorageError::LogNotFound { .. } => {
            error_codes::HABIT_NOT_FOUND
        }
        StorageError::DuplicateEntry { .. } => error_codes::DUPLICATE_ENTRY,
        StorageError::Query(_)
        | StorageError::Connection(_)
        | StorageError::Migration(_) => error_codes::STORAGE_ERROR,
    };
    ErrorCode::ServerError(code)
}

/// Map a tool error to a JSON-RPC error code
pub fn tool_error_code(error: &ToolError) -> ErrorCode {
    match error {
        ToolError::InvalidParams(_) => ErrorCode::InvalidParams,
        ToolError::Domain(_) => ErrorCode::ServerError(error_codes::VALIDATION_ERROR),
        ToolError::Storage(e) | ToolError::Analytics(AnalyticsError::Storage(e)) => storage_error_code(e),
        ToolError::Analytics(AnalyticsError::Domain { .. }) => {
            ErrorCode::ServerError(error_codes::VALIDATION_ERROR)
        }
    }
}
