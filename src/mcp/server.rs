/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads newline-delimited JSON-RPC requests from stdin
/// 2. Dispatches tool calls to the habit tools
/// 3. Writes JSON-RPC responses to stdout
///
/// The server is the only place that reads the clock; every tool receives
/// "today" as a plain date.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::tools::{self, ToolError};
use crate::{HabitStatsServer, ServerError};

/// MCP server that handles communication with a client over stdio
pub struct McpServer {
    /// The underlying habit stats server
    habit_server: HabitStatsServer,
    /// Whether the client has confirmed initialization
    initialized: bool,
    /// Fixed date to use instead of the local clock
    today_override: Option<NaiveDate>,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(habit_server: HabitStatsServer) -> Self {
        Self {
            habit_server,
            initialized: false,
            today_override: None,
        }
    }

    /// Pin "today" to a fixed date instead of reading the local clock
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today_override = Some(today);
        self
    }

    /// Whether the client has sent `initialized`
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn today(&self) -> NaiveDate {
        self.today_override
            .unwrap_or_else(|| chrono::Local::now().date_naive())
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
                    if let Some(response) = self.process_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    return Err(e.into());
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Returns `None` for blank lines and notifications.
    pub async fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                warn!("Failed to parse JSON-RPC request: {}", e);
                let mut err = JsonRpcError::parse_error();
                err.message = format!("Invalid JSON: {}", e);
                return Some(JsonRpcResponse::error(Value::Null, err));
            }
        };

        self.handle_request(request).await
    }

    /// Handle a JSON-RPC request
    pub async fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let JsonRpcRequest { id, method, params, .. } = request;

        if method == "initialized" || method == "notifications/initialized" {
            self.initialized = true;
            info!("MCP client initialized");
            return id.map(|id| JsonRpcResponse::success(id, Value::Null));
        }

        // Other notifications need no answer
        let id = match id {
            Some(id) => id,
            None => {
                debug!("Ignoring notification '{}'", method);
                return None;
            }
        };

        let outcome = match method.as_str() {
            "initialize" => self.handle_initialize(),
            "ping" => Ok(json!({})),
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tools_call(params),
            _ => {
                let mut err = JsonRpcError::method_not_found();
                err.message = format!("Method '{}' not found", method);
                Err(err)
            }
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err) => JsonRpcResponse::error(id, err),
        })
    }

    /// Handle MCP initialization request
    fn handle_initialize(&self) -> Result<Value, JsonRpcError> {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: "Habit Stats MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        to_json(&result)
    }

    /// Handle tools/list request
    fn handle_tools_list(&self) -> Result<Value, JsonRpcError> {
        let tools = tool_definitions().map_err(internal_error)?;
        Ok(json!({ "tools": tools }))
    }

    /// Handle tools/call request
    fn handle_tools_call(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let call: ToolCallParams = match params {
            Some(params) => parse_params(params)?,
            None => return Err(JsonRpcError::invalid_params("Missing parameters")),
        };
        let args = call.arguments.unwrap_or_else(|| json!({}));
        let today = self.today();
        let storage = self.habit_server.storage();

        debug!("Calling tool '{}' with today = {}", call.name, today);

        let outcome: Result<String, ToolError> = match call.name.as_str() {
            "habit_create" => tools::create_habit(storage, parse_params(args)?)
                .map(|r| format!("{}\nHabit ID: {}", r.message, r.habit_id)),
            "habit_update" => tools::update_habit(storage, parse_params(args)?).map(|r| r.message),
            "habit_delete" => tools::delete_habit(storage, parse_params(args)?).map(|r| r.message),
            "habit_list" => tools::list_habits(storage, parse_params(args)?, today)
                .map(|r| format_habit_list(&r)),
            "habit_log" => tools::log_habit(storage, parse_params(args)?, today)
                .map(|r| format!("{}\nLog ID: {}", r.message, r.log_id)),
            "habit_toggle" => tools::toggle_today(storage, parse_params(args)?, today).map(|r| r.message),
            "habit_unlog" => tools::unlog(storage, parse_params(args)?).map(|r| r.message),
            "habit_logs" => tools::list_logs(storage, parse_params(args)?).map(|r| format_log_list(&r)),
            "habit_stats" => tools::get_habit_stats(storage, parse_params(args)?, today)
                .map(|r| format_stats(&r)),
            other => return to_json(&ToolCallResult::error(format!("Unknown tool: {}", other))),
        };

        let result = match outcome {
            Ok(text) => ToolCallResult::success(text),
            Err(e) => {
                warn!(code = tool_error_code(&e).code(), "Tool '{}' failed: {}", call.name, e);
                ToolCallResult::tool_error(&e)
            }
        };

        to_json(&result)
    }
}

fn internal_error(e: serde_json::Error) -> JsonRpcError {
    error!("Failed to serialize response: {}", e);
    let mut err = JsonRpcError::internal_error();
    err.message = format!("Serialization failed: {}", e);
    err
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(internal_error)
}

fn parse_params<P: DeserializeOwned>(value: Value) -> Result<P, JsonRpcError> {
    serde_json::from_value(value)
        .map_err(|e| JsonRpcError::invalid_params(format!("Invalid parameters: {}", e)))
}

fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

fn format_habit_list(response: &tools::ListHabitsResponse) -> String {
    if response.habits.is_empty() {
        return "No habits found. Create your first habit to get started!".to_string();
    }

    let header = format!("📋 **Habit Summary** ({} habits)\n\n", response.summary.total_habits);
    let body = response
        .habits
        .iter()
        .map(|h| {
            format!(
                "🎯 **{}** ({})\n   ID: {} | 🔥 Streak: {} | 📊 30 days: {}",
                h.name,
                h.goal,
                h.habit_id,
                h.current_streak,
                percent(h.success_30d)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "{}{}\n\n📊 Average 30 day success: {}",
        header,
        body,
        percent(response.summary.avg_success_30d)
    )
}

fn format_log_list(response: &tools::ListLogsResponse) -> String {
    if response.logs.is_empty() {
        return "No logs match these filters.".to_string();
    }

    let lines = response
        .logs
        .iter()
        .map(|l| format!("- {} habit {} value {} (log {})", l.date, l.habit_id, l.value, l.log_id))
        .collect::<Vec<_>>()
        .join("\n");

    format!("📅 {} logs\n{}", response.count, lines)
}

fn format_stats(response: &tools::StatsResponse) -> String {
    let mut text = format!("📈 Stats as of {}\n{}", response.reference_date, response.message);

    for s in &response.habits {
        let unit = s.cadence.period_name();
        text.push_str(&format!(
            "\n\n🎯 **{}** ({})\n   🔥 Current: {} {}(s) | 🏆 Longest: {} {}(s)\n   📊 7 days: {} ({}) | 30 days: {} ({})",
            s.name,
            s.cadence,
            s.current_streak,
            unit,
            s.longest_streak,
            unit,
            s.success_7d,
            percent(s.success_7d),
            s.success_30d,
            percent(s.success_30d),
        ));
    }

    text
}
