/// Public library interface for the Habit Stats MCP server
///
/// The core (`domain`) computes streaks and success ratios for daily and
/// weekly habits from a completion history and an explicit reference date.
/// Around it sit a SQLite store, the per-habit stats engine, the MCP tools
/// and the stdio JSON-RPC server.

use std::path::PathBuf;
use thiserror::Error;

pub mod domain;
pub mod storage;
pub mod analytics;
pub mod tools;
pub mod mcp;

// Re-export public modules and types
pub use domain::*;
pub use storage::{HabitStorage, LogFilter, LogOrdering, SqliteStorage, StorageError};
pub use analytics::{
    compute_habit_stats, round_ratio, AnalyticsEngine, AnalyticsError, HabitStats, LONG_WINDOW,
    SHORT_WINDOW,
};
pub use tools::ToolError;

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] StorageError),

    #[error("Stats error: {0}")]
    Analytics(#[from] AnalyticsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main habit stats server that implements the MCP protocol
///
/// This server manages habit data through a SQLite database and exposes
/// tools for managing habits, logging days and reading stats.
pub struct HabitStatsServer {
    storage: SqliteStorage,
    analytics: AnalyticsEngine,
}

impl HabitStatsServer {
    /// Create a new server with the specified database path
    ///
    /// This will initialize the SQLite database with the required schema
    /// if it doesn't already exist.
    pub async fn new(db_path: PathBuf) -> Result<Self, ServerError> {
        tracing::info!("Initializing Habit Stats server with database: {:?}", db_path);

        let storage = SqliteStorage::new(db_path)?;
        Ok(Self::with_storage(storage))
    }

    /// Wrap an already opened store
    pub fn with_storage(storage: SqliteStorage) -> Self {
        Self {
            storage,
            analytics: AnalyticsEngine::new(),
        }
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin is closed or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting MCP server...");

        let today = chrono::Local::now().date_naive();
        let stats = self.analytics.all_stats(&self.storage, today)?;
        let active = stats.iter().filter(|s| s.current_streak > 0).count();
        tracing::info!(
            "Server started successfully, found {} existing habits ({} with an active streak)",
            stats.len(),
            active
        );

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Get a reference to the storage layer
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Get a reference to the analytics engine
    pub fn analytics(&self) -> &AnalyticsEngine {
        &self.analytics
    }
}
