/// Public library interface for the Habit Streaks MCP server
///
/// This module exports the main server implementation and public types
/// that can be used by other applications or tests.

use std::path::PathBuf;
use thiserror::Error;

// Internal modules
mod domain;
mod storage;
mod tools;
mod mcp;

// Re-export public modules and types
pub use domain::*;
pub use storage::{CompletionLog, HabitStorage, SqliteStorage, StorageError};
pub use tools::*;
pub use mcp::McpServer;

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Startup settings for [`StreakServer`]
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// SQLite database file
    pub db_path: PathBuf,
    /// The user every tool call acts on behalf of
    pub user_id: UserId,
}

impl ServerConfig {
    /// Build a config, validating the acting user's id
    pub fn new(db_path: PathBuf, user_id: impl Into<String>) -> Result<Self, ServerError> {
        Ok(Self {
            db_path,
            user_id: UserId::new(user_id)?,
        })
    }
}

/// Main streak server that implements the MCP protocol
///
/// Holds the SQLite store, the acting user and the clock that decides
/// what "today" is for every tool call.
pub struct StreakServer {
    storage: SqliteStorage,
    user_id: UserId,
    clock: Box<dyn Clock>,
}

impl StreakServer {
    /// Create a new streak server reading the wall clock
    ///
    /// This will initialize the SQLite database with the required schema
    /// if it doesn't already exist.
    pub async fn new(config: ServerConfig) -> Result<Self, ServerError> {
        Self::with_clock(config, Box::new(SystemClock))
    }

    /// Create a server whose notion of today comes from `clock`
    pub fn with_clock(config: ServerConfig, clock: Box<dyn Clock>) -> Result<Self, ServerError> {
        tracing::info!(
            "Initializing Habit Streaks server for user {} with database: {:?}",
            config.user_id, config.db_path
        );

        let storage = SqliteStorage::new(&config.db_path)?;

        Ok(Self::from_parts(storage, config.user_id, clock))
    }

    /// Assemble a server from an already opened store
    pub fn from_parts(storage: SqliteStorage, user_id: UserId, clock: Box<dyn Clock>) -> Self {
        Self {
            storage,
            user_id,
            clock,
        }
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin closes or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting MCP server...");

        // Test database connectivity
        let habits = self.storage.list_habits(&self.user_id)?;
        tracing::info!("Server started successfully, found {} existing habits", habits.len());

        let mut mcp_server = McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Get a reference to the storage layer (useful for testing)
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// The user tool calls act on behalf of
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// The clock tool calls read today from
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}
