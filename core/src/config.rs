//! Configuration types for the ballot node

use crate::error::BallotError;
use crate::traits::BallotResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Length of the voting window, measured from ballot creation
pub const VOTING_WINDOW_SECONDS: u64 = 300;

/// Main node configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Node name for logging
    pub name: String,

    /// Data directory
    pub data_dir: PathBuf,

    /// API configuration
    pub api: ApiConfig,

    /// Logging level
    pub log_level: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            name: "ballot-node".to_string(),
            data_dir: PathBuf::from("./data"),
            api: ApiConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl NodeConfig {
    pub fn to_json(&self) -> BallotResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BallotError::SerializationError(e.to_string()))
    }

    pub fn from_json(json: &str) -> BallotResult<Self> {
        serde_json::from_str(json).map_err(|e| BallotError::ConfigError(e.to_string()))
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> BallotResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Enable HTTP API
    pub enabled: bool,

    /// API listen address
    pub listen_addr: String,

    /// Enable CORS
    pub enable_cors: bool,

    /// CORS allowed origins
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            listen_addr: "127.0.0.1:8080".to_string(),
            enable_cors: true,
            cors_origins: vec!["*".to_string()],
        }
    }
}
