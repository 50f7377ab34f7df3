//! Error types for depchain
//!
//! All modules use `DepchainResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for depchain operations
pub type DepchainResult<T> = Result<T, DepchainError>;

/// All errors that can occur in depchain
#[derive(Error, Debug)]
pub enum DepchainError {
    // Version control errors
    #[error("Remote unavailable: {url}: {reason}")]
    RemoteUnavailable { url: String, reason: String },

    #[error("No checkout at {0}")]
    NotCloned(PathBuf),

    // Toolchain errors
    #[error("Command failed: {command}, exit code: {}", display_code(.code))]
    ToolInvocationFailed { command: String, code: Option<i32> },

    #[error("Build target for {project} is {actual}, expected {expected}")]
    InvalidState {
        project: String,
        expected: &'static str,
        actual: &'static str,
    },

    // Cache errors
    #[error("Failed to write hash file {path}: {source}")]
    CacheWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Artifact errors
    #[error("Artifact download failed: {url}: {reason}")]
    ArtifactFetch { url: String, reason: String },

    #[error("Artifact checksum mismatch for {url}: expected {expected}, got {actual}")]
    ArtifactChecksum {
        url: String,
        expected: String,
        actual: String,
    },

    #[error("Failed to unpack {path}: {reason}")]
    ArtifactUnpack { path: PathBuf, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Unknown project: {0}")]
    UnknownProject(String),

    #[error("Dependency cycle involving project: {0}")]
    DependencyCycle(String),

    // Chain errors
    #[error("Build chain failed: {}", .failed.join(", "))]
    ChainFailed { failed: Vec<String> },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}

impl DepchainError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a remote unavailable error
    pub fn remote(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RemoteUnavailable {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error must abort the chain.
    ///
    /// A failed cache write only means the next run rebuilds needlessly.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::CacheWriteFailed { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::RemoteUnavailable { .. } => {
                Some("Check network access and the project url, then re-run")
            }
            Self::ConfigNotFound(_) => Some("Create depchain.toml or pass --config"),
            Self::ToolInvocationFailed { .. } => {
                Some("The tool output above shows the failure; the cache was cleared, re-run is safe")
            }
            Self::DependencyCycle(_) => Some("Check depends_on entries in the configuration"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DepchainError::ToolInvocationFailed {
            command: "cmake --build .".to_string(),
            code: Some(2),
        };
        assert_eq!(
            err.to_string(),
            "Command failed: cmake --build ., exit code: 2"
        );
    }

    #[test]
    fn error_display_signal() {
        let err = DepchainError::ToolInvocationFailed {
            command: "git clone".to_string(),
            code: None,
        };
        assert!(err.to_string().ends_with("exit code: signal"));
    }

    #[test]
    fn error_hint() {
        let err = DepchainError::ConfigNotFound(PathBuf::from("depchain.toml"));
        assert_eq!(err.hint(), Some("Create depchain.toml or pass --config"));
    }

    #[test]
    fn cache_write_is_not_fatal() {
        let err = DepchainError::CacheWriteFailed {
            path: PathBuf::from("/tmp/a.hash"),
            source: std::io::Error::other("disk full"),
        };
        assert!(!err.is_fatal());
        assert!(DepchainError::NotCloned(PathBuf::from("a")).is_fatal());
    }

    #[test]
    fn chain_failed_lists_projects() {
        let err = DepchainError::ChainFailed {
            failed: vec!["zlib".to_string(), "png".to_string()],
        };
        assert_eq!(err.to_string(), "Build chain failed: zlib, png");
    }
}
