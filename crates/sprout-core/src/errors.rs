//! Error types for the Sprout compiler.
//!
//! Resolution misses (an asset id with no export URL) are not errors: the
//! resource pipeline logs them and the node renders without that visual.

use thiserror::Error;

/// Result type alias for compiler operations.
pub type Result<T> = std::result::Result<T, SproutError>;

/// Top-level error type for the Sprout compiler.
#[derive(Debug, Error)]
pub enum SproutError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Markup(#[from] MarkupError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// Errors reported by the design-document collaborator.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API answered with an error payload instead of data.
    #[error("Design API error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    /// The request never produced a usable response.
    #[error("Transport error fetching {target}: {message}")]
    Transport { target: String, message: String },

    /// The response body did not have the expected shape.
    #[error("Malformed response from {target}: {message}")]
    Malformed { target: String, message: String },
}

impl FetchError {
    /// Create an upstream error.
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Create a transport error.
    pub fn transport(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a malformed-response error.
    pub fn malformed(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            target: target.into(),
            message: message.into(),
        }
    }
}

/// Errors while transcoding vector markup.
#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("Invalid markup for node {node_id}: {message}")]
    Parse { node_id: String, message: String },

    #[error("Element '{element_id}' not found in markup for node {node_id}")]
    ElementNotFound { node_id: String, element_id: String },

    #[error("Markup for node {node_id} has no root element")]
    EmptyDocument { node_id: String },
}

impl MarkupError {
    /// Create a parse error attributed to a node.
    pub fn parse(node_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            node_id: node_id.into(),
            message: message.into(),
        }
    }

    /// Id of the node whose markup failed.
    pub fn node_id(&self) -> &str {
        match self {
            Self::Parse { node_id, .. }
            | Self::ElementNotFound { node_id, .. }
            | Self::EmptyDocument { node_id } => node_id,
        }
    }
}

/// Configuration errors, raised before any traversal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required option: {0}")]
    Missing(&'static str),

    #[error("Invalid value for option '{option}': {message}")]
    Invalid {
        option: &'static str,
        message: String,
    },

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
}

/// Errors raised while building components.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Component '{0}' references itself")]
    RecursiveComponent(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Template error: {0}")]
    Template(String),
}
