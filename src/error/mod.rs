//! Error types for the cab booking server.
//!
//! Uses `thiserror` for ergonomic error definitions with automatic `From` conversions.

use std::borrow::Cow;
use thiserror::Error;

/// Main error type for the cab booking server.
#[derive(Debug, Error)]
pub enum McpError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Booking error: {0}")]
    Booking(#[from] BookingError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal { message: Cow<'static, str> },
}

/// JSON-RPC 2.0 and MCP protocol errors.
///
/// These travel back to the client as JSON-RPC error objects, so they are
/// reserved for requests the client got wrong at the protocol level.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Parse error: invalid JSON")]
    ParseError,

    #[error("Invalid request: {0}")]
    InvalidRequest(Cow<'static, str>),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(Cow<'static, str>),

    #[error("Internal error: {0}")]
    InternalError(Cow<'static, str>),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Unknown prompt: {0}")]
    PromptNotFound(String),
}

impl ProtocolError {
    /// Returns the JSON-RPC 2.0 error code.
    pub fn code(&self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest(_) => -32600,
            Self::MethodNotFound(_) => -32601,
            Self::InvalidParams(_) => -32602,
            Self::InternalError(_) => -32603,
            Self::ResourceNotFound(_) => -32002,
            Self::PromptNotFound(_) => -32602,
        }
    }

    /// Whether the server, rather than the client, is at fault.
    pub fn is_server_fault(&self) -> bool {
        matches!(self, Self::InternalError(_))
    }
}

/// Booking registry errors.
///
/// Both variants are recoverable and never leave the registry modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("Invalid {field}: {message}")]
    InvalidInput {
        field: Cow<'static, str>,
        message: Cow<'static, str>,
    },

    #[error("Booking {0} not found")]
    NotFound(String),

    #[error("No booking ids left to issue")]
    IdsExhausted,
}

impl BookingError {
    pub fn invalid(
        field: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(Cow<'static, str>),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        field: Cow<'static, str>,
        message: Cow<'static, str>,
    },
}

/// Tool call errors. Reported to the client as tool content, not as protocol faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownAction(String),

    #[error("Missing required argument: {0}")]
    MissingArgument(Cow<'static, str>),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("{0}")]
    Rejected(#[from] BookingError),
}

/// Result type alias for McpError.
pub type Result<T> = std::result::Result<T, McpError>;

/// Result type alias for BookingError.
pub type BookingResult<T> = std::result::Result<T, BookingError>;

/// Result type alias for ProtocolError.
pub type ProtocolResult<T> = std::result::Result<T, ProtocolError>;

/// Result type alias for ToolError.
pub type ToolResult<T> = std::result::Result<T, ToolError>;
