//! Line-delimited transport for JSON-RPC messages.
//!
//! One JSON message per line. Stdio in production; any async reader/writer
//! pair (such as `tokio::io::duplex`) in tests.

use crate::error::{McpError, ProtocolError, Result};
use crate::protocol::types::{JsonRpcRequest, JsonRpcResponse, Message};
use serde::Deserialize;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};
use tokio::sync::Mutex;
use tracing::{debug, error, trace};

/// Transport trait for MCP communication.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Next message, or `None` at end of input.
    async fn read_message(&self) -> Result<Option<Message>>;
    async fn write_message(&self, message: &Message) -> Result<()>;
    async fn write_response(&self, response: &JsonRpcResponse) -> Result<()>;
}

/// Newline-delimited JSON over an async reader/writer pair.
pub struct LineTransport<R, W> {
    reader: Mutex<R>,
    writer: Mutex<W>,
}

/// Transport bound to the process's stdin and stdout.
pub type StdioTransport = LineTransport<BufReader<Stdin>, Stdout>;

impl<R, W> LineTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
        }
    }

    /// Read the next non-blank line.
    async fn read_line(&self) -> Result<Option<String>> {
        let mut reader = self.reader.lock().await;
        let mut line = String::new();

        loop {
            line.clear();
            match reader.read_line(&mut line).await {
                Ok(0) => return Ok(None), // EOF
                Ok(_) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    trace!("Received line: {}", trimmed);
                    return Ok(Some(trimmed.to_string()));
                }
                Err(e) => {
                    error!("Error reading from transport: {}", e);
                    return Err(McpError::Io(e));
                }
            }
        }
    }

    async fn write_line(&self, content: &str) -> Result<()> {
        let mut writer = self.writer.lock().await;
        trace!("Sending line: {}", content);
        writer.write_all(content.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        Ok(())
    }
}

impl StdioTransport {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::stdio()
    }
}

#[async_trait::async_trait]
impl<R, W> Transport for LineTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn read_message(&self) -> Result<Option<Message>> {
        let Some(line) = self.read_line().await? else {
            return Ok(None);
        };

        let value: serde_json::Value = serde_json::from_str(&line).map_err(|e| {
            error!("Failed to parse message: {}", e);
            ProtocolError::ParseError
        })?;

        // Request first, then response
        if let Ok(request) = JsonRpcRequest::deserialize(&value) {
            debug!("Received request: method={}", request.method);
            return Ok(Some(Message::Request(request)));
        }
        match JsonRpcResponse::deserialize(&value) {
            Ok(response) => {
                debug!("Received response: id={:?}", response.id);
                Ok(Some(Message::Response(response)))
            }
            Err(e) => Err(ProtocolError::InvalidRequest(e.to_string().into()).into()),
        }
    }

    async fn write_message(&self, message: &Message) -> Result<()> {
        let json = serde_json::to_string(message)?;
        self.write_line(&json).await
    }

    async fn write_response(&self, response: &JsonRpcResponse) -> Result<()> {
        let json = serde_json::to_string(response)?;
        debug!("Sending response: id={:?}", response.id);
        self.write_line(&json).await
    }
}
