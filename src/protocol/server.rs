//! MCP server with lifecycle management.

use crate::error::{McpError, ProtocolError, ProtocolResult, Result};
use crate::protocol::handler::{Dispatcher, Handler};
use crate::protocol::transport::{StdioTransport, Transport};
use crate::protocol::types::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info, instrument, warn};

/// Methods a client may send before `initialize` has succeeded.
const PRE_INIT_METHODS: &[&str] = &["initialize", "ping", "shutdown"];

/// MCP Server.
pub struct McpServer<H: Handler> {
    info: ServerInfo,
    capabilities: ServerCapabilities,
    handler: Arc<H>,
    initialized: AtomicBool,
}

impl<H: Handler> McpServer<H> {
    pub fn new(handler: H, info: ServerInfo, capabilities: ServerCapabilities) -> Self {
        Self {
            info,
            capabilities,
            handler: Arc::new(handler),
            initialized: AtomicBool::new(false),
        }
    }

    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    pub fn capabilities(&self) -> &ServerCapabilities {
        &self.capabilities
    }

    /// Whether an `initialize` request has been answered successfully.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Serve over stdin/stdout.
    #[instrument(skip(self), fields(server = %self.info.name))]
    pub async fn run(self) -> Result<()> {
        self.run_with_transport(Arc::new(StdioTransport::stdio())).await
    }

    /// Serve until end of input or a `shutdown` request.
    ///
    /// Malformed lines are answered with an error and skipped. Only a failing
    /// transport ends the loop early.
    pub async fn run_with_transport<T: Transport + 'static>(self, transport: Arc<T>) -> Result<()> {
        info!("Serving {} v{}", self.info.name, self.info.version);
        let dispatcher = Dispatcher::new(Arc::clone(&self.handler));

        loop {
            let request = match transport.read_message().await {
                Ok(Some(Message::Request(request))) => request,
                Ok(Some(Message::Response(response))) => {
                    warn!("Ignoring unsolicited response: {:?}", response.id);
                    continue;
                }
                Ok(None) => {
                    debug!("Input closed");
                    break;
                }
                Err(McpError::Protocol(fault)) => {
                    warn!("Rejecting unreadable message: {}", fault);
                    let reply = JsonRpcResponse::error(None, JsonRpcError::from(&fault));
                    send(transport.as_ref(), &reply).await;
                    continue;
                }
                Err(e) => {
                    error!("Transport failed: {}", e);
                    break;
                }
            };

            let silent = request.is_notification();
            let is_shutdown = request.method == "shutdown";

            let reply = match self.admit(&request.method) {
                Ok(()) => {
                    let is_initialize = request.method == "initialize";
                    let reply = dispatcher.dispatch(request).await;
                    if is_initialize && reply.error.is_none() {
                        self.initialized.store(true, Ordering::SeqCst);
                        info!("Client session initialized");
                    }
                    reply
                }
                Err(fault) => {
                    warn!("{}", fault);
                    JsonRpcResponse::error(request.id, JsonRpcError::from(&fault))
                }
            };

            if !silent {
                send(transport.as_ref(), &reply).await;
            }
            if is_shutdown {
                info!("Shutdown requested");
                break;
            }
        }

        info!("Server stopped");
        Ok(())
    }

    /// Refuse session methods until the client has initialized.
    fn admit(&self, method: &str) -> ProtocolResult<()> {
        if self.is_initialized()
            || PRE_INIT_METHODS.contains(&method)
            || method.starts_with("notifications/")
            || method == "initialized"
        {
            return Ok(());
        }
        Err(ProtocolError::InvalidRequest(
            format!("{} sent before initialize", method).into(),
        ))
    }
}

async fn send<T: Transport>(transport: &T, reply: &JsonRpcResponse) {
    if let Err(e) = transport.write_response(reply).await {
        error!("Failed to send response: {}", e);
    }
}

/// Builder for MCP Server.
pub struct McpServerBuilder<H: Handler> {
    handler: Option<H>,
    name: String,
    version: String,
    capabilities: ServerCapabilities,
}

impl<H: Handler> McpServerBuilder<H> {
    pub fn new() -> Self {
        Self {
            handler: None,
            name: env!("CARGO_PKG_NAME").into(),
            version: env!("CARGO_PKG_VERSION").into(),
            capabilities: ServerCapabilities::default(),
        }
    }

    pub fn handler(mut self, handler: H) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn capabilities(mut self, capabilities: ServerCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_tools(mut self) -> Self {
        self.capabilities.tools = Some(ToolsCapability {
            list_changed: Some(false),
        });
        self
    }

    pub fn with_resources(mut self) -> Self {
        self.capabilities.resources = Some(ResourcesCapability {
            subscribe: Some(false),
            list_changed: Some(false),
        });
        self
    }

    pub fn with_prompts(mut self) -> Self {
        self.capabilities.prompts = Some(PromptsCapability {
            list_changed: Some(false),
        });
        self
    }

    pub fn build(self) -> Result<McpServer<H>> {
        let handler = self.handler.ok_or_else(|| McpError::Internal {
            message: "Handler is required".into(),
        })?;

        Ok(McpServer::new(
            handler,
            ServerInfo {
                name: self.name,
                version: self.version,
            },
            self.capabilities,
        ))
    }
}

impl<H: Handler> Default for McpServerBuilder<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::transport::LineTransport;
    use async_trait::async_trait;
    use tokio::io::AsyncReadExt;

    struct TestHandler;

    #[async_trait]
    impl Handler for TestHandler {
        async fn initialize(&self, _params: InitializeParams) -> ProtocolResult<InitializeResult> {
            Ok(InitializeResult {
                protocol_version: MCP_VERSION.into(),
                capabilities: ServerCapabilities::default(),
                server_info: ServerInfo {
                    name: "test".into(),
                    version: "1.0".into(),
                },
                instructions: None,
            })
        }

        async fn initialized(&self) -> ProtocolResult<()> {
            Ok(())
        }

        async fn shutdown(&self) -> ProtocolResult<()> {
            Ok(())
        }

        async fn list_tools(&self) -> ProtocolResult<ListToolsResult> {
            Ok(ListToolsResult {
                tools: vec![],
                next_cursor: None,
            })
        }

        async fn call_tool(&self, _params: CallToolParams) -> ProtocolResult<CallToolResult> {
            Ok(CallToolResult::text("test"))
        }
    }

    #[test]
    fn test_server_builder() {
        let server = McpServerBuilder::new()
            .handler(TestHandler)
            .name("test-server")
            .version("0.1.0")
            .with_tools()
            .with_resources()
            .with_prompts()
            .build()
            .unwrap();

        assert_eq!(server.info().name, "test-server");
        assert_eq!(server.info().version, "0.1.0");
        assert!(server.capabilities().tools.is_some());
        assert!(server.capabilities().resources.is_some());
        assert!(server.capabilities().prompts.is_some());
    }

    #[test]
    fn test_builder_requires_handler() {
        assert!(McpServerBuilder::<TestHandler>::new().build().is_err());
    }

    #[test]
    fn test_admits_only_handshake_before_initialize() {
        let server = McpServerBuilder::new()
            .handler(TestHandler)
            .build()
            .unwrap();

        assert!(!server.is_initialized());
        for method in ["initialize", "ping", "shutdown", "notifications/initialized"] {
            assert!(server.admit(method).is_ok(), "{method} should be admitted");
        }
        let err = server.admit("tools/call").unwrap_err();
        assert_eq!(err.code(), -32600);

        server.initialized.store(true, Ordering::SeqCst);
        assert!(server.admit("tools/call").is_ok());
    }

    #[tokio::test]
    async fn test_loop_answers_requests_but_not_notifications() {
        let input: &'static [u8] = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            "garbage\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"shutdown"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":3,"method":"ping"}"#,
            "\n",
        )
        .as_bytes();
        let (writer, mut output) = tokio::io::duplex(16 * 1024);

        let server = McpServerBuilder::new()
            .handler(TestHandler)
            .build()
            .unwrap();
        server
            .run_with_transport(Arc::new(LineTransport::new(input, writer)))
            .await
            .unwrap();

        let mut written = String::new();
        output.read_to_string(&mut written).await.unwrap();
        let responses: Vec<JsonRpcResponse> = written
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        // ping, parse error, shutdown; the ping after shutdown is never read.
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0].id, Some(RequestId::Number(1)));
        assert_eq!(responses[1].error.as_ref().unwrap().code, -32700);
        assert_eq!(responses[2].id, Some(RequestId::Number(2)));
    }

    #[tokio::test]
    async fn test_loop_rejects_session_methods_before_initialize() {
        let input: &'static [u8] = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"book_cab"}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"c","version":"1"}}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"book_cab"}}"#,
            "\n",
        )
        .as_bytes();
        let (writer, mut output) = tokio::io::duplex(16 * 1024);

        let server = McpServerBuilder::new()
            .handler(TestHandler)
            .build()
            .unwrap();
        server
            .run_with_transport(Arc::new(LineTransport::new(input, writer)))
            .await
            .unwrap();

        let mut written = String::new();
        output.read_to_string(&mut written).await.unwrap();
        let responses: Vec<JsonRpcResponse> = written
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(responses.len(), 3);
        let early = responses[0].error.as_ref().unwrap();
        assert_eq!(early.code, -32600);
        assert!(early.message.contains("tools/call"));
        assert!(responses[1].error.is_none());
        assert_eq!(responses[2].result.as_ref().unwrap()["content"][0]["text"], "test");
    }
}
