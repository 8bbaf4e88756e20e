//! Request handler and method dispatcher.

use crate::error::{ProtocolError, ProtocolResult};
use crate::protocol::types::*;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

/// Handler trait for processing MCP requests.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Handle initialize request.
    async fn initialize(&self, params: InitializeParams) -> ProtocolResult<InitializeResult>;

    /// Handle initialized notification.
    async fn initialized(&self) -> ProtocolResult<()>;

    /// Handle shutdown request.
    async fn shutdown(&self) -> ProtocolResult<()>;

    /// List available tools.
    async fn list_tools(&self) -> ProtocolResult<ListToolsResult>;

    /// Call a tool.
    async fn call_tool(&self, params: CallToolParams) -> ProtocolResult<CallToolResult>;

    /// List readable resources.
    async fn list_resources(&self) -> ProtocolResult<ListResourcesResult> {
        Ok(ListResourcesResult {
            resources: Vec::new(),
            next_cursor: None,
        })
    }

    /// Read one resource by URI.
    async fn read_resource(&self, params: ReadResourceParams) -> ProtocolResult<ReadResourceResult> {
        Err(ProtocolError::ResourceNotFound(params.uri))
    }

    /// List prompt templates.
    async fn list_prompts(&self) -> ProtocolResult<ListPromptsResult> {
        Ok(ListPromptsResult {
            prompts: Vec::new(),
            next_cursor: None,
        })
    }

    /// Render one prompt template by name.
    async fn get_prompt(&self, params: GetPromptParams) -> ProtocolResult<GetPromptResult> {
        Err(ProtocolError::PromptNotFound(params.name))
    }

    /// Handle ping request.
    async fn ping(&self) -> ProtocolResult<Value> {
        Ok(serde_json::json!({}))
    }
}

/// Method dispatcher that routes requests to appropriate handlers.
pub struct Dispatcher<H: Handler> {
    handler: Arc<H>,
}

impl<H: Handler> Dispatcher<H> {
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Dispatch a request to the appropriate handler method.
    #[instrument(skip(self, request), fields(method = %request.method))]
    pub async fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!("Dispatching request: {}", request.method);

        let handler = &self.handler;
        let result = match request.method.as_str() {
            "initialize" => match parse_params(request.params) {
                Ok(params) => to_value(handler.initialize(params).await),
                Err(e) => Err(e),
            },
            "initialized" | "notifications/initialized" => {
                handler.initialized().await.map(|()| Value::Null)
            }
            "shutdown" => handler.shutdown().await.map(|()| Value::Null),
            "ping" => handler.ping().await,
            "tools/list" => to_value(handler.list_tools().await),
            "tools/call" => match parse_params(request.params) {
                Ok(params) => to_value(handler.call_tool(params).await),
                Err(e) => Err(e),
            },
            "resources/list" => to_value(handler.list_resources().await),
            "resources/read" => match parse_params(request.params) {
                Ok(params) => to_value(handler.read_resource(params).await),
                Err(e) => Err(e),
            },
            "prompts/list" => to_value(handler.list_prompts().await),
            "prompts/get" => match parse_params(request.params) {
                Ok(params) => to_value(handler.get_prompt(params).await),
                Err(e) => Err(e),
            },
            method => {
                warn!("Unknown method: {}", method);
                Err(ProtocolError::MethodNotFound(method.to_string()))
            }
        };

        match result {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => {
                if e.is_server_fault() {
                    error!("Request failed: {}", e);
                } else {
                    warn!("Request rejected: {}", e);
                }
                JsonRpcResponse::error(request.id, JsonRpcError::from(&e))
            }
        }
    }
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> ProtocolResult<T> {
    params
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| ProtocolError::InvalidParams(e.to_string().into()))?
        .ok_or_else(|| ProtocolError::InvalidParams("Missing params".into()))
}

fn to_value<T: Serialize>(result: ProtocolResult<T>) -> ProtocolResult<Value> {
    serde_json::to_value(result?).map_err(|e| ProtocolError::InternalError(e.to_string().into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct MockHandler {
        initialized: AtomicBool,
    }

    impl MockHandler {
        fn new() -> Self {
            Self {
                initialized: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl Handler for MockHandler {
        async fn initialize(&self, _params: InitializeParams) -> ProtocolResult<InitializeResult> {
            self.initialized.store(true, Ordering::SeqCst);
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

        async fn call_tool(&self, params: CallToolParams) -> ProtocolResult<CallToolResult> {
            Ok(CallToolResult::text(params.name))
        }
    }

    #[tokio::test]
    async fn test_dispatcher_initialize() {
        let handler = Arc::new(MockHandler::new());
        let dispatcher = Dispatcher::new(handler.clone());

        let request = JsonRpcRequest::new("initialize")
            .with_id(1)
            .with_params(serde_json::json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {
                    "name": "test-client",
                    "version": "1.0"
                }
            }));

        let response = dispatcher.dispatch(request).await;
        assert!(response.result.is_some());
        assert!(response.error.is_none());
        assert!(handler.initialized.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_dispatcher_unknown_method() {
        let dispatcher = Dispatcher::new(Arc::new(MockHandler::new()));

        let request = JsonRpcRequest::new("unknown/method").with_id(1);
        let response = dispatcher.dispatch(request).await;

        assert!(response.result.is_none());
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn test_dispatcher_missing_params() {
        let dispatcher = Dispatcher::new(Arc::new(MockHandler::new()));

        let response = dispatcher
            .dispatch(JsonRpcRequest::new("tools/call").with_id(2))
            .await;
        assert_eq!(response.error.unwrap().code, -32602);

        let response = dispatcher
            .dispatch(
                JsonRpcRequest::new("tools/call")
                    .with_id(3)
                    .with_params(serde_json::json!({"arguments": {}})),
            )
            .await;
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_default_resource_and_prompt_handlers() {
        let dispatcher = Dispatcher::new(Arc::new(MockHandler::new()));

        let response = dispatcher
            .dispatch(JsonRpcRequest::new("resources/list").with_id(1))
            .await;
        assert_eq!(response.result.unwrap()["resources"], serde_json::json!([]));

        let response = dispatcher
            .dispatch(
                JsonRpcRequest::new("resources/read")
                    .with_id(2)
                    .with_params(serde_json::json!({"uri": "booking://all"})),
            )
            .await;
        assert_eq!(response.error.unwrap().code, -32002);

        let response = dispatcher
            .dispatch(
                JsonRpcRequest::new("prompts/get")
                    .with_id(3)
                    .with_params(serde_json::json!({"name": "anything"})),
            )
            .await;
        assert_eq!(response.error.unwrap().code, -32602);
    }
}
