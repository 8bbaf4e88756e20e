//! MCP request handler implementation.

use crate::error::ProtocolResult;
use crate::protocol::{
    CallToolParams, CallToolResult, GetPromptParams, GetPromptResult, Handler, InitializeParams,
    InitializeResult, ListPromptsResult, ListResourcesResult, ListToolsResult, MCP_VERSION,
    PromptsCapability, ReadResourceParams, ReadResourceResult, ResourcesCapability,
    ServerCapabilities, ServerInfo, ToolsCapability,
};
use crate::server::state::ServerState;
use crate::tools;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

const INSTRUCTIONS: &str = "Cab booking server. \
    Tools: book_cab (pickup_location, dropoff_location, pickup_datetime in ISO 8601, \
    cab_type Standard/Premium/Luxury), check_booking_status (booking_id), \
    list_available_cabs (location). \
    Resource booking://all lists every booking as JSON. \
    Prompt booking_assistant provides guidance for taking bookings.";

/// MCP request handler that processes protocol messages.
pub struct McpHandler {
    state: Arc<ServerState>,
}

impl McpHandler {
    pub fn new(state: Arc<ServerState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &Arc<ServerState> {
        &self.state
    }
}

#[async_trait]
impl Handler for McpHandler {
    async fn initialize(&self, params: InitializeParams) -> ProtocolResult<InitializeResult> {
        info!(
            "Initialize request from {} v{}",
            params.client_info.name, params.client_info.version
        );
        debug!("Client capabilities: {:?}", params.capabilities);

        self.state.set_initialized(params.client_info);

        let capabilities = ServerCapabilities {
            tools: Some(ToolsCapability {
                list_changed: Some(false),
            }),
            resources: Some(ResourcesCapability {
                subscribe: Some(false),
                list_changed: Some(false),
            }),
            prompts: Some(PromptsCapability {
                list_changed: Some(false),
            }),
        };

        Ok(InitializeResult {
            protocol_version: MCP_VERSION.into(),
            capabilities,
            server_info: ServerInfo {
                name: self.state.config.name.to_string(),
                version: self.state.config.version.to_string(),
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        })
    }

    async fn initialized(&self) -> ProtocolResult<()> {
        info!("Server initialized successfully");
        Ok(())
    }

    async fn shutdown(&self) -> ProtocolResult<()> {
        info!(
            "Shutdown request received after {} tool calls, {} bookings",
            self.state.tool_calls(),
            self.state.bookings.len()
        );
        Ok(())
    }

    async fn list_tools(&self) -> ProtocolResult<ListToolsResult> {
        let tools = tools::definitions();
        debug!("Listing {} tools", tools.len());

        Ok(ListToolsResult {
            tools,
            next_cursor: None,
        })
    }

    async fn call_tool(&self, params: CallToolParams) -> ProtocolResult<CallToolResult> {
        let seq = self.state.record_tool_call();
        debug!("Tool call #{}: {}", seq, params.name);

        let reply = self.state.dispatcher.dispatch(&params.name, params.arguments);
        Ok(reply.into())
    }

    async fn list_resources(&self) -> ProtocolResult<ListResourcesResult> {
        Ok(ListResourcesResult {
            resources: self.state.resources.list(),
            next_cursor: None,
        })
    }

    async fn read_resource(&self, params: ReadResourceParams) -> ProtocolResult<ReadResourceResult> {
        debug!("Reading resource: {}", params.uri);
        self.state.resources.read(&params.uri)
    }

    async fn list_prompts(&self) -> ProtocolResult<ListPromptsResult> {
        Ok(ListPromptsResult {
            prompts: self.state.prompts.list(),
            next_cursor: None,
        })
    }

    async fn get_prompt(&self, params: GetPromptParams) -> ProtocolResult<GetPromptResult> {
        debug!("Rendering prompt: {}", params.name);
        let arguments = params.arguments.unwrap_or_default();
        self.state.prompts.render(&params.name, &arguments)
    }
}
