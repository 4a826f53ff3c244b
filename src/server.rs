//! MCP server exposing the Search Console tools.

use std::sync::Arc;

use rmcp::{
    model::{
        CallToolRequestParams, CallToolResult, Content, ErrorData as McpError, Implementation,
        ListToolsResult, PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
        Tool,
    },
    service::{RequestContext, RoleServer},
    ServerHandler,
};

use crate::tools::{Dispatcher, OperationDescriptor, ToolResponse};

/// Search Console MCP Server.
#[derive(Clone)]
pub struct GscServer {
    dispatcher: Arc<Dispatcher>,
}

impl GscServer {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    fn tools(&self) -> Vec<Tool> {
        self.dispatcher
            .registry()
            .list_operations()
            .iter()
            .map(to_tool)
            .collect()
    }
}

fn to_tool(descriptor: &OperationDescriptor) -> Tool {
    Tool::new(
        descriptor.name,
        descriptor.description,
        Arc::new(descriptor.input_schema.clone()),
    )
}

impl From<ToolResponse> for CallToolResult {
    fn from(response: ToolResponse) -> Self {
        let content: Vec<Content> = response
            .content
            .into_iter()
            .map(|block| Content::text(block.text))
            .collect();
        if response.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        }
    }
}

impl ServerHandler for GscServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Google Search Console MCP Server - list verified sites, query search \
                analytics (clicks, impressions, CTR, position) and manage sitemaps for the \
                configured property."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let response = self
            .dispatcher
            .dispatch(&request.name, request.arguments)
            .await;
        Ok(response.into())
    }
}
