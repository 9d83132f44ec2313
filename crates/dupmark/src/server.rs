//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes duplicate detection over MCP so assistants can ask which words a
//! draft repeats. Like the CLI commands, each tool is a thin wrapper around
//! `dupmark-core`.
//!
//! # Adding Tools
//!
//! 1. Define a parameter struct with `Deserialize` + `JsonSchema`
//! 2. Add a `#[tool(description = "...")]` method to the `#[tool_router]` impl
//! 3. Call core library functions, convert errors to `McpError`
//! 4. Return `CallToolResult::success(vec![Content::text(...)])`

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use dupmark_core::{DuplicateReport, Stopwords};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `find_duplicates` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct FindDuplicatesParams {
    /// The text to check.
    pub text: String,
    /// Words to ignore in addition to the configured stopwords.
    #[serde(default)]
    pub extra_stopwords: Option<Vec<String>>,
}

/// MCP server exposing duplicate detection to AI assistants.
#[derive(Clone)]
pub struct DupmarkServer {
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
    stopwords: Stopwords,
    max_input_bytes: Option<usize>,
}

impl Default for DupmarkServer {
    fn default() -> Self {
        Self::new(Stopwords::default(), Some(dupmark_core::DEFAULT_MAX_INPUT_BYTES))
    }
}

#[tool_router]
impl DupmarkServer {
    /// Create a new MCP server instance.
    pub fn new(stopwords: Stopwords, max_input_bytes: Option<usize>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            stopwords,
            max_input_bytes,
        }
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        #[allow(unused_variables)] Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
        });

        let text = if params.format == "json" {
            serde_json::to_string_pretty(&info)
                .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Find repeated words and the character ranges to highlight.
    #[tool(
        description = "Find repeated words in text. Returns each duplicated word with its character offsets and the [start, end) ranges to highlight."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn find_duplicates(
        &self,
        #[allow(unused_variables)] Parameters(params): Parameters<FindDuplicatesParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "find_duplicates",
            text_len = params.text.len(),
            "executing MCP tool"
        );

        if let Some(max) = self.max_input_bytes
            && params.text.len() > max
        {
            return Err(McpError::invalid_params(
                format!(
                    "input too large: {} bytes (limit: {max} bytes)",
                    params.text.len()
                ),
                None,
            ));
        }

        let report = match params.extra_stopwords {
            Some(ref extra) => {
                let stopwords = Stopwords::with_extra(
                    self.stopwords.extra().into_iter().chain(extra.iter().map(String::as_str)),
                );
                DuplicateReport::from_text(&params.text, &stopwords)
            }
            None => DuplicateReport::from_text(&params.text, &self.stopwords),
        };

        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(
            tool = "find_duplicates",
            duplicates = report.total_duplicates,
            ranges = report.total_ranges,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for DupmarkServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use find_duplicates to see which words a text repeats.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}
