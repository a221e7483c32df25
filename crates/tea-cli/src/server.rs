use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};
use tea_core::{TeaRecord, WireExport, analyze_batch, import_records, summarize};
use tea_store::TeaLibrary;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct TeaServer {
    state: Arc<Mutex<TeaLibrary>>,
    tool_router: ToolRouter<Self>,
}

impl TeaServer {
    pub fn new(library: TeaLibrary) -> Self {
        Self {
            state: Arc::new(Mutex::new(library)),
            tool_router: Self::tool_router(),
        }
    }
}

fn json_result(value: &impl serde::Serialize) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn parse_record(value: Value) -> Result<TeaRecord, McpError> {
    serde_json::from_value(value)
        .map_err(|e| McpError::invalid_params(format!("invalid tea record: {e}"), None))
}

// --- Tool parameter types ---

#[derive(Debug, Deserialize, JsonSchema)]
struct AnalyzeRequest {
    /// Tea record: { name?, teaType?, flavorProfile?: [..], caffeineLevel?,
    /// lTheanineLevel?, processingMethods?: [..], geography?: { altitude?,
    /// humidity?, temperature?, solarRadiation?, latitude? } }
    record: Option<Value>,
    /// Analyze a saved tea by name instead of an inline record
    name: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct BatchRequest {
    /// An array of tea records, a single record, or { "teas": [...] }
    teas: Value,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SaveRequest {
    /// Tea record to save; must carry a name
    record: Value,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ConfigGetRequest {
    /// Dotted key path such as "elementWeights.flavor"; omit for everything
    path: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ConfigSetRequest {
    /// Dotted key path such as "thermal.enabled"
    path: Option<String>,
    /// New value for `path`
    value: Option<Value>,
    /// Several writes at once, keyed by path. Applied atomically.
    updates: Option<Map<String, Value>>,
}

#[tool_router]
impl TeaServer {
    #[tool(
        description = "Analyze a tea's five-element (wood, fire, earth, metal, water) profile from its flavor descriptors, caffeine/L-theanine levels (1-10), processing methods and growing geography. Any attribute may be omitted. Returns the normalized distribution, dominant and supporting elements, per-attribute scores, applied weights and the thermal (warming/cooling) analysis."
    )]
    async fn tea_analyze(
        &self,
        Parameters(req): Parameters<AnalyzeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let library = self.state.lock().await;

        let analysis = match (req.record, req.name) {
            (Some(record), _) => library.combiner().combine(&parse_record(record)?),
            (None, Some(name)) => library
                .analyze_saved(&name)
                .map_err(|e| McpError::internal_error(e.to_string(), None))?
                .ok_or_else(|| McpError::invalid_params(format!("no tea named {name:?}"), None))?,
            (None, None) => {
                return Err(McpError::invalid_params(
                    "provide either a record or the name of a saved tea",
                    None,
                ));
            }
        };
        json_result(&analysis)
    }

    #[tool(
        description = "Analyze many teas at once. Returns an export { version, timestamp, analyses: [{ name, record, analysis }] } plus summary counts."
    )]
    async fn tea_batch(
        &self,
        Parameters(req): Parameters<BatchRequest>,
    ) -> Result<CallToolResult, McpError> {
        let records = import_records(&req.teas.to_string())
            .map_err(|e| McpError::invalid_params(format!("invalid teas: {e}"), None))?;

        let library = self.state.lock().await;
        let combiner = library.combiner();
        let analyses = analyze_batch(&combiner, &records);
        let summary = summarize(&analyses);
        let export = WireExport::new(records.iter().zip(&analyses));

        json_result(&serde_json::json!({
            "export": export,
            "summary": summary,
        }))
    }

    #[tool(
        description = "Save a named tea record to the library (replacing any tea with the same name), analyze it, and keep the analysis in its history."
    )]
    async fn tea_save(
        &self,
        Parameters(req): Parameters<SaveRequest>,
    ) -> Result<CallToolResult, McpError> {
        let record = parse_record(req.record)?;
        if record.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
            return Err(McpError::invalid_params("record.name is required", None));
        }

        let library = self.state.lock().await;
        let (id, analysis) = library
            .save_and_analyze(&record)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        json_result(&serde_json::json!({
            "id": id,
            "name": record.display_name(),
            "analysis": analysis,
        }))
    }

    #[tool(description = "List saved teas with their analysis counts.")]
    async fn tea_list(&self) -> Result<CallToolResult, McpError> {
        let library = self.state.lock().await;
        let teas = library
            .store()
            .list_teas()
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        json_result(&serde_json::json!({ "teas": teas }))
    }

    #[tool(
        description = "Read engine configuration by dotted key path (e.g. elementWeights.flavor, thermal.enabled, diminishingReturns.formula). Omit the path to get everything."
    )]
    async fn tea_config_get(
        &self,
        Parameters(req): Parameters<ConfigGetRequest>,
    ) -> Result<CallToolResult, McpError> {
        let library = self.state.lock().await;
        let path = req.path.unwrap_or_default();
        let value = library
            .config()
            .get(&path)
            .ok_or_else(|| McpError::invalid_params(format!("unknown config key {path:?}"), None))?;
        json_result(&value)
    }

    #[tool(
        description = "Change engine configuration and persist it. Pass path + value for one key or `updates` for several. Element weights are renormalized to sum 1.0; a weight of 1.0 or more makes that attribute exclusive. Diminishing-returns formulas: power:<exponent>, inverse_sqrt, log, linear."
    )]
    async fn tea_config_set(
        &self,
        Parameters(req): Parameters<ConfigSetRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut entries: Vec<(String, Value)> = req.updates.unwrap_or_default().into_iter().collect();
        match (req.path, req.value) {
            (Some(path), Some(value)) => entries.push((path, value)),
            (Some(path), None) => {
                return Err(McpError::invalid_params(format!("missing value for {path}"), None));
            }
            (None, _) => {}
        }
        if entries.is_empty() {
            return Err(McpError::invalid_params("nothing to update", None));
        }

        let mut library = self.state.lock().await;
        library
            .update_config(entries)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        let config = library.config().get("").unwrap_or(Value::Null);
        json_result(&config)
    }
}

#[tool_handler]
impl ServerHandler for TeaServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Five-element tea analysis.\n\n\
                 - tea_analyze: score one tea (inline record or saved name).\n\
                 - tea_batch: score many teas and get an export.\n\
                 - tea_save / tea_list: manage the saved tea library.\n\
                 - tea_config_get / tea_config_set: inspect and tune weights, interaction \
                   strengths, thermal adjustment and diminishing returns.\n\n\
                 Attributes are optional; missing ones are excluded from weighting. \
                 A tea with no usable attribute returns status insufficient_data."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
