use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchContentParams {
    /// Free-text query. Every whitespace-separated term must appear in a result.
    pub query: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetItemParams {
    /// Navigation target of the item, e.g. "/blog/tdd-front-end".
    pub href: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListKindParams {
    /// One of "guide", "guide-section", "article", "article-heading".
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SimulateRenderingParams {
    /// Network preset: "fibre", "4g", "3g" or "slow-3g" (default: "4g").
    pub network: Option<String>,
    /// Whether the incremental regeneration cache already holds the page (default: true).
    pub cache_hit: Option<bool>,
    /// Point on the timeline to inspect, in simulated milliseconds (default: end).
    pub elapsed_ms: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ComparePerformanceParams {
    /// Number of rows in the rendered list (default: 1000, max: 100000).
    pub item_count: Option<u32>,
    /// Point on the timeline to inspect, in simulated milliseconds (default: end).
    pub elapsed_ms: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ItemSummary {
    pub kind: String,
    pub title: String,
    pub href: String,
    pub parent_title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchContentResponse {
    pub guides: Vec<ItemSummary>,
    pub guide_sections: Vec<ItemSummary>,
    pub articles: Vec<ItemSummary>,
    pub article_headings: Vec<ItemSummary>,
    /// Length of the flattened result list.
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ItemDetailResponse {
    pub kind: String,
    pub title: String,
    pub description: Option<String>,
    pub href: String,
    pub tags: Vec<String>,
    pub parent_title: Option<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KindListResponse {
    pub kind: String,
    pub items: Vec<ItemSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReloadContentResponse {
    pub updated: bool,
    pub fingerprint: String,
    pub item_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PhaseView {
    pub kind: String,
    pub start_ms: f64,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScenarioView {
    pub id: String,
    pub label: String,
    pub phases: Vec<PhaseView>,
    /// Phase in progress at the inspected time, if any.
    pub active_phase: Option<String>,
    /// Fraction of the scenario completed, in [0, 1].
    pub progress: f64,
    pub first_paint_ms: Option<f64>,
    pub interactive_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SimulationResponse {
    pub state: String,
    pub elapsed_ms: f64,
    pub max_duration_ms: f64,
    pub scenarios: Vec<ScenarioView>,
}
