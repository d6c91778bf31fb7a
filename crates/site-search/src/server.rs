use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use tokio::sync::RwLock;
use tracing::info;

use crate::error::AppError;
use crate::model::{GroupedResults, ItemKind, SearchItem};
use crate::search::SearchIndex;
use crate::update::UpdateService;
use site_common::api::{
    ComparePerformanceParams, GetItemParams, ItemDetailResponse, ItemSummary, KindListResponse,
    ListKindParams, PhaseView, ReloadContentResponse, ScenarioView, SearchContentParams,
    SearchContentResponse, SimulateRenderingParams, SimulationResponse,
};
use site_demos::performance::MAX_ITEM_COUNT;
use site_demos::{
    NetworkPreset, PerformanceModel, PerformanceSettings, RenderingModel, RenderingSettings,
    ScenarioModel, SimulationSnapshot, Simulator,
};

pub struct AppState {
    pub index: Arc<SearchIndex>,
    pub fingerprint: String,
}

#[derive(Clone)]
pub struct SiteSearchServer {
    state: Arc<RwLock<AppState>>,
    update_service: Arc<UpdateService>,
    tool_router: ToolRouter<SiteSearchServer>,
}

impl SiteSearchServer {
    pub fn new(items: Vec<SearchItem>, fingerprint: String, update_service: UpdateService) -> Self {
        let state = Arc::new(RwLock::new(AppState {
            index: Arc::new(SearchIndex::new(items)),
            fingerprint,
        }));

        Self {
            state,
            update_service: Arc::new(update_service),
            tool_router: Self::tool_router(),
        }
    }

    /// The index currently served; callers keep it alive across a reload.
    pub async fn index(&self) -> Arc<SearchIndex> {
        Arc::clone(&self.state.read().await.index)
    }
}

#[tool_router]
impl SiteSearchServer {
    #[tool(description = "Search courses, course sections, blog articles and article headings. \
                          Every word of the query must appear in a result.")]
    async fn search_content(
        &self,
        Parameters(params): Parameters<SearchContentParams>,
    ) -> Result<Json<SearchContentResponse>, String> {
        let query = params.query.trim().to_string();
        if query.is_empty() {
            return Err("query must not be empty".to_string());
        }

        let results = self.index().await.search(&query);
        Ok(Json(to_api_results(&results)))
    }

    #[tool(description = "Get a course, section, article or heading by its href (e.g. '/blog/tdd-front-end').")]
    async fn get_item(
        &self,
        Parameters(params): Parameters<GetItemParams>,
    ) -> Result<Json<ItemDetailResponse>, String> {
        let href = params.href.trim().to_string();
        if href.is_empty() {
            return Err("href must not be empty".to_string());
        }

        let index = self.index().await;
        let item = index
            .find_by_href(&href)
            .ok_or_else(|| format!("item not found: {href}"))?;

        Ok(Json(to_api_detail(item)))
    }

    #[tool(description = "List every item of one kind: guide, guide-section, article or article-heading.")]
    async fn list_kind(
        &self,
        Parameters(params): Parameters<ListKindParams>,
    ) -> Result<Json<KindListResponse>, String> {
        let kind_name = params.kind.trim().to_string();
        if kind_name.is_empty() {
            return Err("kind must not be empty".to_string());
        }

        let kind: ItemKind = kind_name.parse().map_err(|_| {
            let available: Vec<&str> = ItemKind::ALL.iter().map(|k| k.as_str()).collect();
            format!(
                "unknown kind: '{kind_name}'. Available kinds: {}",
                available.join(", ")
            )
        })?;

        let index = self.index().await;
        let items = index.items_of_kind(kind).map(|i| to_api_summary(i)).collect();

        Ok(Json(KindListResponse {
            kind: kind.to_string(),
            items,
        }))
    }

    #[tool(description = "Reload the content registry from the content directory if it changed.")]
    async fn reload_content(&self) -> Result<Json<ReloadContentResponse>, String> {
        info!("reload_content tool invoked");

        let (result, new_items) = self
            .update_service
            .update()
            .await
            .map_err(|e| format!("reload failed: {e}"))?;

        if let Some(items) = new_items {
            let item_count = items.len();
            let mut state = self.state.write().await;
            state.index = Arc::new(SearchIndex::new(items));
            state.fingerprint = result.fingerprint.clone();
            info!(item_count, "in-memory registry replaced");
        }

        let state = self.state.read().await;
        let response = ReloadContentResponse {
            updated: result.updated,
            fingerprint: state.fingerprint.clone(),
            item_count: state.index.len(),
        };

        Ok(Json(response))
    }

    #[tool(description = "Timeline of CSR, SSR, SSG and ISR page loads for a network preset \
                          (fibre, 4g, 3g, slow-3g), optionally inspected at a given millisecond.")]
    async fn simulate_rendering(
        &self,
        Parameters(params): Parameters<SimulateRenderingParams>,
    ) -> Result<Json<SimulationResponse>, String> {
        rendering_simulation(&params)
            .map(Json)
            .map_err(|e| e.to_string())
    }

    #[tool(description = "Compare rendering strategies for a long list (naive, React.memo, \
                          useMemo, virtualization). Timings are illustrative constants.")]
    async fn compare_performance(
        &self,
        Parameters(params): Parameters<ComparePerformanceParams>,
    ) -> Result<Json<SimulationResponse>, String> {
        let settings = PerformanceSettings {
            item_count: params
                .item_count
                .unwrap_or(PerformanceSettings::default().item_count)
                .clamp(1, MAX_ITEM_COUNT),
        };

        simulate(PerformanceModel, settings, params.elapsed_ms)
            .map(Json)
            .map_err(|e| e.to_string())
    }
}

fn rendering_simulation(params: &SimulateRenderingParams) -> Result<SimulationResponse, AppError> {
    let defaults = RenderingSettings::default();
    let network = match params.network.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.parse::<NetworkPreset>()?,
        _ => defaults.network,
    };
    let settings = RenderingSettings {
        network,
        cache_hit: params.cache_hit.unwrap_or(defaults.cache_hit),
    };

    simulate(RenderingModel, settings, params.elapsed_ms)
}

fn simulate<M: ScenarioModel>(
    model: M,
    settings: M::Settings,
    elapsed_ms: Option<f64>,
) -> Result<SimulationResponse, AppError> {
    let simulator = Simulator::new(model, settings, 1.0)?;
    let snapshot = simulator.snapshot_at(elapsed_ms.unwrap_or(f64::INFINITY));
    Ok(to_api_simulation(&simulator, &snapshot))
}

fn to_api_summary(item: &SearchItem) -> ItemSummary {
    ItemSummary {
        kind: item.kind.to_string(),
        title: item.title.clone(),
        href: item.href.clone(),
        parent_title: item.parent_title.clone(),
    }
}

fn to_api_results(results: &GroupedResults) -> SearchContentResponse {
    let summaries = |kind: ItemKind| -> Vec<ItemSummary> {
        results.group(kind).iter().map(|i| to_api_summary(i)).collect()
    };

    SearchContentResponse {
        guides: summaries(ItemKind::Guide),
        guide_sections: summaries(ItemKind::GuideSection),
        articles: summaries(ItemKind::Article),
        article_headings: summaries(ItemKind::ArticleHeading),
        total: results.len(),
    }
}

fn to_api_detail(item: &SearchItem) -> ItemDetailResponse {
    ItemDetailResponse {
        kind: item.kind.to_string(),
        title: item.title.clone(),
        description: item.description.clone(),
        href: item.href.clone(),
        tags: item.tags.clone(),
        parent_title: item.parent_title.clone(),
        keywords: item.keywords.clone(),
    }
}

fn to_api_simulation<M: ScenarioModel>(
    simulator: &Simulator<M>,
    snapshot: &SimulationSnapshot,
) -> SimulationResponse {
    let scenarios = simulator
        .timeline()
        .scenarios
        .iter()
        .zip(&snapshot.scenarios)
        .map(|(scenario, view)| ScenarioView {
            id: view.id.clone(),
            label: view.label.clone(),
            phases: scenario
                .phases
                .iter()
                .map(|p| PhaseView {
                    kind: p.kind.as_str().to_string(),
                    start_ms: p.start_ms,
                    duration_ms: p.duration_ms,
                })
                .collect(),
            active_phase: view.active_phase.map(|k| k.as_str().to_string()),
            progress: view.progress,
            first_paint_ms: view.first_paint_ms,
            interactive_ms: view.interactive_ms,
        })
        .collect();

    SimulationResponse {
        state: snapshot.state.as_str().to_string(),
        elapsed_ms: snapshot.elapsed_ms,
        max_duration_ms: snapshot.max_duration_ms,
        scenarios,
    }
}

#[tool_handler]
impl ServerHandler for SiteSearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "site-search".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Course site search server. Use search_content for keyword queries over courses \
                 and articles, get_item to resolve an href, list_kind to browse one kind of \
                 item, reload_content to pick up content edits, and simulate_rendering / \
                 compare_performance for the interactive demo timelines."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::registry;

    fn server() -> SiteSearchServer {
        SiteSearchServer::new(
            registry::builtin_items(),
            "builtin".to_string(),
            UpdateService::new(Config::default()),
        )
    }

    #[test]
    fn tools_publish_output_schemas() {
        let tools = SiteSearchServer::tool_router().list_all();
        for name in [
            "search_content",
            "get_item",
            "list_kind",
            "reload_content",
            "simulate_rendering",
            "compare_performance",
        ] {
            let tool = tools
                .iter()
                .find(|t| t.name == name)
                .unwrap_or_else(|| panic!("missing tool: {name}"));
            assert!(
                tool.output_schema.is_some(),
                "tool {name} should publish output_schema"
            );
        }
    }

    #[tokio::test]
    async fn search_returns_grouped_summaries() {
        let Json(response) = server()
            .search_content(Parameters(SearchContentParams {
                query: "tdd   front".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(response.articles.len(), 1);
        assert_eq!(response.articles[0].kind, "article");
        assert_eq!(
            response.total,
            response.guides.len()
                + response.guide_sections.len()
                + response.articles.len()
                + response.article_headings.len()
        );
    }

    #[tokio::test]
    async fn empty_query_is_rejected() {
        let err = server()
            .search_content(Parameters(SearchContentParams {
                query: "   ".to_string(),
            }))
            .await
            .err().unwrap();
        assert!(err.contains("empty"));
    }

    #[tokio::test]
    async fn missing_item_reports_not_found() {
        let err = server()
            .get_item(Parameters(GetItemParams {
                href: "/blog/nope".to_string(),
            }))
            .await
            .err().unwrap();
        assert_eq!(err, "item not found: /blog/nope");
    }

    #[tokio::test]
    async fn unknown_kind_lists_available_kinds() {
        let err = server()
            .list_kind(Parameters(ListKindParams {
                kind: "chapter".to_string(),
            }))
            .await
            .err().unwrap();
        assert!(err.contains("guide-section"));
    }

    #[tokio::test]
    async fn builtin_reload_is_a_no_op() {
        let server = server();
        // The service has not recorded a load yet, so the first reload swaps in
        // the same built-in registry.
        let Json(first) = server.reload_content().await.unwrap();
        assert_eq!(first.fingerprint, "builtin");
        let Json(second) = server.reload_content().await.unwrap();
        assert!(!second.updated);
        assert_eq!(second.item_count, first.item_count);
        assert_eq!(second.fingerprint, first.fingerprint);
    }

    #[tokio::test]
    async fn up_to_date_reload_reports_served_fingerprint() {
        let update_service = UpdateService::new(Config::default());
        let (items, fingerprint) = update_service.load().await.unwrap();
        let server = SiteSearchServer::new(items, fingerprint, update_service);

        let Json(response) = server.reload_content().await.unwrap();
        assert!(!response.updated);
        assert_eq!(response.fingerprint, "builtin");
        assert_eq!(response.item_count, server.index().await.len());
    }

    #[test]
    fn simulation_errors_keep_their_source() {
        let err = rendering_simulation(&SimulateRenderingParams {
            network: Some("dial-up".to_string()),
            cache_hit: None,
            elapsed_ms: None,
        })
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::Simulation(site_demos::SimError::UnknownPreset(ref name)) if name == "dial-up"
        ));
    }

    #[tokio::test]
    async fn rendering_simulation_defaults_to_final_frame() {
        let Json(response) = server()
            .simulate_rendering(Parameters(SimulateRenderingParams {
                network: Some("slow-3g".to_string()),
                cache_hit: None,
                elapsed_ms: None,
            }))
            .await
            .unwrap();
        assert_eq!(response.state, "completed");
        assert_eq!(response.elapsed_ms, response.max_duration_ms);
        assert_eq!(response.scenarios.len(), 4);
        assert!(response.scenarios.iter().all(|s| s.progress == 1.0));
    }

    #[tokio::test]
    async fn unknown_network_preset_is_rejected() {
        let err = server()
            .simulate_rendering(Parameters(SimulateRenderingParams {
                network: Some("dial-up".to_string()),
                cache_hit: None,
                elapsed_ms: Some(10.0),
            }))
            .await
            .err().unwrap();
        assert!(err.contains("dial-up"));
    }

    #[tokio::test]
    async fn performance_comparison_uses_display_name_timings() {
        let Json(response) = server()
            .compare_performance(Parameters(ComparePerformanceParams {
                item_count: None,
                elapsed_ms: Some(50.0),
            }))
            .await
            .unwrap();
        assert_eq!(response.state, "running");
        let virtualized = response
            .scenarios
            .iter()
            .find(|s| s.id == "virtualized")
            .unwrap();
        assert_eq!(virtualized.interactive_ms, 10.0);
        assert_eq!(virtualized.progress, 1.0);
    }
}
