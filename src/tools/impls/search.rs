//! Network information search, filtered to results about the Rivalz network

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::parse_params;
use crate::config::ToolsConfig;
use crate::tools::schema::{object_schema, string_prop};
use crate::tools::{Tool, ToolEnv, ToolOutcome};

/// One search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// An external web search capability
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;
}

/// How raw hits are narrowed down
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    pub context: String,
    pub brand_token: String,
    pub max_results: usize,
}

impl SearchSettings {
    pub fn from_config(config: &ToolsConfig) -> Self {
        Self {
            context: config.search_context.clone(),
            brand_token: config.brand_token.clone(),
            max_results: config.max_search_results,
        }
    }

    fn mentions_brand(&self, hit: &SearchHit) -> bool {
        let token = self.brand_token.to_lowercase();
        hit.title.to_lowercase().contains(&token) || hit.snippet.to_lowercase().contains(&token)
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::from_config(&ToolsConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Results(Vec<SearchHit>),
    NoResults { query: String },
    Failed(String),
}

impl SearchOutcome {
    pub fn to_payload(&self) -> Value {
        match self {
            Self::Results(hits) => json!({ "results": hits }),
            Self::NoResults { query } => json!({
                "results": [],
                "message": format!("No relevant results found for '{}'", query),
            }),
            Self::Failed(error) => json!({ "error": format!("Search failed: {}", error) }),
        }
    }
}

/// Search once with the context appended, keep hits mentioning the brand token.
pub async fn search_network_info(
    provider: &dyn SearchProvider,
    query: &str,
    settings: &SearchSettings,
) -> SearchOutcome {
    let full_query = format!("{} {}", query.trim(), settings.context);
    debug!("Searching: {}", full_query);

    match provider.search(&full_query).await {
        Ok(hits) => {
            let total = hits.len();
            let relevant: Vec<SearchHit> = hits
                .into_iter()
                .filter(|hit| settings.mentions_brand(hit))
                .take(settings.max_results)
                .collect();
            debug!("Search kept {} of {} results", relevant.len(), total);

            if relevant.is_empty() {
                SearchOutcome::NoResults {
                    query: query.to_string(),
                }
            } else {
                SearchOutcome::Results(relevant)
            }
        }
        Err(e) => {
            warn!("Search failed: {:#}", e);
            SearchOutcome::Failed(format!("{:#}", e))
        }
    }
}

/// Brave Web Search API
pub struct BraveSearch {
    client: reqwest::Client,
    url: String,
    count: u32,
}

#[derive(Debug, Deserialize)]
struct BraveSearchResponse {
    #[serde(default)]
    web: Option<WebResults>,
}

#[derive(Debug, Deserialize)]
struct WebResults {
    #[serde(default)]
    results: Vec<WebResult>,
}

#[derive(Debug, Deserialize)]
struct WebResult {
    title: String,
    url: String,
    #[serde(default)]
    description: String,
}

impl BraveSearch {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            count: 20,
        }
    }

    fn api_key() -> Result<String> {
        std::env::var("BRAVE_API_KEY").context(
            "BRAVE_API_KEY environment variable not set. \
             Get an API key from https://brave.com/search/api/",
        )
    }
}

#[async_trait]
impl SearchProvider for BraveSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let api_key = Self::api_key()?;
        let url = format!(
            "{}?q={}&count={}",
            self.url,
            urlencoding::encode(query),
            self.count
        );

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .header("X-Subscription-Token", &api_key)
            .send()
            .await
            .context("Search request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Brave Search API error: {} {} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown"),
                error_text
            );
        }

        let body: BraveSearchResponse = response
            .json()
            .await
            .context("Failed to parse Brave Search response")?;

        Ok(body
            .web
            .map(|web| {
                web.results
                    .into_iter()
                    .map(|r| SearchHit {
                        title: r.title,
                        url: r.url,
                        snippet: r.description,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}

pub struct SearchNetworkInfoTool {
    provider: std::sync::Arc<dyn SearchProvider>,
    settings: SearchSettings,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: String,
}

impl SearchNetworkInfoTool {
    pub const NAME: &'static str = "search_network_info";

    pub fn new(env: &ToolEnv) -> Self {
        Self {
            provider: env.search.clone(),
            settings: env.search_settings.clone(),
        }
    }
}

#[async_trait]
impl Tool for SearchNetworkInfoTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Search the web for recent information about the Rivalz network."
    }

    fn schema(&self) -> Value {
        object_schema()
            .property("query", string_prop("What to search for"), true)
            .build()
    }

    async fn execute(&self, params: Value) -> ToolOutcome {
        let params: SearchParams = match parse_params(params) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };
        let outcome = search_network_info(self.provider.as_ref(), &params.query, &self.settings).await;
        ToolOutcome::Data(outcome.to_payload())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Returns canned hits and records the queries it saw
    struct CannedSearch {
        hits: Result<Vec<SearchHit>, String>,
        queries: Mutex<Vec<String>>,
    }

    impl CannedSearch {
        fn new(hits: Result<Vec<SearchHit>, String>) -> Self {
            Self {
                hits,
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SearchProvider for CannedSearch {
        async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
            self.queries.lock().unwrap().push(query.to_string());
            self.hits.clone().map_err(|e| anyhow::anyhow!(e))
        }
    }

    fn hit(title: &str, snippet: &str) -> SearchHit {
        SearchHit {
            title: title.to_string(),
            url: format!("https://example.com/{}", title.len()),
            snippet: snippet.to_string(),
        }
    }

    #[tokio::test]
    async fn test_appends_context_and_filters() {
        let provider = CannedSearch::new(Ok(vec![
            hit("Rivalz launches rollup", ""),
            hit("Unrelated chain news", "nothing here"),
            hit("Weekly digest", "the RIVALZ network grew"),
        ]));

        let outcome = search_network_info(&provider, "staking ", &SearchSettings::default()).await;

        assert_eq!(
            *provider.queries.lock().unwrap(),
            vec!["staking Rivalz AI network".to_string()]
        );
        assert_eq!(
            outcome,
            SearchOutcome::Results(vec![
                hit("Rivalz launches rollup", ""),
                hit("Weekly digest", "the RIVALZ network grew"),
            ])
        );
    }

    #[tokio::test]
    async fn test_truncates_to_max_results() {
        let hits = (0..8).map(|i| hit(&format!("Rivalz {}", i), "")).collect();
        let provider = CannedSearch::new(Ok(hits));

        match search_network_info(&provider, "news", &SearchSettings::default()).await {
            SearchOutcome::Results(kept) => {
                assert_eq!(kept.len(), 5);
                assert_eq!(kept[0].title, "Rivalz 0");
                assert_eq!(kept[4].title, "Rivalz 4");
            }
            other => panic!("Expected results, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_relevant_results() {
        let provider = CannedSearch::new(Ok(vec![hit("Other project", "no mention")]));

        let outcome = search_network_info(&provider, "roadmap", &SearchSettings::default()).await;

        assert_eq!(
            outcome,
            SearchOutcome::NoResults {
                query: "roadmap".to_string()
            }
        );
        assert_eq!(
            outcome.to_payload()["message"],
            "No relevant results found for 'roadmap'"
        );
    }

    #[tokio::test]
    async fn test_provider_error_is_captured() {
        let provider = CannedSearch::new(Err("quota exceeded".to_string()));

        let outcome = search_network_info(&provider, "roadmap", &SearchSettings::default()).await;

        assert_eq!(outcome, SearchOutcome::Failed("quota exceeded".to_string()));
        assert_eq!(outcome.to_payload()["error"], "Search failed: quota exceeded");
    }

    #[tokio::test]
    async fn test_tool_rejects_missing_query() {
        let env_provider: std::sync::Arc<dyn SearchProvider> =
            std::sync::Arc::new(CannedSearch::new(Ok(vec![])));
        let tool = SearchNetworkInfoTool {
            provider: env_provider,
            settings: SearchSettings::default(),
        };

        match tool.execute(json!({})).await {
            ToolOutcome::Data(payload) => {
                assert!(payload["error"].as_str().unwrap().starts_with("Invalid params"));
                assert_eq!(payload["kind"], "tool");
            }
            other => panic!("Expected data, got {:?}", other),
        }
    }
}
