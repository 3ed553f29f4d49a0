//! Total Value Locked per chain, from the DefiLlama chains listing

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info};

use super::parse_params;
use crate::error::ToolError;
use crate::tools::schema::{integer_prop, object_schema};
use crate::tools::{RetryPolicy, Tool, ToolEnv, ToolOutcome};

/// One record of the chains listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainTvl {
    pub name: String,
    pub tvl: f64,
}

/// Fetch TVL for every chain.
///
/// Transport failures and non-2xx responses are retried up to
/// `policy.attempts` times in total. A body that is not a list of
/// `{name, tvl}` records fails at once with [`ToolError::DataFormat`].
pub async fn fetch_network_tvl(
    client: &reqwest::Client,
    url: &str,
    policy: &RetryPolicy,
) -> Result<Vec<ChainTvl>, ToolError> {
    for attempt in 1..=policy.attempts {
        match get_body(client, url).await {
            Ok(body) => {
                let chains = parse_chains(&body)?;
                for chain in &chains {
                    debug!("Chain: {}, TVL: {}", chain.name, chain.tvl);
                }
                info!("Fetched TVL for {} chains (attempt {})", chains.len(), attempt);
                return Ok(chains);
            }
            Err(e) => {
                error!("TVL fetch attempt {} of {} failed: {}", attempt, policy.attempts, e);
                if attempt < policy.attempts {
                    tokio::time::sleep(policy.delay(attempt)).await;
                }
            }
        }
    }

    Err(ToolError::FetchExhausted {
        attempts: policy.attempts,
    })
}

async fn get_body(client: &reqwest::Client, url: &str) -> reqwest::Result<String> {
    client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}

fn parse_chains(body: &str) -> Result<Vec<ChainTvl>, ToolError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ToolError::DataFormat(format!("response is not JSON: {}", e)))?;

    let Value::Array(records) = value else {
        return Err(ToolError::DataFormat("expected a list of chain records".to_string()));
    };

    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            serde_json::from_value(record)
                .map_err(|e| ToolError::DataFormat(format!("chain record {}: {}", i, e)))
        })
        .collect()
}

/// Tool wrapper exposed to the Financial Analyst
pub struct FetchNetworkTvlTool {
    client: reqwest::Client,
    url: String,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct TvlParams {
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    20
}

impl FetchNetworkTvlTool {
    pub const NAME: &'static str = "fetch_network_tvl";

    pub fn new(env: &ToolEnv) -> Self {
        Self {
            client: env.http.clone(),
            url: env.tvl_url.clone(),
            retry: env.retry,
        }
    }
}

#[async_trait]
impl Tool for FetchNetworkTvlTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Fetch the Total Value Locked (TVL) for all blockchain networks. \
         Returns the largest chains by TVL."
    }

    fn schema(&self) -> Value {
        object_schema()
            .property(
                "limit",
                integer_prop("Number of chains to return, largest first (default: 20)"),
                false,
            )
            .build()
    }

    async fn execute(&self, params: Value) -> ToolOutcome {
        let params: TvlParams = match parse_params(params) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };

        match fetch_network_tvl(&self.client, &self.url, &self.retry).await {
            Ok(mut chains) => {
                let total_chains = chains.len();
                let total_tvl: f64 = chains.iter().map(|c| c.tvl).sum();
                chains.sort_by(|a, b| b.tvl.total_cmp(&a.tvl));
                chains.truncate(params.limit);
                ToolOutcome::Data(json!({
                    "total_chains": total_chains,
                    "total_tvl": total_tvl,
                    "chains": chains,
                }))
            }
            Err(e) => {
                error!("TVL fetch failed: {}", e);
                ToolOutcome::from_error(&e)
            }
        }
    }
}
