//! Spot price lookup (CoinGecko simple price API)

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::parse_params;
use crate::error::ToolError;
use crate::tools::schema::{object_schema, string_prop};
use crate::tools::{Tool, ToolEnv, ToolOutcome};

/// Result of a single price lookup
#[derive(Debug)]
pub enum PriceLookup {
    Found { symbol: String, usd: f64 },
    NotFound { symbol: String },
    Failed { symbol: String, error: ToolError },
}

impl PriceLookup {
    /// User-facing sentence describing the lookup
    pub fn message(&self) -> String {
        match self {
            Self::Found { symbol, usd } => {
                format!("The current price of {} is ${:.2} USD", symbol.to_uppercase(), usd)
            }
            Self::NotFound { symbol } => format!("Price for '{}' not found", symbol),
            Self::Failed { symbol, error } => {
                format!("Failed to fetch price for '{}': {}", symbol, error)
            }
        }
    }

    pub fn to_payload(&self) -> Value {
        match self {
            Self::Found { symbol, usd } => json!({
                "symbol": symbol,
                "usd": usd,
                "message": self.message(),
            }),
            Self::NotFound { symbol } => json!({
                "symbol": symbol,
                "error": self.message(),
                "kind": "not_found",
            }),
            Self::Failed { symbol, error } => json!({
                "symbol": symbol,
                "error": self.message(),
                "kind": error.kind(),
            }),
        }
    }
}

/// Look up the USD price of `symbol` with a single request.
///
/// The identifier is lowercased before the request. Never returns an error;
/// failures are described by [`PriceLookup::Failed`].
pub async fn fetch_price(client: &reqwest::Client, base_url: &str, symbol: &str) -> PriceLookup {
    let id = symbol.trim().to_lowercase();
    let url = format!(
        "{}?ids={}&vs_currencies=usd",
        base_url,
        urlencoding::encode(&id)
    );

    let body: Value = match request_json(client, &url).await {
        Ok(body) => body,
        Err(error) => {
            warn!("Price lookup for {} failed: {}", id, error);
            return PriceLookup::Failed { symbol: id, error };
        }
    };

    match body.get(&id).and_then(|entry| entry.get("usd")).and_then(Value::as_f64) {
        Some(usd) => {
            info!("Price for {}: {}", id, usd);
            PriceLookup::Found { symbol: id, usd }
        }
        None => PriceLookup::NotFound { symbol: id },
    }
}

async fn request_json(client: &reqwest::Client, url: &str) -> Result<Value, ToolError> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await?
        .error_for_status()?;
    let text = response.text().await?;
    serde_json::from_str(&text)
        .map_err(|e| ToolError::DataFormat(format!("price response is not JSON: {}", e)))
}

pub struct FetchPriceTool {
    client: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct PriceParams {
    symbol: String,
}

impl FetchPriceTool {
    pub const NAME: &'static str = "fetch_price";

    pub fn new(env: &ToolEnv) -> Self {
        Self {
            client: env.http.clone(),
            url: env.price_url.clone(),
        }
    }
}

#[async_trait]
impl Tool for FetchPriceTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Get the current USD price of a token by its identifier (e.g. bitcoin, ethereum)."
    }

    fn schema(&self) -> Value {
        object_schema()
            .property("symbol", string_prop("Token identifier to price"), true)
            .build()
    }

    async fn execute(&self, params: Value) -> ToolOutcome {
        let params: PriceParams = match parse_params(params) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };
        let lookup = fetch_price(&self.client, &self.url, &params.symbol).await;
        ToolOutcome::Data(lookup.to_payload())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_message_rounds_to_cents() {
        let lookup = PriceLookup::Found {
            symbol: "btc".to_string(),
            usd: 65000.1234,
        };
        assert_eq!(lookup.message(), "The current price of BTC is $65000.12 USD");
        assert_eq!(lookup.to_payload()["usd"], 65000.1234);
    }

    #[test]
    fn test_not_found_payload() {
        let lookup = PriceLookup::NotFound {
            symbol: "doesnotexist".to_string(),
        };
        let payload = lookup.to_payload();
        assert_eq!(payload["kind"], "not_found");
        assert_eq!(payload["error"], "Price for 'doesnotexist' not found");
    }
}
