mod onchain;
mod price;
mod search;
mod transfer;
mod tvl;

pub use onchain::{NotifyAgentsTool, ProcessOnchainRequestTool};
pub use price::{fetch_price, FetchPriceTool, PriceLookup};
pub use search::{
    search_network_info, BraveSearch, SearchHit, SearchNetworkInfoTool, SearchOutcome,
    SearchProvider, SearchSettings,
};
pub use transfer::TransferTool;
pub use tvl::{fetch_network_tvl, ChainTvl, FetchNetworkTvlTool};

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ToolOutcome;
use crate::error::ToolError;

/// Deserialize tool arguments; models send `null` for argument-less calls
fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, ToolOutcome> {
    let params = if params.is_null() {
        Value::Object(Default::default())
    } else {
        params
    };
    serde_json::from_value(params)
        .map_err(|e| ToolOutcome::from_error(&ToolError::Tool(format!("Invalid params: {}", e))))
}
