use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;
use signaldesk_core::pnl::PriceLookup;

use crate::error::FetchError;

/// Latest known price per pair, replaced wholesale on each feed
/// refresh.
#[derive(Debug, Clone, Default)]
pub struct PriceBook {
    prices: HashMap<String, Decimal>,
}

impl PriceBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, prices: HashMap<String, Decimal>) {
        self.prices = prices;
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl PriceLookup for PriceBook {
    fn price(&self, pair: &str) -> Option<Decimal> {
        self.prices.get(pair).copied()
    }
}

#[derive(Debug, Deserialize)]
struct Ticker {
    pair: String,
    price: Decimal,
}

/// Client for the live market-data collaborator.
#[derive(Debug, Clone)]
pub struct PriceFeedClient {
    pub base_url: String,
    client: reqwest::Client,
}

impl PriceFeedClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Fetch latest prices for the given pairs. A pair missing from the
    /// answer is not an error; the aggregator falls back per position.
    pub async fn fetch_prices(
        &self,
        pairs: &[String],
    ) -> Result<HashMap<String, Decimal>, FetchError> {
        if pairs.is_empty() {
            return Ok(HashMap::new());
        }
        let response = self
            .client
            .get(format!("{}/api/v1/tickers", self.base_url))
            .query(&[("pairs", pairs.join(","))])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                endpoint: "/api/v1/tickers".to_string(),
                status: response.status().as_u16(),
            });
        }
        let tickers: Vec<Ticker> = response.json().await?;
        Ok(tickers.into_iter().map(|t| (t.pair, t.price)).collect())
    }
}
