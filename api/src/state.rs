use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::{BackendClient, Config, PriceBook, PriceFeedClient};
use signaldesk_core::entitlement::UserRecord;
use signaldesk_core::pnl::Position;
use tokio::sync::RwLock;

/// Latest successfully fetched collaborator data.
///
/// On a fetch failure the previous value stays in place and handlers
/// keep computing from it. Only a fetch that succeeds replaces a field,
/// and then it replaces it honestly, surprising values included.
#[derive(Debug, Default)]
pub struct Snapshot {
    pub user: Option<UserRecord>,
    pub positions: Vec<Position>,
    pub prices: PriceBook,
    pub user_refreshed_at: Option<DateTime<Utc>>,
    pub positions_refreshed_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct AppState {
    pub backend: BackendClient,
    pub feed: PriceFeedClient,
    pub snapshot: Arc<RwLock<Snapshot>>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        AppState {
            backend: BackendClient::new(
                config.backend_base_url.clone(),
                config.backend_api_token.clone(),
            ),
            feed: PriceFeedClient::new(config.price_feed_url.clone()),
            snapshot: Arc::new(RwLock::new(Snapshot::default())),
        }
    }

    pub async fn refresh_user(&self) {
        match self.backend.current_user().await {
            Ok(user) => {
                let mut snapshot = self.snapshot.write().await;
                snapshot.user = Some(user);
                snapshot.user_refreshed_at = Some(Utc::now());
                tracing::debug!("refreshed user record");
            }
            Err(e) => {
                tracing::warn!("user fetch failed, keeping last snapshot: {}", e);
            }
        }
    }

    pub async fn refresh_positions(&self) {
        match self.backend.list_positions(None).await {
            Ok(positions) => {
                let mut snapshot = self.snapshot.write().await;
                snapshot.positions = positions;
                snapshot.positions_refreshed_at = Some(Utc::now());
                tracing::debug!("refreshed {} positions", snapshot.positions.len());
            }
            Err(e) => {
                tracing::warn!("positions fetch failed, keeping last snapshot: {}", e);
            }
        }
    }

    pub async fn refresh_prices(&self) {
        let pairs: Vec<String> = {
            let snapshot = self.snapshot.read().await;
            snapshot
                .positions
                .iter()
                .filter(|p| p.status.is_open())
                .map(|p| p.pair.clone())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        };
        match self.feed.fetch_prices(&pairs).await {
            Ok(prices) => {
                let mut snapshot = self.snapshot.write().await;
                snapshot.prices.replace(prices);
                tracing::debug!("refreshed {} prices", snapshot.prices.len());
            }
            Err(e) => {
                tracing::warn!("price fetch failed, keeping last prices: {}", e);
            }
        }
    }
}
