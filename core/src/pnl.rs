//! Live position P/L aggregation
//!
//! Turns the set of open leveraged positions plus a price lookup into
//! per-position and portfolio-level unrealized P/L. The aggregator
//! never fails: a missing or stale price degrades that position to
//! "no movement" instead of an error, and a position without a
//! tradable entry price is excluded from both sum and count.

use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Buy,
    Sell,
}

/// Lifecycle status of a tracked position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionStatus {
    Active,
    TakeProfitHit,
    StopLossHit,
    Closed,
}

impl PositionStatus {
    pub fn is_open(self) -> bool {
        matches!(self, PositionStatus::Active)
    }
}

fn default_leverage() -> Decimal {
    Decimal::ONE
}

/// A tracked leveraged trade as fetched from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    /// Trading pair, e.g. "BTC/USDT".
    pub pair: String,
    pub direction: Direction,
    #[serde(default = "default_leverage")]
    pub leverage: Decimal,
    /// Principal before leverage.
    #[serde(default)]
    pub entry_amount: Decimal,
    #[serde(default)]
    pub entry_price: Decimal,
    /// Latest known price; may be stale if the live feed is down.
    #[serde(default)]
    pub current_price: Option<Decimal>,
    pub status: PositionStatus,
}

impl Position {
    /// Total operated value: principal times leverage.
    pub fn operated_value(&self) -> f64 {
        (self.entry_amount * self.leverage).to_f64().unwrap_or(0.0)
    }
}

/// Live price source. A missing answer is not an error: the aggregator
/// falls back to the position's last-known price, then its entry price.
pub trait PriceLookup {
    fn price(&self, pair: &str) -> Option<Decimal>;
}

impl PriceLookup for HashMap<String, Decimal> {
    fn price(&self, pair: &str) -> Option<Decimal> {
        self.get(pair).copied()
    }
}

/// Unrealized P/L of one position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionPnl {
    pub percent: f64,
    pub usd: f64,
}

/// Portfolio-level unrealized P/L, recomputed on every price tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PortfolioPnl {
    #[serde(rename = "totalUnrealizedUSD")]
    pub total_unrealized_usd: f64,
    /// Simple unweighted mean across positions, not volume-weighted.
    #[serde(rename = "averagePercentage")]
    pub average_percent: f64,
    #[serde(rename = "positionCount")]
    pub position_count: usize,
    #[serde(rename = "perPosition")]
    pub per_position: HashMap<String, PositionPnl>,
}

/// Aggregate unrealized P/L over active positions.
///
/// Price preference per position: live lookup, then last-known
/// `current_price`, then `entry_price` (flat). Positions that are not
/// active or have a zero entry price contribute to neither sum nor
/// count.
pub fn aggregate_pnl(positions: &[Position], prices: &impl PriceLookup) -> PortfolioPnl {
    let mut total_usd = 0.0;
    let mut percent_sum = 0.0;
    let mut per_position = HashMap::new();

    for position in positions {
        if !position.status.is_open() || position.entry_price.is_zero() {
            continue;
        }
        let entry = position.entry_price.to_f64().unwrap_or(0.0);
        if entry == 0.0 {
            continue;
        }
        let current = prices
            .price(&position.pair)
            .or(position.current_price)
            .unwrap_or(position.entry_price)
            .to_f64()
            .unwrap_or(entry);

        let percent = match position.direction {
            Direction::Buy => (current - entry) / entry * 100.0,
            Direction::Sell => (entry - current) / entry * 100.0,
        };
        let usd = percent / 100.0 * position.operated_value();

        total_usd += usd;
        percent_sum += percent;
        per_position.insert(position.id.clone(), PositionPnl { percent, usd });
    }

    let count = per_position.len();
    PortfolioPnl {
        total_unrealized_usd: total_usd,
        average_percent: if count == 0 {
            0.0
        } else {
            percent_sum / count as f64
        },
        position_count: count,
        per_position,
    }
}
