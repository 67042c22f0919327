//! SignalDesk Core: entitlement and live P/L decision logic
//!
//! This crate is the single source of truth for the two pieces of
//! decision logic the dashboard reuses across every screen:
//!
//! - **Entitlement resolution**: turn a user's admin flag, subscription
//!   state, plan tier, expiration date and prepaid credit balance into
//!   an effective tier plus the numeric quotas that apply right now.
//! - **P/L aggregation**: turn the set of open leveraged positions and
//!   a live price lookup into per-position and portfolio-level
//!   unrealized profit/loss.
//!
//! Everything here is a pure function: callers supply the user
//! snapshot, the position list, the price lookup and an explicit
//! evaluation timestamp, and get back plain data to render or gate on.
//! Malformed input degrades to the most conservative entitlement or a
//! flat P/L contribution, never a panic or an error.
//!
//! # Example
//!
//! ```
//! use signaldesk_core::prelude::*;
//! use chrono::Utc;
//!
//! let user = UserRecord::default();
//! let entitlement = resolve_entitlement(&user, Utc::now());
//! assert_eq!(entitlement.effective_tier, PlanTier::Free);
//! ```

pub mod entitlement;
pub mod pnl;
pub mod usage;

// Re-export commonly used types
pub mod prelude {
    pub use crate::entitlement::{
        credit_bonus, resolve_entitlement, Entitlement, Limit, PlanTier, QuotaSet, UserRecord,
        CREDIT_UNIT,
    };
    pub use crate::pnl::{
        aggregate_pnl, Direction, PortfolioPnl, Position, PositionPnl, PositionStatus, PriceLookup,
    };
    pub use crate::usage::{
        classify, present_usage, ExpiryCountdown, QuotaStatus, UsageCounts, UsageLevel,
        UsagePresentation, WARNING_RATIO,
    };

    pub use anyhow::{Context, Result};
}

/// Result type alias
pub type Result<T> = anyhow::Result<T>;
