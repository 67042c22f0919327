//! Usage presentation: quota classification and expiry countdown
//!
//! Classification only. Gating (blocking an action) is the caller's
//! decision, using [`UsageLevel::Exceeded`] as the block condition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entitlement::{Entitlement, Limit};

/// Fraction of a finite limit at which usage turns into a warning.
pub const WARNING_RATIO: f64 = 0.8;

/// Display classification for one quota dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageLevel {
    Ok,
    Warning,
    Exceeded,
}

/// Current consumption counts, supplied by the caller.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UsageCounts {
    pub ai_used: u32,
    pub total_positions: u32,
    pub active_positions: u32,
}

/// One quota dimension with its classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuotaStatus {
    pub used: u32,
    pub limit: Limit,
    pub level: UsageLevel,
}

impl QuotaStatus {
    pub fn new(used: u32, limit: Limit) -> Self {
        Self {
            used,
            limit,
            level: classify(used, limit),
        }
    }

    /// `used / limit`, or `None` when the limit is unbounded (or zero).
    pub fn ratio(&self) -> Option<f64> {
        match self.limit {
            Limit::Finite(max) if max > 0 => Some(self.used as f64 / max as f64),
            _ => None,
        }
    }
}

/// Classify consumption against a limit.
///
/// `Exceeded` when the finite limit is reached, `Warning` from 80% of
/// the limit (inclusive), `Ok` otherwise. Unbounded limits are always
/// `Ok`.
pub fn classify(used: u32, limit: Limit) -> UsageLevel {
    match limit {
        Limit::Unlimited => UsageLevel::Ok,
        Limit::Finite(max) => {
            if used >= max {
                UsageLevel::Exceeded
            } else if (used as f64) >= WARNING_RATIO * (max as f64) {
                UsageLevel::Warning
            } else {
                UsageLevel::Ok
            }
        }
    }
}

/// Human-readable bucket for the subscription expiration countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ExpiryCountdown {
    NoExpiry,
    Expired,
    Today,
    Days(i64),
    Months(i64),
}

impl ExpiryCountdown {
    /// Bucket the remaining time: negative is `Expired`, under one full
    /// day is `Today`, 1..30 whole days are `Days`, 30 days and up are
    /// `Months` of 30 days.
    pub fn from_expiry(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        let Some(at) = expires_at else {
            return ExpiryCountdown::NoExpiry;
        };
        let remaining = at.signed_duration_since(now);
        if remaining < chrono::Duration::zero() {
            return ExpiryCountdown::Expired;
        }
        let days = remaining.num_days();
        if days == 0 {
            ExpiryCountdown::Today
        } else if days < 30 {
            ExpiryCountdown::Days(days)
        } else {
            ExpiryCountdown::Months(days / 30)
        }
    }

    pub fn label(&self) -> String {
        match self {
            ExpiryCountdown::NoExpiry => "no expiration".to_string(),
            ExpiryCountdown::Expired => "expired".to_string(),
            ExpiryCountdown::Today => "expires today".to_string(),
            ExpiryCountdown::Days(1) => "1 day".to_string(),
            ExpiryCountdown::Days(n) => format!("{} days", n),
            ExpiryCountdown::Months(1) => "1 month".to_string(),
            ExpiryCountdown::Months(n) => format!("{} months", n),
        }
    }
}

/// Everything a badge or quota panel needs to render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsagePresentation {
    pub ai: QuotaStatus,
    pub total_positions: QuotaStatus,
    pub active_positions: QuotaStatus,
    pub expiry: ExpiryCountdown,
}

/// Combine an entitlement with current usage counts for display.
pub fn present_usage(
    entitlement: &Entitlement,
    counts: &UsageCounts,
    expires_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> UsagePresentation {
    UsagePresentation {
        ai: QuotaStatus::new(counts.ai_used, entitlement.limits.ai_generations),
        total_positions: QuotaStatus::new(counts.total_positions, entitlement.limits.total_positions),
        active_positions: QuotaStatus::new(
            counts.active_positions,
            entitlement.limits.concurrent_positions,
        ),
        expiry: ExpiryCountdown::from_expiry(expires_at, now),
    }
}
