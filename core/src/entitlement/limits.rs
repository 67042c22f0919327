//! Quota limits and the per-tier nominal table

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use super::tier::PlanTier;

/// A quota limit: a finite count or unbounded.
///
/// The UI contract uses `-1` as the "unlimited" sentinel, so this type
/// serializes `Unlimited` as `-1` and accepts any negative number on
/// the way in. Internally the sum type keeps credit-bonus arithmetic
/// from ever touching a sentinel by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Finite(u32),
    Unlimited,
}

impl Limit {
    pub fn is_unlimited(self) -> bool {
        matches!(self, Limit::Unlimited)
    }

    /// Add a bonus to a finite limit; an unbounded limit is unaffected.
    pub fn plus(self, bonus: u32) -> Limit {
        match self {
            Limit::Finite(n) => Limit::Finite(n.saturating_add(bonus)),
            Limit::Unlimited => Limit::Unlimited,
        }
    }

    /// Whether `used` has reached this limit.
    pub fn reached_by(self, used: u32) -> bool {
        match self {
            Limit::Finite(n) => used >= n,
            Limit::Unlimited => false,
        }
    }
}

impl Serialize for Limit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Limit::Finite(n) => serializer.serialize_i64(*n as i64),
            Limit::Unlimited => serializer.serialize_i64(-1),
        }
    }
}

impl<'de> Deserialize<'de> for Limit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        if raw < 0 {
            Ok(Limit::Unlimited)
        } else {
            let n = u32::try_from(raw).map_err(|_| de::Error::custom("limit out of range"))?;
            Ok(Limit::Finite(n))
        }
    }
}

/// The three quota dimensions the dashboard gates on.
///
/// Serialized field names match the entitlement payload the UI already
/// consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaSet {
    #[serde(rename = "totalPositionLimit")]
    pub total_positions: Limit,
    #[serde(rename = "concurrentPositionLimit")]
    pub concurrent_positions: Limit,
    #[serde(rename = "aiUseLimit")]
    pub ai_generations: Limit,
}

impl QuotaSet {
    fn finite(total: u32, concurrent: u32, ai: u32) -> Self {
        Self {
            total_positions: Limit::Finite(total),
            concurrent_positions: Limit::Finite(concurrent),
            ai_generations: Limit::Finite(ai),
        }
    }

    /// All three dimensions unbounded.
    pub fn unlimited() -> Self {
        Self {
            total_positions: Limit::Unlimited,
            concurrent_positions: Limit::Unlimited,
            ai_generations: Limit::Unlimited,
        }
    }

    /// Nominal limit table (total positions / concurrent positions /
    /// AI uses) per plan tier.
    pub fn nominal(tier: PlanTier) -> Self {
        match tier {
            PlanTier::Free => Self::finite(10, 3, 5),
            PlanTier::Pro => Self::finite(100, 20, 30),
            PlanTier::ProPlus => Self::finite(300, 50, 100),
            PlanTier::InfinityPro | PlanTier::Enterprise => Self::unlimited(),
        }
    }

    /// Add a credit bonus to every finite limit.
    pub fn with_bonus(self, bonus: u32) -> Self {
        Self {
            total_positions: self.total_positions.plus(bonus),
            concurrent_positions: self.concurrent_positions.plus(bonus),
            ai_generations: self.ai_generations.plus(bonus),
        }
    }

    /// The same dynamic cap for every dimension. Used for credit-only
    /// access, where one `floor(credit / 10)` value is reused for all
    /// three limits.
    pub fn capped(cap: u32) -> Self {
        Self::finite(cap, cap, cap)
    }
}
