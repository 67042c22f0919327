//! Entitlement resolution
//!
//! `resolve_entitlement` is evaluated on every render of every surface
//! that shows or gates on quotas (sidebar, top bar, P/L screens), so it
//! is pure and total: it never reads a clock, never caches, and never
//! fails. Expiration is checked against the `now` the caller captured
//! at evaluation time.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::limits::QuotaSet;
use super::tier::PlanTier;

/// Minimum credit balance that unlocks any credit-derived bonus.
/// Product constant, not derived from the limit tables.
pub const CREDIT_UNIT: u32 = 10;

/// Billing and entitlement state of one account, as fetched from the
/// dashboard backend.
///
/// Every field is defaulted so a sparse or malformed record resolves to
/// the most conservative values: free tier, inactive subscription,
/// zero credit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserRecord {
    pub is_admin: bool,
    pub is_pro_subscription_active: bool,
    /// Meaningful only while the subscription is active.
    pub pro_plan_tier: PlanTier,
    /// Absent means the subscription does not expire by date.
    pub pro_expires_at: Option<DateTime<Utc>>,
    /// Prepaid balance in account-credit units.
    pub credit_balance: Decimal,
    /// Cumulative AI-generation calls consumed.
    pub ai_uses_count: u32,
}

/// Derived entitlement. Recomputed from a fresh user snapshot on every
/// evaluation; never cached across snapshots, since expiration is
/// time-dependent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entitlement {
    pub effective_tier: PlanTier,
    #[serde(flatten)]
    pub limits: QuotaSet,
    pub has_temporary_credit_access: bool,
}

impl Entitlement {
    fn new(effective_tier: PlanTier, limits: QuotaSet, has_temporary_credit_access: bool) -> Self {
        Self {
            effective_tier,
            limits,
            has_temporary_credit_access,
        }
    }
}

/// Whole credit units in the balance: `floor(balance / 10)`, clamped
/// at zero for negative or malformed balances.
pub fn credit_bonus(balance: Decimal) -> u32 {
    let units = (balance / Decimal::from(CREDIT_UNIT)).floor();
    if units <= Decimal::ZERO {
        0
    } else {
        units.to_u32().unwrap_or(u32::MAX)
    }
}

/// Resolve the effective tier and quotas for a user at `now`.
///
/// Priority order, first match wins:
/// 1. admin: unbounded everything;
/// 2. live unlimited plan (infinity_pro / enterprise): unbounded;
/// 3. live finite plan with credit: nominal limits plus the credit
///    bonus added to each finite limit (floor before addition);
/// 4. credit without a live plan: displayed as infinity_pro, but every
///    limit is the same credit-derived cap;
/// 5. live finite plan: nominal limits;
/// 6. otherwise: free table.
pub fn resolve_entitlement(user: &UserRecord, now: DateTime<Utc>) -> Entitlement {
    let pro_active = user.is_pro_subscription_active
        && user.pro_expires_at.map(|at| at > now).unwrap_or(true);
    let has_credit = user.credit_balance >= Decimal::from(CREDIT_UNIT);
    let bonus = credit_bonus(user.credit_balance);

    if user.is_admin {
        return Entitlement::new(PlanTier::InfinityPro, QuotaSet::unlimited(), false);
    }

    if pro_active && user.pro_plan_tier.is_unlimited() {
        return Entitlement::new(user.pro_plan_tier, QuotaSet::unlimited(), false);
    }

    if has_credit && pro_active {
        return Entitlement::new(
            user.pro_plan_tier,
            QuotaSet::nominal(user.pro_plan_tier).with_bonus(bonus),
            true,
        );
    }

    if has_credit {
        // Display tier only: the quotas stay at the credit-derived cap,
        // and the same cap is reused for all three dimensions.
        return Entitlement::new(PlanTier::InfinityPro, QuotaSet::capped(bonus), true);
    }

    if pro_active {
        return Entitlement::new(
            user.pro_plan_tier,
            QuotaSet::nominal(user.pro_plan_tier),
            false,
        );
    }

    Entitlement::new(PlanTier::Free, QuotaSet::nominal(PlanTier::Free), false)
}
