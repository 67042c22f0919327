//! Subscription plan tiers

use serde::{Deserialize, Serialize};

/// Nominal subscription plan tier as stored on the user record.
///
/// The wire values are lowercase snake strings (`"pro_plus"`). A value
/// outside the known set deserializes to `Free`, so a record written by
/// a newer backend never grants more than the free quotas here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    /// Entry paid plan
    Pro,
    /// Mid paid plan
    ProPlus,
    /// Top plan, no quota limits
    InfinityPro,
    /// Contract plan, no quota limits
    Enterprise,
    /// No paid plan
    #[default]
    #[serde(other)]
    Free,
}

impl PlanTier {
    /// Whether this tier carries unbounded quotas.
    pub fn is_unlimited(self) -> bool {
        matches!(self, PlanTier::InfinityPro | PlanTier::Enterprise)
    }

    /// Wire/display name of the tier.
    pub fn as_str(self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Pro => "pro",
            PlanTier::ProPlus => "pro_plus",
            PlanTier::InfinityPro => "infinity_pro",
            PlanTier::Enterprise => "enterprise",
        }
    }
}

impl std::fmt::Display for PlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
