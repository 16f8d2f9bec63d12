use serde::{Deserialize, Serialize};

/// Named commission brackets plus the per-influencer `Custom` override.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommissionTier {
    Tin,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Custom,
}

/// One row of the fixed tier table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierSpec {
    pub tier: CommissionTier,
    pub name: &'static str,
    /// Cumulative referral volume, `[min, max)`; `None` upper bound is unbounded.
    pub range: (u64, Option<u64>),
    pub commission_total: f64,
    pub ambassador_rate: f64,
    pub customer_rate: f64,
}

pub const COMMISSION_TIERS: [TierSpec; 6] = [
    TierSpec {
        tier: CommissionTier::Tin,
        name: "Tin",
        range: (0, Some(1_000)),
        commission_total: 5.0,
        ambassador_rate: 3.0,
        customer_rate: 2.0,
    },
    TierSpec {
        tier: CommissionTier::Bronze,
        name: "Bronze",
        range: (1_000, Some(5_000)),
        commission_total: 7.0,
        ambassador_rate: 4.0,
        customer_rate: 3.0,
    },
    TierSpec {
        tier: CommissionTier::Silver,
        name: "Silver",
        range: (5_000, Some(10_000)),
        commission_total: 10.0,
        ambassador_rate: 6.0,
        customer_rate: 4.0,
    },
    TierSpec {
        tier: CommissionTier::Gold,
        name: "Gold",
        range: (10_000, Some(25_000)),
        commission_total: 12.0,
        ambassador_rate: 7.0,
        customer_rate: 5.0,
    },
    TierSpec {
        tier: CommissionTier::Platinum,
        name: "Platinum",
        range: (25_000, Some(50_000)),
        commission_total: 15.0,
        ambassador_rate: 9.0,
        customer_rate: 6.0,
    },
    TierSpec {
        tier: CommissionTier::Diamond,
        name: "Diamond",
        range: (50_000, None),
        commission_total: 20.0,
        ambassador_rate: 12.0,
        customer_rate: 8.0,
    },
];

impl CommissionTier {
    pub fn to_str(&self) -> &str {
        match self {
            CommissionTier::Tin => "TIN",
            CommissionTier::Bronze => "BRONZE",
            CommissionTier::Silver => "SILVER",
            CommissionTier::Gold => "GOLD",
            CommissionTier::Platinum => "PLATINUM",
            CommissionTier::Diamond => "DIAMOND",
            CommissionTier::Custom => "CUSTOM",
        }
    }

    /// Table row for a named tier; `Custom` has none.
    pub fn spec(&self) -> Option<&'static TierSpec> {
        COMMISSION_TIERS.iter().find(|spec| spec.tier == *self)
    }

    pub fn display_name(&self) -> &str {
        self.spec().map(|spec| spec.name).unwrap_or("Custom")
    }
}

/// Effective rates for one influencer, in percent.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommissionRates {
    pub ambassador_rate: f64,
    pub customer_discount: f64,
}
