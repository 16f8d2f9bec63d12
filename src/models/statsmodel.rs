use serde::{Deserialize, Serialize};

/// One point of a monthly chart series.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyMetric {
    pub name: String,
    pub referrals: u32,
    /// Pence.
    pub revenue: i64,
}
