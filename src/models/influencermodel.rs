use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::commissionmodels::CommissionTier;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InfluencerStatus {
    Active,
    Inactive,
}

impl InfluencerStatus {
    pub fn to_str(&self) -> &str {
        match self {
            InfluencerStatus::Active => "active",
            InfluencerStatus::Inactive => "inactive",
        }
    }

    pub fn toggled(&self) -> InfluencerStatus {
        match self {
            InfluencerStatus::Active => InfluencerStatus::Inactive,
            InfluencerStatus::Inactive => InfluencerStatus::Active,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Influencer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
    pub youtube: Option<String>,
    pub status: InfluencerStatus,
    pub referrals: u32,
    pub code_usage: u32,
    pub completed_treatments: u32,
    /// Lifetime earnings in pence.
    pub earnings: i64,
    pub commission_tier: CommissionTier,
    pub custom_commission_rate: Option<f64>,
    pub custom_discount_rate: Option<f64>,
    pub referral_code: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub last_active: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Influencer {
    /// Completed treatments over code usage, as a whole percentage.
    pub fn conversion_rate(&self) -> u32 {
        conversion_rate(self.completed_treatments, self.code_usage)
    }
}

/// Fields supplied by the admin "add influencer" form.
#[derive(Debug, Clone)]
pub struct NewInfluencer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
    pub youtube: Option<String>,
    pub commission_tier: CommissionTier,
    pub custom_commission_rate: Option<f64>,
    pub custom_discount_rate: Option<f64>,
}

/// Partial edit; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct InfluencerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
    pub youtube: Option<String>,
    pub commission_tier: Option<CommissionTier>,
    pub custom_commission_rate: Option<f64>,
    pub custom_discount_rate: Option<f64>,
    pub code_usage: Option<u32>,
    pub completed_treatments: Option<u32>,
    /// Pence.
    pub earnings: Option<i64>,
}

pub fn conversion_rate(completed: u32, usage: u32) -> u32 {
    if usage == 0 {
        return 0;
    }
    ((completed as f64 / usage as f64) * 100.0).round() as u32
}

/// Human label used by the dashboard tables ("Today", "Yesterday", "3 days ago").
pub fn last_active_label(last_active: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (now.date_naive() - last_active.date_naive()).num_days();
    match days {
        d if d <= 0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        d => format!("{} days ago", d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn conversion_rate_rounds_to_nearest_percent() {
        assert_eq!(conversion_rate(29, 36), 81);
        assert_eq!(conversion_rate(25, 32), 78);
        assert_eq!(conversion_rate(1, 3), 33);
        assert_eq!(conversion_rate(2, 3), 67);
        assert_eq!(conversion_rate(0, 0), 0);
    }

    #[test]
    fn last_active_labels() {
        let now = Utc::now();
        assert_eq!(last_active_label(now, now), "Today");
        assert_eq!(last_active_label(now - Duration::days(1), now), "Yesterday");
        assert_eq!(last_active_label(now - Duration::days(3), now), "3 days ago");
    }
}
