use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CodeStatus {
    Active,
    Paused,
    Expired,
}

impl CodeStatus {
    pub fn to_str(&self) -> &str {
        match self {
            CodeStatus::Active => "active",
            CodeStatus::Paused => "paused",
            CodeStatus::Expired => "expired",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReferralCode {
    pub id: String,
    pub influencer_id: String,
    pub code: String,
    pub status: CodeStatus,
    pub start_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub usage_count: u32,
    pub completed_bookings: u32,
    /// Pence.
    pub total_earnings: i64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum UsageStatus {
    Completed,
    Pending,
    Cancelled,
}

impl UsageStatus {
    pub fn to_str(&self) -> &str {
        match self {
            UsageStatus::Completed => "completed",
            UsageStatus::Pending => "pending",
            UsageStatus::Cancelled => "cancelled",
        }
    }
}

/// One redemption attempt of a referral code.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CodeUsageEvent {
    pub id: String,
    pub code: String,
    pub date: NaiveDate,
    pub booking_id: String,
    pub status: UsageStatus,
    /// Pence; zero unless the booking completed.
    pub amount: i64,
}
