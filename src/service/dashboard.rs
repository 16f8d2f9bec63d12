use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    models::{
        applicationmodel::{AmbassadorApplication, ApplicationStatus},
        commissionmodels::{CommissionRates, CommissionTier},
        influencermodel::{last_active_label, Influencer, InfluencerStatus},
        referralmodel::{CodeStatus, ReferralCode},
        statsmodel::MonthlyMetric,
    },
    service::{
        commission::influencer_rates,
        referral::generate_referral_link,
    },
    utils::currency::{format_pence, format_rate, sum_pence},
};

/// Influencer with the derived fields every table and detail page shows.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InfluencerSummary {
    #[serde(flatten)]
    pub influencer: Influencer,
    pub conversion_rate: u32,
    pub conversion_rate_display: String,
    pub earnings_display: String,
    pub tier_name: String,
    pub rates: CommissionRates,
    pub ambassador_rate_display: String,
    pub customer_discount_display: String,
    pub last_active_label: String,
}

impl InfluencerSummary {
    pub fn new(influencer: Influencer, now: DateTime<Utc>) -> Self {
        let rates = influencer_rates(&influencer);
        let conversion_rate = influencer.conversion_rate();
        InfluencerSummary {
            conversion_rate,
            conversion_rate_display: format!("{}%", conversion_rate),
            earnings_display: format_pence(influencer.earnings),
            tier_name: influencer.commission_tier.display_name().to_string(),
            ambassador_rate_display: format_rate(rates.ambassador_rate),
            customer_discount_display: format_rate(rates.customer_discount),
            last_active_label: last_active_label(influencer.last_active, now),
            rates,
            influencer,
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_influencers: usize,
    pub active_influencers: usize,
    pub total_referrals: u32,
    pub total_earnings: i64,
    pub total_earnings_display: String,
    /// Mean of the per-influencer conversion rates, rounded.
    pub average_conversion_rate: u32,
    pub pending_applications: usize,
    pub monthly: Vec<MonthlyMetric>,
}

pub fn admin_stats(
    influencers: &[Influencer],
    applications: &[AmbassadorApplication],
    monthly: Vec<MonthlyMetric>,
) -> AdminStats {
    let total_earnings = sum_pence(influencers.iter().map(|i| i.earnings));
    let average_conversion_rate = if influencers.is_empty() {
        0
    } else {
        let sum: u32 = influencers.iter().map(|i| i.conversion_rate()).sum();
        (sum as f64 / influencers.len() as f64).round() as u32
    };

    AdminStats {
        total_influencers: influencers.len(),
        active_influencers: influencers
            .iter()
            .filter(|i| i.status == InfluencerStatus::Active)
            .count(),
        total_referrals: influencers.iter().map(|i| i.referrals).sum(),
        total_earnings,
        total_earnings_display: format_pence(total_earnings),
        average_conversion_rate,
        pending_applications: applications
            .iter()
            .filter(|a| a.status == ApplicationStatus::Pending)
            .count(),
        monthly,
    }
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AmbassadorDashboard {
    pub influencer: InfluencerSummary,
    pub tier: CommissionTier,
    pub active_code: Option<ReferralCode>,
    pub referral_link: Option<String>,
    pub monthly: Vec<MonthlyMetric>,
}

/// The live code shown on the dashboard: the active one, else the paused one.
pub fn current_code(codes: &[ReferralCode]) -> Option<&ReferralCode> {
    codes
        .iter()
        .find(|c| c.status == CodeStatus::Active)
        .or_else(|| codes.iter().find(|c| c.status == CodeStatus::Paused))
}

pub fn ambassador_dashboard(
    influencer: Influencer,
    codes: &[ReferralCode],
    monthly: Vec<MonthlyMetric>,
    app_url: &str,
    now: DateTime<Utc>,
) -> AmbassadorDashboard {
    let active_code = current_code(codes).cloned();
    let referral_link = active_code
        .as_ref()
        .map(|code| generate_referral_link(app_url, &code.code));

    AmbassadorDashboard {
        tier: influencer.commission_tier,
        influencer: InfluencerSummary::new(influencer, now),
        active_code,
        referral_link,
        monthly,
    }
}
