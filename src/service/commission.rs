use serde::Serialize;

use crate::{
    models::{
        commissionmodels::{CommissionRates, CommissionTier, COMMISSION_TIERS},
        influencermodel::Influencer,
    },
    utils::currency::format_rate,
};

/// Resolves the ambassador and customer rates for a tier.
///
/// Named tiers always read the fixed table. `Custom` uses the supplied
/// overrides, each defaulting to zero. The tier's volume range never
/// influences the result; tiers are assigned by an admin.
pub fn lookup_rates(
    tier: CommissionTier,
    custom_commission_rate: Option<f64>,
    custom_discount_rate: Option<f64>,
) -> CommissionRates {
    match tier.spec() {
        Some(spec) => CommissionRates {
            ambassador_rate: spec.ambassador_rate,
            customer_discount: spec.customer_rate,
        },
        None => CommissionRates {
            ambassador_rate: custom_commission_rate.unwrap_or(0.0),
            customer_discount: custom_discount_rate.unwrap_or(0.0),
        },
    }
}

pub fn influencer_rates(influencer: &Influencer) -> CommissionRates {
    lookup_rates(
        influencer.commission_tier,
        influencer.custom_commission_rate,
        influencer.custom_discount_rate,
    )
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TierView {
    pub key: CommissionTier,
    pub name: String,
    pub min_volume: u64,
    pub max_volume: Option<u64>,
    pub commission_total: f64,
    pub ambassador_rate: f64,
    pub customer_rate: f64,
    pub ambassador_rate_display: String,
    pub customer_rate_display: String,
}

/// The selection list shown when assigning a tier.
pub fn tier_catalogue() -> Vec<TierView> {
    COMMISSION_TIERS
        .iter()
        .map(|spec| TierView {
            key: spec.tier,
            name: spec.name.to_string(),
            min_volume: spec.range.0,
            max_volume: spec.range.1,
            commission_total: spec.commission_total,
            ambassador_rate: spec.ambassador_rate,
            customer_rate: spec.customer_rate,
            ambassador_rate_display: format_rate(spec.ambassador_rate),
            customer_rate_display: format_rate(spec.customer_rate),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silver_reads_fixed_table() {
        let spec = CommissionTier::Silver.spec().unwrap();
        assert_eq!(spec.ambassador_rate, 6.0);
        assert_eq!(spec.customer_rate, 4.0);
        assert_eq!(spec.commission_total, 10.0);

        let rates = lookup_rates(CommissionTier::Silver, Some(50.0), Some(50.0));
        assert_eq!(rates, CommissionRates { ambassador_rate: 6.0, customer_discount: 4.0 });
    }

    #[test]
    fn every_named_tier_matches_table() {
        let expected = [
            (CommissionTier::Tin, 5.0, 3.0, 2.0),
            (CommissionTier::Bronze, 7.0, 4.0, 3.0),
            (CommissionTier::Silver, 10.0, 6.0, 4.0),
            (CommissionTier::Gold, 12.0, 7.0, 5.0),
            (CommissionTier::Platinum, 15.0, 9.0, 6.0),
            (CommissionTier::Diamond, 20.0, 12.0, 8.0),
        ];

        for (tier, total, ambassador, customer) in expected {
            let spec = tier.spec().unwrap();
            assert_eq!(spec.commission_total, total, "{:?} total", tier);
            assert_eq!(spec.ambassador_rate, ambassador, "{:?} ambassador", tier);
            assert_eq!(spec.customer_rate, customer, "{:?} customer", tier);

            let rates = lookup_rates(tier, None, None);
            assert_eq!(rates.ambassador_rate, ambassador);
            assert_eq!(rates.customer_discount, customer);
        }
    }

    #[test]
    fn ranges_are_contiguous_and_last_is_unbounded() {
        assert_eq!(COMMISSION_TIERS[0].range.0, 0);
        for pair in COMMISSION_TIERS.windows(2) {
            assert_eq!(pair[0].range.1, Some(pair[1].range.0));
            assert!(pair[0].range.0 < pair[1].range.0);
        }
        assert_eq!(COMMISSION_TIERS[COMMISSION_TIERS.len() - 1].range.1, None);
    }

    #[test]
    fn custom_uses_overrides_with_zero_default() {
        assert!(CommissionTier::Custom.spec().is_none());

        let rates = lookup_rates(CommissionTier::Custom, Some(11.5), None);
        assert_eq!(rates.ambassador_rate, 11.5);
        assert_eq!(rates.customer_discount, 0.0);

        let rates = lookup_rates(CommissionTier::Custom, None, None);
        assert_eq!(rates, CommissionRates { ambassador_rate: 0.0, customer_discount: 0.0 });
    }

    #[test]
    fn catalogue_formats_one_decimal() {
        let catalogue = tier_catalogue();
        assert_eq!(catalogue.len(), 6);
        let gold = catalogue.iter().find(|t| t.key == CommissionTier::Gold).unwrap();
        assert_eq!(gold.ambassador_rate_display, "7.0%");
        assert_eq!(gold.customer_rate_display, "5.0%");
        assert_eq!(gold.min_volume, 10_000);
        assert_eq!(gold.max_volume, Some(25_000));
    }
}
