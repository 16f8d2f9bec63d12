use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{
    dtos::validate_uk_mobile,
    models::{
        commissionmodels::CommissionTier,
        influencermodel::{InfluencerUpdate, NewInfluencer},
    },
    service::{
        dashboard::InfluencerSummary,
        listing::{FilterOptions, InfluencerSortField, Page, PageRequest, SortDirection, StatusFilter},
    },
    utils::currency::parse_amount_to_pence,
};

pub const INFLUENCER_PAGE_SIZE: usize = 10;

/// Query string of the influencer table.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfluencerListQueryDto {
    pub search: Option<String>,
    pub status: Option<StatusFilter>,
    pub sort: Option<InfluencerSortField>,
    pub sort_direction: Option<SortDirection>,
    pub min_referrals: Option<u32>,
    /// Column header clicked; flips or switches the sort.
    pub toggle: Option<InfluencerSortField>,
    #[validate(range(min = 1))]
    pub current_page: Option<usize>,
    pub page: Option<usize>,
}

impl InfluencerListQueryDto {
    pub fn filter_options(&self) -> FilterOptions {
        let defaults = FilterOptions::default();
        let options = FilterOptions {
            status: self.status.unwrap_or(defaults.status),
            sort: self.sort.unwrap_or(defaults.sort),
            sort_direction: self.sort_direction.unwrap_or(defaults.sort_direction),
            min_referrals: self.min_referrals,
        };
        match self.toggle {
            Some(field) => options.with_sort_toggled(field),
            None => options,
        }
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.current_page, self.page, INFLUENCER_PAGE_SIZE)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfluencerListResponseDto {
    pub status: &'static str,
    pub data: Page<InfluencerSummary>,
    pub filters: FilterOptions,
    pub active_filter_count: usize,
    pub has_filters_applied: bool,
}

fn validate_custom_rates(dto: &AddInfluencerDto) -> Result<(), ValidationError> {
    if dto.commission_tier == CommissionTier::Custom && dto.custom_commission_rate.is_none() {
        let mut error = ValidationError::new("custom_rate_required");
        error.message = Some("A custom commission rate is required for the Custom tier".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_custom_rates", skip_on_field_errors = false))]
pub struct AddInfluencerDto {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Email is required"), email(message = "Email is invalid"))]
    pub email: String,
    #[validate(custom = "validate_uk_mobile")]
    pub phone: Option<String>,
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
    pub youtube: Option<String>,
    pub commission_tier: CommissionTier,
    #[validate(range(min = 0.0, max = 100.0, message = "Rate must be between 0 and 100"))]
    pub custom_commission_rate: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0, message = "Rate must be between 0 and 100"))]
    pub custom_discount_rate: Option<f64>,
    /// Generated from the name when left empty.
    #[validate(length(min = 3, max = 20, message = "Referral code must be between 3-20 characters"))]
    pub referral_code: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub send_welcome_email: bool,
}

impl AddInfluencerDto {
    pub fn new_influencer(&self) -> NewInfluencer {
        NewInfluencer {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            bio: self.bio.clone(),
            instagram: self.instagram.clone(),
            tiktok: self.tiktok.clone(),
            youtube: self.youtube.clone(),
            commission_tier: self.commission_tier,
            custom_commission_rate: self.custom_commission_rate,
            custom_discount_rate: self.custom_discount_rate,
        }
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditInfluencerDto {
    #[validate(length(min = 1, max = 100, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Email is invalid"))]
    pub email: Option<String>,
    #[validate(custom = "validate_uk_mobile")]
    pub phone: Option<String>,
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
    pub youtube: Option<String>,
    pub commission_tier: Option<CommissionTier>,
    #[validate(range(min = 0.0, max = 100.0, message = "Rate must be between 0 and 100"))]
    pub custom_commission_rate: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0, message = "Rate must be between 0 and 100"))]
    pub custom_discount_rate: Option<f64>,
    pub code_usage: Option<u32>,
    pub completed_treatments: Option<u32>,
    /// Display amount such as `"£960"`.
    pub earnings: Option<String>,
}

impl EditInfluencerDto {
    pub fn into_update(self) -> Result<InfluencerUpdate, String> {
        let earnings = self
            .earnings
            .as_deref()
            .map(parse_amount_to_pence)
            .transpose()?;

        Ok(InfluencerUpdate {
            name: self.name,
            email: self.email,
            phone: self.phone,
            bio: self.bio,
            instagram: self.instagram,
            tiktok: self.tiktok,
            youtube: self.youtube,
            commission_tier: self.commission_tier,
            custom_commission_rate: self.custom_commission_rate,
            custom_discount_rate: self.custom_discount_rate,
            code_usage: self.code_usage,
            completed_treatments: self.completed_treatments,
            earnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_dto() -> AddInfluencerDto {
        AddInfluencerDto {
            name: "Grace Lee".to_string(),
            email: "grace@example.com".to_string(),
            phone: Some("07700 900999".to_string()),
            bio: None,
            instagram: Some("@grace".to_string()),
            tiktok: None,
            youtube: None,
            commission_tier: CommissionTier::Silver,
            custom_commission_rate: None,
            custom_discount_rate: None,
            referral_code: None,
            expiry_date: None,
            send_welcome_email: false,
        }
    }

    #[test]
    fn add_requires_uk_mobile_and_custom_rate() {
        assert!(add_dto().validate().is_ok());

        let mut dto = add_dto();
        dto.phone = Some("+44 7700 900999".to_string());
        assert!(dto.validate().is_err());

        let mut dto = add_dto();
        dto.commission_tier = CommissionTier::Custom;
        assert!(dto.validate().is_err());
        dto.custom_commission_rate = Some(9.5);
        assert!(dto.validate().is_ok());

        dto.custom_discount_rate = Some(120.0);
        assert!(dto.validate().is_err());
    }

    #[test]
    fn edit_parses_display_earnings() {
        let dto = EditInfluencerDto { earnings: Some("£1,250.50".to_string()), ..Default::default() };
        assert_eq!(dto.into_update().unwrap().earnings, Some(125_050));

        let dto = EditInfluencerDto { earnings: Some("lots".to_string()), ..Default::default() };
        assert!(dto.into_update().is_err());

        for bad in ["£inf", "NaN", "1e300"] {
            let dto = EditInfluencerDto { earnings: Some(bad.to_string()), ..Default::default() };
            assert!(dto.into_update().is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn toggle_applies_after_explicit_sort() {
        let query = InfluencerListQueryDto {
            sort: Some(InfluencerSortField::Referrals),
            toggle: Some(InfluencerSortField::Referrals),
            ..Default::default()
        };
        let options = query.filter_options();
        assert_eq!(options.sort, InfluencerSortField::Referrals);
        assert_eq!(options.sort_direction, SortDirection::Desc);

        let query = InfluencerListQueryDto { toggle: Some(InfluencerSortField::Earnings), ..Default::default() };
        let options = query.filter_options();
        assert_eq!(options.sort, InfluencerSortField::Earnings);
        assert_eq!(options.sort_direction, SortDirection::Asc);
    }
}
