use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{
    models::referralmodel::{CodeUsageEvent, ReferralCode, UsageStatus},
    service::{
        listing::{Page, PageRequest, SortDirection},
        referral::{ActiveCodeFilter, ActiveCodeSortField, CodeSortField, LiveCodeFilter, ACTIVE_CODES_PAGE_SIZE},
        usage::{UsageFilter, UsageSortField, UsageSummary, USAGE_PAGE_SIZE},
    },
};

fn validate_code_characters(code: &str) -> Result<(), ValidationError> {
    if code.trim().chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_code");
        error.message = Some("Referral code may only contain letters and digits".into());
        Err(error)
    }
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCodeDto {
    #[validate(
        length(min = 3, max = 20, message = "Referral code must be between 3-20 characters"),
        custom = "validate_code_characters"
    )]
    pub code: String,
    pub expiry_date: NaiveDate,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeHistoryQueryDto {
    pub sort: Option<CodeSortField>,
    #[serde(default)]
    pub sort_direction: SortDirection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeneratedCodeDto {
    pub status: &'static str,
    pub code: String,
    pub link: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveCodesQueryDto {
    pub search: Option<String>,
    pub status: Option<LiveCodeFilter>,
    pub sort: Option<ActiveCodeSortField>,
    pub sort_direction: Option<SortDirection>,
    #[validate(range(min = 1))]
    pub current_page: Option<usize>,
    pub page: Option<usize>,
}

impl ActiveCodesQueryDto {
    pub fn filter(&self) -> ActiveCodeFilter {
        ActiveCodeFilter {
            search: self.search.clone().unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            sort: self.sort.unwrap_or_default(),
            sort_direction: self.sort_direction.unwrap_or_default(),
        }
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.current_page, self.page, ACTIVE_CODES_PAGE_SIZE)
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageQueryDto {
    pub status: Option<UsageStatus>,
    pub search: Option<String>,
    pub sort: Option<UsageSortField>,
    pub sort_direction: Option<SortDirection>,
    #[validate(range(min = 1))]
    pub current_page: Option<usize>,
    pub page: Option<usize>,
}

impl UsageQueryDto {
    /// Newest booking first unless asked otherwise.
    pub fn filter(&self) -> UsageFilter {
        UsageFilter {
            status: self.status,
            search: self.search.clone().unwrap_or_default(),
            sort: self.sort.unwrap_or_default(),
            sort_direction: self.sort_direction.unwrap_or(SortDirection::Desc),
        }
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.current_page, self.page, USAGE_PAGE_SIZE)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeUsageResponseDto {
    pub status: &'static str,
    pub code: ReferralCode,
    /// Over every event of the code, ignoring filters.
    pub summary: UsageSummary,
    pub usages: Page<CodeUsageEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_must_be_alphanumeric() {
        let expiry_date = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        assert!(AddCodeDto { code: "EMMA10".to_string(), expiry_date }.validate().is_ok());
        assert!(AddCodeDto { code: "EMMA-10".to_string(), expiry_date }.validate().is_err());
        assert!(AddCodeDto { code: "AB".to_string(), expiry_date }.validate().is_err());
    }

    #[test]
    fn usage_defaults_to_newest_first() {
        let filter = UsageQueryDto::default().filter();
        assert_eq!(filter.sort, UsageSortField::Date);
        assert_eq!(filter.sort_direction, SortDirection::Desc);
    }
}
