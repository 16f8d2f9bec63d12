use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rand::{distr::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

use crate::{
    models::referralmodel::{CodeStatus, ReferralCode},
    service::{
        error::ServiceError,
        listing::{filter_by_query, paginate, sort_records, Listable, Page, PageRequest, SortDirection, SortValue},
    },
    utils::currency::{format_pence, pence_to_pounds, sum_pence},
};

pub const ACTIVE_CODES_PAGE_SIZE: usize = 10;

/// Suggested code: up to four letters/digits of the name plus four random characters, upper-cased.
pub fn generate_referral_code(name: &str) -> String {
    let prefix: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(4)
        .collect();

    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(4)
        .map(char::from)
        .collect();

    format!("{}{}", prefix, suffix).to_uppercase()
}

pub fn generate_referral_link(base_url: &str, code: &str) -> String {
    format!("{}/?ref={}", base_url.trim_end_matches('/'), code)
}

/// Codes without an explicit expiry run for a year.
pub const DEFAULT_CODE_LIFETIME_DAYS: i64 = 365;

/// A code dated `date` stays usable until the end of that day.
pub fn expiry_from_date(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(23, 59, 59)
        .map(|end_of_day| Utc.from_utc_datetime(&end_of_day))
}

pub fn default_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(DEFAULT_CODE_LIFETIME_DAYS)
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CodeAction {
    Pause,
    Activate,
    End,
}

impl CodeAction {
    fn past_tense(&self) -> &'static str {
        match self {
            CodeAction::Pause => "paused",
            CodeAction::Activate => "activated",
            CodeAction::End => "ended",
        }
    }
}

/// An influencer holds at most one live (active or paused) code at a time.
pub fn ensure_can_add(siblings: &[ReferralCode]) -> Result<(), ServiceError> {
    if siblings
        .iter()
        .any(|c| matches!(c.status, CodeStatus::Active | CodeStatus::Paused))
    {
        return Err(ServiceError::Conflict(
            "This influencer already has an active or paused code. End the existing code before adding a new one.".to_string(),
        ));
    }
    Ok(())
}

/// Applies `action` to `siblings[index]`, checking the rules against the
/// influencer's other codes.
pub fn apply_action(
    siblings: &mut [ReferralCode],
    index: usize,
    action: CodeAction,
    now: DateTime<Utc>,
) -> Result<(), ServiceError> {
    let current = &siblings[index];
    let invalid = || ServiceError::InvalidCodeTransition {
        code: current.code.clone(),
        status: current.status,
        action: action.past_tense(),
    };

    match action {
        CodeAction::Pause => {
            if current.status != CodeStatus::Active {
                return Err(invalid());
            }
            if siblings.iter().any(|c| c.status == CodeStatus::Paused) {
                return Err(ServiceError::Conflict(
                    "Another code is already paused. End the paused code first.".to_string(),
                ));
            }
            siblings[index].status = CodeStatus::Paused;
        }
        CodeAction::Activate => {
            if current.status != CodeStatus::Paused || current.expiry_date <= now {
                return Err(invalid());
            }
            if siblings.iter().any(|c| c.status == CodeStatus::Active) {
                return Err(ServiceError::Conflict(
                    "Another code is already active. End the active code first.".to_string(),
                ));
            }
            siblings[index].status = CodeStatus::Active;
        }
        CodeAction::End => {
            if current.status == CodeStatus::Expired {
                return Err(invalid());
            }
            siblings[index].status = CodeStatus::Expired;
            siblings[index].expiry_date = now;
        }
    }

    Ok(())
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CodeSortField {
    Code,
    Status,
    StartDate,
    ExpiryDate,
    UsageCount,
    CompletedBookings,
    TotalEarnings,
}

impl Listable for ReferralCode {
    type SortField = CodeSortField;

    fn matches_query(&self, needle: &str) -> bool {
        self.code.to_lowercase().contains(needle)
    }

    fn sort_value(&self, field: CodeSortField) -> SortValue<'_> {
        match field {
            CodeSortField::Code => SortValue::text(&self.code),
            CodeSortField::Status => SortValue::text(self.status.to_str()),
            CodeSortField::StartDate => SortValue::Number(self.start_date.timestamp() as f64),
            CodeSortField::ExpiryDate => SortValue::Number(self.expiry_date.timestamp() as f64),
            CodeSortField::UsageCount => SortValue::Number(self.usage_count as f64),
            CodeSortField::CompletedBookings => SortValue::Number(self.completed_bookings as f64),
            CodeSortField::TotalEarnings => SortValue::Number(self.total_earnings as f64),
        }
    }
}

/// Code history of one influencer; without a sort field the stored order is kept.
pub fn sort_code_history(codes: &mut [ReferralCode], sort: Option<CodeSortField>, direction: SortDirection) {
    if let Some(field) = sort {
        sort_records(codes, field, direction);
    }
}

/// One row of the admin "active codes" overview.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ActiveCodeRow {
    pub code: String,
    pub influencer_name: String,
    pub influencer_id: String,
    pub expiry_date: DateTime<Utc>,
    pub usage_count: u32,
    /// Pence.
    pub revenue: i64,
    pub revenue_display: String,
    pub status: CodeStatus,
}

impl ActiveCodeRow {
    pub fn new(code: &ReferralCode, influencer_name: &str) -> Self {
        ActiveCodeRow {
            code: code.code.clone(),
            influencer_name: influencer_name.to_string(),
            influencer_id: code.influencer_id.clone(),
            expiry_date: code.expiry_date,
            usage_count: code.usage_count,
            revenue: code.total_earnings,
            revenue_display: format_pence(code.total_earnings),
            status: code.status,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ActiveCodeSortField {
    #[default]
    Code,
    InfluencerName,
    ExpiryDate,
    UsageCount,
    Revenue,
}

impl Listable for ActiveCodeRow {
    type SortField = ActiveCodeSortField;

    fn matches_query(&self, needle: &str) -> bool {
        self.code.to_lowercase().contains(needle) || self.influencer_name.to_lowercase().contains(needle)
    }

    fn sort_value(&self, field: ActiveCodeSortField) -> SortValue<'_> {
        match field {
            ActiveCodeSortField::Code => SortValue::text(&self.code),
            ActiveCodeSortField::InfluencerName => SortValue::text(&self.influencer_name),
            ActiveCodeSortField::ExpiryDate => SortValue::Number(self.expiry_date.timestamp() as f64),
            ActiveCodeSortField::UsageCount => SortValue::Number(self.usage_count as f64),
            ActiveCodeSortField::Revenue => SortValue::Number(pence_to_pounds(self.revenue)),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LiveCodeFilter {
    #[default]
    All,
    Active,
    Paused,
}

impl LiveCodeFilter {
    pub fn matches(&self, status: CodeStatus) -> bool {
        match self {
            LiveCodeFilter::All => matches!(status, CodeStatus::Active | CodeStatus::Paused),
            LiveCodeFilter::Active => status == CodeStatus::Active,
            LiveCodeFilter::Paused => status == CodeStatus::Paused,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ActiveCodeFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: LiveCodeFilter,
    #[serde(default)]
    pub sort: ActiveCodeSortField,
    #[serde(default)]
    pub sort_direction: SortDirection,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveCodesView {
    #[serde(flatten)]
    pub page: Page<ActiveCodeRow>,
    /// Revenue of every filtered row, not only the current page.
    pub total_revenue: i64,
    pub total_revenue_display: String,
}

pub fn active_codes_view(rows: Vec<ActiveCodeRow>, filter: &ActiveCodeFilter, request: PageRequest) -> ActiveCodesView {
    let mut rows: Vec<ActiveCodeRow> = filter_by_query(rows, &filter.search)
        .into_iter()
        .filter(|row| filter.status.matches(row.status))
        .collect();

    let total_revenue = sum_pence(rows.iter().map(|row| row.revenue));
    sort_records(&mut rows, filter.sort, filter.sort_direction);

    ActiveCodesView {
        page: paginate(rows, request),
        total_revenue,
        total_revenue_display: format_pence(total_revenue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(id: &str, status: CodeStatus) -> ReferralCode {
        let now = Utc::now();
        ReferralCode {
            id: id.to_string(),
            influencer_id: "1".to_string(),
            code: format!("CODE{}", id),
            status,
            start_date: now - Duration::days(30),
            expiry_date: now + Duration::days(30),
            usage_count: 0,
            completed_bookings: 0,
            total_earnings: 0,
        }
    }

    #[test]
    fn generated_code_uses_name_prefix() {
        let generated = generate_referral_code("Emma Rodriguez");
        assert_eq!(generated.len(), 8);
        assert!(generated.starts_with("EMMA"));
        assert!(generated.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));

        let short = generate_referral_code("Al");
        assert!(short.starts_with("AL"));
        assert_eq!(short.len(), 6);
    }

    #[test]
    fn referral_link_appends_code() {
        assert_eq!(
            generate_referral_link("https://bwc.example/", "EMMA10"),
            "https://bwc.example/?ref=EMMA10"
        );
    }

    #[test]
    fn expiry_runs_to_end_of_day() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let expiry = expiry_from_date(date).unwrap();
        assert_eq!(expiry.date_naive(), date);
        assert_eq!(expiry.format("%H:%M:%S").to_string(), "23:59:59");
    }

    #[test]
    fn cannot_add_while_live_code_exists() {
        assert!(ensure_can_add(&[code("1", CodeStatus::Expired)]).is_ok());
        assert!(ensure_can_add(&[code("1", CodeStatus::Active)]).is_err());
        assert!(ensure_can_add(&[code("1", CodeStatus::Paused)]).is_err());
    }

    #[test]
    fn pause_then_activate_then_end() {
        let now = Utc::now();
        let mut codes = vec![code("1", CodeStatus::Active), code("2", CodeStatus::Expired)];

        apply_action(&mut codes, 0, CodeAction::Pause, now).unwrap();
        assert_eq!(codes[0].status, CodeStatus::Paused);

        apply_action(&mut codes, 0, CodeAction::Activate, now).unwrap();
        assert_eq!(codes[0].status, CodeStatus::Active);

        apply_action(&mut codes, 0, CodeAction::End, now).unwrap();
        assert_eq!(codes[0].status, CodeStatus::Expired);
        assert_eq!(codes[0].expiry_date, now);

        assert!(matches!(
            apply_action(&mut codes, 0, CodeAction::End, now),
            Err(ServiceError::InvalidCodeTransition { .. })
        ));
    }

    #[test]
    fn only_one_paused_and_one_active() {
        let now = Utc::now();
        let mut codes = vec![code("1", CodeStatus::Active), code("2", CodeStatus::Paused)];
        assert!(matches!(
            apply_action(&mut codes, 0, CodeAction::Pause, now),
            Err(ServiceError::Conflict(_))
        ));
        assert!(matches!(
            apply_action(&mut codes, 1, CodeAction::Activate, now),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn cannot_activate_past_expiry() {
        let now = Utc::now();
        let mut codes = vec![code("1", CodeStatus::Paused)];
        codes[0].expiry_date = now - Duration::days(1);
        assert!(apply_action(&mut codes, 0, CodeAction::Activate, now).is_err());
    }

    #[test]
    fn active_codes_view_filters_and_totals_revenue() {
        let mut a = code("1", CodeStatus::Active);
        a.code = "EMMA10".to_string();
        a.total_earnings = 225_000;
        let mut b = code("2", CodeStatus::Paused);
        b.code = "JAMES15".to_string();
        b.total_earnings = 160_000;
        let c = code("3", CodeStatus::Expired);

        let rows = vec![
            ActiveCodeRow::new(&a, "Emma Rodriguez"),
            ActiveCodeRow::new(&b, "James Wilson"),
            ActiveCodeRow::new(&c, "Sophie Anderson"),
        ];

        let filter = ActiveCodeFilter {
            sort: ActiveCodeSortField::Revenue,
            sort_direction: SortDirection::Desc,
            ..Default::default()
        };
        let view = active_codes_view(rows.clone(), &filter, PageRequest::new(None, None, ACTIVE_CODES_PAGE_SIZE));
        assert_eq!(view.page.total_count, 2);
        assert_eq!(view.page.rows[0].code, "EMMA10");
        assert_eq!(view.total_revenue, 385_000);
        assert_eq!(view.total_revenue_display, "£3850.00");

        let filter = ActiveCodeFilter { status: LiveCodeFilter::Paused, ..Default::default() };
        let view = active_codes_view(rows.clone(), &filter, PageRequest::new(None, None, ACTIVE_CODES_PAGE_SIZE));
        assert_eq!(view.page.total_count, 1);
        assert_eq!(view.page.rows[0].influencer_name, "James Wilson");

        let filter = ActiveCodeFilter { search: "emma".to_string(), ..Default::default() };
        let view = active_codes_view(rows, &filter, PageRequest::new(None, None, ACTIVE_CODES_PAGE_SIZE));
        assert_eq!(view.page.total_count, 1);
    }

    #[test]
    fn code_history_keeps_order_without_sort() {
        let mut codes = vec![code("2", CodeStatus::Active), code("1", CodeStatus::Expired)];
        sort_code_history(&mut codes, None, SortDirection::Asc);
        assert_eq!(codes[0].id, "2");
        sort_code_history(&mut codes, Some(CodeSortField::Code), SortDirection::Asc);
        assert_eq!(codes[0].id, "1");
    }
}
