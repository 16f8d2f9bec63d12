use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::{
    models::referralmodel::{CodeUsageEvent, UsageStatus},
    service::listing::{
        filter_by_query, paginate, sort_records, Listable, Page, PageRequest, SortDirection, SortValue,
    },
    utils::currency::{format_pence, pence_to_pounds},
};

pub const USAGE_PAGE_SIZE: usize = 20;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UsageSummary {
    pub completed_count: usize,
    pub pending_count: usize,
    pub cancelled_count: usize,
    /// Pence, completed events only.
    pub total_earnings: i64,
    pub total_earnings_display: String,
}

/// Partitions events by status and sums earnings of completed bookings.
pub fn aggregate(events: &[CodeUsageEvent]) -> UsageSummary {
    let mut summary = UsageSummary {
        completed_count: 0,
        pending_count: 0,
        cancelled_count: 0,
        total_earnings: 0,
        total_earnings_display: String::new(),
    };

    for event in events {
        match event.status {
            UsageStatus::Completed => {
                summary.completed_count += 1;
                summary.total_earnings = summary.total_earnings.saturating_add(event.amount);
            }
            UsageStatus::Pending => summary.pending_count += 1,
            UsageStatus::Cancelled => summary.cancelled_count += 1,
        }
    }

    summary.total_earnings_display = format_pence(summary.total_earnings);
    summary
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum UsageSortField {
    #[default]
    Date,
    BookingId,
    Status,
    Amount,
}

impl Listable for CodeUsageEvent {
    type SortField = UsageSortField;

    fn matches_query(&self, needle: &str) -> bool {
        self.booking_id.to_lowercase().contains(needle)
            || self.status.to_str().contains(needle)
            || format_pence(self.amount).to_lowercase().contains(needle)
    }

    fn sort_value(&self, field: UsageSortField) -> SortValue<'_> {
        match field {
            UsageSortField::Date => SortValue::Number(self.date.num_days_from_ce() as f64),
            UsageSortField::BookingId => SortValue::text(&self.booking_id),
            UsageSortField::Status => SortValue::text(self.status.to_str()),
            UsageSortField::Amount => SortValue::Number(pence_to_pounds(self.amount)),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UsageFilter {
    pub status: Option<UsageStatus>,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub sort: UsageSortField,
    #[serde(default = "default_usage_direction")]
    pub sort_direction: SortDirection,
}

fn default_usage_direction() -> SortDirection {
    SortDirection::Desc
}

impl Default for UsageFilter {
    fn default() -> Self {
        UsageFilter {
            status: None,
            search: String::new(),
            sort: UsageSortField::default(),
            sort_direction: default_usage_direction(),
        }
    }
}

pub fn usage_view(events: Vec<CodeUsageEvent>, filter: &UsageFilter, request: PageRequest) -> Page<CodeUsageEvent> {
    let mut rows: Vec<CodeUsageEvent> = filter_by_query(events, &filter.search)
        .into_iter()
        .filter(|event| filter.status.map_or(true, |status| event.status == status))
        .collect();

    sort_records(&mut rows, filter.sort, filter.sort_direction);

    paginate(rows, request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::currency::parse_amount_to_pence;
    use chrono::NaiveDate;

    fn event(id: usize, status: UsageStatus, amount: &str) -> CodeUsageEvent {
        CodeUsageEvent {
            id: id.to_string(),
            code: "EMMA10".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, id as u32).unwrap(),
            booking_id: format!("BK-{:04}", id),
            status,
            amount: parse_amount_to_pence(amount).unwrap(),
        }
    }

    #[test]
    fn aggregates_completed_earnings_only() {
        let events = vec![
            event(1, UsageStatus::Completed, "£50"),
            event(2, UsageStatus::Pending, "£0"),
            event(3, UsageStatus::Cancelled, "£0"),
            event(4, UsageStatus::Completed, "£30.50"),
        ];

        let summary = aggregate(&events);
        assert_eq!(summary.completed_count, 2);
        assert_eq!(summary.pending_count, 1);
        assert_eq!(summary.cancelled_count, 1);
        assert_eq!(summary.total_earnings, 8050);
        assert_eq!(summary.total_earnings_display, "£80.50");
    }

    #[test]
    fn empty_events_aggregate_to_zero() {
        let summary = aggregate(&[]);
        assert_eq!(summary.completed_count + summary.pending_count + summary.cancelled_count, 0);
        assert_eq!(summary.total_earnings_display, "£0.00");
    }

    #[test]
    fn view_filters_by_status_and_sorts_by_amount() {
        let events = vec![
            event(1, UsageStatus::Completed, "£120"),
            event(2, UsageStatus::Pending, "£0"),
            event(3, UsageStatus::Completed, "£75.25"),
            event(4, UsageStatus::Completed, "£200"),
        ];
        let filter = UsageFilter {
            status: Some(UsageStatus::Completed),
            sort: UsageSortField::Amount,
            sort_direction: SortDirection::Asc,
            ..Default::default()
        };

        let page = usage_view(events, &filter, PageRequest::new(None, None, USAGE_PAGE_SIZE));
        let amounts: Vec<i64> = page.rows.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![7525, 12000, 20000]);
    }

    #[test]
    fn view_searches_booking_and_amount() {
        let events = vec![
            event(1, UsageStatus::Completed, "£120"),
            event(2, UsageStatus::Pending, "£0"),
        ];
        let filter = UsageFilter { search: "bk-0002".to_string(), ..Default::default() };
        let page = usage_view(events.clone(), &filter, PageRequest::new(None, None, USAGE_PAGE_SIZE));
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].id, "2");

        let filter = UsageFilter { search: "£120".to_string(), ..Default::default() };
        let page = usage_view(events, &filter, PageRequest::new(None, None, USAGE_PAGE_SIZE));
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].id, "1");
    }

    #[test]
    fn default_filter_matches_empty_query() {
        let parsed: UsageFilter = serde_json::from_str("{}").unwrap();
        let default = UsageFilter::default();
        assert_eq!(parsed.sort_direction, SortDirection::Desc);
        assert_eq!(default.sort_direction, parsed.sort_direction);
        assert_eq!(default.sort, parsed.sort);
    }
}
