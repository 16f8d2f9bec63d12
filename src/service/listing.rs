//! Filter, sort and paginate pipeline shared by the admin tables.
//!
//! Every table runs the same three stages in the same order: records are
//! filtered first, the survivors are sorted (stable), and only then cut into
//! pages. Sorting happens on the filtered set because the sort column may
//! differ from the filtered columns.

use std::{borrow::Cow, cmp::Ordering};

use serde::{Deserialize, Serialize};

use crate::models::influencermodel::{Influencer, InfluencerStatus};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    pub fn toggled(&self) -> SortDirection {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// A resolved column value.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue<'a> {
    Number(f64),
    Text(Cow<'a, str>),
}

impl<'a> SortValue<'a> {
    pub fn text(value: &'a str) -> Self {
        SortValue::Text(Cow::Borrowed(value))
    }
}

fn is_decorated(value: &str) -> bool {
    value.contains('£') || value.contains('%')
}

fn strip_decoration(value: &str) -> String {
    value.chars().filter(|c| *c != '£' && *c != '%').collect()
}

fn compare_numbers(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Orders display strings such as `"£840"` or `"92%"`.
///
/// When either side carries a `£` or `%`, both sides are stripped of those
/// characters; if both then parse as numbers they compare numerically,
/// otherwise the stripped strings compare lexicographically. Undecorated
/// strings compare as-is.
pub fn compare_decorated(a: &str, b: &str) -> Ordering {
    if !is_decorated(a) && !is_decorated(b) {
        return a.cmp(b);
    }

    let a = strip_decoration(a);
    let b = strip_decoration(b);
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => compare_numbers(x, y),
        _ => a.cmp(&b),
    }
}

pub fn compare_values(a: &SortValue<'_>, b: &SortValue<'_>) -> Ordering {
    match (a, b) {
        (SortValue::Number(x), SortValue::Number(y)) => compare_numbers(*x, *y),
        (SortValue::Text(x), SortValue::Text(y)) => compare_decorated(x, y),
        (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
        (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
    }
}

/// A record that can be shown in a searchable, sortable table.
pub trait Listable {
    type SortField: Copy;

    /// `needle` is already lower-cased and non-empty.
    fn matches_query(&self, needle: &str) -> bool;

    fn sort_value(&self, field: Self::SortField) -> SortValue<'_>;
}

/// Keeps records matching the free-text query; an empty query keeps everything.
pub fn filter_by_query<T: Listable>(records: Vec<T>, query: &str) -> Vec<T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| record.matches_query(&needle))
        .collect()
}

/// Stable sort by one column.
pub fn sort_records<T: Listable>(records: &mut [T], field: T::SortField, direction: SortDirection) {
    records.sort_by(|a, b| {
        direction.apply(compare_values(&a.sort_value(field), &b.sort_value(field)))
    });
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Page navigation state of one table view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    current: usize,
}

impl PageCursor {
    pub fn new(current: usize) -> Self {
        PageCursor { current: current.max(1) }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Moves to `requested` when it lies in `[1, total_pages]`; otherwise
    /// nothing changes. Returns whether the cursor moved.
    pub fn navigate(&mut self, requested: usize, total_pages: usize) -> bool {
        if requested == 0 || requested > total_pages {
            return false;
        }
        self.current = requested;
        true
    }

    /// Pulls the cursor back inside the available pages after the row count shrank.
    pub fn clamp(&mut self, total_pages: usize) {
        self.current = self.current.min(total_pages.max(1));
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page the client is on.
    pub current: usize,
    /// Page the client asked to move to, if any.
    pub target: Option<usize>,
    pub page_size: usize,
}

impl PageRequest {
    pub fn new(current: Option<usize>, target: Option<usize>, page_size: usize) -> Self {
        PageRequest {
            current: current.unwrap_or(1),
            target,
            page_size,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            rows: self.rows.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }
}

/// Cuts an already filtered and sorted list into the requested page.
pub fn paginate<T>(records: Vec<T>, request: PageRequest) -> Page<T> {
    let total_count = records.len();
    let pages = total_pages(total_count, request.page_size);

    let mut cursor = PageCursor::new(request.current);
    cursor.clamp(pages);
    if let Some(target) = request.target {
        cursor.navigate(target, pages);
    }

    let page = cursor.current();
    let start = (page - 1).saturating_mul(request.page_size);
    let rows = records
        .into_iter()
        .skip(start)
        .take(request.page_size)
        .collect();

    Page {
        rows,
        page,
        page_size: request.page_size,
        total_count,
        total_pages: pages,
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub fn matches(&self, status: InfluencerStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status == InfluencerStatus::Active,
            StatusFilter::Inactive => status == InfluencerStatus::Inactive,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum InfluencerSortField {
    #[default]
    Name,
    Referrals,
    Earnings,
    ConversionRate,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default)]
    pub sort: InfluencerSortField,
    #[serde(default)]
    pub sort_direction: SortDirection,
    #[serde(default)]
    pub min_referrals: Option<u32>,
}

impl FilterOptions {
    pub fn matches(&self, influencer: &Influencer) -> bool {
        self.status.matches(influencer.status)
            && self
                .min_referrals
                .map_or(true, |min| influencer.referrals >= min)
    }

    /// Badge count on the filter button. Sort field and sort direction
    /// together count as a single dimension.
    pub fn active_filter_count(&self) -> usize {
        let defaults = FilterOptions::default();
        let status = usize::from(self.status != defaults.status);
        let min_referrals = usize::from(self.min_referrals.is_some());
        let sort = usize::from(
            self.sort != defaults.sort || self.sort_direction != defaults.sort_direction,
        );
        status + min_referrals + sort
    }

    pub fn has_filters_applied(&self) -> bool {
        self.active_filter_count() > 0
    }

    /// Header-click behaviour: same column flips direction, a new column starts ascending.
    pub fn with_sort_toggled(&self, field: InfluencerSortField) -> FilterOptions {
        let mut next = *self;
        if self.sort == field {
            next.sort_direction = self.sort_direction.toggled();
        } else {
            next.sort = field;
            next.sort_direction = SortDirection::Asc;
        }
        next
    }
}

impl Listable for Influencer {
    type SortField = InfluencerSortField;

    fn matches_query(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.email.to_lowercase().contains(needle)
    }

    fn sort_value(&self, field: InfluencerSortField) -> SortValue<'_> {
        match field {
            InfluencerSortField::Name => SortValue::text(&self.name),
            InfluencerSortField::Referrals => SortValue::Number(self.referrals as f64),
            InfluencerSortField::Earnings => SortValue::Number(self.earnings as f64),
            InfluencerSortField::ConversionRate => SortValue::Number(self.conversion_rate() as f64),
        }
    }
}

/// The influencer table: filter, then sort, then page.
pub fn view(
    records: Vec<Influencer>,
    query: &str,
    filters: &FilterOptions,
    request: PageRequest,
) -> Page<Influencer> {
    let mut rows: Vec<Influencer> = filter_by_query(records, query)
        .into_iter()
        .filter(|influencer| filters.matches(influencer))
        .collect();

    sort_records(&mut rows, filters.sort, filters.sort_direction);

    paginate(rows, request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::commissionmodels::CommissionTier;
    use chrono::Utc;

    fn influencer(id: usize, name: &str, referrals: u32, earnings_pounds: i64) -> Influencer {
        let now = Utc::now();
        Influencer {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            phone: None,
            bio: None,
            instagram: None,
            tiktok: None,
            youtube: None,
            status: if id % 2 == 0 { InfluencerStatus::Inactive } else { InfluencerStatus::Active },
            referrals,
            code_usage: referrals + 2,
            completed_treatments: referrals,
            earnings: earnings_pounds * 100,
            commission_tier: CommissionTier::Tin,
            custom_commission_rate: None,
            custom_discount_rate: None,
            referral_code: None,
            expiry_date: None,
            last_active: now,
            created_at: now,
            updated_at: now,
        }
    }

    fn request(page_size: usize) -> PageRequest {
        PageRequest::new(None, None, page_size)
    }

    #[test]
    fn decorated_strings_compare_numerically() {
        let mut values = vec!["£900", "£120", "£1000", "£95", "£450.50", "£450"];
        values.sort_by(|a, b| compare_decorated(a, b));
        assert_eq!(values, vec!["£95", "£120", "£450", "£450.50", "£900", "£1000"]);

        let mut rates = vec!["92%", "100%", "8%"];
        rates.sort_by(|a, b| compare_decorated(a, b));
        assert_eq!(rates, vec!["8%", "92%", "100%"]);
    }

    #[test]
    fn decorated_strings_fall_back_to_stripped_text() {
        assert_eq!(compare_decorated("£abc", "£abd"), Ordering::Less);
        assert_eq!(compare_decorated("Emma", "James"), Ordering::Less);
        assert_eq!(compare_decorated("£5", "£5.0"), Ordering::Equal);
    }

    #[test]
    fn earnings_sort_is_numeric_not_lexicographic() {
        let records: Vec<Influencer> = (0..12)
            .map(|i| influencer(i + 1, &format!("Person {}", i), 1, [900, 120, 450, 1000, 95, 300, 820, 610, 130, 700, 205, 560][i]))
            .collect();

        let filters = FilterOptions {
            sort: InfluencerSortField::Earnings,
            ..Default::default()
        };
        let page = view(records, "", &filters, request(20));
        let earnings: Vec<i64> = page.rows.iter().map(|r| r.earnings).collect();

        assert_eq!(earnings.len(), 12);
        assert!(earnings.windows(2).all(|w| w[0] < w[1]), "{:?}", earnings);
        assert_eq!(earnings[0], 9_500);
        assert_eq!(earnings[11], 100_000);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let records = vec![
            influencer(1, "Zed", 5, 10),
            influencer(3, "Amy", 5, 10),
            influencer(5, "Kim", 5, 10),
        ];
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let filters = FilterOptions {
                sort: InfluencerSortField::Referrals,
                sort_direction: direction,
                ..Default::default()
            };
            let page = view(records.clone(), "", &filters, request(10));
            let ids: Vec<&str> = page.rows.iter().map(|r| r.id.as_str()).collect();
            assert_eq!(ids, vec!["1", "3", "5"]);
        }
    }

    #[test]
    fn descending_sort_reverses_order() {
        let records = vec![
            influencer(1, "Amy", 3, 10),
            influencer(3, "Bea", 9, 10),
            influencer(5, "Cat", 6, 10),
        ];
        let filters = FilterOptions {
            sort: InfluencerSortField::Referrals,
            sort_direction: SortDirection::Desc,
            ..Default::default()
        };
        let page = view(records, "", &filters, request(10));
        let referrals: Vec<u32> = page.rows.iter().map(|r| r.referrals).collect();
        assert_eq!(referrals, vec![9, 6, 3]);
    }

    #[test]
    fn min_referrals_threshold_is_inclusive() {
        let records = vec![influencer(1, "Five", 5, 10)];

        let mut filters = FilterOptions { min_referrals: Some(6), ..Default::default() };
        assert_eq!(view(records.clone(), "", &filters, request(10)).total_count, 0);

        filters.min_referrals = Some(5);
        assert_eq!(view(records.clone(), "", &filters, request(10)).total_count, 1);

        filters.min_referrals = None;
        assert_eq!(view(records, "", &filters, request(10)).total_count, 1);
    }

    #[test]
    fn query_matches_name_or_email_case_insensitively() {
        let records = vec![
            influencer(1, "Emma Rodriguez", 1, 1),
            influencer(3, "James Wilson", 1, 1),
        ];
        let filters = FilterOptions::default();

        let page = view(records.clone(), "EMMA", &filters, request(10));
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].name, "Emma Rodriguez");

        let page = view(records.clone(), "james.wilson@", &filters, request(10));
        assert_eq!(page.rows.len(), 1);

        let page = view(records, "", &filters, request(10));
        assert_eq!(page.rows.len(), 2);
    }

    #[test]
    fn status_filter_keeps_matching_records() {
        let records: Vec<Influencer> = (1..=4).map(|i| influencer(i, &format!("P{}", i), 1, 1)).collect();
        let filters = FilterOptions { status: StatusFilter::Inactive, ..Default::default() };
        let page = view(records, "", &filters, request(10));
        assert_eq!(page.total_count, 2);
        assert!(page.rows.iter().all(|r| r.status == InfluencerStatus::Inactive));
    }

    #[test]
    fn pagination_boundaries_leave_current_page_unchanged() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(30, 10), 3);

        let mut cursor = PageCursor::new(2);
        assert!(!cursor.navigate(4, 3));
        assert_eq!(cursor.current(), 2);
        assert!(!cursor.navigate(0, 3));
        assert_eq!(cursor.current(), 2);
        assert!(cursor.navigate(3, 3));
        assert_eq!(cursor.current(), 3);
    }

    #[test]
    fn paginate_serves_partial_last_page() {
        let records: Vec<usize> = (1..=25).collect();

        let page = paginate(records.clone(), PageRequest::new(Some(2), Some(3), 10));
        assert_eq!(page.page, 3);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.rows, (21..=25).collect::<Vec<_>>());

        let page = paginate(records.clone(), PageRequest::new(Some(2), Some(4), 10));
        assert_eq!(page.page, 2);
        assert_eq!(page.rows, (11..=20).collect::<Vec<_>>());

        let page = paginate(records, PageRequest::new(Some(2), Some(0), 10));
        assert_eq!(page.page, 2);
    }

    #[test]
    fn paginate_empty_list() {
        let page = paginate(Vec::<usize>::new(), PageRequest::new(Some(3), Some(1), 10));
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.page, 1);
        assert!(page.rows.is_empty());
    }

    #[test]
    fn active_filter_badge_count() {
        let only_status = FilterOptions {
            status: StatusFilter::Active,
            min_referrals: None,
            sort: InfluencerSortField::Name,
            sort_direction: SortDirection::Asc,
        };
        assert_eq!(only_status.active_filter_count(), 1);

        let referrals_and_sort = FilterOptions {
            status: StatusFilter::All,
            min_referrals: Some(10),
            sort: InfluencerSortField::Earnings,
            sort_direction: SortDirection::Desc,
        };
        assert_eq!(referrals_and_sort.active_filter_count(), 2);

        assert_eq!(FilterOptions::default().active_filter_count(), 0);
        assert!(!FilterOptions::default().has_filters_applied());
    }

    #[test]
    fn header_click_toggles_direction_or_resets() {
        let filters = FilterOptions::default();
        let flipped = filters.with_sort_toggled(InfluencerSortField::Name);
        assert_eq!(flipped.sort_direction, SortDirection::Desc);

        let switched = flipped.with_sort_toggled(InfluencerSortField::Referrals);
        assert_eq!(switched.sort, InfluencerSortField::Referrals);
        assert_eq!(switched.sort_direction, SortDirection::Asc);
    }
}
