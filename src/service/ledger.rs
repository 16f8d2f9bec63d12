use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    models::invoicemodel::{Invoice, InvoiceStatus},
    service::{
        error::ServiceError,
        listing::{filter_by_query, sort_records, Listable, SortDirection, SortValue},
    },
    utils::currency::{format_pence, sum_pence},
};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum InvoiceSortField {
    Amount,
    #[default]
    Month,
}

impl Listable for Invoice {
    type SortField = InvoiceSortField;

    fn matches_query(&self, needle: &str) -> bool {
        self.influencer_name.to_lowercase().contains(needle)
            || self.invoice_number.to_lowercase().contains(needle)
            || self.email.to_lowercase().contains(needle)
    }

    fn sort_value(&self, field: InvoiceSortField) -> SortValue<'_> {
        match field {
            InvoiceSortField::Amount => SortValue::Number(self.total_amount as f64),
            InvoiceSortField::Month => SortValue::Number(self.month.num_days_from_ce() as f64),
        }
    }
}

fn default_desc() -> SortDirection {
    SortDirection::Desc
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub sort: InvoiceSortField,
    #[serde(default = "default_desc")]
    pub sort_direction: SortDirection,
}

impl Default for InvoiceFilter {
    fn default() -> Self {
        InvoiceFilter {
            search: String::new(),
            sort: InvoiceSortField::Month,
            sort_direction: SortDirection::Desc,
        }
    }
}

/// Admin totals, computed over every invoice regardless of the search box.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub total_invoiced: i64,
    pub total_paid: i64,
    pub total_pending: i64,
    pub pending_count: usize,
    pub total_invoiced_display: String,
    pub total_paid_display: String,
    pub total_pending_display: String,
}

pub fn summarize_invoices(invoices: &[Invoice]) -> InvoiceSummary {
    let (paid, pending): (Vec<&Invoice>, Vec<&Invoice>) = invoices
        .iter()
        .partition(|invoice| invoice.status == InvoiceStatus::Paid);

    let total_paid = sum_pence(paid.iter().map(|i| i.total_amount));
    let total_pending = sum_pence(pending.iter().map(|i| i.total_amount));
    let total_invoiced = total_paid.saturating_add(total_pending);

    InvoiceSummary {
        total_invoiced,
        total_paid,
        total_pending,
        pending_count: pending.len(),
        total_invoiced_display: format_pence(total_invoiced),
        total_paid_display: format_pence(total_paid),
        total_pending_display: format_pence(total_pending),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceListView {
    pub invoices: Vec<Invoice>,
    pub summary: InvoiceSummary,
}

/// Search then sort; the invoice table is not paged.
pub fn invoice_view(invoices: Vec<Invoice>, filter: &InvoiceFilter) -> InvoiceListView {
    let summary = summarize_invoices(&invoices);
    let mut invoices = filter_by_query(invoices, &filter.search);
    sort_records(&mut invoices, filter.sort, filter.sort_direction);

    InvoiceListView { invoices, summary }
}

pub fn mark_paid(invoice: &mut Invoice, today: NaiveDate) -> Result<(), ServiceError> {
    if invoice.status == InvoiceStatus::Paid {
        return Err(ServiceError::InvoiceAlreadyPaid(invoice.invoice_number.clone()));
    }
    invoice.status = InvoiceStatus::Paid;
    invoice.paid_date = Some(today);
    Ok(())
}

/// Ambassador earnings header.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EarningsSummary {
    pub total_earned: i64,
    pub total_paid: i64,
    pub total_pending: i64,
    pub total_earned_display: String,
    pub total_paid_display: String,
    pub total_pending_display: String,
}

pub fn summarize_earnings(invoices: &[Invoice]) -> EarningsSummary {
    let summary = summarize_invoices(invoices);
    EarningsSummary {
        total_earned: summary.total_invoiced,
        total_paid: summary.total_paid,
        total_pending: summary.total_pending,
        total_earned_display: summary.total_invoiced_display,
        total_paid_display: summary.total_paid_display,
        total_pending_display: summary.total_pending_display,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsView {
    pub invoices: Vec<Invoice>,
    pub summary: EarningsSummary,
}

/// Newest month first.
pub fn earnings_view(mut invoices: Vec<Invoice>) -> EarningsView {
    let summary = summarize_earnings(&invoices);
    sort_records(&mut invoices, InvoiceSortField::Month, SortDirection::Desc);
    EarningsView { invoices, summary }
}
