use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Paid,
    Pending,
}

impl InvoiceStatus {
    pub fn to_str(&self) -> &str {
        match self {
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Pending => "pending",
        }
    }
}

/// Monthly commission invoice raised for one ambassador.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub invoice_number: String,
    pub influencer_id: Option<String>,
    pub influencer_name: String,
    pub email: String,
    /// First day of the invoiced month.
    pub month: NaiveDate,
    /// Pence.
    pub total_amount: i64,
    pub status: InvoiceStatus,
    pub paid_date: Option<NaiveDate>,
}

impl Invoice {
    pub fn month_label(&self) -> String {
        self.month.format("%B %Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_label_and_status_names() {
        let invoice = Invoice {
            id: "inv-1".to_string(),
            invoice_number: "INV-2024-005".to_string(),
            influencer_id: Some("1".to_string()),
            influencer_name: "Emma Rodriguez".to_string(),
            email: "emma@example.com".to_string(),
            month: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            total_amount: 250_000,
            status: InvoiceStatus::Pending,
            paid_date: None,
        };
        assert_eq!(invoice.month_label(), "March 2024");
        assert_eq!(invoice.status.to_str(), "pending");
        assert_eq!(InvoiceStatus::Paid.to_str(), "paid");
    }
}
