// db/invoicedb.rs
use async_trait::async_trait;
use chrono::Utc;

use super::db::DBClient;

use crate::{
    models::invoicemodel::Invoice,
    service::{error::ServiceError, ledger::mark_paid},
};

#[async_trait]
pub trait InvoiceExt {
    async fn get_invoices(&self) -> Vec<Invoice>;

    async fn get_invoices_for_influencer(&self, influencer_id: &str) -> Vec<Invoice>;

    async fn mark_invoice_paid(&self, invoice_id: &str) -> Result<Invoice, ServiceError>;
}

#[async_trait]
impl InvoiceExt for DBClient {
    async fn get_invoices(&self) -> Vec<Invoice> {
        self.store.read().await.invoices.clone()
    }

    async fn get_invoices_for_influencer(&self, influencer_id: &str) -> Vec<Invoice> {
        self.store
            .read()
            .await
            .invoices
            .iter()
            .filter(|i| i.influencer_id.as_deref() == Some(influencer_id))
            .cloned()
            .collect()
    }

    async fn mark_invoice_paid(&self, invoice_id: &str) -> Result<Invoice, ServiceError> {
        let mut store = self.store.write().await;

        let invoice = store
            .invoices
            .iter_mut()
            .find(|i| i.id == invoice_id)
            .ok_or_else(|| ServiceError::InvoiceNotFound(invoice_id.to_string()))?;

        mark_paid(invoice, Utc::now().date_naive())?;
        tracing::info!(
            "Invoice {} for {} is now {}",
            invoice.invoice_number,
            invoice.month_label(),
            invoice.status.to_str()
        );
        Ok(invoice.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoicemodel::InvoiceStatus;

    #[tokio::test]
    async fn influencer_invoices_only() {
        let db = DBClient::with_fixtures();
        let emma = db.get_invoices_for_influencer("1").await;
        assert_eq!(emma.len(), 3);
        assert!(emma.iter().all(|i| i.influencer_name == "Emma Rodriguez"));
        assert!(db.get_invoices_for_influencer("2").await.is_empty());
    }

    #[tokio::test]
    async fn mark_pending_invoice_paid() {
        let db = DBClient::with_fixtures();
        let paid = db.mark_invoice_paid("INV-2024-002").await.unwrap();
        assert_eq!(paid.status, InvoiceStatus::Paid);
        assert_eq!(paid.paid_date, Some(Utc::now().date_naive()));

        let err = db.mark_invoice_paid("INV-2024-002").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvoiceAlreadyPaid(_)));

        let err = db.mark_invoice_paid("INV-1999-001").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvoiceNotFound(_)));
    }
}
