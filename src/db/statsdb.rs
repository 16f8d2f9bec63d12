// db/statsdb.rs
use async_trait::async_trait;

use super::db::DBClient;

use crate::models::statsmodel::MonthlyMetric;

#[async_trait]
pub trait StatsExt {
    async fn get_monthly_metrics(&self) -> Vec<MonthlyMetric>;
}

#[async_trait]
impl StatsExt for DBClient {
    async fn get_monthly_metrics(&self) -> Vec<MonthlyMetric> {
        self.store.read().await.monthly.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn twelve_months_of_series() {
        let db = DBClient::with_fixtures();
        let monthly = db.get_monthly_metrics().await;
        assert_eq!(monthly.len(), 12);
        assert_eq!(monthly[0].name, "Jan");
        assert_eq!(monthly[11].referrals, 225);
        assert_eq!(monthly[11].revenue, 2_250_000);

        assert!(DBClient::new().get_monthly_metrics().await.is_empty());
    }
}
