// db/applicationdb.rs
use async_trait::async_trait;
use chrono::Utc;

use super::db::DBClient;

use crate::{
    models::applicationmodel::{AmbassadorApplication, ApplicationStatus, NewApplication},
    service::{
        applications::{new_application, review},
        error::ServiceError,
    },
};

#[async_trait]
pub trait ApplicationExt {
    async fn get_applications(&self) -> Vec<AmbassadorApplication>;

    async fn save_application(&self, application: NewApplication) -> Result<AmbassadorApplication, ServiceError>;

    async fn review_application(
        &self,
        application_id: &str,
        decision: ApplicationStatus,
        reviewer: &str,
        notes: Option<String>,
    ) -> Result<AmbassadorApplication, ServiceError>;
}

#[async_trait]
impl ApplicationExt for DBClient {
    async fn get_applications(&self) -> Vec<AmbassadorApplication> {
        self.store.read().await.applications.clone()
    }

    async fn save_application(&self, application: NewApplication) -> Result<AmbassadorApplication, ServiceError> {
        let mut store = self.store.write().await;

        let email = application.email.trim();
        let already_pending = store
            .applications
            .iter()
            .any(|a| a.status == ApplicationStatus::Pending && a.email.eq_ignore_ascii_case(email));
        if already_pending {
            return Err(ServiceError::Conflict(
                "An application with this email is already awaiting review".to_string(),
            ));
        }

        let record = new_application(application, Utc::now());
        store.applications.push(record.clone());
        Ok(record)
    }

    async fn review_application(
        &self,
        application_id: &str,
        decision: ApplicationStatus,
        reviewer: &str,
        notes: Option<String>,
    ) -> Result<AmbassadorApplication, ServiceError> {
        let mut store = self.store.write().await;

        let application = store
            .applications
            .iter_mut()
            .find(|a| a.id == application_id)
            .ok_or_else(|| ServiceError::ApplicationNotFound(application_id.to_string()))?;

        review(application, decision, reviewer, notes, Utc::now())?;
        Ok(application.clone())
    }
}
