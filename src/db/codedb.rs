// db/codedb.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::db::{DBClient, Store};

use crate::{
    models::referralmodel::{CodeStatus, CodeUsageEvent, ReferralCode},
    service::{
        error::ServiceError,
        referral::{apply_action, ensure_can_add, ActiveCodeRow, CodeAction},
    },
};

#[async_trait]
pub trait ReferralCodeExt {
    /// Every code the influencer has held, stored order.
    async fn get_codes_for_influencer(&self, influencer_id: &str) -> Result<Vec<ReferralCode>, ServiceError>;

    /// Active and paused codes across all influencers, joined with names.
    async fn get_live_codes(&self) -> Vec<ActiveCodeRow>;

    async fn get_code(&self, code: &str) -> Option<ReferralCode>;

    async fn save_code(
        &self,
        influencer_id: &str,
        code: &str,
        expiry_date: DateTime<Utc>,
    ) -> Result<ReferralCode, ServiceError>;

    async fn transition_code(&self, code_id: &str, action: CodeAction) -> Result<ReferralCode, ServiceError>;

    async fn get_code_usages(&self, code: &str) -> Result<Vec<CodeUsageEvent>, ServiceError>;
}

/// Keeps the influencer's current code fields in line with their live code.
fn sync_influencer_code(store: &mut Store, influencer_id: &str) {
    let live = store
        .codes
        .iter()
        .find(|c| {
            c.influencer_id == influencer_id && matches!(c.status, CodeStatus::Active | CodeStatus::Paused)
        })
        .map(|c| (c.code.clone(), c.expiry_date.date_naive()));

    if let Some(influencer) = store.influencers.iter_mut().find(|i| i.id == influencer_id) {
        influencer.referral_code = live.as_ref().map(|(code, _)| code.clone());
        influencer.expiry_date = live.map(|(_, expiry)| expiry);
        influencer.updated_at = Utc::now();
    }
}

#[async_trait]
impl ReferralCodeExt for DBClient {
    async fn get_codes_for_influencer(&self, influencer_id: &str) -> Result<Vec<ReferralCode>, ServiceError> {
        let store = self.store.read().await;
        if store.influencer_index(influencer_id).is_none() {
            return Err(ServiceError::InfluencerNotFound(influencer_id.to_string()));
        }

        Ok(store
            .codes
            .iter()
            .filter(|c| c.influencer_id == influencer_id)
            .cloned()
            .collect())
    }

    async fn get_live_codes(&self) -> Vec<ActiveCodeRow> {
        let store = self.store.read().await;
        store
            .codes
            .iter()
            .filter(|c| matches!(c.status, CodeStatus::Active | CodeStatus::Paused))
            .filter_map(|c| {
                store
                    .influencers
                    .iter()
                    .find(|i| i.id == c.influencer_id)
                    .map(|i| ActiveCodeRow::new(c, &i.name))
            })
            .collect()
    }

    async fn get_code(&self, code: &str) -> Option<ReferralCode> {
        self.store
            .read()
            .await
            .codes
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
            .cloned()
    }

    async fn save_code(
        &self,
        influencer_id: &str,
        code: &str,
        expiry_date: DateTime<Utc>,
    ) -> Result<ReferralCode, ServiceError> {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return Err(ServiceError::Validation("Referral code is required".to_string()));
        }

        let now = Utc::now();
        if expiry_date <= now {
            return Err(ServiceError::Validation("Expiry date must be in the future".to_string()));
        }

        let mut store = self.store.write().await;
        if store.influencer_index(influencer_id).is_none() {
            return Err(ServiceError::InfluencerNotFound(influencer_id.to_string()));
        }
        if store.codes.iter().any(|c| c.code.eq_ignore_ascii_case(&code)) {
            return Err(ServiceError::Conflict(format!("Referral code {} is already in use", code)));
        }

        let siblings: Vec<ReferralCode> = store
            .codes
            .iter()
            .filter(|c| c.influencer_id == influencer_id)
            .cloned()
            .collect();
        ensure_can_add(&siblings)?;

        let record = ReferralCode {
            id: Uuid::new_v4().to_string(),
            influencer_id: influencer_id.to_string(),
            code,
            status: CodeStatus::Active,
            start_date: now,
            expiry_date,
            usage_count: 0,
            completed_bookings: 0,
            total_earnings: 0,
        };

        store.codes.push(record.clone());
        sync_influencer_code(&mut store, influencer_id);

        tracing::info!("Added referral code {} for influencer {}", record.code, influencer_id);
        Ok(record)
    }

    async fn transition_code(&self, code_id: &str, action: CodeAction) -> Result<ReferralCode, ServiceError> {
        let mut store = self.store.write().await;

        let influencer_id = store
            .codes
            .iter()
            .find(|c| c.id == code_id)
            .map(|c| c.influencer_id.clone())
            .ok_or_else(|| ServiceError::CodeNotFound(code_id.to_string()))?;

        // The influencer's codes, with their positions in the store.
        let positions: Vec<usize> = store
            .codes
            .iter()
            .enumerate()
            .filter(|(_, c)| c.influencer_id == influencer_id)
            .map(|(position, _)| position)
            .collect();
        let mut siblings: Vec<ReferralCode> = positions.iter().map(|&p| store.codes[p].clone()).collect();
        let index = siblings
            .iter()
            .position(|c| c.id == code_id)
            .ok_or_else(|| ServiceError::CodeNotFound(code_id.to_string()))?;

        apply_action(&mut siblings, index, action, Utc::now())?;

        let updated = siblings[index].clone();
        store.codes[positions[index]] = updated.clone();
        sync_influencer_code(&mut store, &influencer_id);

        tracing::info!("Referral code {} is now {}", updated.code, updated.status.to_str());
        Ok(updated)
    }

    async fn get_code_usages(&self, code: &str) -> Result<Vec<CodeUsageEvent>, ServiceError> {
        let store = self.store.read().await;
        let record = store
            .codes
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
            .ok_or_else(|| ServiceError::CodeNotFound(code.to_string()))?;

        Ok(store
            .usages
            .iter()
            .filter(|u| u.code == record.code)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::influencerdb::InfluencerExt;
    use chrono::Duration;

    #[tokio::test]
    async fn live_codes_join_influencer_names() {
        let db = DBClient::with_fixtures();
        let rows = db.get_live_codes().await;
        let emma = rows.iter().find(|r| r.code == "EMMA10").unwrap();
        assert_eq!(emma.influencer_name, "Emma Rodriguez");
        assert!(rows.iter().all(|r| r.status != CodeStatus::Expired));
        assert!(rows.iter().any(|r| r.code == "JAMES15" && r.status == CodeStatus::Paused));
    }

    #[tokio::test]
    async fn add_rejected_while_live_code_exists() {
        let db = DBClient::with_fixtures();
        let expiry = Utc::now() + Duration::days(30);

        let err = db.save_code("1", "EMMA25", expiry).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        // Michael only has an expired code.
        let saved = db.save_code("4", "michael10", expiry).await.unwrap();
        assert_eq!(saved.code, "MICHAEL10");
        assert_eq!(saved.status, CodeStatus::Active);
        let michael = db.get_influencer("4").await.unwrap();
        assert_eq!(michael.referral_code.as_deref(), Some("MICHAEL10"));

        let err = db.save_code("4", "EMMA10", expiry).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let err = db.save_code("4", "PAST", Utc::now() - Duration::days(1)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn end_then_add_new_code() {
        let db = DBClient::with_fixtures();
        let emma10 = db.get_code("EMMA10").await.unwrap();

        let ended = db.transition_code(&emma10.id, CodeAction::End).await.unwrap();
        assert_eq!(ended.status, CodeStatus::Expired);
        assert!(db.get_influencer("1").await.unwrap().referral_code.is_none());

        db.save_code("1", "EMMA20", Utc::now() + Duration::days(60)).await.unwrap();
        let codes = db.get_codes_for_influencer("1").await.unwrap();
        assert_eq!(codes.len(), 3);
    }

    #[tokio::test]
    async fn pause_and_activate() {
        let db = DBClient::with_fixtures();
        let james = db.get_code("JAMES15").await.unwrap();
        let activated = db.transition_code(&james.id, CodeAction::Activate).await.unwrap();
        assert_eq!(activated.status, CodeStatus::Active);

        let paused = db.transition_code(&james.id, CodeAction::Pause).await.unwrap();
        assert_eq!(paused.status, CodeStatus::Paused);

        let err = db.transition_code("missing", CodeAction::Pause).await.unwrap_err();
        assert!(matches!(err, ServiceError::CodeNotFound(_)));
    }

    #[tokio::test]
    async fn usages_by_code() {
        let db = DBClient::with_fixtures();
        let usages = db.get_code_usages("emma10").await.unwrap();
        assert_eq!(usages.len(), 45);
        assert!(matches!(db.get_code_usages("NOPE").await, Err(ServiceError::CodeNotFound(_))));
    }
}
