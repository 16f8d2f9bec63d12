// db/influencerdb.rs
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::db::DBClient;

use crate::{
    models::{
        commissionmodels::CommissionTier,
        influencermodel::{Influencer, InfluencerStatus, InfluencerUpdate, NewInfluencer},
    },
    service::error::ServiceError,
};

#[async_trait]
pub trait InfluencerExt {
    async fn get_influencers(&self) -> Vec<Influencer>;

    async fn get_influencer(&self, influencer_id: &str) -> Option<Influencer>;

    async fn save_influencer(&self, influencer: NewInfluencer) -> Result<Influencer, ServiceError>;

    async fn update_influencer(
        &self,
        influencer_id: &str,
        update: InfluencerUpdate,
    ) -> Result<Influencer, ServiceError>;

    async fn set_influencer_status(
        &self,
        influencer_id: &str,
        status: InfluencerStatus,
    ) -> Result<Influencer, ServiceError>;

    /// Removes the influencer together with their codes and code usage.
    async fn delete_influencer(&self, influencer_id: &str) -> Result<Influencer, ServiceError>;
}

fn check_rates(
    tier: CommissionTier,
    custom_commission_rate: Option<f64>,
    custom_discount_rate: Option<f64>,
) -> Result<(), ServiceError> {
    if tier != CommissionTier::Custom {
        return Ok(());
    }
    for rate in [custom_commission_rate, custom_discount_rate].into_iter().flatten() {
        if !(0.0..=100.0).contains(&rate) {
            return Err(ServiceError::Validation(format!(
                "Custom rate {} must be between 0 and 100",
                rate
            )));
        }
    }
    Ok(())
}

fn check_usage(code_usage: u32, completed_treatments: u32) -> Result<(), ServiceError> {
    if completed_treatments > code_usage {
        return Err(ServiceError::Validation(
            "Completed treatments cannot exceed code usage".to_string(),
        ));
    }
    Ok(())
}

fn email_taken(influencers: &[Influencer], email: &str, except_id: Option<&str>) -> bool {
    influencers
        .iter()
        .filter(|i| Some(i.id.as_str()) != except_id)
        .any(|i| i.email.eq_ignore_ascii_case(email))
}

#[async_trait]
impl InfluencerExt for DBClient {
    async fn get_influencers(&self) -> Vec<Influencer> {
        self.store.read().await.influencers.clone()
    }

    async fn get_influencer(&self, influencer_id: &str) -> Option<Influencer> {
        self.store
            .read()
            .await
            .influencers
            .iter()
            .find(|i| i.id == influencer_id)
            .cloned()
    }

    async fn save_influencer(&self, influencer: NewInfluencer) -> Result<Influencer, ServiceError> {
        check_rates(
            influencer.commission_tier,
            influencer.custom_commission_rate,
            influencer.custom_discount_rate,
        )?;

        let mut store = self.store.write().await;

        let email = influencer.email.trim().to_lowercase();
        if email_taken(&store.influencers, &email, None) {
            return Err(ServiceError::Conflict(format!(
                "An influencer with email {} already exists",
                email
            )));
        }

        let is_custom = influencer.commission_tier == CommissionTier::Custom;
        let now = Utc::now();
        let record = Influencer {
            id: Uuid::new_v4().to_string(),
            name: influencer.name.trim().to_string(),
            email,
            phone: influencer.phone,
            bio: influencer.bio,
            instagram: influencer.instagram,
            tiktok: influencer.tiktok,
            youtube: influencer.youtube,
            status: InfluencerStatus::Active,
            referrals: 0,
            code_usage: 0,
            completed_treatments: 0,
            earnings: 0,
            commission_tier: influencer.commission_tier,
            custom_commission_rate: influencer.custom_commission_rate.filter(|_| is_custom),
            custom_discount_rate: influencer.custom_discount_rate.filter(|_| is_custom),
            referral_code: None,
            expiry_date: None,
            last_active: now,
            created_at: now,
            updated_at: now,
        };

        store.influencers.push(record.clone());
        Ok(record)
    }

    async fn update_influencer(
        &self,
        influencer_id: &str,
        update: InfluencerUpdate,
    ) -> Result<Influencer, ServiceError> {
        let mut store = self.store.write().await;

        let index = store
            .influencer_index(influencer_id)
            .ok_or_else(|| ServiceError::InfluencerNotFound(influencer_id.to_string()))?;

        if let Some(email) = &update.email {
            if email_taken(&store.influencers, email.trim(), Some(influencer_id)) {
                return Err(ServiceError::Conflict(format!(
                    "An influencer with email {} already exists",
                    email.trim()
                )));
            }
        }

        let mut next = store.influencers[index].clone();

        if let Some(name) = update.name {
            next.name = name.trim().to_string();
        }
        if let Some(email) = update.email {
            next.email = email.trim().to_lowercase();
        }
        if update.phone.is_some() {
            next.phone = update.phone;
        }
        if update.bio.is_some() {
            next.bio = update.bio;
        }
        if update.instagram.is_some() {
            next.instagram = update.instagram;
        }
        if update.tiktok.is_some() {
            next.tiktok = update.tiktok;
        }
        if update.youtube.is_some() {
            next.youtube = update.youtube;
        }
        if let Some(tier) = update.commission_tier {
            next.commission_tier = tier;
        }
        if update.custom_commission_rate.is_some() {
            next.custom_commission_rate = update.custom_commission_rate;
        }
        if update.custom_discount_rate.is_some() {
            next.custom_discount_rate = update.custom_discount_rate;
        }
        if next.commission_tier != CommissionTier::Custom {
            next.custom_commission_rate = None;
            next.custom_discount_rate = None;
        }
        if let Some(code_usage) = update.code_usage {
            next.code_usage = code_usage;
        }
        if let Some(completed) = update.completed_treatments {
            next.completed_treatments = completed;
        }
        if let Some(earnings) = update.earnings {
            next.earnings = earnings;
        }

        check_rates(next.commission_tier, next.custom_commission_rate, next.custom_discount_rate)?;
        check_usage(next.code_usage, next.completed_treatments)?;

        next.updated_at = Utc::now();
        store.influencers[index] = next.clone();
        Ok(next)
    }

    async fn set_influencer_status(
        &self,
        influencer_id: &str,
        status: InfluencerStatus,
    ) -> Result<Influencer, ServiceError> {
        let mut store = self.store.write().await;

        let influencer = store
            .influencers
            .iter_mut()
            .find(|i| i.id == influencer_id)
            .ok_or_else(|| ServiceError::InfluencerNotFound(influencer_id.to_string()))?;

        influencer.status = status;
        influencer.updated_at = Utc::now();
        Ok(influencer.clone())
    }

    async fn delete_influencer(&self, influencer_id: &str) -> Result<Influencer, ServiceError> {
        let mut store = self.store.write().await;

        let index = store
            .influencer_index(influencer_id)
            .ok_or_else(|| ServiceError::InfluencerNotFound(influencer_id.to_string()))?;
        let removed = store.influencers.remove(index);

        let codes: Vec<String> = store
            .codes
            .iter()
            .filter(|c| c.influencer_id == influencer_id)
            .map(|c| c.code.clone())
            .collect();
        store.codes.retain(|c| c.influencer_id != influencer_id);
        store.usages.retain(|u| !codes.contains(&u.code));
        // Invoices stay on the books but no longer point at the removed record.
        for invoice in store
            .invoices
            .iter_mut()
            .filter(|i| i.influencer_id.as_deref() == Some(influencer_id))
        {
            invoice.influencer_id = None;
        }

        tracing::info!(
            "Deleted influencer {} with {} referral codes",
            removed.id,
            codes.len()
        );
        Ok(removed)
    }
}
