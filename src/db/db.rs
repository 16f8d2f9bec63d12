// db/db.rs
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::{
    applicationmodel::AmbassadorApplication,
    influencermodel::Influencer,
    invoicemodel::Invoice,
    referralmodel::{CodeUsageEvent, ReferralCode},
    statsmodel::MonthlyMetric,
};

use super::fixtures;

/// Everything the programme keeps. Lives only for the process lifetime.
#[derive(Debug, Default)]
pub struct Store {
    pub influencers: Vec<Influencer>,
    pub codes: Vec<ReferralCode>,
    pub usages: Vec<CodeUsageEvent>,
    pub applications: Vec<AmbassadorApplication>,
    pub invoices: Vec<Invoice>,
    pub monthly: Vec<MonthlyMetric>,
}

impl Store {
    pub fn influencer_index(&self, id: &str) -> Option<usize> {
        self.influencers.iter().position(|i| i.id == id)
    }
}

#[derive(Clone)]
pub struct DBClient {
    pub(crate) store: Arc<RwLock<Store>>,
}

impl std::fmt::Debug for DBClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DBClient")
            .field("store", &"RwLock<Store>")
            .finish()
    }
}

impl Default for DBClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DBClient {
    /// Empty store.
    pub fn new() -> Self {
        DBClient {
            store: Arc::new(RwLock::new(Store::default())),
        }
    }

    /// Store seeded with the demo programme data.
    pub fn with_fixtures() -> Self {
        let store = fixtures::seed(Utc::now());
        tracing::info!(
            "Seeded {} influencers, {} referral codes, {} code usages",
            store.influencers.len(),
            store.codes.len(),
            store.usages.len()
        );
        DBClient {
            store: Arc::new(RwLock::new(store)),
        }
    }
}
