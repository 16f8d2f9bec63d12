pub mod applications;
pub mod commission;
pub mod dashboard;
pub mod error;
pub mod ledger;
pub mod listing;
pub mod referral;
pub mod session;
pub mod usage;
