pub mod applicationdb;
pub mod codedb;
pub mod db;
pub mod fixtures;
pub mod influencerdb;
pub mod invoicedb;
pub mod statsdb;

pub use applicationdb::ApplicationExt;
pub use codedb::ReferralCodeExt;
pub use db::DBClient;
pub use influencerdb::InfluencerExt;
pub use invoicedb::InvoiceExt;
pub use statsdb::StatsExt;
