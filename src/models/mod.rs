pub mod applicationmodel;
pub mod commissionmodels;
pub mod influencermodel;
pub mod invoicemodel;
pub mod referralmodel;
pub mod statsmodel;
pub mod usermodel;
