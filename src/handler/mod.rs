pub mod applications;
pub mod auth;
pub mod codes;
pub mod dashboard;
pub mod influencers;
pub mod invoices;
pub mod tools;
