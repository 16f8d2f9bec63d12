pub mod currency;
pub mod phone;
pub mod token;
