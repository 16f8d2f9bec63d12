pub mod applicationdtos;
pub mod authdtos;
pub mod codedtos;
pub mod influencerdtos;
pub mod tooldtos;

use serde::{Deserialize, Serialize};
use validator::ValidationError;

use crate::utils::phone::is_valid_uk_mobile;

#[derive(Serialize, Deserialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}

/// `{"status": "success", "data": ...}` envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn success(data: T) -> Self {
        DataResponse { status: "success", data }
    }
}

pub(crate) fn validate_uk_mobile(phone: &str) -> Result<(), ValidationError> {
    if is_valid_uk_mobile(phone) {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_uk_mobile");
        error.message = Some("Please enter a valid UK mobile number (07XXX XXXXXX)".into());
        Err(error)
    }
}
