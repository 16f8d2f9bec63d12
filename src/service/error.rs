use axum::http::StatusCode;
use thiserror::Error;

use crate::{
    error::HttpError,
    models::{applicationmodel::ApplicationStatus, referralmodel::CodeStatus},
};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Influencer {0} not found")]
    InfluencerNotFound(String),

    #[error("Referral code {0} not found")]
    CodeNotFound(String),

    #[error("Application {0} not found")]
    ApplicationNotFound(String),

    #[error("Invoice {0} not found")]
    InvoiceNotFound(String),

    #[error("Referral code {code} is {status:?} and cannot be {action}")]
    InvalidCodeTransition {
        code: String,
        status: CodeStatus,
        action: &'static str,
    },

    #[error("Application {0} has already been reviewed ({1:?})")]
    ApplicationAlreadyReviewed(String, ApplicationStatus),

    #[error("Invoice {0} has already been paid")]
    InvoiceAlreadyPaid(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        let status = error.status_code();
        HttpError::new(error.to_string(), status)
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InfluencerNotFound(_)
            | ServiceError::CodeNotFound(_)
            | ServiceError::ApplicationNotFound(_)
            | ServiceError::InvoiceNotFound(_) => StatusCode::NOT_FOUND,

            ServiceError::InvalidCodeTransition { .. }
            | ServiceError::ApplicationAlreadyReviewed(_, _)
            | ServiceError::InvoiceAlreadyPaid(_)
            | ServiceError::Conflict(_)
            | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}
