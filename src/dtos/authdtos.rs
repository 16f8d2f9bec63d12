use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::usermodel::{Session, UserRole};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginUserDto {
    #[validate(length(min = 1, message = "Email is required"), email(message = "Email is invalid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct UserLoginResponseDto {
    pub status: String,
    pub token: String,
    pub role: UserRole,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusDto {
    pub is_logged_in: bool,
    pub user_role: Option<UserRole>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSessionDto {
    pub email: String,
    pub role: UserRole,
    pub influencer_id: Option<String>,
}

impl FilterSessionDto {
    pub fn filter_session(session: &Session) -> Self {
        FilterSessionDto {
            email: session.email.clone(),
            role: session.role,
            influencer_id: session.influencer_id.clone(),
        }
    }
}
