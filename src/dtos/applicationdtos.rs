use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{dtos::validate_uk_mobile, models::applicationmodel::NewApplication};

fn has_handle(value: &Option<String>) -> bool {
    value.as_deref().map_or(false, |v| !v.trim().is_empty())
}

fn validate_application(dto: &SubmitApplicationDto) -> Result<(), ValidationError> {
    if !(has_handle(&dto.instagram) || has_handle(&dto.tiktok) || has_handle(&dto.youtube)) {
        let mut error = ValidationError::new("social_required");
        error.message = Some("Please provide at least one social media handle".into());
        return Err(error);
    }
    if !dto.not_employee {
        let mut error = ValidationError::new("not_employee");
        error.message = Some("You must confirm you are not a BWC employee".into());
        return Err(error);
    }
    if !dto.over_eighteen {
        let mut error = ValidationError::new("over_eighteen");
        error.message = Some("You must confirm you are over 18".into());
        return Err(error);
    }
    Ok(())
}

/// Public ambassador interest form.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_application", skip_on_field_errors = false))]
pub struct SubmitApplicationDto {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(custom = "validate_uk_mobile")]
    pub phone: String,
    pub instagram: Option<String>,
    pub tiktok: Option<String>,
    pub youtube: Option<String>,
    #[validate(length(min = 10, message = "Please tell us a bit more about yourself"))]
    pub bio: String,
    #[serde(default)]
    pub not_employee: bool,
    #[serde(default)]
    pub over_eighteen: bool,
    #[serde(default)]
    pub consent_marketing: bool,
}

impl SubmitApplicationDto {
    pub fn new_application(&self) -> NewApplication {
        let handle = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());
        NewApplication {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            instagram: handle(&self.instagram),
            tiktok: handle(&self.tiktok),
            youtube: handle(&self.youtube),
            bio: self.bio.clone(),
            consent_marketing: self.consent_marketing,
        }
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct ReviewApplicationDto {
    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SubmitApplicationDto {
        SubmitApplicationDto {
            first_name: "Noah".to_string(),
            last_name: "Reid".to_string(),
            email: "noah@example.com".to_string(),
            phone: "07123 456789".to_string(),
            instagram: Some("@noah".to_string()),
            tiktok: None,
            youtube: None,
            bio: "Wellness creator in Leeds".to_string(),
            not_employee: true,
            over_eighteen: true,
            consent_marketing: false,
        }
    }

    #[test]
    fn accepts_complete_form() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn rejects_each_rule() {
        let mut dto = valid();
        dto.instagram = Some("   ".to_string());
        assert!(dto.validate().is_err());

        let mut dto = valid();
        dto.not_employee = false;
        assert!(dto.validate().is_err());

        let mut dto = valid();
        dto.over_eighteen = false;
        assert!(dto.validate().is_err());

        let mut dto = valid();
        dto.bio = "Too short".to_string();
        assert!(dto.validate().is_err());

        let mut dto = valid();
        dto.phone = "08123 456789".to_string();
        assert!(dto.validate().is_err());

        let mut dto = valid();
        dto.email = "not-an-email".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn blank_handles_are_dropped() {
        let mut dto = valid();
        dto.tiktok = Some(" ".to_string());
        let application = dto.new_application();
        assert_eq!(application.instagram.as_deref(), Some("@noah"));
        assert!(application.tiktok.is_none());
    }
}
