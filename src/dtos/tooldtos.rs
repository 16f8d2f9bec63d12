use serde::{Deserialize, Serialize};
use validator::Validate;

/// One keystroke-level edit of the phone field.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct PhoneFormatDto {
    #[serde(default)]
    pub current: String,
    #[validate(length(max = 32, message = "Input is too long"))]
    pub input: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PhoneFormatResponseDto {
    pub status: &'static str,
    pub value: String,
    /// False when the edit was rejected and `value` is the unchanged current value.
    pub accepted: bool,
    pub valid: bool,
}
