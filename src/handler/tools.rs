use axum::{response::IntoResponse, routing::{get, post}, Json, Router};
use validator::Validate;

use crate::{
    dtos::{
        tooldtos::{PhoneFormatDto, PhoneFormatResponseDto},
        DataResponse,
    },
    error::HttpError,
    service::commission::tier_catalogue,
    utils::phone::{apply_edit, format_uk_mobile, is_valid_uk_mobile},
};

/// Nested under `/tools`.
pub fn tools_handler() -> Router {
    Router::new().route("/phone/format", post(format_phone))
}

/// Nested under `/tiers`.
pub fn tiers_handler() -> Router {
    Router::new().route("/", get(get_tiers))
}

pub async fn format_phone(Json(body): Json<PhoneFormatDto>) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let accepted = format_uk_mobile(&body.input).is_some();
    let value = apply_edit(&body.current, &body.input);

    Ok(Json(PhoneFormatResponseDto {
        status: "success",
        valid: is_valid_uk_mobile(&value),
        value,
        accepted,
    }))
}

pub async fn get_tiers() -> impl IntoResponse {
    Json(DataResponse::success(tier_catalogue()))
}
