use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::ReferralCodeExt,
    dtos::{
        codedtos::{ActiveCodesQueryDto, CodeUsageResponseDto, UsageQueryDto},
        DataResponse,
    },
    error::{ErrorMessage, HttpError},
    middleware::JWTAuthMiddeware,
    models::usermodel::UserRole,
    service::{
        error::ServiceError,
        referral::{active_codes_view, CodeAction},
        usage::{aggregate, usage_view},
    },
    AppState,
};

/// Admin code management, nested under `/admin/codes`.
pub fn codes_handler() -> Router {
    Router::new()
        .route("/active", get(get_active_codes))
        .route("/:code_id/pause", put(pause_code))
        .route("/:code_id/activate", put(activate_code))
        .route("/:code_id/end", put(end_code))
}

/// Usage details, nested under `/codes` for any logged-in user.
pub fn usage_handler() -> Router {
    Router::new().route("/:code/usage", get(get_code_usage))
}

pub async fn get_active_codes(
    Query(query_params): Query<ActiveCodesQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let rows = app_state.db_client.get_live_codes().await;
    let view = active_codes_view(rows, &query_params.filter(), query_params.page_request());

    Ok(Json(DataResponse::success(view)))
}

async fn transition(
    app_state: &AppState,
    code_id: &str,
    action: CodeAction,
) -> Result<impl IntoResponse, HttpError> {
    let code = app_state.db_client.transition_code(code_id, action).await?;
    Ok(Json(DataResponse::success(code)))
}

pub async fn pause_code(
    Path(code_id): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    transition(&app_state, &code_id, CodeAction::Pause).await
}

pub async fn activate_code(
    Path(code_id): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    transition(&app_state, &code_id, CodeAction::Activate).await
}

pub async fn end_code(
    Path(code_id): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    transition(&app_state, &code_id, CodeAction::End).await
}

pub async fn get_code_usage(
    Path(code): Path<String>,
    Query(query_params): Query<UsageQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let record = app_state
        .db_client
        .get_code(&code)
        .await
        .ok_or_else(|| HttpError::from(ServiceError::CodeNotFound(code.clone())))?;

    // Ambassadors only see their own codes.
    if user.session.role == UserRole::Ambassador
        && user.session.influencer_id.as_deref() != Some(record.influencer_id.as_str())
    {
        return Err(HttpError::forbidden(ErrorMessage::PermissionDenied.to_string()));
    }

    let events = app_state.db_client.get_code_usages(&record.code).await?;
    let summary = aggregate(&events);
    let usages = usage_view(events, &query_params.filter(), query_params.page_request());

    Ok(Json(CodeUsageResponseDto {
        status: "success",
        code: record,
        summary,
        usages,
    }))
}
