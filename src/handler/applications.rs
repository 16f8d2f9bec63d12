use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::ApplicationExt,
    dtos::{
        applicationdtos::{ReviewApplicationDto, SubmitApplicationDto},
        DataResponse,
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::applicationmodel::ApplicationStatus,
    service::applications::{application_view, ApplicationFilter},
    AppState,
};

/// Public interest form, nested under `/applications`.
pub fn submission_handler() -> Router {
    Router::new().route("/", post(submit_application))
}

/// Admin review queue, nested under `/admin/applications`.
pub fn applications_handler() -> Router {
    Router::new()
        .route("/", get(get_applications))
        .route("/:id/approve", put(approve_application))
        .route("/:id/reject", put(reject_application))
}

pub async fn submit_application(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<SubmitApplicationDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let application = app_state
        .db_client
        .save_application(body.new_application())
        .await?;

    tracing::info!("New ambassador application from {}", application.email);
    Ok((StatusCode::CREATED, Json(DataResponse::success(application))))
}

pub async fn get_applications(
    Query(filter): Query<ApplicationFilter>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let applications = app_state.db_client.get_applications().await;
    Ok(Json(DataResponse::success(application_view(applications, &filter))))
}

async fn decide(
    app_state: &AppState,
    user: &JWTAuthMiddeware,
    application_id: &str,
    decision: ApplicationStatus,
    body: ReviewApplicationDto,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let application = app_state
        .db_client
        .review_application(application_id, decision, &user.session.email, body.notes)
        .await?;

    tracing::info!(
        "Application {} {} by {}",
        application.id,
        application.status.to_str(),
        user.session.email
    );
    Ok(Json(DataResponse::success(application)))
}

pub async fn approve_application(
    Path(application_id): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<ReviewApplicationDto>,
) -> Result<impl IntoResponse, HttpError> {
    decide(&app_state, &user, &application_id, ApplicationStatus::Approved, body).await
}

pub async fn reject_application(
    Path(application_id): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<ReviewApplicationDto>,
) -> Result<impl IntoResponse, HttpError> {
    decide(&app_state, &user, &application_id, ApplicationStatus::Rejected, body).await
}
