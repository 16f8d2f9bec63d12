use std::sync::Arc;

use axum::{response::IntoResponse, routing::get, Extension, Json, Router};
use chrono::Utc;

use crate::{
    db::{ApplicationExt, InfluencerExt, InvoiceExt, ReferralCodeExt, StatsExt},
    dtos::DataResponse,
    error::{ErrorMessage, HttpError},
    middleware::JWTAuthMiddeware,
    service::{
        dashboard::{admin_stats, ambassador_dashboard},
        ledger::earnings_view,
    },
    AppState,
};

/// Nested under `/admin/stats`.
pub fn stats_handler() -> Router {
    Router::new().route("/", get(get_admin_stats))
}

/// Nested under `/ambassador`.
pub fn ambassador_handler() -> Router {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/earnings", get(get_earnings))
}

pub async fn get_admin_stats(Extension(app_state): Extension<Arc<AppState>>) -> Result<impl IntoResponse, HttpError> {
    let influencers = app_state.db_client.get_influencers().await;
    let applications = app_state.db_client.get_applications().await;
    let monthly = app_state.db_client.get_monthly_metrics().await;

    Ok(Json(DataResponse::success(admin_stats(&influencers, &applications, monthly))))
}

fn linked_influencer_id(user: &JWTAuthMiddeware) -> Result<&str, HttpError> {
    user.session
        .influencer_id
        .as_deref()
        .ok_or_else(|| HttpError::forbidden(ErrorMessage::NoLinkedInfluencer.to_string()))
}

pub async fn get_dashboard(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let influencer_id = linked_influencer_id(&user)?;

    let influencer = app_state
        .db_client
        .get_influencer(influencer_id)
        .await
        .ok_or_else(|| HttpError::not_found(ErrorMessage::InfluencerNotFound.to_string()))?;
    let codes = app_state.db_client.get_codes_for_influencer(influencer_id).await?;
    let monthly = app_state.db_client.get_monthly_metrics().await;

    let dashboard = ambassador_dashboard(influencer, &codes, monthly, &app_state.env.app_url, Utc::now());
    Ok(Json(DataResponse::success(dashboard)))
}

pub async fn get_earnings(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let influencer_id = linked_influencer_id(&user)?;
    let invoices = app_state.db_client.get_invoices_for_influencer(influencer_id).await;

    Ok(Json(DataResponse::success(earnings_view(invoices))))
}
