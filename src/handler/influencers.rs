use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    db::{InfluencerExt, ReferralCodeExt},
    dtos::{
        codedtos::{AddCodeDto, CodeHistoryQueryDto, GeneratedCodeDto},
        influencerdtos::{AddInfluencerDto, EditInfluencerDto, InfluencerListQueryDto, InfluencerListResponseDto},
        DataResponse, Response,
    },
    error::{ErrorMessage, HttpError},
    mail::mails::send_welcome_email,
    service::{
        dashboard::InfluencerSummary,
        error::ServiceError,
        listing::view,
        referral::{
            default_expiry, expiry_from_date, generate_referral_code, generate_referral_link, sort_code_history,
        },
    },
    AppState,
};

pub fn influencers_handler() -> Router {
    Router::new()
        .route("/", get(get_influencers).post(add_influencer))
        .route(
            "/:id",
            get(get_influencer).put(edit_influencer).delete(delete_influencer),
        )
        .route("/:id/status", axum::routing::put(toggle_status))
        .route("/:id/codes", get(get_codes).post(add_code))
        .route("/:id/codes/generate", get(generate_code))
}

pub async fn get_influencers(
    Query(query_params): Query<InfluencerListQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let filters = query_params.filter_options();
    let influencers = app_state.db_client.get_influencers().await;
    let search = query_params.search.clone().unwrap_or_default();

    let now = Utc::now();
    let page = view(influencers, &search, &filters, query_params.page_request())
        .map(|influencer| InfluencerSummary::new(influencer, now));

    Ok(Json(InfluencerListResponseDto {
        status: "success",
        data: page,
        active_filter_count: filters.active_filter_count(),
        has_filters_applied: filters.has_filters_applied(),
        filters,
    }))
}

pub async fn get_influencer(
    Path(influencer_id): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let influencer = app_state
        .db_client
        .get_influencer(&influencer_id)
        .await
        .ok_or_else(|| HttpError::not_found(ErrorMessage::InfluencerNotFound.to_string()))?;

    Ok(Json(DataResponse::success(InfluencerSummary::new(influencer, Utc::now()))))
}

pub async fn add_influencer(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<AddInfluencerDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let code = body
        .referral_code
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| generate_referral_code(&body.name));
    let expiry = match body.expiry_date {
        Some(date) => expiry_from_date(date)
            .ok_or_else(|| HttpError::bad_request("Invalid expiry date"))?,
        None => default_expiry(Utc::now()),
    };

    if app_state.db_client.get_code(&code).await.is_some() {
        return Err(ServiceError::Conflict(format!("Referral code {} is already in use", code)).into());
    }

    let influencer = app_state.db_client.save_influencer(body.new_influencer()).await?;

    if let Err(e) = app_state.db_client.save_code(&influencer.id, &code, expiry).await {
        // Undo the half-created influencer.
        app_state.db_client.delete_influencer(&influencer.id).await?;
        return Err(e.into());
    }

    let influencer = app_state
        .db_client
        .get_influencer(&influencer.id)
        .await
        .ok_or_else(|| HttpError::server_error("Influencer vanished after creation"))?;

    tracing::info!(
        "Added influencer {} ({}) on tier {} with code {}",
        influencer.name,
        influencer.id,
        influencer.commission_tier.to_str(),
        code
    );

    if body.send_welcome_email {
        let recipient = influencer.clone();
        let app_url = app_state.env.app_url.clone();
        tokio::spawn(async move {
            if let Err(e) = send_welcome_email(&recipient, &app_url).await {
                tracing::error!("Failed to send welcome email to {}: {}", recipient.email, e);
            }
        });
    }

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::success(InfluencerSummary::new(influencer, Utc::now()))),
    ))
}

pub async fn edit_influencer(
    Path(influencer_id): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<EditInfluencerDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let update = body.into_update().map_err(HttpError::bad_request)?;
    let influencer = app_state
        .db_client
        .update_influencer(&influencer_id, update)
        .await?;

    Ok(Json(DataResponse::success(InfluencerSummary::new(influencer, Utc::now()))))
}

pub async fn toggle_status(
    Path(influencer_id): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let current = app_state
        .db_client
        .get_influencer(&influencer_id)
        .await
        .ok_or_else(|| HttpError::not_found(ErrorMessage::InfluencerNotFound.to_string()))?;

    let influencer = app_state
        .db_client
        .set_influencer_status(&influencer_id, current.status.toggled())
        .await?;

    tracing::info!("Influencer {} is now {}", influencer.id, influencer.status.to_str());
    Ok(Json(DataResponse::success(InfluencerSummary::new(influencer, Utc::now()))))
}

pub async fn delete_influencer(
    Path(influencer_id): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let removed = app_state.db_client.delete_influencer(&influencer_id).await?;

    Ok(Json(Response {
        status: "success",
        message: format!("{} has been removed", removed.name),
    }))
}

pub async fn get_codes(
    Path(influencer_id): Path<String>,
    Query(query_params): Query<CodeHistoryQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let mut codes = app_state
        .db_client
        .get_codes_for_influencer(&influencer_id)
        .await?;

    sort_code_history(&mut codes, query_params.sort, query_params.sort_direction);
    Ok(Json(DataResponse::success(codes)))
}

pub async fn add_code(
    Path(influencer_id): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<AddCodeDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let expiry = expiry_from_date(body.expiry_date)
        .ok_or_else(|| HttpError::bad_request("Invalid expiry date"))?;

    let code = app_state
        .db_client
        .save_code(&influencer_id, &body.code, expiry)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse::success(code))))
}

pub async fn generate_code(
    Path(influencer_id): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let influencer = app_state
        .db_client
        .get_influencer(&influencer_id)
        .await
        .ok_or_else(|| HttpError::not_found(ErrorMessage::InfluencerNotFound.to_string()))?;

    let code = generate_referral_code(&influencer.name);
    let link = generate_referral_link(&app_state.env.app_url, &code);

    Ok(Json(GeneratedCodeDto {
        status: "success",
        code,
        link,
    }))
}
