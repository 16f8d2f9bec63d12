use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use validator::Validate;

use crate::{
    dtos::{
        authdtos::{FilterSessionDto, LoginUserDto, SessionStatusDto, UserLoginResponseDto},
        DataResponse, Response,
    },
    error::{ErrorMessage, HttpError},
    middleware::{auth, extract_token, rate_limit::login_rate_limit, JWTAuthMiddeware},
    service::session::authenticate,
    utils::token,
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route(
            "/login",
            post(login).layer(middleware::from_fn(login_rate_limit)),
        )
        .route("/session", get(session_status))
        .route("/logout", post(logout).layer(middleware::from_fn(auth)))
        .route("/me", get(get_me).layer(middleware::from_fn(auth)))
}

fn token_cookie(value: String, max_age_minutes: i64) -> Cookie<'static> {
    Cookie::build(("token", value))
        .path("/")
        .max_age(time::Duration::minutes(max_age_minutes))
        .http_only(true)
        .build()
}

fn with_cookie(response: impl IntoResponse, cookie: Cookie<'static>) -> Result<axum::response::Response, HttpError> {
    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error("Failed to build session cookie"))?,
    );

    let mut response = response.into_response();
    response.headers_mut().extend(headers);
    Ok(response)
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<LoginUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let (role, influencer_id) = authenticate(&app_state.env, &body.email, &body.password)
        .ok_or_else(|| HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()))?;

    let session = app_state
        .sessions
        .open(&body.email.trim().to_lowercase(), role, influencer_id)
        .await;

    let token = token::create_token(
        &session.id.to_string(),
        role,
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    tracing::info!("{} logged in as {}", session.email, role.to_str());

    let response = Json(UserLoginResponseDto {
        status: "success".to_string(),
        token: token.clone(),
        role,
    });

    with_cookie(response, token_cookie(token, app_state.env.jwt_maxage))
}

/// Reports whether the caller holds a live session; never fails.
pub async fn session_status(
    cookie_jar: CookieJar,
    Extension(app_state): Extension<Arc<AppState>>,
    req: Request,
) -> impl IntoResponse {
    let session = match extract_token(&cookie_jar, &req)
        .and_then(|t| token::decode_token(t, app_state.env.jwt_secret.as_bytes()).ok())
        .and_then(|claims| uuid::Uuid::parse_str(&claims.sub).ok())
    {
        Some(session_id) => app_state.sessions.get(session_id).await,
        None => None,
    };

    Json(SessionStatusDto {
        is_logged_in: session.is_some(),
        user_role: session.map(|s| s.role),
    })
}

pub async fn logout(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    app_state.sessions.close(user.session.id).await;
    tracing::info!("{} logged out", user.session.email);

    let response = Json(Response {
        status: "success",
        message: "Logged out".to_string(),
    });

    with_cookie(response, token_cookie(String::new(), 0))
}

pub async fn get_me(Extension(user): Extension<JWTAuthMiddeware>) -> Result<impl IntoResponse, HttpError> {
    Ok(Json(DataResponse::success(FilterSessionDto::filter_session(&user.session))))
}
