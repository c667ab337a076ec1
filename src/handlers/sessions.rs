use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use model::entities::guide;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::credentials;
use crate::error::{map_validation, AppError};
use crate::handlers::guides::GuideResponse;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use crate::session::{self, MaybeAuthGuide, SESSION_COOKIE};

/// Request body for logging in
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Email the guide registered with
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    /// Plaintext password
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    /// Keep the session alive for 30 days instead of one
    pub remember: Option<bool>,
}

/// Query parameters for the login endpoint
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// Destination to return to after a successful login
    pub next: Option<String>,
}

/// Establish a session
///
/// A successful credential check issues a session token as a cookie.
/// When a `next` destination was preserved by a guarded route, the
/// response redirects there instead of returning the profile.
#[utoipa::path(
    post,
    path = "/login",
    tag = "sessions",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session established", body = ApiResponse<GuideResponse>),
        (status = 303, description = "Session established, redirecting to preserved destination"),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(request, jar, auth))]
pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
    jar: CookieJar,
    auth: MaybeAuthGuide,
    Json(request): Json<LoginRequest>,
) -> Result<Response, AppError> {
    if auth.0.is_some() {
        debug!("authenticated caller on /login, bouncing home");
        return Ok(Redirect::to("/home").into_response());
    }

    request.validate().map_err(map_validation)?;

    let guide_model = guide::Entity::find()
        .filter(guide::Column::Email.eq(request.email.as_str()))
        .one(&state.db)
        .await?;

    let Some(guide_model) = guide_model else {
        warn!("login attempt for unknown email");
        return Err(AppError::Authentication);
    };

    // A failed verify must never establish a session.
    if !credentials::verify_password(&request.password, &guide_model.password) {
        warn!("failed login for guide {}", guide_model.id);
        return Err(AppError::Authentication);
    }

    let session_row =
        session::issue_session(&state.db, guide_model.id, request.remember.unwrap_or(false))
            .await?;
    info!("guide {} logged in (session {})", guide_model.id, session_row.id);

    let cookie = Cookie::build((SESSION_COOKIE, session_row.token))
        .path("/")
        .http_only(true)
        .build();
    let jar = jar.add(cookie);

    // Honor the destination the caller was heading for before login.
    match query.next.filter(|next| next.starts_with('/')) {
        Some(next) => Ok((jar, Redirect::to(&next)).into_response()),
        None => {
            let response = ApiResponse {
                data: GuideResponse::from(guide_model),
                message: "you have been logged in".to_string(),
                success: true,
            };
            Ok((jar, Json(response)).into_response())
        }
    }
}

/// Clear the session
#[utoipa::path(
    get,
    path = "/logout",
    tag = "sessions",
    responses(
        (status = 303, description = "Session cleared, redirecting home"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(jar))]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Result<Response, AppError> {
    let jar = if let Some(cookie) = jar.get(SESSION_COOKIE) {
        session::revoke_session(&state.db, cookie.value()).await?;
        debug!("session revoked on logout");
        jar.remove(Cookie::build(SESSION_COOKIE).path("/").build())
    } else {
        jar
    };

    Ok((jar, Redirect::to("/home")).into_response())
}
