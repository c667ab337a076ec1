use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Redirect, Response},
};
use model::entities::guide;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::credentials;
use crate::error::{map_validation, AppError};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use crate::session::MaybeAuthGuide;

/// How long a reset token stays valid.
const RESET_TOKEN_TTL_SECONDS: i64 = 1800;

/// Request body for requesting a password reset
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct ResetRequest {
    /// Email the guide registered with
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
}

/// Request body for performing a password reset
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct PerformResetRequest {
    /// New plaintext password
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    /// Must repeat the password
    #[validate(must_match(other = "password", message = "passwords do not match"))]
    pub confirm_password: String,
}

/// Request a password-reset token
///
/// The response is the same whether or not the address is registered, so
/// the endpoint cannot be used to probe for accounts. Mail delivery is
/// not wired up; the reset link goes to the log for the operator.
#[utoipa::path(
    post,
    path = "/reset_password",
    tag = "password-reset",
    request_body = ResetRequest,
    responses(
        (status = 200, description = "Reset requested", body = ApiResponse<String>),
        (status = 303, description = "Already authenticated, bounced home"),
        (status = 400, description = "Invalid email field", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(request, auth))]
pub async fn request_reset(
    State(state): State<AppState>,
    auth: MaybeAuthGuide,
    Json(request): Json<ResetRequest>,
) -> Result<Response, AppError> {
    if auth.0.is_some() {
        return Ok(Redirect::to("/home").into_response());
    }

    request.validate().map_err(map_validation)?;

    match guide::Entity::find()
        .filter(guide::Column::Email.eq(request.email.as_str()))
        .one(&state.db)
        .await?
    {
        Some(guide_model) => {
            let token = credentials::issue_reset_token(
                &state.config.secret,
                guide_model.id,
                RESET_TOKEN_TTL_SECONDS,
            )?;
            info!(
                "password reset requested for guide {}: /reset_password/{}",
                guide_model.id, token
            );
        }
        None => debug!("password reset requested for unknown email"),
    }

    let response = ApiResponse {
        data: String::new(),
        message: "an email has been sent with instructions to reset your password".to_string(),
        success: true,
    };
    Ok(Json(response).into_response())
}

/// Perform a password reset with a previously issued token
///
/// An invalid or expired token does not fail the request; the caller is
/// sent back to the re-request flow.
#[utoipa::path(
    post,
    path = "/reset_password/{token}",
    tag = "password-reset",
    params(
        ("token" = String, Path, description = "Reset token from the emailed link"),
    ),
    request_body = PerformResetRequest,
    responses(
        (status = 200, description = "Password updated", body = ApiResponse<String>),
        (status = 303, description = "Invalid or expired token, redirected to the request flow"),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(token, request, auth))]
pub async fn perform_reset(
    Path(token): Path<String>,
    State(state): State<AppState>,
    auth: MaybeAuthGuide,
    Json(request): Json<PerformResetRequest>,
) -> Result<Response, AppError> {
    if auth.0.is_some() {
        return Ok(Redirect::to("/home").into_response());
    }

    let Some(guide_id) = credentials::verify_reset_token(&state.config.secret, &token) else {
        warn!("rejected password reset token");
        return Ok(Redirect::to("/reset_password").into_response());
    };

    request.validate().map_err(map_validation)?;

    let guide_model = guide::Entity::find_by_id(guide_id)
        .one(&state.db)
        .await?
        .ok_or(AppError::NotFound("guide"))?;

    let mut active: guide::ActiveModel = guide_model.into();
    active.password = Set(credentials::hash_password(&request.password)?);
    active.update(&state.db).await?;

    info!("password reset completed for guide {}", guide_id);
    let response = ApiResponse {
        data: String::new(),
        message: "your password has been updated, you are now able to log in".to_string(),
        success: true,
    };
    Ok(Json(response).into_response())
}
