use axum::{
    extract::{Multipart, State},
    response::Json,
};
use model::entities::guide;
use sea_orm::{ActiveModelTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{map_unique_email, map_validation, AppError};
use crate::handlers::guides::GuideResponse;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use crate::session::AuthGuide;
use crate::uploads;

/// Editable profile fields, prefilled from the stored guide so a partial
/// form keeps the current values, the way the original edit form did.
#[derive(Debug, Validate)]
struct AccountForm {
    #[validate(length(min = 3, max = 20, message = "name must be 3 to 20 characters"))]
    name: String,
    #[validate(length(min = 3, max = 20, message = "surname must be 3 to 20 characters"))]
    surname: String,
    #[validate(length(min = 9, max = 15, message = "phone must be 9 to 15 characters"))]
    phone: String,
    #[validate(email(message = "email must be a valid address"))]
    email: String,
}

/// Multipart form accepted by the account update endpoint (documentation
/// schema only; parsing walks the parts directly).
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AccountUpdateForm {
    pub name: String,
    pub surname: String,
    pub phone: String,
    pub email: String,
    /// Optional replacement profile picture (jpg/jpeg/png)
    #[schema(value_type = Option<String>, format = Binary)]
    pub picture: Option<String>,
}

/// View the authenticated guide's own profile
#[utoipa::path(
    get,
    path = "/account",
    tag = "account",
    responses(
        (status = 200, description = "Profile retrieved successfully", body = ApiResponse<GuideResponse>),
        (status = 303, description = "Not authenticated, redirected to login"),
    )
)]
#[instrument(skip(author))]
pub async fn get_account(AuthGuide(author): AuthGuide) -> Json<ApiResponse<GuideResponse>> {
    Json(ApiResponse {
        data: GuideResponse::from(author),
        message: "profile retrieved successfully".to_string(),
        success: true,
    })
}

/// Update the authenticated guide's profile
///
/// Fields are overwritten in place; a `picture` part replaces the stored
/// profile picture under a fresh random filename.
#[utoipa::path(
    post,
    path = "/account",
    tag = "account",
    request_body(content = AccountUpdateForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Profile updated successfully", body = ApiResponse<GuideResponse>),
        (status = 303, description = "Not authenticated, redirected to login"),
        (status = 400, description = "Invalid fields or picture type", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(author, multipart))]
pub async fn update_account(
    State(state): State<AppState>,
    AuthGuide(author): AuthGuide,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<GuideResponse>>, AppError> {
    let mut form = AccountForm {
        name: author.name.clone(),
        surname: author.surname.clone(),
        phone: author.phone.clone(),
        email: author.email.clone(),
    };
    let mut picture: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed form upload: {e}")))?
    {
        let field_name = field.name().map(ToString::to_string);
        match field_name.as_deref() {
            Some("name") => form.name = read_text(field).await?,
            Some("surname") => form.surname = read_text(field).await?,
            Some("phone") => form.phone = read_text(field).await?,
            Some("email") => form.email = read_text(field).await?,
            Some("picture") => {
                let original_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("malformed picture upload: {e}")))?;
                // An empty file input on the form means "keep the picture".
                if !data.is_empty() {
                    picture = Some((original_name, data.to_vec()));
                }
            }
            other => debug!("ignoring unknown form field {:?}", other),
        }
    }

    form.validate().map_err(map_validation)?;

    let mut active: guide::ActiveModel = author.into();
    if let Some((original_name, data)) = picture {
        let stored = uploads::save_picture(&state.config.upload_dir, &original_name, &data).await?;
        active.image_file = Set(stored);
    }
    active.name = Set(form.name);
    active.surname = Set(form.surname);
    active.phone = Set(form.phone);
    active.email = Set(form.email);

    let updated = active.update(&state.db).await.map_err(map_unique_email)?;

    info!("guide {} updated their account", updated.id);
    Ok(Json(ApiResponse {
        data: GuideResponse::from(updated),
        message: "your account has been updated".to_string(),
        success: true,
    }))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("malformed form field: {e}")))
}
