use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
};
use model::entities::{guide, travel};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::credentials;
use crate::error::{map_unique_email, map_validation, AppError};
use crate::handlers::travels::TravelResponse;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use crate::session::{AuthGuide, MaybeAuthGuide};

/// Request body for registering a new guide
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// First name
    #[validate(length(min = 3, max = 20, message = "name must be 3 to 20 characters"))]
    pub name: String,
    /// Family name
    #[validate(length(min = 3, max = 20, message = "surname must be 3 to 20 characters"))]
    pub surname: String,
    /// Contact phone number
    #[validate(length(min = 9, max = 15, message = "phone must be 9 to 15 characters"))]
    pub phone: String,
    /// Email address, used as the login identifier (must be unique)
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    /// Plaintext password, hashed before it reaches storage
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    /// Must repeat the password
    #[validate(must_match(other = "password", message = "passwords do not match"))]
    pub confirm_password: String,
}

/// Guide response model. The password hash never leaves the server.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GuideResponse {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub phone: String,
    pub email: String,
    pub image_file: String,
}

impl From<guide::Model> for GuideResponse {
    fn from(model: guide::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            surname: model.surname,
            phone: model.phone,
            email: model.email,
            image_file: model.image_file,
        }
    }
}

/// One guide together with their travels
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GuideDetailResponse {
    pub guide: GuideResponse,
    pub travels: Vec<TravelResponse>,
}

/// Register a new guide
#[utoipa::path(
    post,
    path = "/register",
    tag = "guides",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Guide created successfully", body = ApiResponse<GuideResponse>),
        (status = 400, description = "Invalid fields or email already taken", body = ErrorResponse),
        (status = 303, description = "Already authenticated, bounced home"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(request, auth))]
pub async fn register_guide(
    State(state): State<AppState>,
    auth: MaybeAuthGuide,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    if auth.0.is_some() {
        debug!("authenticated caller on /register, bouncing home");
        return Ok(Redirect::to("/home").into_response());
    }

    request.validate().map_err(map_validation)?;

    let hashed = credentials::hash_password(&request.password)?;
    let new_guide = guide::ActiveModel {
        name: Set(request.name.clone()),
        surname: Set(request.surname.clone()),
        phone: Set(request.phone.clone()),
        email: Set(request.email.clone()),
        password: Set(hashed),
        image_file: Set("default.jpg".to_string()),
        ..Default::default()
    };

    // The unique index on email is the authority for duplicates; a failed
    // insert surfaces as a validation error, not a server fault.
    let guide_model = new_guide.insert(&state.db).await.map_err(map_unique_email)?;

    info!(
        "guide {} {} registered with id {}",
        guide_model.name, guide_model.surname, guide_model.id
    );
    let response = ApiResponse {
        data: GuideResponse::from(guide_model),
        message: "guide was successfully created".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Get all guides
#[utoipa::path(
    get,
    path = "/guides",
    tag = "guides",
    responses(
        (status = 200, description = "Guides retrieved successfully", body = ApiResponse<Vec<GuideResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn list_guides(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<GuideResponse>>>, AppError> {
    let guides = guide::Entity::find().all(&state.db).await?;
    debug!("retrieved {} guides", guides.len());

    let response = ApiResponse {
        data: guides.into_iter().map(GuideResponse::from).collect(),
        message: "guides retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get one guide with their travels
#[utoipa::path(
    get,
    path = "/guides/{guide_id}",
    tag = "guides",
    params(
        ("guide_id" = i32, Path, description = "Guide ID"),
    ),
    responses(
        (status = 200, description = "Guide retrieved successfully", body = ApiResponse<GuideDetailResponse>),
        (status = 404, description = "Guide not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn show_guide(
    Path(guide_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<GuideDetailResponse>>, AppError> {
    let guide_model = guide::Entity::find_by_id(guide_id)
        .one(&state.db)
        .await?
        .ok_or(AppError::NotFound("guide"))?;

    let travels = travel::Entity::find()
        .filter(travel::Column::GuideId.eq(guide_model.id))
        .order_by_desc(travel::Column::Id)
        .all(&state.db)
        .await?;

    let response = ApiResponse {
        data: GuideDetailResponse {
            guide: GuideResponse::from(guide_model),
            travels: travels.into_iter().map(TravelResponse::from).collect(),
        },
        message: "guide retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a guide account
///
/// Only the guide themselves may do this, and only once none of their
/// travels remain. Sessions go with the account.
#[utoipa::path(
    post,
    path = "/guides/{guide_id}",
    tag = "guides",
    params(
        ("guide_id" = i32, Path, description = "Guide ID"),
    ),
    responses(
        (status = 200, description = "Guide deleted successfully", body = ApiResponse<String>),
        (status = 303, description = "Not authenticated, redirected to login"),
        (status = 400, description = "Guide still owns travels", body = ErrorResponse),
        (status = 403, description = "Not the account owner", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(author))]
pub async fn delete_guide(
    Path(guide_id): Path<i32>,
    State(state): State<AppState>,
    AuthGuide(author): AuthGuide,
) -> Result<Json<ApiResponse<String>>, AppError> {
    if author.id != guide_id {
        warn!(
            "guide {} attempted to delete guide account {}",
            author.id, guide_id
        );
        return Err(AppError::Authorization);
    }

    let owned_travels = travel::Entity::find()
        .filter(travel::Column::GuideId.eq(guide_id))
        .count(&state.db)
        .await?;
    if owned_travels > 0 {
        return Err(AppError::Validation(format!(
            "account still owns {owned_travels} travels, delete them first"
        )));
    }

    let result = guide::Entity::delete_by_id(guide_id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("guide"));
    }

    info!("guide {} deleted their account", guide_id);
    let response = ApiResponse {
        data: format!("guide {guide_id} deleted"),
        message: "guide deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
