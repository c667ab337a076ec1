use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use model::entities::travel;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{map_validation, AppError};
use crate::schemas::{ApiResponse, AppState, ErrorResponse, PageResponse};
use crate::session::AuthGuide;

/// Travels per listing page.
const PAGE_SIZE: u64 = 3;

/// Request body for creating or updating a travel
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct TravelRequest {
    /// Post title
    #[validate(length(min = 1, max = 40, message = "title must be 1 to 40 characters"))]
    pub title: String,
    /// Post body
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
}

/// Travel response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TravelResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub guide_id: i32,
}

impl From<travel::Model> for TravelResponse {
    fn from(model: travel::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            guide_id: model.guide_id,
        }
    }
}

/// Query parameters for paginated listings
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// 1-based page index, defaults to the first page
    pub page: Option<u64>,
}

/// Run a travel query through the paginator. Ordering is newest first by
/// id; there is no timestamp column. A page index past the end is a
/// not-found, except that page 1 of an empty store is an empty page.
async fn fetch_travel_page(
    db: &DatabaseConnection,
    select: Select<travel::Entity>,
    page: u64,
) -> Result<PageResponse<TravelResponse>, AppError> {
    if page == 0 {
        return Err(AppError::NotFound("page"));
    }

    let paginator = select
        .order_by_desc(travel::Column::Id)
        .paginate(db, PAGE_SIZE);
    let totals = paginator.num_items_and_pages().await?;

    if page > totals.number_of_pages && page != 1 {
        debug!(
            "page {} requested but only {} pages exist",
            page, totals.number_of_pages
        );
        return Err(AppError::NotFound("page"));
    }

    let items = paginator.fetch_page(page - 1).await?;
    Ok(PageResponse {
        items: items.into_iter().map(TravelResponse::from).collect(),
        page,
        page_size: PAGE_SIZE,
        total_pages: totals.number_of_pages,
        total_items: totals.number_of_items,
    })
}

/// List all travels, newest first
#[utoipa::path(
    get,
    path = "/travels",
    tag = "travels",
    params(
        ("page" = Option<u64>, Query, description = "1-based page index"),
    ),
    responses(
        (status = 200, description = "Travels retrieved successfully", body = ApiResponse<PageResponse<TravelResponse>>),
        (status = 404, description = "Page out of range", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn list_travels(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<PageResponse<TravelResponse>>>, AppError> {
    let page = query.page.unwrap_or(1);
    let data = fetch_travel_page(&state.db, travel::Entity::find(), page).await?;

    let response = ApiResponse {
        data,
        message: "travels retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// List the authenticated guide's own travels
#[utoipa::path(
    get,
    path = "/my_travels",
    tag = "travels",
    params(
        ("page" = Option<u64>, Query, description = "1-based page index"),
    ),
    responses(
        (status = 200, description = "Travels retrieved successfully", body = ApiResponse<PageResponse<TravelResponse>>),
        (status = 303, description = "Not authenticated, redirected to login"),
        (status = 404, description = "Page out of range", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(author))]
pub async fn my_travels(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    AuthGuide(author): AuthGuide,
) -> Result<Json<ApiResponse<PageResponse<TravelResponse>>>, AppError> {
    let page = query.page.unwrap_or(1);
    let select = travel::Entity::find().filter(travel::Column::GuideId.eq(author.id));
    let data = fetch_travel_page(&state.db, select, page).await?;

    let response = ApiResponse {
        data,
        message: "travels retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a single travel
#[utoipa::path(
    get,
    path = "/travels/{travel_id}",
    tag = "travels",
    params(
        ("travel_id" = i32, Path, description = "Travel ID"),
    ),
    responses(
        (status = 200, description = "Travel retrieved successfully", body = ApiResponse<TravelResponse>),
        (status = 404, description = "Travel not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn show_travel(
    Path(travel_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TravelResponse>>, AppError> {
    let travel_model = travel::Entity::find_by_id(travel_id)
        .one(&state.db)
        .await?
        .ok_or(AppError::NotFound("travel"))?;

    let response = ApiResponse {
        data: TravelResponse::from(travel_model),
        message: "travel retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Create a travel owned by the authenticated guide
#[utoipa::path(
    post,
    path = "/travels/create",
    tag = "travels",
    request_body = TravelRequest,
    responses(
        (status = 201, description = "Travel created successfully", body = ApiResponse<TravelResponse>),
        (status = 303, description = "Not authenticated, redirected to login"),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(author, request))]
pub async fn create_travel(
    State(state): State<AppState>,
    AuthGuide(author): AuthGuide,
    Json(request): Json<TravelRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TravelResponse>>), AppError> {
    request.validate().map_err(map_validation)?;

    // The session guide is always the owner; the request cannot choose one.
    let new_travel = travel::ActiveModel {
        title: Set(request.title.clone()),
        content: Set(request.content.clone()),
        guide_id: Set(author.id),
        ..Default::default()
    };
    let travel_model = new_travel.insert(&state.db).await?;

    info!(
        "guide {} created travel {} ({})",
        author.id, travel_model.id, travel_model.title
    );
    let response = ApiResponse {
        data: TravelResponse::from(travel_model),
        message: "travel was successfully created".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Update a travel
///
/// Only the owning guide gets past the ownership check; nothing is
/// written before it passes.
#[utoipa::path(
    post,
    path = "/travels/{travel_id}/edit",
    tag = "travels",
    params(
        ("travel_id" = i32, Path, description = "Travel ID"),
    ),
    request_body = TravelRequest,
    responses(
        (status = 200, description = "Travel updated successfully", body = ApiResponse<TravelResponse>),
        (status = 303, description = "Not authenticated, redirected to login"),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Travel not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(author, request))]
pub async fn update_travel(
    Path(travel_id): Path<i32>,
    State(state): State<AppState>,
    AuthGuide(author): AuthGuide,
    Json(request): Json<TravelRequest>,
) -> Result<Json<ApiResponse<TravelResponse>>, AppError> {
    let existing = travel::Entity::find_by_id(travel_id)
        .one(&state.db)
        .await?
        .ok_or(AppError::NotFound("travel"))?;

    if existing.guide_id != author.id {
        warn!(
            "guide {} attempted to edit travel {} owned by guide {}",
            author.id, existing.id, existing.guide_id
        );
        return Err(AppError::Authorization);
    }

    request.validate().map_err(map_validation)?;

    let mut active: travel::ActiveModel = existing.into();
    active.title = Set(request.title.clone());
    active.content = Set(request.content.clone());
    let updated = active.update(&state.db).await?;

    info!("guide {} updated travel {}", author.id, updated.id);
    let response = ApiResponse {
        data: TravelResponse::from(updated),
        message: "your travel has been updated".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a travel
///
/// Same ownership policy as update.
#[utoipa::path(
    post,
    path = "/travels/{travel_id}/delete",
    tag = "travels",
    params(
        ("travel_id" = i32, Path, description = "Travel ID"),
    ),
    responses(
        (status = 200, description = "Travel deleted successfully", body = ApiResponse<String>),
        (status = 303, description = "Not authenticated, redirected to login"),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Travel not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(author))]
pub async fn delete_travel(
    Path(travel_id): Path<i32>,
    State(state): State<AppState>,
    AuthGuide(author): AuthGuide,
) -> Result<Json<ApiResponse<String>>, AppError> {
    let existing = travel::Entity::find_by_id(travel_id)
        .one(&state.db)
        .await?
        .ok_or(AppError::NotFound("travel"))?;

    if existing.guide_id != author.id {
        warn!(
            "guide {} attempted to delete travel {} owned by guide {}",
            author.id, existing.id, existing.guide_id
        );
        return Err(AppError::Authorization);
    }

    travel::Entity::delete_by_id(travel_id).exec(&state.db).await?;

    info!("guide {} deleted travel {}", author.id, travel_id);
    let response = ApiResponse {
        data: format!("travel {travel_id} deleted"),
        message: "travel deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
