use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::config::AppConfig;
use crate::handlers::account::AccountUpdateForm;
use crate::handlers::guides::{GuideDetailResponse, GuideResponse, RegisterRequest};
use crate::handlers::password_reset::{PerformResetRequest, ResetRequest};
use crate::handlers::sessions::LoginRequest;
use crate::handlers::travels::{TravelRequest, TravelResponse};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Process configuration (token secret, upload directory)
    pub config: AppConfig,
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// One page of a listing
#[derive(Serialize, Deserialize, ToSchema)]
pub struct PageResponse<T> {
    /// Records on this page, newest first
    pub items: Vec<T>,
    /// 1-based page index
    pub page: u64,
    /// Maximum records per page
    pub page_size: u64,
    /// Number of pages available
    pub total_pages: u64,
    /// Number of records across all pages
    pub total_items: u64,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::guides::register_guide,
        crate::handlers::guides::list_guides,
        crate::handlers::guides::show_guide,
        crate::handlers::guides::delete_guide,
        crate::handlers::sessions::login,
        crate::handlers::sessions::logout,
        crate::handlers::account::get_account,
        crate::handlers::account::update_account,
        crate::handlers::travels::list_travels,
        crate::handlers::travels::show_travel,
        crate::handlers::travels::my_travels,
        crate::handlers::travels::create_travel,
        crate::handlers::travels::update_travel,
        crate::handlers::travels::delete_travel,
        crate::handlers::password_reset::request_reset,
        crate::handlers::password_reset::perform_reset,
    ),
    components(
        schemas(
            ApiResponse<GuideResponse>,
            ApiResponse<Vec<GuideResponse>>,
            ApiResponse<GuideDetailResponse>,
            ApiResponse<TravelResponse>,
            ApiResponse<PageResponse<TravelResponse>>,
            ApiResponse<String>,
            ErrorResponse,
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            TravelRequest,
            AccountUpdateForm,
            ResetRequest,
            PerformResetRequest,
            GuideResponse,
            GuideDetailResponse,
            TravelResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "guides", description = "Guide registration and profiles"),
        (name = "sessions", description = "Login and logout"),
        (name = "account", description = "Own-profile management"),
        (name = "travels", description = "Travel posts and listings"),
        (name = "password-reset", description = "Credential recovery flow"),
    ),
    info(
        title = "Travelbook API",
        description = "Travel blogging service - guides author travel posts and manage them through session login",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;
