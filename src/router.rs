use crate::handlers::{
    account::{get_account, update_account},
    guides::{delete_guide, list_guides, register_guide, show_guide},
    health::health_check,
    password_reset::{perform_reset, request_reset},
    sessions::{login, logout},
    travels::{create_travel, delete_travel, list_travels, my_travels, show_travel, update_travel},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Public travel listing, the landing page
        .route("/", get(list_travels))
        .route("/home", get(list_travels))
        .route("/travels", get(list_travels))
        .route("/travels/:travel_id", get(show_travel))
        // Registration and sessions
        .route("/register", post(register_guide))
        .route("/login", post(login))
        .route("/logout", get(logout))
        // Own-profile management
        .route("/account", get(get_account).post(update_account))
        // Guides
        .route("/guides", get(list_guides))
        .route(
            "/guides/:guide_id",
            get(show_guide).post(delete_guide).delete(delete_guide),
        )
        // Travel mutations, owner-gated
        .route("/my_travels", get(my_travels))
        .route("/travels/create", post(create_travel))
        .route("/travels/:travel_id/edit", post(update_travel))
        .route(
            "/travels/:travel_id/delete",
            post(delete_travel).delete(delete_travel),
        )
        // Password reset flow
        .route("/reset_password", post(request_reset))
        .route("/reset_password/:token", post(perform_reset))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
