mod cursor;
mod envelope;
mod error;
mod operation;
mod state;
mod util;

pub mod docs;
pub mod handlers;
pub mod routes;
pub mod services;

pub use cursor::{decode_scan_key, encode_scan_key, CursorError};
pub use envelope::{ApiRequest, ApiResponse};
pub use error::{ApiError, ErrorResponse};
pub use handlers::invoke;
pub use operation::{Operation, UnknownOperation};
pub use state::AppState;

use axum::{
    http::header::{ACCEPT, CONTENT_TYPE},
    routing::{get, patch, put},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/users",
            get(routes::users::get_users).post(routes::users::create_user),
        )
        .route("/users/paginate", get(routes::users::paginate_users))
        .route(
            "/users/paginate/sorted",
            get(routes::users::paginate_and_sort_users),
        )
        .route("/users/query", get(routes::users::query_users_by_name))
        .route("/users/sorted", get(routes::users::sort_users))
        .route(
            "/users/:id/soft-delete",
            patch(routes::users::soft_delete_user),
        )
        .route(
            "/users/:id",
            put(routes::users::update_user).delete(routes::users::delete_user),
        )
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(docs::ApiDoc::openapi())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::PATCH,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([ACCEPT, CONTENT_TYPE])
}
