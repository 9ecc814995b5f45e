pub mod api;
mod middleware;

pub use api::ApiState;

use axum::{Router, middleware as axum_middleware};

/// Assemble the service router: render API plus CORS and response logging.
pub fn build_router(state: ApiState) -> Router {
    api::build_api_router(state)
        .layer(axum_middleware::from_fn(middleware::log_responses))
        .layer(axum_middleware::from_fn(middleware::allow_cross_origin))
}
