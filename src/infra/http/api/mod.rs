pub mod error;
pub mod handlers;
pub mod state;

pub use state::ApiState;

use axum::{Router, routing::post};

/// Routes for the render API. Middleware (CORS, response logging) is layered
/// by the top-level router builder.
pub fn build_api_router(state: ApiState) -> Router {
    Router::new()
        .route("/render", post(handlers::render))
        .with_state(state)
}
