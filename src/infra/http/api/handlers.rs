use std::time::Instant;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::{StatusCode, header::CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use metrics::{counter, histogram};
use serde::Deserialize;
use velina_api_types::{RenderRequest, RenderResponse, RenderStats};

use crate::application::render::validate;

use super::error::{ApiError, codes};
use super::state::ApiState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RenderQuery {
    pub pretty: Option<u8>,
}

/// `POST /render`: validate, render, sanitize, assemble.
///
/// The `pretty` flag only changes response serialization; it has no effect on
/// validation or sanitization.
pub async fn render(
    State(state): State<ApiState>,
    query: Result<Query<RenderQuery>, QueryRejection>,
    body: Result<Json<RenderRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    counter!("velina_render_requests_total").increment(1);

    let pretty = match query {
        Ok(Query(RenderQuery { pretty: None })) | Ok(Query(RenderQuery { pretty: Some(0) })) => {
            false
        }
        Ok(Query(RenderQuery { pretty: Some(1) })) => true,
        Ok(Query(RenderQuery { pretty: Some(_) })) => {
            return reject(ApiError::bad_request(
                codes::BAD_REQUEST,
                "'pretty' must be 0 or 1",
            ));
        }
        Err(rejection) => {
            return reject(
                ApiError::bad_request(codes::BAD_REQUEST, "invalid query string")
                    .with_detail(rejection.to_string()),
            );
        }
    };

    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return reject(
                ApiError::bad_request(codes::BAD_REQUEST, "request body must be a JSON object")
                    .with_detail(rejection.to_string()),
            );
        }
    };

    let validated = match validate(request) {
        Ok(validated) => validated,
        Err(error) => {
            counter!("velina_render_rejected_total", "kind" => error.code()).increment(1);
            return ApiError::from(error).into_response();
        }
    };

    let outcome = match state.pipeline.render(&validated) {
        Ok(outcome) => outcome,
        Err(error) => {
            counter!("velina_render_rejected_total", "kind" => error.code()).increment(1);
            return ApiError::from(error).into_response();
        }
    };

    histogram!("velina_render_duration_ms").record(start.elapsed().as_secs_f64() * 1000.0);

    let response = RenderResponse {
        html: outcome.html,
        stats: RenderStats {
            chars_in: outcome.chars_in,
            chars_out: outcome.chars_out,
        },
        sanitized: true,
        text: outcome.text,
    };

    if pretty {
        return match serde_json::to_string_pretty(&response) {
            Ok(body) => (
                StatusCode::OK,
                [(CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response(),
            Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        };
    }

    Json(response).into_response()
}

fn reject(error: ApiError) -> Response {
    counter!("velina_render_rejected_total", "kind" => "bad_request").increment(1);
    error.into_response()
}
