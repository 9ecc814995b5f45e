use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use velina::application::render::RenderPipeline;
use velina::infra::http::{ApiState, build_router};

fn app() -> Router {
    build_router(ApiState::new(Arc::new(RenderPipeline::new())))
}

async fn post_render(path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds");

    let response = app().oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body readable")
        .to_bytes();
    let value = serde_json::from_slice(&bytes).expect("JSON body");
    (status, value)
}

#[tokio::test]
async fn renders_markdown_and_reports_stats() {
    let (status, body) =
        post_render("/render", json!({ "markdown": "# Hi\n\nVisit http://example.com\n" })).await;

    assert_eq!(status, StatusCode::OK);
    let html = body["html"].as_str().expect("html is a string");
    assert!(html.contains("<h1>Hi</h1>"));
    assert!(html.contains(
        "<a href=\"http://example.com\" target=\"_blank\" rel=\"nofollow\">http://example.com</a>"
    ));
    assert_eq!(body["stats"]["chars_in"], 31);
    assert_eq!(
        body["stats"]["chars_out"].as_u64().expect("chars_out"),
        html.chars().count() as u64
    );
    assert_eq!(body["sanitized"], true);
    assert!(body.get("text").is_none());
}

#[tokio::test]
async fn strip_html_attaches_a_text_projection() {
    let (status, body) = post_render(
        "/render",
        json!({ "markdown": "# Hi\n\n*there*", "strip_html": true }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let text = body["text"].as_str().expect("text is a string");
    assert!(!text.contains('<'));
    assert!(text.contains("Hi"));
    assert!(text.contains("there"));
}

#[tokio::test]
async fn missing_markdown_is_a_client_error() {
    let (status, body) = post_render("/render", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "missing_field");
    assert_eq!(body["error"]["message"], "missing 'markdown' field");
}

#[tokio::test]
async fn non_string_markdown_is_a_client_error() {
    let (status, body) = post_render("/render", json!({ "markdown": 5 })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "wrong_type");
    assert_eq!(body["error"]["message"], "'markdown' must be a string");
}

#[tokio::test]
async fn oversized_markdown_is_a_client_error() {
    let over_cap = "a".repeat(51201);
    let (status, body) = post_render("/render", json!({ "markdown": over_cap })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "too_large");
    assert_eq!(
        body["error"]["message"],
        "markdown too large (max 51200 bytes)"
    );
}

#[tokio::test]
async fn markdown_at_the_exact_cap_succeeds() {
    let at_cap = "a".repeat(51200);
    let (status, body) = post_render("/render", json!({ "markdown": at_cap })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["chars_in"], 51200);
}

#[tokio::test]
async fn pretty_flag_reformats_without_changing_content() {
    let request = Request::builder()
        .method("POST")
        .uri("/render?pretty=1")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "markdown": "# Hi" }).to_string()))
        .expect("request builds");

    let response = app().oneshot(request).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body readable")
        .to_bytes();
    let raw = String::from_utf8(bytes.to_vec()).expect("utf-8 body");
    assert!(raw.contains('\n'), "pretty output should be indented");

    let body: Value = serde_json::from_str(&raw).expect("JSON body");
    assert!(body["html"].as_str().expect("html").contains("<h1>Hi</h1>"));
    assert_eq!(body["sanitized"], true);
}

#[tokio::test]
async fn out_of_range_pretty_is_a_client_error() {
    let (status, body) = post_render("/render?pretty=2", json!({ "markdown": "x" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "'pretty' must be 0 or 1");
}

#[tokio::test]
async fn non_json_bodies_are_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/render")
        .header(CONTENT_TYPE, "text/plain")
        .body(Body::from("# Hi"))
        .expect("request builds");

    let response = app().oneshot(request).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn preflight_requests_are_answered_permissively() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/render")
        .body(Body::empty())
        .expect("request builds");

    let response = app().oneshot(request).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let headers = response.headers();
    assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], "POST");
    assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], "*");
}

#[tokio::test]
async fn responses_carry_the_open_origin_header() {
    let request = Request::builder()
        .method("POST")
        .uri("/render")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "markdown": "hello" }).to_string()))
        .expect("request builds");

    let response = app().oneshot(request).await.expect("router responds");
    assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn embedded_script_is_neutralized_end_to_end() {
    let (status, body) = post_render(
        "/render",
        json!({ "markdown": "<script>alert('x')</script>\n\nsafe" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let html = body["html"].as_str().expect("html");
    assert!(!html.contains("<script"));
    assert!(html.contains("safe"));
}
