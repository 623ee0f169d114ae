use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::evaluation::AnswerEvaluator;
use crate::gateway::{HandlerState, router};

const CONTEXT: &str = "The Nile is the longest river in Africa. It flows north \
                       through eleven countries. Cairo sits on its banks.";

fn stub_app() -> Router {
    let evaluator = AnswerEvaluator::stub().expect("stub evaluator");
    router(HandlerState::new(evaluator))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

#[tokio::test]
async fn test_healthz_returns_ok() {
    let app = stub_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_ready_reports_stub_backends() {
    let app = stub_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/ready")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ready");
    assert_eq!(json["qaModel"], "stub");
    assert_eq!(json["embedder"], "stub");
}

#[tokio::test]
async fn test_evaluate_identical_answer_scores_100() {
    let evaluator = AnswerEvaluator::stub().expect("stub evaluator");
    let question = "Which river is the longest in Africa?";
    let reference = evaluator
        .extractor()
        .answer(CONTEXT, question)
        .expect("answer");
    let app = router(HandlerState::new(evaluator));

    let body = json!({
        "context": CONTEXT,
        "question": question,
        "userAnswer": reference,
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/evaluate")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["score"], 100.0);
    assert_eq!(json["similarityScore"], 100.0);
    assert_eq!(json["modelAnswer"], reference);
    assert_eq!(json["userAnswer"], reference);
    assert_eq!(json["feedback"], "Excellent match with the expected answer!");
}

#[tokio::test]
async fn test_evaluate_missing_field_is_bad_request() {
    let app = stub_app();

    let body = json!({
        "context": CONTEXT,
        "question": "Which river is the longest in Africa?",
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/evaluate")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"].as_str().expect("error message").contains("userAnswer"));
}

#[tokio::test]
async fn test_evaluate_malformed_body_is_bad_request() {
    let app = stub_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/evaluate")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json.get("error").is_some());
}
