//! End-to-end tests for the evaluation endpoint through the public API.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use quizmill::evaluation::AnswerEvaluator;
use quizmill::gateway::{HandlerState, router};

const CONTEXT: &str = "Water boils at 100 degrees Celsius at sea level. The \
                       boiling point drops as altitude increases. Pressure \
                       cookers raise it instead.";

const FEEDBACK_MESSAGES: &[&str] = &[
    "Excellent match with the expected answer!",
    "Good answer, but could be more precise.",
    "Partial match. Review key concepts.",
    "Significant differences detected. Needs improvement.",
];

async fn post_evaluate(body: Value) -> (StatusCode, Value) {
    let app = router(HandlerState::new(
        AnswerEvaluator::stub().expect("stub evaluator"),
    ));

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

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    let json = serde_json::from_slice(&bytes).expect("JSON body");

    (status, json)
}

#[tokio::test]
async fn evaluate_returns_full_response_shape() {
    let (status, json) = post_evaluate(json!({
        "context": CONTEXT,
        "question": "At what temperature does water boil?",
        "userAnswer": "It boils at one hundred degrees",
    }))
    .await;

    assert_eq!(status, StatusCode::OK);

    let score = json["score"].as_f64().expect("score");
    assert!((0.0..=100.0).contains(&score));
    assert_eq!(json["similarityScore"], json["score"]);
    assert!(json["modelAnswer"].is_string());
    assert_eq!(json["userAnswer"], "It boils at one hundred degrees");

    let feedback = json["feedback"].as_str().expect("feedback");
    assert!(
        FEEDBACK_MESSAGES.contains(&feedback),
        "unexpected feedback: {}",
        feedback
    );
}

#[tokio::test]
async fn evaluate_feedback_matches_score_bucket() {
    let (status, json) = post_evaluate(json!({
        "context": CONTEXT,
        "question": "At what temperature does water boil?",
        "userAnswer": "Something else entirely about geology",
    }))
    .await;

    assert_eq!(status, StatusCode::OK);

    let score = json["score"].as_f64().expect("score");
    let feedback = json["feedback"].as_str().expect("feedback");

    let expected = if score >= 90.0 {
        FEEDBACK_MESSAGES[0]
    } else if score >= 70.0 {
        FEEDBACK_MESSAGES[1]
    } else if score >= 50.0 {
        FEEDBACK_MESSAGES[2]
    } else {
        FEEDBACK_MESSAGES[3]
    };
    assert_eq!(feedback, expected);
}

#[tokio::test]
async fn evaluate_rejects_blank_fields() {
    let (status, json) = post_evaluate(json!({
        "context": CONTEXT,
        "question": "   ",
        "userAnswer": "answer",
    }))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().expect("error").contains("question"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = router(HandlerState::new(
        AnswerEvaluator::stub().expect("stub evaluator"),
    ));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nope")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
