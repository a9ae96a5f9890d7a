use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::Value;

use super::provider::AssessmentProvider;
use super::service::AssessmentService;

/// Router exposing the assessment endpoint.
pub fn assessment_router<P>(service: Arc<AssessmentService<P>>) -> Router
where
    P: AssessmentProvider + 'static,
{
    Router::new()
        .route("/api/assess", post(assess_handler::<P>))
        .with_state(service)
}

/// Always answers 200. Bodies that are not JSON objects are read as `{}`.
pub(crate) async fn assess_handler<P>(
    State(service): State<Arc<AssessmentService<P>>>,
    body: Bytes,
) -> Response
where
    P: AssessmentProvider + 'static,
{
    let payload = serde_json::from_slice::<Value>(&body).unwrap_or(Value::Null);
    let output = service.assess_json(&payload).await;
    (StatusCode::OK, axum::Json(output)).into_response()
}
