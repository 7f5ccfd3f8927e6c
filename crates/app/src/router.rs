use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
    routing::{get, put},
    Json, Router,
};
use cookit_core::{
    feedback_message, RecipeDetail, RecipeError, RecipeId, RecipeState, RecipeSummary,
};
use metrics::counter;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use tokio_stream::Stream;
use tracing::error;

use crate::events::{self, RatingHub};
use crate::problem::ProblemResponse;
use crate::telemetry;

#[derive(Clone)]
pub struct AppState {
    metrics: PrometheusHandle,
    recipes: Arc<RecipeState>,
    ratings: RatingHub,
    sse_heartbeat_secs: u64,
}

impl AppState {
    /// Wires the rating hub to `recipes` so recorded ratings reach SSE clients.
    pub fn new(
        metrics: PrometheusHandle,
        recipes: Arc<RecipeState>,
        ratings: RatingHub,
        sse_heartbeat_secs: u64,
    ) -> Self {
        recipes.subscribe(Arc::new(ratings.clone()));
        Self {
            metrics,
            recipes,
            ratings,
            sse_heartbeat_secs,
        }
    }

    pub fn metrics(&self) -> &PrometheusHandle {
        &self.metrics
    }

    pub fn recipes(&self) -> &RecipeState {
        &self.recipes
    }

    pub fn ratings(&self) -> &RatingHub {
        &self.ratings
    }

    pub fn sse_heartbeat(&self) -> u64 {
        self.sse_heartbeat_secs
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .route("/api/recipes", get(list_recipes))
        .route("/api/recipes/:id", get(recipe_detail))
        .route("/api/recipes/:id/rating", put(rate_recipe))
        .route("/api/ratings/stream", get(rating_events))
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = telemetry::render_metrics(state.metrics());
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    q: Option<String>,
}

async fn list_recipes(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<RecipeSummary>> {
    counter!("recipe_search_requests_total").increment(1);
    Json(state.recipes().search(query.q.unwrap_or_default()))
}

#[derive(Debug, Deserialize)]
struct DetailQuery {
    #[serde(default)]
    servings: Option<i64>,
}

impl DetailQuery {
    /// Saturates into `i32`; the scaler clamps whatever remains.
    fn servings(&self) -> Option<i32> {
        self.servings
            .map(|servings| servings.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
    }
}

async fn recipe_detail(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    query: Result<Query<DetailQuery>, QueryRejection>,
) -> Result<Json<RecipeDetail>, ProblemResponse> {
    let Query(query) = query?;
    let id: RecipeId = raw_id.parse()?;
    match state.recipes().detail(id, query.servings()) {
        Ok(detail) => {
            counter!("recipe_detail_requests_total", "result" => "ok").increment(1);
            Ok(Json(detail))
        }
        Err(err @ RecipeError::SimulatedFault { .. }) => {
            counter!("simulated_faults_total").increment(1);
            error!(stage = "app", recipe_id = %id, error = %err, "raising simulated fault");
            panic!("{err}");
        }
        Err(err) => {
            counter!("recipe_detail_requests_total", "result" => "not_found").increment(1);
            Err(err.into())
        }
    }
}

#[derive(Debug, Deserialize)]
struct RatingRequest {
    value: i64,
}

#[derive(Debug, Serialize)]
struct RatingReceipt {
    recipe_id: RecipeId,
    rating: u8,
    previous: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    feedback: Option<&'static str>,
}

/// Answers 200 with thank-you copy when the rating is recorded, 204 when an
/// out-of-range value is dropped.
async fn rate_recipe(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(request): Json<RatingRequest>,
) -> Result<Response, ProblemResponse> {
    let id: RecipeId = raw_id.parse()?;
    let recipe = state.recipes().recipe(id)?;

    let Some(change) = state.recipes().set_rating(recipe, request.value) else {
        counter!("ratings_submitted_total", "result" => "ignored").increment(1);
        return Ok(StatusCode::NO_CONTENT.into_response());
    };
    counter!("ratings_submitted_total", "result" => "recorded").increment(1);

    let receipt = RatingReceipt {
        recipe_id: change.recipe_id,
        rating: change.rating,
        previous: change.previous,
        feedback: feedback_message(change.rating),
    };
    Ok(Json(receipt).into_response())
}

async fn rating_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, serde_json::Error>>> {
    let stream = events::rating_stream(state.ratings());
    Sse::new(stream).keep_alive(events::keep_alive(state.sse_heartbeat()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use cookit_core::{CAPPED_NOTICE, UNRATED};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tokio::time::{self, Duration};
    use tower::ServiceExt;

    fn setup_state() -> AppState {
        let metrics = telemetry::init_metrics().expect("metrics init");
        AppState::new(metrics, Arc::new(RecipeState::new()), RatingHub::new(16), 20)
    }

    fn pizza_id(state: &AppState) -> RecipeId {
        state.recipes().catalog().recipes()[0].id
    }

    fn fault_id(state: &AppState) -> RecipeId {
        state
            .recipes()
            .catalog()
            .fault_recipe_id()
            .expect("fault recipe")
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn put_rating(id: impl std::fmt::Display, value: i64) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri(format!("/api/recipes/{id}/rating"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(format!("{{\"value\":{value}}}")))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let collected = response
            .into_body()
            .collect()
            .await
            .expect("body should read");
        serde_json::from_slice(&collected.to_bytes()).expect("json body")
    }

    #[tokio::test]
    async fn healthz_returns_ok() {
        let app = app_router(setup_state());
        let response = app.oneshot(get("/healthz")).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_exports_build_info() {
        let app = app_router(setup_state());
        let response = app.oneshot(get("/metrics")).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let collected = response.into_body().collect().await.expect("body");
        let body = String::from_utf8(collected.to_bytes().to_vec()).expect("utf-8");
        assert!(body.contains("app_build_info"));
        assert!(body.contains("app_uptime_seconds"));
    }

    #[tokio::test]
    async fn lists_whole_catalog_without_query() {
        let app = app_router(setup_state());
        let response = app.oneshot(get("/api/recipes")).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        let rows = body.as_array().expect("array");
        assert_eq!(rows.len(), 13);
        assert_eq!(rows[0]["title"].as_str(), Some("Classic Margherita Pizza"));
        assert_eq!(rows[0]["rating"].as_u64(), Some(u64::from(UNRATED)));
    }

    #[tokio::test]
    async fn filters_by_query_case_insensitively() {
        let state = setup_state();
        let app = app_router(state.clone());
        let response = app
            .oneshot(get("/api/recipes?q=%20%20PIZZA%20"))
            .await
            .expect("response");

        let body = json_body(response).await;
        let rows = body.as_array().expect("array");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["title"].as_str(), Some("Classic Margherita Pizza"));
        assert_eq!(state.recipes().query(), "  PIZZA ");
    }

    #[tokio::test]
    async fn detail_scales_and_caps_servings() {
        let state = setup_state();
        let uri = format!("/api/recipes/{}?servings=20", pizza_id(&state));
        let response = app_router(state).oneshot(get(&uri)).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["effective_servings"].as_i64(), Some(10));
        assert_eq!(body["capped"].as_bool(), Some(true));
        assert_eq!(body["capped_notice"].as_str(), Some(CAPPED_NOTICE));
        assert_eq!(body["ingredients"][0].as_str(), Some("5 pizza dough ball"));
        assert_eq!(body["ingredients"][3].as_str(), Some("fresh basil leaves"));
    }

    #[tokio::test]
    async fn unknown_recipe_is_not_found() {
        let state = setup_state();
        let uri = format!("/api/recipes/{}", RecipeId::new());
        let response = app_router(state).oneshot(get(&uri)).await.expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/problem+json"
        );
        let body = json_body(response).await;
        assert_eq!(body["type"].as_str(), Some("recipe_not_found"));
    }

    #[tokio::test]
    async fn malformed_id_is_bad_request() {
        let app = app_router(setup_state());
        let response = app
            .oneshot(get("/api/recipes/not-a-recipe"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["type"].as_str(), Some("invalid_recipe_id"));
    }

    #[tokio::test]
    #[should_panic(expected = "Simulated data corruption")]
    async fn fault_recipe_detail_crashes() {
        let state = setup_state();
        let uri = format!("/api/recipes/{}", fault_id(&state));
        let _ = app_router(state).oneshot(get(&uri)).await;
    }

    #[tokio::test]
    async fn ratings_are_validated_and_overwritten() {
        let state = setup_state();
        let id = pizza_id(&state);

        for (value, status, expected) in [
            (3, StatusCode::OK, 3),
            (6, StatusCode::NO_CONTENT, 3),
            (0, StatusCode::NO_CONTENT, 3),
            (-1, StatusCode::NO_CONTENT, 3),
            (5, StatusCode::OK, 5),
        ] {
            let response = app_router(state.clone())
                .oneshot(put_rating(id, value))
                .await
                .expect("response");
            assert_eq!(response.status(), status);

            let recipe = state.recipes().recipe(id).expect("known recipe");
            assert_eq!(state.recipes().rating_for(recipe), expected);
        }

        let response = app_router(state.clone())
            .oneshot(get(&format!("/api/recipes/{id}")))
            .await
            .expect("response");
        let body = json_body(response).await;
        assert_eq!(body["rating"].as_u64(), Some(5));
    }

    #[tokio::test]
    async fn recorded_rating_returns_feedback() {
        let state = setup_state();
        let id = pizza_id(&state);

        let response = app_router(state.clone())
            .oneshot(put_rating(id, 4))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["recipe_id"].as_str(), Some(id.to_string().as_str()));
        assert_eq!(body["rating"].as_u64(), Some(4));
        assert_eq!(body["previous"].as_u64(), Some(u64::from(UNRATED)));
        assert_eq!(body["feedback"].as_str(), feedback_message(4));

        let response = app_router(state)
            .oneshot(put_rating(id, 2))
            .await
            .expect("response");
        let body = json_body(response).await;
        assert_eq!(body["previous"].as_u64(), Some(4));
        assert_eq!(body["feedback"].as_str(), Some("Thanks for the honest feedback."));
    }

    #[tokio::test]
    async fn oversized_servings_are_capped() {
        let state = setup_state();
        let uri = format!("/api/recipes/{}?servings=99999999999", pizza_id(&state));
        let response = app_router(state).oneshot(get(&uri)).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["requested_servings"].as_i64(), Some(i64::from(i32::MAX)));
        assert_eq!(body["effective_servings"].as_i64(), Some(10));
        assert_eq!(body["capped"].as_bool(), Some(true));
    }

    #[tokio::test]
    async fn non_numeric_servings_is_a_problem() {
        let state = setup_state();
        let uri = format!("/api/recipes/{}?servings=abc", pizza_id(&state));
        let response = app_router(state).oneshot(get(&uri)).await.expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/problem+json"
        );
        let body = json_body(response).await;
        assert_eq!(body["type"].as_str(), Some("invalid_query"));
    }

    #[tokio::test]
    async fn rating_unknown_recipe_is_not_found() {
        let app = app_router(setup_state());
        let response = app
            .oneshot(put_rating(RecipeId::new(), 4))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn rating_stream_emits_changes() {
        let state = setup_state();
        let id = pizza_id(&state);
        let publisher = state.clone();
        let app = app_router(state);

        let publish = tokio::spawn(async move {
            time::sleep(Duration::from_millis(25)).await;
            let recipe = publisher.recipes().recipe(id).expect("known recipe");
            publisher.recipes().set_rating(recipe, 4);
        });

        let mut response = app
            .oneshot(get("/api/ratings/stream"))
            .await
            .expect("response");

        let frame = time::timeout(Duration::from_secs(1), response.body_mut().frame())
            .await
            .expect("stream produced chunk")
            .expect("chunk ok")
            .expect("chunk available");

        let data = match frame.into_data() {
            Ok(data) => data,
            Err(_) => panic!("expected data frame"),
        };
        let text = String::from_utf8(data.to_vec()).expect("utf-8");
        assert!(text.contains("event: rating.changed"));
        assert!(text.contains(&id.to_string()));
        assert!(text.contains("\"rating\":4"));

        publish.await.expect("publish task");
    }
}
