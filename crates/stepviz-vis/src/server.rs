//! Axum HTTP surface for trace generation and playback control.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use stepviz_flow::{FlowGraph, Layout};
use stepviz_trace::{
    catalogue, simulate_or_fallback, AlgorithmDescriptor, Category, ExecutionStep, RawInput, Trace,
};
use tower_http::cors::CorsLayer;

use crate::config::VisConfig;
use crate::driver::Player;
use crate::error::{Error, Result};
use crate::playback::{Direction, Playback, PlaybackStatus, PlaybackView, SpeedTier};

/// Shared application state.
pub struct AppState {
    player: Player,
}

/// Visualization server.
pub struct VisServer {
    config: VisConfig,
    state: Arc<AppState>,
}

impl VisServer {
    /// Create a server with the configured algorithm preselected.
    ///
    /// Spawns the playback task, so it must be called inside a tokio runtime.
    pub fn new(config: VisConfig) -> Self {
        let mut playback = Playback::new(config.speed);
        playback.select(build_trace(&config.algorithm, None));
        Self {
            config,
            state: Arc::new(AppState {
                player: Player::spawn(playback),
            }),
        }
    }

    /// Handle to the playback task behind this server.
    pub fn player(&self) -> &Player {
        &self.state.player
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/health", get(health_handler))
            .route("/api/algorithms", get(catalogue_handler))
            .route("/api/algorithms/{id}", get(algorithm_handler))
            .route("/api/algorithms/name/{name}", get(algorithm_by_name_handler))
            .route("/api/visualize", post(visualize_handler))
            .route("/visualize", post(visualize_handler))
            .route("/api/playback", get(playback_status_handler))
            .route("/api/playback/view", get(view_handler))
            .route("/api/playback/select", post(select_handler))
            .route("/api/playback/play", post(play_handler))
            .route("/api/playback/pause", post(pause_handler))
            .route("/api/playback/reset", post(reset_handler))
            .route("/api/playback/step", post(step_handler))
            .route("/api/playback/seek", post(seek_handler))
            .route("/api/playback/speed", post(speed_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the server on the configured address.
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(self.config.api_addr).await?;
        tracing::info!(
            "Visualization API running on http://{}",
            listener.local_addr()?
        );
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

/// Simulate `algorithm`, using its catalogue default input when none is given.
fn build_trace(algorithm: &str, input: Option<RawInput>) -> Trace {
    let input = input.filter(|i| !i.is_empty()).unwrap_or_else(|| {
        catalogue::lookup(algorithm)
            .map(AlgorithmDescriptor::default_input)
            .unwrap_or_else(|| RawInput::Text(String::new()))
    });
    simulate_or_fallback(algorithm, &input)
}

/// Decode a request body that names an algorithm.
///
/// Bodies that are not JSON, or whose fields have the wrong type, are treated
/// as carrying no algorithm name, whatever their content type.
fn algorithm_request<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|err| {
        tracing::debug!(error = %err, "unreadable request body");
        Error::MissingField("Algorithm name")
    })
}

fn required_algorithm(algorithm: Option<String>) -> Result<String> {
    algorithm
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .ok_or(Error::MissingField("Algorithm name"))
}

async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "Backend server is running",
    }))
}

async fn catalogue_handler() -> Json<BTreeMap<Category, Vec<&'static AlgorithmDescriptor>>> {
    Json(catalogue::grouped())
}

async fn algorithm_handler(Path(id): Path<String>) -> Result<Json<&'static AlgorithmDescriptor>> {
    catalogue::find(&id).map(Json).ok_or(Error::NotFound)
}

async fn algorithm_by_name_handler(
    Path(name): Path<String>,
) -> Result<Json<&'static AlgorithmDescriptor>> {
    catalogue::find_by_name(&name).map(Json).ok_or(Error::NotFound)
}

#[derive(Deserialize)]
struct VisualizeRequest {
    algorithm: Option<String>,
    input: Option<RawInput>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VisualizeData<'a> {
    algorithm: String,
    input: RawInput,
    steps: &'a [ExecutionStep],
    step_count: usize,
    flowchart: &'a FlowGraph,
    layout: Layout,
}

#[derive(Serialize)]
struct VisualizeResponse<'a> {
    success: bool,
    message: &'static str,
    data: VisualizeData<'a>,
}

async fn visualize_handler(body: Bytes) -> Result<Json<Value>> {
    let req: VisualizeRequest = algorithm_request(&body)?;
    let algorithm = required_algorithm(req.algorithm)?;
    let input = req
        .input
        .filter(|i| !i.is_empty())
        .ok_or(Error::MissingField("Input"))?;

    let trace = simulate_or_fallback(&algorithm, &input);
    let graph = trace.flow_graph();
    tracing::info!(
        algorithm = %algorithm,
        steps = trace.step_count(),
        "visualization generated"
    );

    let response = VisualizeResponse {
        success: true,
        message: "Visualization data generated",
        data: VisualizeData {
            algorithm,
            input,
            steps: trace.steps(),
            step_count: trace.step_count(),
            flowchart: graph,
            layout: stepviz_flow::layout(&graph.nodes, &graph.edges),
        },
    };
    Ok(Json(json!(response)))
}

async fn playback_status_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    Json(state.player.status())
}

async fn view_handler(State(state): State<Arc<AppState>>) -> Result<Json<PlaybackView>> {
    Ok(Json(state.player.view().await?))
}

#[derive(Deserialize)]
struct SelectRequest {
    algorithm: Option<String>,
    input: Option<RawInput>,
    /// Play the catalogue walkthrough instead of simulating `input`
    #[serde(default)]
    walkthrough: bool,
}

async fn select_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<PlaybackStatus>> {
    let req: SelectRequest = algorithm_request(&body)?;
    let algorithm = required_algorithm(req.algorithm)?;
    let trace = if req.walkthrough {
        catalogue::lookup(&algorithm)
            .ok_or(Error::NotFound)?
            .walkthrough_trace()
    } else {
        build_trace(&algorithm, req.input)
    };
    tracing::info!(algorithm = %algorithm, steps = trace.step_count(), "algorithm selected");
    Ok(Json(state.player.select(trace).await?))
}

async fn play_handler(State(state): State<Arc<AppState>>) -> Result<Json<PlaybackStatus>> {
    Ok(Json(state.player.play().await?))
}

async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<PlaybackStatus>> {
    Ok(Json(state.player.pause().await?))
}

async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<PlaybackStatus>> {
    Ok(Json(state.player.reset().await?))
}

#[derive(Deserialize)]
struct StepRequest {
    direction: Direction,
}

async fn step_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StepRequest>,
) -> Result<Json<PlaybackStatus>> {
    Ok(Json(state.player.step(req.direction).await?))
}

#[derive(Deserialize)]
struct SeekRequest {
    index: usize,
}

async fn seek_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SeekRequest>,
) -> Result<Json<PlaybackStatus>> {
    Ok(Json(state.player.seek(req.index).await?))
}

#[derive(Deserialize)]
struct SpeedRequest {
    tier: u8,
}

async fn speed_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeedRequest>,
) -> Result<Json<PlaybackStatus>> {
    let tier = SpeedTier::try_from(req.tier)?;
    Ok(Json(state.player.set_speed(tier).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        VisServer::new(VisConfig::default()).router()
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn health() {
        let (status, body) = call(&app(), "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
    }

    #[tokio::test]
    async fn catalogue_is_grouped() {
        let (status, body) = call(&app(), "GET", "/api/algorithms", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sorting"].as_array().unwrap().len(), 3);
        assert_eq!(body["searching"][0]["id"], "binary-search");
        assert_eq!(body["array"][0]["complexityTime"], "O(n)");
    }

    #[tokio::test]
    async fn algorithm_lookup() {
        let app = app();
        let (status, body) = call(&app, "GET", "/api/algorithms/dijkstra", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "graph");

        let (status, body) = call(&app, "GET", "/api/algorithms/name/Bubble%20Sort", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "bubble-sort");

        let (status, body) = call(&app, "GET", "/api/algorithms/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Algorithm not found");
    }

    #[tokio::test]
    async fn visualize_bubble_sort() {
        let (status, body) = call(
            &app(),
            "POST",
            "/api/visualize",
            Some(json!({ "algorithm": "bubble-sort", "input": [64, 34, 25, 12, 22, 11, 90] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let data = &body["data"];
        let steps = data["steps"].as_array().unwrap();
        assert_eq!(data["stepCount"], steps.len());
        assert_eq!(steps[0]["message"], "Input array: [64, 34, 25, 12, 22, 11, 90]");
        assert_eq!(steps[0]["sourceLine"], 2);
        assert_eq!(
            steps.last().unwrap()["message"],
            "Final sorted array: [11, 12, 22, 25, 34, 64, 90]"
        );
        assert!(data["flowchart"]["nodes"].as_array().unwrap().len() > 5);
        assert_eq!(data["layout"]["width"], 600.0);
    }

    #[tokio::test]
    async fn visualize_unknown_algorithm_falls_back() {
        let (status, body) = call(
            &app(),
            "POST",
            "/api/visualize",
            Some(json!({ "algorithm": "foo-sort", "input": "1,2,3" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["stepCount"], 3);
        assert_eq!(body["data"]["steps"][1]["message"], "Algorithm foo-sort is executing...");

        let (status, body) = call(
            &app(),
            "POST",
            "/visualize",
            Some(json!({ "algorithm": "binary-search", "input": 23 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["steps"].as_array().unwrap().last().unwrap()["foundIndex"], 5);
        assert_eq!(body["data"]["input"], json!(23));
        assert_eq!(body["data"]["steps"][0]["target"], json!(23));
    }

    #[tokio::test]
    async fn visualize_requires_fields() {
        let app = app();
        let (status, body) = call(&app, "POST", "/api/visualize", Some(json!({ "input": [1] }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Algorithm name is required");

        let (status, body) =
            call(&app, "POST", "/api/visualize", Some(json!({ "algorithm": "dfs" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Input is required");

        for input in [json!(null), json!(""), json!("   ")] {
            let (status, _) = call(
                &app,
                "POST",
                "/api/visualize",
                Some(json!({ "algorithm": "dfs", "input": input })),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn visualize_rejects_unreadable_bodies_with_400() {
        let app = app();
        let raw = |content_type: Option<&str>, body: &str| {
            let request = Request::builder().method("POST").uri("/api/visualize");
            let request = match content_type {
                Some(ct) => request.header("content-type", ct),
                None => request,
            };
            request.body(Body::from(body.to_owned())).unwrap()
        };

        let cases = [
            raw(None, r#"{"algorithm": "dfs", "input": [1]}"#),
            raw(Some("text/plain"), r#"{"algorithm": "dfs", "input": [1]}"#),
            raw(Some("application/json"), "not json"),
            raw(Some("application/json"), ""),
        ];
        for request in cases {
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body: Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(body["error"], "Algorithm name is required");
        }

        let (status, body) = call(
            &app,
            "POST",
            "/api/visualize",
            Some(json!({ "algorithm": 5, "input": [1] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Algorithm name is required");
    }

    #[tokio::test]
    async fn descriptor_carries_walkthrough() {
        let (status, body) = call(&app(), "GET", "/api/algorithms/merge-sort", None).await;
        assert_eq!(status, StatusCode::OK);
        let walkthrough = body["walkthrough"].as_array().unwrap();
        assert_eq!(walkthrough.len(), 5);
        assert_eq!(walkthrough[1]["action"], "Divide");
        assert_eq!(walkthrough[1]["sourceLine"], 4);
        assert_eq!(walkthrough[4]["terminal"], true);
    }

    #[tokio::test]
    async fn select_walkthrough_plays_curated_steps() {
        let app = app();
        let (status, body) = call(
            &app,
            "POST",
            "/api/playback/select",
            Some(json!({ "algorithm": "bfs", "walkthrough": true })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stepCount"], 5);

        call(&app, "POST", "/api/playback/seek", Some(json!({ "index": 2 }))).await;
        let (_, view) = call(&app, "GET", "/api/playback/view", None).await;
        assert_eq!(view["highlightedLine"], 6);
        assert_eq!(view["highlightedNode"], "dequeue");

        let (status, _) = call(
            &app,
            "POST",
            "/api/playback/select",
            Some(json!({ "algorithm": "foo-sort", "walkthrough": true })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn playback_starts_with_configured_algorithm() {
        let app = app();
        let (status, body) = call(&app, "GET", "/api/playback", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "loaded");
        assert_eq!(body["cursor"], 0);
        assert_eq!(body["speedTier"], 2);

        let (_, view) = call(&app, "GET", "/api/playback/view", None).await;
        assert_eq!(view["algorithm"], "Bubble Sort");
        assert_eq!(view["highlightedNode"], "input");
    }

    #[tokio::test]
    async fn playback_controls() {
        let app = app();
        let (_, body) = call(
            &app,
            "POST",
            "/api/playback/select",
            Some(json!({ "algorithm": "binary-search", "input": 23 })),
        )
        .await;
        assert_eq!(body["state"], "loaded");
        let count = body["stepCount"].as_u64().unwrap();

        let (_, body) = call(
            &app,
            "POST",
            "/api/playback/step",
            Some(json!({ "direction": "forward" })),
        )
        .await;
        assert_eq!(body["cursor"], 1);

        let (_, body) = call(&app, "POST", "/api/playback/seek", Some(json!({ "index": 999 }))).await;
        assert_eq!(body["cursor"], count - 1);

        let (_, view) = call(&app, "GET", "/api/playback/view", None).await;
        assert_eq!(view["finalAnswer"], "Final Answer: Found 23 at index 5!");
        assert_eq!(view["currentStep"]["foundIndex"], 5);

        let (_, body) = call(&app, "POST", "/api/playback/play", None).await;
        assert_eq!(body["cursor"], 0);
        assert_eq!(body["isPlaying"], true);

        let (_, body) = call(&app, "POST", "/api/playback/pause", None).await;
        assert_eq!(body["state"], "paused");

        let (_, body) = call(&app, "POST", "/api/playback/reset", None).await;
        assert_eq!(body["state"], "loaded");
    }

    #[tokio::test]
    async fn speed_tier_validation() {
        let app = app();
        let (status, body) = call(&app, "POST", "/api/playback/speed", Some(json!({ "tier": 3 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["speedTier"], 3);

        let (status, body) = call(&app, "POST", "/api/playback/speed", Some(json!({ "tier": 4 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("speed tier"));
    }

    #[tokio::test]
    async fn select_without_input_uses_category_default() {
        let app = app();
        let (status, _) = call(
            &app,
            "POST",
            "/api/playback/select",
            Some(json!({ "algorithm": "binary-search" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, view) = call(&app, "GET", "/api/playback/view", None).await;
        assert_eq!(
            view["currentStep"]["message"],
            "Searching for 23 in sorted array [2, 5, 8, 12, 16, 23, 38, 45, 67, 77]"
        );

        let (status, body) =
            call(&app, "POST", "/api/playback/select", Some(json!({ "algorithm": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Algorithm name is required");
    }
}
