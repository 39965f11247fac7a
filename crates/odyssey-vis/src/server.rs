//! Axum web server with WebSocket streaming for trace playback.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use odyssey_trace::{
    random_seed, AlgorithmDescriptor, Catalog, Category, Registry, Seed, SeedConfig,
    VisualizationType,
};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::config::VisConfig;
use crate::error::{Error, Result};
use crate::player::{Control, Frame, Player};
use crate::playback::{PlaybackSpeed, PlaybackStatus};

type ApiError = (StatusCode, String);

/// Shared application state.
pub struct AppState {
    registry: Registry,
    catalog: Catalog,
    player: Player,
    seeds: SeedConfig,
    rng: Mutex<StdRng>,
}

impl AppState {
    /// Build state and spawn the player. Must run inside a tokio runtime.
    pub fn new(config: &VisConfig) -> Result<Self> {
        let registry = Registry::standard();
        let catalog = config.load_catalog(&registry)?;
        Ok(Self {
            player: Player::spawn(&config.playback),
            rng: Mutex::new(config.seed.rng()),
            seeds: config.seed.clone(),
            registry,
            catalog,
        })
    }

    /// Handle to the shared player task.
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Generate a trace and hand it to the player.
    ///
    /// Ids known only to the catalog get the one-step unsupported trace; ids
    /// known to neither are rejected. Without a seed, a fresh input is drawn
    /// for the algorithm's category.
    pub async fn load(&self, algorithm: &str, seed: Option<Seed>) -> Result<TraceLoaded> {
        let category = match (self.registry.get(algorithm), self.catalog.get(algorithm)) {
            (Some(entry), _) => entry.category.as_str().to_string(),
            (None, Some(descriptor)) => descriptor.category.clone(),
            (None, None) => {
                return Err(odyssey_trace::Error::UnknownAlgorithm(algorithm.to_string()).into())
            }
        };

        let seed = match seed {
            Some(seed) => seed,
            None => {
                let family = category.parse().unwrap_or(Category::Arrays);
                let mut rng = self.rng.lock().await;
                random_seed(family, &self.seeds, &mut *rng)
            }
        };

        let trace = self.registry.generate_or_unsupported(algorithm, &seed)?;
        let visualization = VisualizationType::for_category(&category);
        let status = self.player.load(Arc::new(trace), visualization).await?;
        info!(algorithm, %visualization, steps = status.total_steps, "trace loaded");

        Ok(TraceLoaded {
            algorithm: algorithm.to_string(),
            category,
            visualization,
            seed,
            status,
        })
    }

    /// The frame under the cursor with its rendering tag.
    pub async fn snapshot(&self) -> Result<Option<Frame>> {
        self.player.frame().await
    }
}

/// Visualization server.
pub struct VisServer {
    state: Arc<AppState>,
}

impl VisServer {
    /// Create a server. Must run inside a tokio runtime.
    pub fn new(config: &VisConfig) -> Result<Self> {
        Ok(Self {
            state: Arc::new(AppState::new(config)?),
        })
    }

    /// Shared state behind every handler.
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(index_handler))
            // Catalog
            .route("/api/health", get(health_handler))
            .route("/api/algorithms", get(algorithms_handler))
            .route("/api/algorithms/{category}", get(category_handler))
            .route("/api/algorithms/{category}/{id}", get(algorithm_handler))
            // Traces
            .route("/api/trace", post(trace_handler))
            .route("/api/snapshot", get(snapshot_handler))
            // Playback
            .route("/api/playback", get(playback_status_handler))
            .route("/api/playback/play", post(play_handler))
            .route("/api/playback/pause", post(pause_handler))
            .route("/api/playback/reset", post(reset_handler))
            .route("/api/playback/seek", post(seek_handler))
            .route("/api/playback/speed", post(speed_handler))
            .route("/api/playback/step", post(step_handler))
            // WebSocket for real-time updates
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the server on the given port.
    pub async fn serve(self, port: u16) -> Result<()> {
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Visualization server running on http://localhost:{}", port);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

fn reject(err: Error) -> ApiError {
    use odyssey_trace::Error as TraceError;

    let status = match &err {
        Error::Trace(TraceError::UnknownAlgorithm(_) | TraceError::UnknownCategory(_)) => {
            StatusCode::NOT_FOUND
        }
        Error::Trace(_) => StatusCode::BAD_REQUEST,
        Error::PlayerClosed => StatusCode::SERVICE_UNAVAILABLE,
        Error::Config(_) | Error::Serialization(_) | Error::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    if status.is_server_error() {
        warn!(error = %err, "request failed");
    }
    (status, err.to_string())
}

async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    algorithms: usize,
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        algorithms: state.catalog.len(),
    })
}

async fn algorithms_handler(State(state): State<Arc<AppState>>) -> Json<Vec<AlgorithmDescriptor>> {
    Json(state.catalog.iter().cloned().collect())
}

async fn category_handler(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> std::result::Result<Json<Vec<AlgorithmDescriptor>>, ApiError> {
    let descriptors: Vec<AlgorithmDescriptor> =
        state.catalog.in_category(&category).cloned().collect();
    if descriptors.is_empty() {
        return Err((StatusCode::NOT_FOUND, format!("unknown category: {category}")));
    }
    Ok(Json(descriptors))
}

async fn algorithm_handler(
    State(state): State<Arc<AppState>>,
    Path((category, id)): Path<(String, String)>,
) -> std::result::Result<Json<AlgorithmDescriptor>, ApiError> {
    state
        .catalog
        .get(&id)
        .filter(|d| d.category == category)
        .cloned()
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("unknown algorithm: {category}/{id}")))
}

/// Body of `POST /api/trace`.
#[derive(Debug, Deserialize)]
pub struct TraceRequest {
    pub algorithm: String,
    #[serde(default)]
    pub seed: Option<Seed>,
}

/// A freshly loaded trace.
#[derive(Debug, Clone, Serialize)]
pub struct TraceLoaded {
    pub algorithm: String,
    pub category: String,
    pub visualization: VisualizationType,
    /// The input the trace was generated from
    pub seed: Seed,
    pub status: PlaybackStatus,
}

async fn trace_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TraceRequest>,
) -> std::result::Result<Json<TraceLoaded>, ApiError> {
    state
        .load(&req.algorithm, req.seed)
        .await
        .map(Json)
        .map_err(reject)
}

async fn snapshot_handler(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<Frame>, ApiError> {
    match state.snapshot().await.map_err(reject)? {
        Some(snapshot) => Ok(Json(snapshot)),
        None => Err((StatusCode::NOT_FOUND, "no trace loaded".to_string())),
    }
}

async fn playback_status_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    Json(state.player.status())
}

async fn control(
    state: &AppState,
    control: Control,
) -> std::result::Result<Json<PlaybackStatus>, ApiError> {
    state.player.control(control).await.map(Json).map_err(reject)
}

async fn play_handler(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<PlaybackStatus>, ApiError> {
    control(&state, Control::Play).await
}

async fn pause_handler(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<PlaybackStatus>, ApiError> {
    control(&state, Control::Pause).await
}

async fn reset_handler(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<PlaybackStatus>, ApiError> {
    control(&state, Control::Reset).await
}

#[derive(Debug, Deserialize)]
struct SeekRequest {
    step: usize,
}

async fn seek_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SeekRequest>,
) -> std::result::Result<Json<PlaybackStatus>, ApiError> {
    control(&state, Control::Seek(req.step)).await
}

#[derive(Debug, Deserialize)]
struct SpeedRequest {
    speed: PlaybackSpeed,
}

async fn speed_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeedRequest>,
) -> std::result::Result<Json<PlaybackStatus>, ApiError> {
    control(&state, Control::Speed(req.speed)).await
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Deserialize)]
struct StepRequest {
    direction: Direction,
}

async fn step_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StepRequest>,
) -> std::result::Result<Json<PlaybackStatus>, ApiError> {
    let step = match req.direction {
        Direction::Forward => Control::Next,
        Direction::Backward => Control::Prev,
    };
    control(&state, step).await
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn send(socket: &mut WebSocket, response: &WsResponse) -> bool {
    match serde_json::to_string(response) {
        Ok(json) => socket.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            warn!("Failed to serialize WebSocket response: {}", e);
            true
        }
    }
}

async fn current_snapshot(state: &AppState) -> WsResponse {
    match state.snapshot().await {
        Ok(Some(snapshot)) => WsResponse::Snapshot(snapshot),
        Ok(None) => WsResponse::Status(state.player.status()),
        Err(e) => WsResponse::Error {
            message: e.to_string(),
        },
    }
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket client connected");
    let mut updates = state.player.subscribe();
    updates.mark_unchanged();

    if !send(&mut socket, &current_snapshot(&state).await).await {
        return;
    }

    loop {
        tokio::select! {
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = match serde_json::from_str::<WsCommand>(&text) {
                            Ok(cmd) => handle_ws_command(&state, cmd).await,
                            Err(e) => WsResponse::Error { message: e.to_string() },
                        };
                        if !send(&mut socket, &response).await {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                if !send(&mut socket, &current_snapshot(&state).await).await {
                    break;
                }
            }
        }
    }

    info!("WebSocket client disconnected");
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsCommand {
    GetSnapshot,
    GetStatus,
    Load {
        algorithm: String,
        #[serde(default)]
        seed: Option<Seed>,
    },
    Play,
    Pause,
    Next,
    Prev,
    Seek { step: usize },
    Speed { speed: PlaybackSpeed },
    Reset,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsResponse {
    Snapshot(Frame),
    Status(PlaybackStatus),
    Loaded(TraceLoaded),
    Error { message: String },
}

async fn handle_ws_command(state: &AppState, cmd: WsCommand) -> WsResponse {
    debug!(?cmd, "WebSocket command");
    let control = match cmd {
        WsCommand::GetSnapshot => return current_snapshot(state).await,
        WsCommand::GetStatus => return WsResponse::Status(state.player.status()),
        WsCommand::Load { algorithm, seed } => {
            return match state.load(&algorithm, seed).await {
                Ok(loaded) => WsResponse::Loaded(loaded),
                Err(e) => WsResponse::Error {
                    message: e.to_string(),
                },
            };
        }
        WsCommand::Play => Control::Play,
        WsCommand::Pause => Control::Pause,
        WsCommand::Next => Control::Next,
        WsCommand::Prev => Control::Prev,
        WsCommand::Seek { step } => Control::Seek(step),
        WsCommand::Speed { speed } => Control::Speed(speed),
        WsCommand::Reset => Control::Reset,
    };
    match state.player.control(control).await {
        Ok(status) => WsResponse::Status(status),
        Err(e) => WsResponse::Error {
            message: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::PlaybackState;
    use odyssey_trace::{Highlight, UNSUPPORTED_MESSAGE};

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(&VisConfig::default()).unwrap())
    }

    #[tokio::test]
    async fn router_builds() {
        let server = VisServer::new(&VisConfig::default()).unwrap();
        let _router = server.router();
    }

    #[tokio::test]
    async fn health_counts_algorithms() {
        let Json(health) = health_handler(State(state())).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.algorithms, 64);
    }

    #[tokio::test]
    async fn categories_filter_the_catalog() {
        let state = state();
        let Json(sorting) = category_handler(State(state.clone()), Path("sorting".to_string()))
            .await
            .unwrap();
        assert_eq!(sorting.len(), 6);

        let missing = category_handler(State(state.clone()), Path("alchemy".to_string())).await;
        assert_eq!(missing.unwrap_err().0, StatusCode::NOT_FOUND);

        let Json(bfs) = algorithm_handler(
            State(state.clone()),
            Path(("graphs".to_string(), "graph-bfs".to_string())),
        )
        .await
        .unwrap();
        assert_eq!(bfs.id, "graph-bfs");

        let wrong_family = algorithm_handler(
            State(state),
            Path(("sorting".to_string(), "graph-bfs".to_string())),
        )
        .await;
        assert_eq!(wrong_family.unwrap_err().0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn trace_with_seed_loads_paused() {
        let state = state();
        let request = TraceRequest {
            algorithm: "bubble".to_string(),
            seed: Some(Seed::from(vec![5, 3, 8, 1])),
        };
        let Json(loaded) = trace_handler(State(state.clone()), Json(request)).await.unwrap();
        assert_eq!(loaded.visualization, VisualizationType::Array);
        assert_eq!(loaded.status.state, PlaybackState::Paused);
        assert_eq!(loaded.status.current_step, 0);

        let Json(snapshot) = snapshot_handler(State(state)).await.unwrap();
        assert_eq!(snapshot.index, 0);
        assert_eq!(snapshot.snapshot.highlighted(Highlight::Comparing), &[0, 1]);
    }

    #[tokio::test]
    async fn trace_without_seed_draws_one() {
        let state = state();
        let request = TraceRequest {
            algorithm: "graph-bfs".to_string(),
            seed: None,
        };
        let Json(loaded) = trace_handler(State(state), Json(request)).await.unwrap();
        assert!(matches!(loaded.seed, Seed::Graph(_)));
        assert_eq!(loaded.visualization, VisualizationType::Graph);
        assert!(loaded.status.total_steps > 1);
    }

    #[tokio::test]
    async fn trace_errors_map_to_status_codes() {
        let state = state();
        let unknown = TraceRequest {
            algorithm: "quantum-sort".to_string(),
            seed: None,
        };
        let err = trace_handler(State(state.clone()), Json(unknown)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);

        let oversized = TraceRequest {
            algorithm: "bubble".to_string(),
            seed: Some(Seed::from(vec![1; 500])),
        };
        let err = trace_handler(State(state), Json(oversized)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn catalog_only_ids_get_unsupported_trace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"[{"id": "red-black-tree", "name": "Red-Black Tree", "category": "trees"}]"#,
        )
        .unwrap();
        let config = VisConfig {
            catalog: Some(path),
            ..VisConfig::default()
        };
        let state = Arc::new(AppState::new(&config).unwrap());

        let loaded = state
            .load("red-black-tree", Some(Seed::from(vec![1, 2, 3])))
            .await
            .unwrap();
        assert_eq!(loaded.visualization, VisualizationType::Tree);
        assert_eq!(loaded.status.total_steps, 1);

        let snapshot = state.snapshot().await.unwrap().unwrap();
        assert_eq!(snapshot.snapshot.message, UNSUPPORTED_MESSAGE);
    }

    #[tokio::test]
    async fn overlapping_loads_keep_tag_and_trace_together() {
        let state = state();
        let (graph, bubble) = tokio::join!(
            state.load("graph-bfs", None),
            state.load("bubble", Some(Seed::from(vec![3, 1, 2]))),
        );
        graph.unwrap();
        bubble.unwrap();

        let snapshot = state.snapshot().await.unwrap().unwrap();
        let expected = match snapshot.algorithm.as_str() {
            "graph-bfs" => VisualizationType::Graph,
            _ => VisualizationType::Array,
        };
        assert_eq!(snapshot.visualization, expected);

        state.load("graph-dfs", None).await.unwrap();
        let snapshot = state.snapshot().await.unwrap().unwrap();
        assert_eq!(snapshot.algorithm, "graph-dfs");
        assert_eq!(snapshot.visualization, VisualizationType::Graph);
    }

    #[tokio::test]
    async fn snapshot_before_load_is_not_found() {
        let err = snapshot_handler(State(state())).await.unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn playback_controls_move_the_cursor() {
        let state = state();
        state
            .load("insertion", Some(Seed::from(vec![4, 2, 3, 1])))
            .await
            .unwrap();

        let Json(status) = step_handler(
            State(state.clone()),
            Json(StepRequest {
                direction: Direction::Forward,
            }),
        )
        .await
        .unwrap();
        assert_eq!(status.current_step, 1);

        let Json(status) = seek_handler(State(state.clone()), Json(SeekRequest { step: 1000 }))
            .await
            .unwrap();
        assert_eq!(status.current_step, status.total_steps - 1);

        let Json(status) = play_handler(State(state.clone())).await.unwrap();
        assert_eq!(status.state, PlaybackState::Paused);

        let Json(status) = reset_handler(State(state.clone())).await.unwrap();
        assert_eq!(status.current_step, 0);

        let Json(status) = speed_handler(
            State(state.clone()),
            Json(SpeedRequest {
                speed: PlaybackSpeed::DOUBLE,
            }),
        )
        .await
        .unwrap();
        assert_eq!(status.speed, PlaybackSpeed::DOUBLE);

        let Json(status) = pause_handler(State(state)).await.unwrap();
        assert_eq!(status.state, PlaybackState::Paused);
    }

    #[tokio::test]
    async fn ws_commands_parse_and_apply() {
        let state = state();
        let cmd: WsCommand =
            serde_json::from_str(r#"{"type": "load", "algorithm": "linear-search", "seed": {"array": [10], "target": 10}}"#)
                .unwrap();
        assert!(matches!(handle_ws_command(&state, cmd).await, WsResponse::Loaded(_)));

        let cmd: WsCommand = serde_json::from_str(r#"{"type": "seek", "step": 1}"#).unwrap();
        let WsResponse::Status(status) = handle_ws_command(&state, cmd).await else {
            panic!("expected status");
        };
        assert_eq!(status.current_step, 1);

        let WsResponse::Snapshot(snapshot) = handle_ws_command(&state, WsCommand::GetSnapshot).await
        else {
            panic!("expected snapshot");
        };
        assert_eq!(snapshot.snapshot.highlighted(Highlight::Found), &[0]);

        let json = serde_json::to_value(WsResponse::Snapshot(snapshot)).unwrap();
        assert_eq!(json["type"], "snapshot");
        assert_eq!(json["visualization"], "array");
        assert_eq!(json["index"], 1);

        assert!(serde_json::from_str::<WsCommand>(r#"{"type": "speed", "speed": -2}"#).is_err());
    }
}
