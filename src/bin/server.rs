use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

use heightmap::config::{self, BRUSH_SIZES, Settings, TOOLS};
use heightmap::elevation::{ElevationStats, summarize};
use heightmap::{BrushSize, BrushTool, ElevationEngine, GenerationParams};

type SharedEngine = Arc<Mutex<ElevationEngine>>;

#[derive(Error, Debug)]
enum ApiError {
    #[error(transparent)]
    Engine(#[from] heightmap::Error),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("no stroke in progress; POST /api/stroke first")]
    NoStroke,

    #[error("engine lock poisoned")]
    Poisoned,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Engine(
                heightmap::Error::UnknownTool(_)
                | heightmap::Error::UnknownBrushSize(_)
                | heightmap::Error::GridLengthMismatch { .. },
            )
            | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NoStroke => StatusCode::CONFLICT,
            _ => {
                tracing::error!("{}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

fn lock(engine: &SharedEngine) -> Result<MutexGuard<'_, ElevationEngine>, ApiError> {
    engine.lock().map_err(|_| ApiError::Poisoned)
}

/// A preset name or explicit values.
#[derive(Deserialize)]
#[serde(untagged)]
enum ToolChoice {
    Named(String),
    Custom(BrushTool),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SizeChoice {
    Named(String),
    Custom(BrushSize),
}

#[derive(Deserialize)]
struct PaintRequest {
    tool: ToolChoice,
    size: SizeChoice,
    x: f32,
    y: f32,
    dt_ms: f32,
}

#[derive(Serialize)]
struct StatusResponse {
    regenerated: bool,
    dirty: bool,
}

#[derive(Serialize)]
struct ElevationResponse {
    size: usize,
    dirty: bool,
    seed: u64,
    islandness: f64,
    stats: ElevationStats,
    /// Little-endian f32 values, row-major, base64 encoded.
    data: String,
}

#[derive(Deserialize)]
struct ReplaceRequest {
    data: String,
}

#[derive(Serialize)]
struct PresetsResponse {
    sizes: Vec<(&'static str, BrushSize)>,
    tools: Vec<(&'static str, BrushTool)>,
}

fn encode_grid(values: &[f32]) -> String {
    let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    base64::engine::general_purpose::STANDARD.encode(&bytes)
}

async fn params_handler(
    State(engine): State<SharedEngine>,
    Json(params): Json<GenerationParams>,
) -> Result<Json<StatusResponse>, ApiError> {
    let mut engine = lock(&engine)?;
    let regenerated = engine.set_params(params);
    Ok(Json(StatusResponse {
        regenerated,
        dirty: engine.has_unsaved_paint(),
    }))
}

async fn reset_handler(
    State(engine): State<SharedEngine>,
) -> Result<Json<StatusResponse>, ApiError> {
    let mut engine = lock(&engine)?;
    engine.generate();
    Ok(Json(StatusResponse {
        regenerated: true,
        dirty: engine.has_unsaved_paint(),
    }))
}

async fn stroke_handler(State(engine): State<SharedEngine>) -> Result<StatusCode, ApiError> {
    lock(&engine)?.begin_stroke();
    Ok(StatusCode::NO_CONTENT)
}

async fn paint_handler(
    State(engine): State<SharedEngine>,
    Json(req): Json<PaintRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let tool = match req.tool {
        ToolChoice::Named(name) => config::tool(&name)?,
        ToolChoice::Custom(tool) => tool,
    };
    let size = match req.size {
        SizeChoice::Named(name) => config::brush_size(&name)?,
        SizeChoice::Custom(size) => size,
    };
    let mut engine = lock(&engine)?;
    if !engine.stroke_in_progress() {
        return Err(ApiError::NoStroke);
    }
    engine.paint_at(&tool, req.x, req.y, &size, req.dt_ms);
    Ok(Json(StatusResponse {
        regenerated: false,
        dirty: engine.has_unsaved_paint(),
    }))
}

fn decode_grid(data: &str) -> Result<Vec<f32>, ApiError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(data)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    if bytes.len() % 4 != 0 {
        return Err(ApiError::BadRequest(format!(
            "{} bytes is not a whole number of f32 values",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

async fn replace_handler(
    State(engine): State<SharedEngine>,
    Json(req): Json<ReplaceRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let values = decode_grid(&req.data)?;
    let mut engine = lock(&engine)?;
    engine.replace_elevation(&values)?;
    Ok(Json(StatusResponse {
        regenerated: false,
        dirty: engine.has_unsaved_paint(),
    }))
}

async fn elevation_handler(
    State(engine): State<SharedEngine>,
) -> Result<Json<ElevationResponse>, ApiError> {
    let engine = lock(&engine)?;
    let params = engine.params();
    Ok(Json(ElevationResponse {
        size: engine.size(),
        dirty: engine.has_unsaved_paint(),
        seed: params.seed,
        islandness: params.islandness,
        stats: summarize(engine.elevation_grid()),
        data: encode_grid(engine.elevation()),
    }))
}

async fn presets_handler() -> Json<PresetsResponse> {
    Json(PresetsResponse {
        sizes: BRUSH_SIZES.to_vec(),
        tools: TOOLS.to_vec(),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = match std::env::var("HEIGHTMAP_CONFIG") {
        Ok(path) => Settings::from_json_file(path)?,
        Err(_) => Settings::default(),
    };
    let engine: SharedEngine = Arc::new(Mutex::new(ElevationEngine::with_params(
        settings.size,
        settings.params(),
    )?));

    let frontend = ServeDir::new("frontend");

    let app = Router::new()
        .route("/api/params", post(params_handler))
        .route("/api/reset", post(reset_handler))
        .route("/api/stroke", post(stroke_handler))
        .route("/api/paint", post(paint_handler))
        .route("/api/elevation", get(elevation_handler).put(replace_handler))
        .route("/api/presets", get(presets_handler))
        .with_state(engine)
        .fallback_service(frontend);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    tracing::info!("heightmap server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
