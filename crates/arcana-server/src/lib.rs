//! HTTP reading server.
//!
//! Generates tarot readings and verifies recorded ones as JSON. All requests
//! share one [`ReadingAssembler`], so sensor collections from concurrent
//! cosmic readings are serialized by the assembler's sensor lock.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use arcana_core::{
    DeckType, EngineConfig, EntropyError, EntropyStats, Language, RandomMode, Reading,
    ReadingAssembler, ReadingConfiguration, SpreadType, VerificationReport, verify_reading,
};

/// Shared server state.
pub struct AppState {
    assembler: ReadingAssembler,
}

impl AppState {
    pub fn new(assembler: ReadingAssembler) -> Self {
        Self { assembler }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(ReadingAssembler::from_config(config))
    }
}

#[derive(Deserialize, Default)]
struct ReadingParams {
    spread: Option<String>,
    deck: Option<String>,
    mode: Option<String>,
    reversed: Option<String>,
    lang: Option<String>,
}

impl ReadingParams {
    /// Missing parameters keep their defaults; unknown values are rejected.
    fn configuration(&self) -> Result<ReadingConfiguration, EntropyError> {
        let mut config = ReadingConfiguration::default();
        if let Some(s) = &self.spread {
            config.spread = SpreadType::from_str(s)?;
        }
        if let Some(d) = &self.deck {
            config.deck = DeckType::from_str(d)?;
        }
        if let Some(m) = &self.mode {
            config.mode = RandomMode::from_str(m)?;
        }
        if let Some(l) = &self.lang {
            config.language = Language::from_str(l)?;
        }
        if let Some(r) = &self.reversed {
            config.allow_reversed = match r.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                other => {
                    return Err(EntropyError::InvalidParameter(format!(
                        "reversed must be true or false, got {other:?}"
                    )));
                }
            };
        }
        Ok(config)
    }
}

#[derive(Deserialize, Default)]
struct SpreadsParams {
    lang: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    entropy: EntropyStats,
}

#[derive(Serialize)]
struct SpreadEntry {
    name: String,
    card_count: usize,
    description: String,
    positions: Vec<String>,
}

#[derive(Serialize)]
struct SpreadsResponse {
    spreads: Vec<SpreadEntry>,
    total: usize,
}

/// Engine error carried to the client as `{ success: false, error }`.
struct ApiError(EntropyError);

impl From<EntropyError> for ApiError {
    fn from(err: EntropyError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            EntropyError::InvalidParameter(_) | EntropyError::AssemblyInconsistency(_) => {
                StatusCode::BAD_REQUEST
            }
            EntropyError::RemoteUnavailable(_) | EntropyError::SensorUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        };
        warn!("request failed ({status}): {}", self.0);
        (
            status,
            Json(ErrorResponse {
                success: false,
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

async fn handle_reading(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReadingParams>,
) -> Result<Json<Reading>, ApiError> {
    let config = params.configuration()?;
    let reading = state.assembler.assemble(&config).await?;
    info!(
        "served reading {} ({} entropy, {})",
        reading.id, reading.entropy.mode, config.spread
    );
    Ok(Json(reading))
}

async fn handle_verify(Json(reading): Json<Reading>) -> Result<Json<VerificationReport>, ApiError> {
    Ok(Json(verify_reading(&reading)?))
}

async fn handle_spreads(
    Query(params): Query<SpreadsParams>,
) -> Result<Json<SpreadsResponse>, ApiError> {
    let language = match &params.lang {
        Some(l) => Language::from_str(l)?,
        None => Language::default(),
    };
    let spreads: Vec<SpreadEntry> = SpreadType::ALL
        .iter()
        .map(|&spread| {
            let descriptor = spread.descriptor(language);
            SpreadEntry {
                name: spread.to_string(),
                card_count: descriptor.card_count,
                description: spread.description().to_string(),
                positions: descriptor.positions.iter().map(|p| p.to_string()).collect(),
            }
        })
        .collect();
    let total = spreads.len();
    Ok(Json(SpreadsResponse { spreads, total }))
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: arcana_core::VERSION.to_string(),
        entropy: state.assembler.orchestrator().stats(),
    })
}

async fn handle_index(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let qrng = state.assembler.orchestrator().quantum_source().base_url();
    Json(serde_json::json!({
        "name": "Arcana Server",
        "version": arcana_core::VERSION,
        "qrng": qrng,
        "endpoints": {
            "/": "This API index",
            "/api/v1/reading": {
                "method": "GET",
                "description": "Draw a reading",
                "params": {
                    "spread": "single, past-present-future, horseshoe, celtic-cross (default: past-present-future)",
                    "deck": "full, major (default: full)",
                    "mode": "quantum, cosmic (default: quantum)",
                    "reversed": "Allow reversed cards: true, false (default: true)",
                    "lang": "fr, en (default: fr)",
                }
            },
            "/api/v1/verify": {
                "method": "POST",
                "description": "Re-derive a recorded reading from its entropy; body is the reading JSON",
            },
            "/spreads": "Built-in spreads with their position labels (?lang=fr|en)",
            "/health": "Health check with entropy counters",
        },
        "examples": {
            "celtic_cross": "/api/v1/reading?spread=celtic-cross&lang=en",
            "cosmic_major": "/api/v1/reading?mode=cosmic&deck=major",
        }
    }))
}

/// Build the axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/api/v1/reading", get(handle_reading))
        .route("/api/v1/verify", post(handle_verify))
        .route("/spreads", get(handle_spreads))
        .route("/health", get(handle_health))
        .with_state(state)
}

/// Run the HTTP reading server until the listener fails.
pub async fn run_server(config: &EngineConfig, host: &str, port: u16) -> std::io::Result<()> {
    let app = build_router(Arc::new(AppState::from_config(config)));
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("arcana server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await
}
