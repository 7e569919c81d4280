//! HTTP API for hosting challenges server-side
//!
//! Endpoints:
//! - GET /health - Health check
//! - POST /challenge/new - Create challenge
//! - GET /challenge/{id} - Get challenge status
//! - DELETE /challenge/{id} - Drop challenge
//! - POST /challenge/{id}/capture - Deliver frame, get puzzle
//! - POST /challenge/{id}/click - Toggle a cell
//! - POST /challenge/{id}/validate - Submit selection
//! - POST /challenge/{id}/retry - Soft reset
//! - POST /challenge/{id}/reset - Full reset
//!
//! Every timestamp comes from the server clock. Each session is mutated only
//! under the write lock. Sessions idle past the configured TTL are evicted when
//! a new challenge is created, and the map never grows past `max_sessions`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::{ServerConfig, SnapgridConfig};
use crate::core::recorder::{Clock, MonotonicClock};
use crate::core::session::ChallengeSession;
use crate::types::{
    AttemptState, CapturedFrame, CellIndex, ChallengeState, ClickAction, Region, Target, ToleranceTier,
    ValidationResult, Watermark,
};
use crate::SnapgridError;

/// A hosted session and when it was last used (server clock, ms)
#[derive(Debug)]
pub struct SessionEntry {
    pub session: ChallengeSession<StdRng>,
    pub last_seen_ms: f64,
}

/// App state
pub struct AppState {
    pub sessions: RwLock<HashMap<String, SessionEntry>>,
    pub config: SnapgridConfig,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(config: SnapgridConfig) -> Self {
        Self::with_clock(config, Arc::new(MonotonicClock::new()))
    }

    pub fn with_clock(config: SnapgridConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
            clock,
        }
    }
}

/// Create challenge request
#[derive(Debug, Default, Deserialize)]
pub struct NewChallengeRequest {
    /// Fixed seed for reproducible puzzles
    pub seed: Option<u64>,
}

/// Create challenge response
#[derive(Debug, Serialize)]
pub struct NewChallengeResponse {
    pub challenge_id: String,
    pub state: ChallengeState,
}

/// Challenge status response
#[derive(Debug, Serialize)]
pub struct ChallengeStatusResponse {
    pub challenge_id: String,
    pub state: ChallengeState,
    pub attempts: AttemptState,
    pub selected: Vec<CellIndex>,
    pub rule: String,
}

/// Capture request
#[derive(Debug, Deserialize)]
pub struct CaptureRequest {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub image: Vec<u8>,
    pub region: Option<Region>,
}

/// Puzzle response
#[derive(Debug, Serialize)]
pub struct PuzzleResponse {
    pub challenge_id: String,
    pub rows: usize,
    pub cols: usize,
    pub watermarks: Vec<Watermark>,
    pub target: Target,
    pub tier: ToleranceTier,
    pub rule: String,
}

/// Click request
#[derive(Debug, Deserialize)]
pub struct ClickRequest {
    pub cell: CellIndex,
}

/// Click response
#[derive(Debug, Serialize)]
pub struct ClickResponse {
    pub cell: CellIndex,
    pub action: ClickAction,
    pub selected: Vec<CellIndex>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub challenges_active: usize,
}

/// Create the API router with a monotonic server clock
pub fn create_router(config: SnapgridConfig) -> Router {
    create_router_with_state(Arc::new(AppState::new(config)))
}

/// Create the API router over existing state
pub fn create_router_with_state(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/challenge/new", post(create_challenge))
        .route("/challenge/:id", get(get_challenge).delete(delete_challenge))
        .route("/challenge/:id/capture", post(capture))
        .route("/challenge/:id/click", post(click))
        .route("/challenge/:id/validate", post(validate))
        .route("/challenge/:id/retry", post(retry))
        .route("/challenge/:id/reset", post(reset))
        .with_state(state)
}

/// Map engine errors to HTTP status codes
fn status_for(err: &SnapgridError) -> StatusCode {
    match err {
        SnapgridError::IllegalTransition { .. } => StatusCode::CONFLICT,
        SnapgridError::CellOutOfRange { .. } | SnapgridError::GridTooSmall { .. } => StatusCode::BAD_REQUEST,
        SnapgridError::Config(_) | SnapgridError::Io(_) | SnapgridError::Json(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn reject(id: &str, err: SnapgridError) -> StatusCode {
    warn!(challenge = id, error = %err, "request rejected");
    status_for(&err)
}

/// Look up a session and mark it used at `now_ms`
fn touch<'a>(
    sessions: &'a mut HashMap<String, SessionEntry>,
    id: &str,
    now_ms: f64,
) -> Result<&'a mut ChallengeSession<StdRng>, StatusCode> {
    let entry = sessions.get_mut(id).ok_or(StatusCode::NOT_FOUND)?;
    entry.last_seen_ms = now_ms;
    Ok(&mut entry.session)
}

/// Drop idle sessions, then the least recently used until one more fits
fn evict(sessions: &mut HashMap<String, SessionEntry>, now_ms: f64, config: &ServerConfig) {
    let before = sessions.len();
    let ttl_ms = config.session_ttl_secs * 1000.0;
    sessions.retain(|_, entry| now_ms - entry.last_seen_ms <= ttl_ms);

    while sessions.len() >= config.max_sessions {
        let oldest = sessions
            .iter()
            .min_by(|a, b| a.1.last_seen_ms.total_cmp(&b.1.last_seen_ms))
            .map(|(id, _)| id.clone());
        match oldest {
            Some(id) => {
                sessions.remove(&id);
            }
            None => break,
        }
    }

    let evicted = before - sessions.len();
    if evicted > 0 {
        info!(evicted, remaining = sessions.len(), "evicted challenges");
    }
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let sessions = state.sessions.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        challenges_active: sessions.len(),
    })
}

/// Create new challenge
async fn create_challenge(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewChallengeRequest>,
) -> Json<NewChallengeResponse> {
    let challenge_id = format!("challenge_{:016x}", rand::random::<u64>());
    let rng = match req.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let session = ChallengeSession::new(state.config.clone(), rng);
    let session_state = session.state();
    let now = state.clock.now_ms();

    let mut sessions = state.sessions.write().await;
    evict(&mut sessions, now, &state.config.server);
    sessions.insert(
        challenge_id.clone(),
        SessionEntry {
            session,
            last_seen_ms: now,
        },
    );
    info!(challenge = %challenge_id, "challenge created");

    Json(NewChallengeResponse {
        challenge_id,
        state: session_state,
    })
}

fn status_response(id: String, session: &ChallengeSession<StdRng>) -> ChallengeStatusResponse {
    ChallengeStatusResponse {
        challenge_id: id,
        state: session.state(),
        attempts: session.attempts(),
        selected: session
            .selection()
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default(),
        rule: session.current_tier().describe(),
    }
}

/// Get challenge status
async fn get_challenge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ChallengeStatusResponse>, StatusCode> {
    let sessions = state.sessions.read().await;
    let entry = sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(status_response(id, &entry.session)))
}

/// Drop a challenge
async fn delete_challenge(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> StatusCode {
    let mut sessions = state.sessions.write().await;
    match sessions.remove(&id) {
        Some(_) => {
            info!(challenge = %id, "challenge deleted");
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

/// Deliver a captured frame and return the generated puzzle
async fn capture(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CaptureRequest>,
) -> Result<Json<PuzzleResponse>, StatusCode> {
    let now = state.clock.now_ms();
    let mut sessions = state.sessions.write().await;
    let session = touch(&mut sessions, &id, now)?;

    let frame = CapturedFrame::new(req.width, req.height, req.image, req.region);
    let tier = session.current_tier();
    let puzzle = session.capture(frame, now).map_err(|e| reject(&id, e))?;

    Ok(Json(PuzzleResponse {
        rows: puzzle.rows,
        cols: puzzle.cols,
        watermarks: puzzle.watermarks.clone(),
        target: puzzle.target,
        tier,
        rule: tier.describe(),
        challenge_id: id,
    }))
}

/// Toggle one cell
async fn click(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ClickRequest>,
) -> Result<Json<ClickResponse>, StatusCode> {
    let now = state.clock.now_ms();
    let mut sessions = state.sessions.write().await;
    let session = touch(&mut sessions, &id, now)?;

    let action = session.toggle_cell(req.cell, now).map_err(|e| reject(&id, e))?;

    Ok(Json(ClickResponse {
        cell: req.cell,
        action,
        selected: session
            .selection()
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default(),
    }))
}

/// Validate the current selection
async fn validate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ValidationResult>, StatusCode> {
    let now = state.clock.now_ms();
    let mut sessions = state.sessions.write().await;
    let session = touch(&mut sessions, &id, now)?;

    let result = session.validate(now).map_err(|e| reject(&id, e))?;
    Ok(Json(result.clone()))
}

/// Soft reset for another attempt
async fn retry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ChallengeStatusResponse>, StatusCode> {
    let now = state.clock.now_ms();
    let mut sessions = state.sessions.write().await;
    let session = touch(&mut sessions, &id, now)?;

    session.retry().map_err(|e| reject(&id, e))?;
    Ok(Json(status_response(id, session)))
}

/// Full reset, clears any block
async fn reset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ChallengeStatusResponse>, StatusCode> {
    let now = state.clock.now_ms();
    let mut sessions = state.sessions.write().await;
    let session = touch(&mut sessions, &id, now)?;

    session.new_challenge();
    Ok(Json(status_response(id, session)))
}

/// Run the API server
pub async fn run_server(addr: &str, config: SnapgridConfig) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(config);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("snapgrid API listening on {}", addr);
    axum::serve(listener, router).await?;
    Ok(())
}
