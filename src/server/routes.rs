//! Axum route handlers for the CloudPoof Omega HTTP server.
//!
//! # Routes
//!
//! - `GET  /health`                 — Liveness probe with default session info
//! - `GET  /api/v1/consciousness`   — Session status (`?session_id=` optional)
//! - `POST /api/v1/manifest`        — Manifest an intent
//! - `POST /api/v1/insight`         — Issue one unique insight
//! - `GET  /api/v1/predict/{steps}` — Foresight predictions
//! - `POST /api/v1/mode/{mode}`     — Switch consciousness level
//! - `POST /api/v1/sessions`        — Open a new session
//! - `DELETE /api/v1/sessions/{id}` — Close a session
//! - `WS   /api/v1/consciousness/stream` — Snapshot plus a unique thought every second

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use dashmap::DashMap;
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::consciousness::ConsciousnessLevel;
use crate::emotional::EmotionalState;
use crate::entropy::{fingerprint_hex, UniquenessGuard};
use crate::foresight::MAX_DEPTH;
use crate::session::{Insight, ManifestResponse, OmegaSession, SessionStatus};
use crate::utilities::config::OmegaConfig;
use crate::utilities::errors::OmegaError;

type ApiError = (StatusCode, Json<Value>);

/// Period of the consciousness stream.
pub const STREAM_INTERVAL: Duration = Duration::from_secs(1);

/// Fixed accuracy reported alongside predictions.
pub const ACCURACY_ESTIMATE: f64 = 0.973;

/// Shared application state for the HTTP server.
///
/// Every session draws insights from the same guard, so uniqueness holds
/// across the whole process, not just per session.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<OmegaConfig>,
    pub guard: Arc<UniquenessGuard>,
    pub sessions: Arc<DashMap<String, OmegaSession>>,
    /// Session used when a request names none.
    pub default_session: String,
}

impl AppState {
    pub fn new(config: OmegaConfig) -> Self {
        let guard = Arc::new(UniquenessGuard::with_max_attempts(
            config.max_generation_attempts,
        ));
        let session = OmegaSession::with_guard(&config, Arc::clone(&guard));
        let default_session = session.session_id().to_string();
        let sessions = DashMap::new();
        sessions.insert(default_session.clone(), session);
        Self {
            config: Arc::new(config),
            guard,
            sessions: Arc::new(sessions),
            default_session,
        }
    }

    /// Open a new session sharing this state's guard, up to
    /// `config.max_sessions` open sessions.
    pub fn create_session(&self) -> Result<SessionStatus, OmegaError> {
        let limit = self.config.max_sessions;
        if self.sessions.len() >= limit {
            tracing::warn!(limit, "session limit reached");
            return Err(OmegaError::SessionLimitReached { limit });
        }
        let session = OmegaSession::with_guard(&self.config, Arc::clone(&self.guard));
        let status = session.status();
        self.sessions.insert(status.session_id.clone(), session);
        Ok(status)
    }

    /// Drop a session. The default session cannot be closed.
    pub fn close_session(&self, session_id: &str) -> Result<bool, OmegaError> {
        if session_id == self.default_session {
            return Ok(false);
        }
        self.sessions
            .remove(session_id)
            .map(|_| {
                tracing::info!(%session_id, "session closed");
                true
            })
            .ok_or_else(|| OmegaError::SessionNotFound(session_id.to_string()))
    }

    /// One frame of the consciousness stream for `session_id`.
    pub fn stream_frame(&self, session_id: &str) -> Result<Value, OmegaError> {
        self.with_session(Some(session_id), |s| {
            let thought = s.insight("stream");
            json!({
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "session_id": s.session_id(),
                "consciousness": s.level(),
                "emotional_state": {
                    "stress": s.emotional_state().stress,
                    "engagement": s.emotional_state().engagement,
                },
                "timeline": s.timeline(),
                "unique_thought": thought.text,
                "fallback": thought.fallback,
            })
        })
    }

    /// Run `f` against the named session, or the default one.
    fn with_session<T>(
        &self,
        session_id: Option<&str>,
        f: impl FnOnce(&mut OmegaSession) -> T,
    ) -> Result<T, OmegaError> {
        let id = session_id.unwrap_or(&self.default_session);
        let mut session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| OmegaError::SessionNotFound(id.to_string()))?;
        Ok(f(session.value_mut()))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(OmegaConfig::default())
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/consciousness", get(consciousness_handler))
        .route("/api/v1/manifest", post(manifest_handler))
        .route("/api/v1/insight", post(insight_handler))
        .route("/api/v1/predict/{steps}", get(predict_handler))
        .route("/api/v1/mode/{mode}", post(mode_handler))
        .route("/api/v1/sessions", post(create_session_handler))
        .route("/api/v1/sessions/{id}", delete(close_session_handler))
        .route("/api/v1/consciousness/stream", get(stream_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn error_response(err: OmegaError) -> ApiError {
    let status = match err {
        OmegaError::UnknownConsciousnessLevel(_) | OmegaError::Config { .. } => {
            StatusCode::BAD_REQUEST
        }
        OmegaError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        OmegaError::SessionLimitReached { .. } => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() })))
}

fn bad_request(message: String) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct SessionQuery {
    pub session_id: Option<String>,
}

/// Caller-supplied emotional values. Omitted fields reset to their defaults.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct EmotionalContextInput {
    pub stress: Option<f64>,
    pub frustration: Option<f64>,
    pub curiosity: Option<f64>,
}

impl EmotionalContextInput {
    /// Apply onto `current`, rejecting values outside `[0, 1]`.
    fn apply(&self, current: &EmotionalState) -> Result<EmotionalState, ApiError> {
        let defaults = EmotionalState::default();
        let fields = [
            ("stress", self.stress.unwrap_or(defaults.stress)),
            ("frustration", self.frustration.unwrap_or(defaults.frustration)),
            ("curiosity", self.curiosity.unwrap_or(defaults.curiosity)),
        ];
        for (name, value) in fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(bad_request(format!(
                    "emotional_context.{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(EmotionalState {
            stress: fields[0].1,
            frustration: fields[1].1,
            curiosity: fields[2].1,
            ..*current
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ManifestRequest {
    pub intent: String,
    pub session_id: Option<String>,
    pub emotional_context: Option<EmotionalContextInput>,
    pub consciousness_level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InsightRequest {
    #[serde(default)]
    pub context: String,
    pub session_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /health — liveness probe.
async fn health_handler(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let status = state
        .with_session(None, |s| s.status())
        .map_err(error_response)?;
    Ok(Json(json!({
        "status": "omniscient",
        "service": "cloudpoof-omega",
        "version": crate::VERSION,
        "consciousness": status.level,
        "timeline": status.timeline,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}

/// GET /api/v1/consciousness — session status.
async fn consciousness_handler(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<SessionStatus>, ApiError> {
    state
        .with_session(query.session_id.as_deref(), |s| s.status())
        .map(Json)
        .map_err(error_response)
}

/// POST /api/v1/manifest — manifest an intent.
///
/// Request: `{ "intent": "...", "session_id"?, "emotional_context"?, "consciousness_level"? }`
///
/// When `emotional_context` is given it replaces stress, frustration and
/// curiosity and the intent text is not analysed.
async fn manifest_handler(
    State(state): State<AppState>,
    Json(request): Json<ManifestRequest>,
) -> Result<Json<ManifestResponse>, ApiError> {
    let level = request
        .consciousness_level
        .as_deref()
        .map(str::parse::<ConsciousnessLevel>)
        .transpose()
        .map_err(error_response)?;

    let outcome = state
        .with_session(request.session_id.as_deref(), |session| {
            let emotional_override = request
                .emotional_context
                .map(|input| input.apply(session.emotional_state()))
                .transpose()?;
            if let Some(level) = level {
                session.set_level(level);
            }
            Ok(session.manifest(&request.intent, emotional_override))
        })
        .map_err(error_response)?;

    outcome.map(Json)
}

/// POST /api/v1/insight — one unique insight plus its fingerprint.
///
/// A fallback insight carries `"fallback": true` and a null fingerprint,
/// since the guard never recorded it.
async fn insight_handler(
    State(state): State<AppState>,
    Json(request): Json<InsightRequest>,
) -> Result<Json<Value>, ApiError> {
    let (session_id, insight) = state
        .with_session(request.session_id.as_deref(), |s| {
            (s.session_id().to_string(), s.insight(&request.context))
        })
        .map_err(error_response)?;
    Ok(Json(insight_body(&session_id, &insight)))
}

fn insight_body(session_id: &str, insight: &Insight) -> Value {
    let fingerprint = (!insight.fallback).then(|| fingerprint_hex(&insight.text));
    json!({
        "session_id": session_id,
        "fingerprint": fingerprint,
        "fallback": insight.fallback,
        "insight": insight.text,
    })
}

/// GET /api/v1/predict/{steps} — foresight predictions.
///
/// `steps` is capped at [`MAX_DEPTH`].
async fn predict_handler(
    State(state): State<AppState>,
    Path(steps): Path<usize>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<Value>, ApiError> {
    let steps = steps.min(MAX_DEPTH);
    let (timeline, mut predictions) = state
        .with_session(query.session_id.as_deref(), |s| {
            let predictions = s.predict(&json!({ "context": "api_request", "steps": steps }));
            (s.timeline().to_string(), predictions)
        })
        .map_err(error_response)?;
    predictions.truncate(steps);
    Ok(Json(json!({
        "predictions": predictions,
        "timeline": timeline,
        "accuracy_estimate": ACCURACY_ESTIMATE,
    })))
}

/// POST /api/v1/mode/{mode} — switch consciousness level.
async fn mode_handler(
    State(state): State<AppState>,
    Path(mode): Path<String>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<Value>, ApiError> {
    let level = state
        .with_session(query.session_id.as_deref(), |s| s.set_mode(&mode))
        .and_then(|result| result)
        .map_err(error_response)?;
    Ok(Json(json!({
        "status": "mode_changed",
        "new_mode": level,
    })))
}

/// POST /api/v1/sessions — open a new session.
async fn create_session_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let status = state.create_session().map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(status)))
}

/// DELETE /api/v1/sessions/{id} — close a session.
async fn close_session_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    match state.close_session(&id).map_err(error_response)? {
        true => Ok(StatusCode::NO_CONTENT),
        false => Err(bad_request("the default session cannot be closed".to_string())),
    }
}

/// WS /api/v1/consciousness/stream — consciousness snapshot plus a unique
/// thought every [`STREAM_INTERVAL`].
async fn stream_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Response, ApiError> {
    let session_id = query
        .session_id
        .unwrap_or_else(|| state.default_session.clone());
    if !state.sessions.contains_key(&session_id) {
        return Err(error_response(OmegaError::SessionNotFound(session_id)));
    }
    Ok(ws.on_upgrade(move |socket| consciousness_stream(socket, state, session_id)))
}

async fn consciousness_stream(mut socket: WebSocket, state: AppState, session_id: String) {
    tracing::debug!(%session_id, "consciousness stream opened");
    let mut ticker = tokio::time::interval(STREAM_INTERVAL);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let frame = match state.stream_frame(&session_id) {
                    Ok(frame) => frame,
                    Err(e) => {
                        tracing::warn!(%session_id, error = %e, "ending consciousness stream");
                        break;
                    }
                };
                if socket.send(Message::Text(frame.to_string().into())).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
    tracing::debug!(%session_id, "consciousness stream closed");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
