//! HTTP route handlers for the agent control API.

use axum::Router;
use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post};
use chrono::Utc;
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};
use supervisor::state::GoalEdit;
use supervisor::{ActionLogView, AgentSnapshot, AutonomyLevel};
use tracing::warn;

use crate::state::AppState;

/// Build the API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/agent/status", get(status))
        .route("/agent/start", post(start))
        .route("/agent/pause", post(pause))
        .route("/agent/resume", post(resume))
        .route("/agent/stop", post(stop))
        .route("/agent/modify", post(modify))
        .route("/agent/action-log", get(action_log))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StartRequest {
    goal: String,
    autonomy_level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModifyRequest {
    /// Missing key keeps the goal; explicit `null` clears it.
    #[serde(deserialize_with = "present")]
    goal: Option<Option<String>>,
}

impl ModifyRequest {
    fn goal_edit(self) -> GoalEdit {
        match self.goal {
            None => GoalEdit::Keep,
            Some(None) => GoalEdit::Clear,
            Some(Some(goal)) => GoalEdit::Set(goal),
        }
    }
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// GET /api/agent/status - current snapshot.
async fn status(State(state): State<AppState>) -> Json<AgentSnapshot> {
    Json(state.supervisor.status().await)
}

/// POST /api/agent/start - plan the goal and start a new run.
async fn start(
    State(state): State<AppState>,
    Json(request): Json<StartRequest>,
) -> Json<AgentSnapshot> {
    let autonomy = parse_autonomy(request.autonomy_level.as_deref());
    Json(state.supervisor.start(request.goal, autonomy).await)
}

async fn pause(State(state): State<AppState>) -> Json<AgentSnapshot> {
    Json(state.supervisor.pause().await)
}

async fn resume(State(state): State<AppState>) -> Json<AgentSnapshot> {
    Json(state.supervisor.resume().await)
}

/// POST /api/agent/stop - kill switch, accepted from any status.
async fn stop(State(state): State<AppState>) -> Json<AgentSnapshot> {
    Json(state.supervisor.stop().await)
}

/// POST /api/agent/modify - replace the goal text, keeping the plan.
async fn modify(
    State(state): State<AppState>,
    Json(request): Json<ModifyRequest>,
) -> Json<AgentSnapshot> {
    Json(state.supervisor.modify(request.goal_edit()).await)
}

/// GET /api/agent/action-log - full audit trail with its length.
async fn action_log(State(state): State<AppState>) -> Json<ActionLogView> {
    Json(state.supervisor.action_log().await)
}

/// Missing or unrecognized levels fall back to supervised.
fn parse_autonomy(raw: Option<&str>) -> AutonomyLevel {
    match raw.map(str::parse::<AutonomyLevel>) {
        None => AutonomyLevel::Supervised,
        Some(Ok(level)) => level,
        Some(Err(err)) => {
            warn!(error = %err, "falling back to supervised");
            AutonomyLevel::Supervised
        }
    }
}
