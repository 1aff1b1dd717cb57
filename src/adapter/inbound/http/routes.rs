use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use crate::application::ingest::{IngestReceipt, IngestionService};
use crate::application::query::{MatchDetail, MatchSummary, MatchTotals, QueryService};
use crate::domain::{ChangeKind, MatchId, MatchSubmission, TeamName, TeamStatistics, TeamSummary};

/// Shared handler state
#[derive(Clone)]
pub struct ApiState {
    pub ingestion: Arc<IngestionService>,
    pub query: Arc<QueryService>,
}

/// Create the API router
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ingest", post(ingest))
        .route("/matches", get(list_matches))
        .route("/matches/:match_id", get(get_match))
        .route("/matches/:match_id/statistics", get(get_match_statistics))
        .route("/teams/:team_name/statistics", get(get_team_statistics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

const SUCCESS: &str = "success";

// ===== Route Handlers =====

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn ingest(
    State(state): State<ApiState>,
    payload: Result<Json<MatchSubmission>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(submission) = payload?;
    let receipt = state.ingestion.ingest(submission).await?;

    let status = match receipt.change {
        ChangeKind::Insert => StatusCode::CREATED,
        _ => StatusCode::OK,
    };
    let body = IngestResponse {
        status: SUCCESS,
        message: "Match record stored.",
        data: receipt,
    };
    Ok((status, Json(body)).into_response())
}

async fn list_matches(State(state): State<ApiState>) -> Result<Json<MatchesResponse>, ApiError> {
    let matches = state.query.list_matches().await?;
    Ok(Json(MatchesResponse {
        status: SUCCESS,
        matches,
    }))
}

async fn get_match(
    State(state): State<ApiState>,
    Path(match_id): Path<String>,
) -> Result<Json<MatchResponse>, ApiError> {
    let id = MatchId::new(match_id);
    let detail = state
        .query
        .match_detail(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("match {id} not found")))?;
    Ok(Json(MatchResponse {
        status: SUCCESS,
        r#match: detail,
    }))
}

async fn get_match_statistics(
    State(state): State<ApiState>,
    Path(match_id): Path<String>,
) -> Result<Json<MatchStatisticsResponse>, ApiError> {
    let id = MatchId::new(match_id);
    let statistics = state
        .query
        .match_statistics(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("match {id} not found")))?;
    Ok(Json(MatchStatisticsResponse {
        status: SUCCESS,
        match_id: id,
        statistics,
    }))
}

async fn get_team_statistics(
    State(state): State<ApiState>,
    Path(team_name): Path<String>,
) -> Result<Json<TeamStatisticsResponse>, ApiError> {
    let report = state
        .query
        .team_statistics(&TeamName::new(team_name))
        .await?;
    Ok(Json(TeamStatisticsResponse {
        status: SUCCESS,
        team: report.team,
        statistics: report.statistics,
        matches: report.matches,
    }))
}

// ===== Response Types =====

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct IngestResponse {
    status: &'static str,
    message: &'static str,
    data: IngestReceipt,
}

#[derive(Serialize)]
struct MatchesResponse {
    status: &'static str,
    matches: Vec<MatchSummary>,
}

#[derive(Serialize)]
struct MatchResponse {
    status: &'static str,
    r#match: MatchDetail,
}

#[derive(Serialize)]
struct MatchStatisticsResponse {
    status: &'static str,
    match_id: MatchId,
    statistics: MatchTotals,
}

#[derive(Serialize)]
struct TeamStatisticsResponse {
    status: &'static str,
    team: TeamName,
    statistics: TeamSummary,
    matches: Vec<TeamStatistics>,
}
