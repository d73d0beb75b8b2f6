//! HTTP route handlers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{debug, error, warn};

use crate::domain::StationId;
use crate::planner::{PatrolPlanner, PlanError, find_path};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/lines", get(list_lines))
        .route("/stations/:id/neighbors", get(station_neighbors))
        .route("/route", post(plan_route))
        .route("/patrol", post(plan_patrol))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List the line catalogue.
async fn list_lines(State(state): State<AppState>) -> Json<LinesResponse> {
    let lines = state
        .graph
        .lines()
        .iter()
        .map(|(id, meta)| LineResult::new(id, &meta.name, &meta.colour))
        .collect();

    Json(LinesResponse { lines })
}

/// Connections incident to one station.
async fn station_neighbors(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<NeighborsResponse>, AppError> {
    let id = StationId(id);
    let neighbors = state.graph.neighbors(id).map_err(|e| AppError::NotFound {
        message: e.to_string(),
    })?;
    let connections = neighbors.map(|c| ConnectionInfo::leaving(c, id)).collect();

    Ok(Json(NeighborsResponse {
        station: StationInfo::from_id(&state.graph, id),
        connections,
    }))
}

/// Plan a point-to-point route.
async fn plan_route(
    State(state): State<AppState>,
    Json(req): Json<RouteRequest>,
) -> Result<Json<RouteResponse>, AppError> {
    let graph = Arc::clone(&state.graph);
    let task = tokio::task::spawn_blocking(move || {
        let route = find_path(&graph, req.strategy, StationId(req.from), StationId(req.to))?;
        debug!(
            from = req.from,
            to = req.to,
            strategy = %req.strategy,
            total_time = route.total_time,
            "route planned"
        );
        Ok::<_, PlanError>(RouteResponse::from_route(&route, req.strategy, &graph))
    });

    let response = task.await.map_err(|e| AppError::Internal {
        message: format!("route task failed: {e}"),
    })??;

    Ok(Json(response))
}

/// Sets its flag when dropped.
///
/// Held by the patrol handler across the blocking task, so a client that
/// disconnects stops the search.
struct CancelOnDrop(Arc<AtomicBool>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// Plan a patrol through a set of required stations.
async fn plan_patrol(
    State(state): State<AppState>,
    Json(req): Json<PatrolRequest>,
) -> Result<Json<PatrolResponse>, AppError> {
    let flag = Arc::new(AtomicBool::new(false));
    let _guard = CancelOnDrop(Arc::clone(&flag));

    let graph = Arc::clone(&state.graph);
    let config = Arc::clone(&state.config);
    let task = tokio::task::spawn_blocking(move || {
        let required: Vec<StationId> = req.required.iter().copied().map(StationId).collect();
        let patrol = PatrolPlanner::new(&graph, &config)
            .with_cancel_flag(flag)
            .plan(StationId(req.origin), &required)?;
        Ok::<_, PlanError>(PatrolResponse::from_patrol(&patrol, &graph))
    });

    let response = task
        .await
        .map_err(|e| AppError::Internal {
            message: format!("patrol task failed: {e}"),
        })?
        .map_err(AppError::from_patrol_error)?;

    debug!(
        total_time = response.total_time,
        oracle_searches = response.oracle_searches,
        "patrol planned"
    );

    Ok(Json(response))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Unprocessable { message: String },
    Internal { message: String },
}

impl AppError {
    /// Map a patrol error; every input-contract violation is a bad request.
    fn from_patrol_error(e: PlanError) -> Self {
        match e {
            PlanError::UnknownStation(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            other => other.into(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        let message = e.to_string();
        match e {
            PlanError::UnknownStation(_) => AppError::NotFound { message },
            PlanError::EmptyRequiredSet | PlanError::TooManyRequiredStations { .. } => {
                AppError::BadRequest { message }
            }
            PlanError::Unreachable { .. }
            | PlanError::Cancelled
            | PlanError::DeadlineExceeded => AppError::Unprocessable { message },
            PlanError::Graph(_) => AppError::Internal { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Unprocessable { message }
            | AppError::Internal { message } => message,
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
