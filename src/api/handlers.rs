use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::Recommendation;

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub title: String,
    pub k: Option<usize>,
    /// Session whose history records this query
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub title: String,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct WatchlistRequest {
    pub title: String,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Get every title in the catalog, in catalog order
pub async fn list_movies(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.recommender.catalog().to_vec())
}

/// Get the movies most similar to a title
pub async fn recommend(
    State(state): State<AppState>,
    query: Result<Query<RecommendQuery>, QueryRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Query(params) = query?;

    let k = params.k.unwrap_or(state.default_top_k);
    if k > state.max_top_k {
        return Err(AppError::InvalidInput(format!(
            "k must be at most {}",
            state.max_top_k
        )));
    }

    let recommendations = match state.recommender.recommend_scored(&params.title, k) {
        Ok(recommendations) => recommendations,
        Err(e) => {
            tracing::info!(title = %params.title, error = %e, "Recommendation query rejected");
            return Err(e);
        }
    };

    if let Some(session_id) = params.session_id {
        state
            .with_session(session_id, |session| session.record_query(&params.title))
            .await?;
    }

    tracing::info!(
        title = %params.title,
        k,
        returned = recommendations.len(),
        "Recommendations served"
    );

    Ok(Json(RecommendationResponse {
        title: params.title,
        recommendations,
    }))
}

/// Open a new session
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionResponse>) {
    let session_id = state.open_session().await;
    tracing::debug!(%session_id, "Session opened");
    (StatusCode::CREATED, Json(SessionResponse { session_id }))
}

/// Close a session and drop its state
pub async fn delete_session(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(session_id) = path?;
    match state.sessions.write().await.remove(&session_id) {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(AppError::NotFound(format!("session {}", session_id))),
    }
}

/// Get the titles queried in a session, oldest first
pub async fn get_history(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Vec<String>>> {
    let Path(session_id) = path?;
    let history = state
        .with_session(session_id, |session| session.history.clone())
        .await?;
    Ok(Json(history))
}

/// Get a session's watchlist
pub async fn get_watchlist(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Vec<String>>> {
    let Path(session_id) = path?;
    let watchlist = state
        .with_session(session_id, |session| session.watchlist.clone())
        .await?;
    Ok(Json(watchlist))
}

/// Add a catalog title to a session's watchlist
pub async fn add_to_watchlist(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<WatchlistRequest>, JsonRejection>,
) -> AppResult<StatusCode> {
    let Path(session_id) = path?;
    let Json(request) = body?;

    if !state.recommender.contains(&request.title) {
        return Err(AppError::UnknownTitle(request.title));
    }

    let added = state
        .with_session(session_id, |session| session.add_to_watchlist(&request.title))
        .await?;
    Ok(if added { StatusCode::CREATED } else { StatusCode::OK })
}

/// Remove a title from a session's watchlist
pub async fn remove_from_watchlist(
    State(state): State<AppState>,
    path: Result<Path<(Uuid, String)>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path((session_id, title)) = path?;
    let removed = state
        .with_session(session_id, |session| session.remove_from_watchlist(&title))
        .await?;

    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("'{}' is not on the watchlist", title)))
    }
}
