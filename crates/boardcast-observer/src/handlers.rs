//! HTTP endpoint handlers.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Index page with the board rendered in |
//! | `GET` | `/api/board` | Current board as JSON |
//!
//! The event stream lives in [`crate::sse`].

use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::Json;

use crate::error::ObserverError;
use crate::state::AppState;

/// Serve the index page.
///
/// The board is rendered once at request time; live updates arrive over
/// `/sse` afterwards.
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ObserverError> {
    let page = state.render_index().await?;
    Ok(Html(page))
}

/// Return the current board, turn, and move count.
pub async fn get_board(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let snapshot = state.current().await;
    Ok(Json(serde_json::to_value(snapshot)?))
}
