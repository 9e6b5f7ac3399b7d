//! Server-Sent Events stream of rendered boards.
//!
//! Clients connect to `GET /sse` and receive one `data:` frame per
//! rendered board: two straight away, then one after each accepted
//! move. The stream owns its [`Viewer`](crate::viewer::Viewer); when the
//! server stops polling it (client gone, write failed, shutdown) the
//! viewer is dropped and deregistered.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONNECTION,
};
use axum::http::HeaderName;
use axum::response::sse::{Event, Sse};
use axum::response::IntoResponse;
use futures::stream::{self, Stream};
use tracing::info;

use crate::state::AppState;
use crate::viewer::Viewer;

/// Attach a viewer and stream its frames.
///
/// # Route
///
/// `GET /sse`
pub async fn sse_board(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let viewer = state.attach_viewer();
    info!(viewer = %viewer.id(), viewers = state.viewer_count(), "viewer attached");
    (stream_headers(), Sse::new(frames(viewer)))
}

/// Turn a viewer into a stream of SSE events.
pub fn frames(viewer: Viewer) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold(viewer, |mut viewer| async move {
        let frame = viewer.next_frame().await?;
        Some((Ok(Event::default().data(frame)), viewer))
    })
}

fn stream_headers() -> [(HeaderName, &'static str); 4] {
    [
        (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        (CACHE_CONTROL, "no-cache"),
        (CONNECTION, "keep-alive"),
    ]
}
