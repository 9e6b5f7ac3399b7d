//! Attached viewers and their frame loop.
//!
//! Each viewer owns its own broadcast receiver and a child
//! [`CancellationToken`]. On attach it gets two frames of the current
//! board straight away, then one frame per wake-up after that.
//!
//! # Delivery
//!
//! A viewer that is waiting when a move is applied renders exactly one
//! frame for it. A viewer that is busy (rendering or writing) when
//! several moves land coalesces them: on its next wake-up it drains the
//! queued pulses and renders the latest board once. Intermediate
//! positions may be skipped; the final one never is.
//!
//! A viewer is torn down by dropping it. The HTTP server drops the
//! stream (and with it the viewer) once a write fails or the client
//! goes away, so a dead connection never lingers in the registry and
//! never takes a pulse away from anyone else.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::state::{AppState, MoveApplied};

/// Frames pushed to a new viewer before it starts waiting for moves.
pub const WARMUP_FRAMES: u8 = 2;

/// Identifier of an attached viewer, unique for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewerId(pub u64);

impl core::fmt::Display for ViewerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "viewer-{}", self.0)
    }
}

/// Tracks attached viewers and hands out their cancellation tokens.
#[derive(Debug)]
pub struct ViewerRegistry {
    next_id: AtomicU64,
    root: CancellationToken,
    active: Mutex<BTreeSet<ViewerId>>,
}

impl ViewerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            root: CancellationToken::new(),
            active: Mutex::new(BTreeSet::new()),
        }
    }

    /// Register a viewer, returning its id and a token that is cancelled
    /// when the registry shuts down.
    pub fn register(&self) -> (ViewerId, CancellationToken) {
        let id = ViewerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.active.lock().insert(id);
        (id, self.root.child_token())
    }

    /// Remove a viewer. Returns `false` if it was not registered.
    pub fn deregister(&self, id: ViewerId) -> bool {
        self.active.lock().remove(&id)
    }

    /// Whether a viewer is currently registered.
    pub fn contains(&self, id: ViewerId) -> bool {
        self.active.lock().contains(&id)
    }

    /// Number of registered viewers.
    pub fn len(&self) -> usize {
        self.active.lock().len()
    }

    /// Whether no viewers are registered.
    pub fn is_empty(&self) -> bool {
        self.active.lock().is_empty()
    }

    /// Cancel every current and future viewer token.
    pub fn cancel_all(&self) {
        self.root.cancel();
    }

    /// The parent of every viewer token.
    pub fn root_token(&self) -> CancellationToken {
        self.root.clone()
    }
}

impl Default for ViewerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// One attached viewer.
///
/// Obtained from [`AppState::attach_viewer`]. Deregisters itself and
/// cancels its token when dropped.
pub struct Viewer {
    id: ViewerId,
    rx: broadcast::Receiver<MoveApplied>,
    cancel: CancellationToken,
    warmup: u8,
    state: AppState,
}

impl Viewer {
    pub(crate) fn new(
        id: ViewerId,
        rx: broadcast::Receiver<MoveApplied>,
        cancel: CancellationToken,
        state: AppState,
    ) -> Self {
        Self {
            id,
            rx,
            cancel,
            warmup: WARMUP_FRAMES,
            state,
        }
    }

    /// This viewer's id.
    pub const fn id(&self) -> ViewerId {
        self.id
    }

    /// Token that ends this viewer's loop when cancelled.
    pub const fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Produce the next frame to push.
    ///
    /// During warm-up this returns immediately. Afterwards it waits for a
    /// move pulse. A frame that fails to render is logged and skipped.
    /// Returns `None` once the viewer is cancelled.
    pub async fn next_frame(&mut self) -> Option<String> {
        loop {
            if self.warmup > 0 {
                self.warmup = self.warmup.saturating_sub(1);
            } else if !self.wait_for_pulse().await {
                return None;
            }

            if self.cancel.is_cancelled() {
                return None;
            }

            match self.state.render_board().await {
                Ok(frame) => return Some(frame),
                Err(e) => {
                    warn!(viewer = %self.id, error = %e, "failed to render board, skipping push");
                }
            }
        }
    }

    /// Wait for a pulse, then drain any others already queued.
    ///
    /// Returns `false` when the viewer is cancelled.
    async fn wait_for_pulse(&mut self) -> bool {
        let id = self.id;
        let received = tokio::select! {
            biased;
            () = self.cancel.cancelled() => None,
            result = self.rx.recv() => Some(result),
        };

        match received {
            None => {
                debug!(viewer = %id, "viewer cancelled");
                return false;
            }
            Some(Ok(applied)) => {
                debug!(viewer = %id, sequence = applied.sequence, "move pulse received");
            }
            Some(Err(RecvError::Lagged(skipped))) => {
                debug!(viewer = %id, skipped, "viewer lagged, rendering latest board");
            }
            Some(Err(RecvError::Closed)) => {
                debug!(viewer = %id, "pulse channel closed");
                return false;
            }
        }

        let mut coalesced: u64 = 0;
        loop {
            match self.rx.try_recv() {
                Ok(_) | Err(TryRecvError::Lagged(_)) => coalesced = coalesced.saturating_add(1),
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        if coalesced > 0 {
            debug!(viewer = %id, coalesced, "coalesced queued pulses");
        }
        true
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.state.viewers.deregister(self.id);
        info!(viewer = %self.id, remaining = self.state.viewers.len(), "viewer detached");
    }
}

impl core::fmt::Debug for Viewer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Viewer")
            .field("id", &self.id)
            .field("warmup", &self.warmup)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use boardcast_board::SquarePolicy;
    use tokio::time::timeout;

    use super::*;
    use crate::render::{SnapshotRenderer, INDEX_PAGE};
    use crate::state::PULSE_CAPACITY;

    const WAIT: Duration = Duration::from_millis(100);

    #[tokio::test]
    async fn warmup_yields_two_identical_frames() {
        let state = AppState::new();
        let mut viewer = state.attach_viewer();

        let first = timeout(WAIT, viewer.next_frame()).await.ok().flatten();
        let second = timeout(WAIT, viewer.next_frame()).await.ok().flatten();
        assert!(first.is_some());
        assert_eq!(first, second);
        assert_eq!(first.as_deref(), state.render_board().await.ok().as_deref());

        // Third frame waits for a move.
        assert!(timeout(WAIT, viewer.next_frame()).await.is_err());
    }

    #[tokio::test]
    async fn queued_pulses_coalesce_into_one_frame() {
        let state = AppState::new();
        let mut viewer = state.attach_viewer();
        for _ in 0..WARMUP_FRAMES {
            assert!(viewer.next_frame().await.is_some());
        }

        state.update("e2e4").await;
        state.update("e7e5").await;
        state.update("g1f3").await;

        let frame = timeout(WAIT, viewer.next_frame()).await.ok().flatten();
        assert_eq!(frame.as_deref(), state.render_board().await.ok().as_deref());
        assert!(timeout(WAIT, viewer.next_frame()).await.is_err());
    }

    #[tokio::test]
    async fn lagged_viewer_renders_latest_board_once() {
        let state = AppState::new();
        let mut viewer = state.attach_viewer();
        for _ in 0..WARMUP_FRAMES {
            assert!(viewer.next_frame().await.is_some());
        }

        // Overflow the pulse channel so the receiver reports a lag.
        let moves = PULSE_CAPACITY.saturating_mul(2).saturating_add(1);
        for i in 0..moves {
            let command = if i % 2 == 0 { "g1f3" } else { "f3g1" };
            assert!(state.try_update(command).await.is_ok());
        }
        assert_eq!(Some(state.current().await.sequence), u64::try_from(moves).ok());

        let frame = timeout(WAIT, viewer.next_frame()).await.ok().flatten();
        assert!(frame.is_some());
        assert_eq!(frame.as_deref(), state.render_board().await.ok().as_deref());
        assert!(timeout(WAIT, viewer.next_frame()).await.is_err());
    }

    #[tokio::test]
    async fn drop_deregisters() {
        let state = AppState::new();
        let viewer = state.attach_viewer();
        let id = viewer.id();
        let token = viewer.cancellation_token().clone();
        assert!(state.viewers.contains(id));
        assert_eq!(state.viewer_count(), 1);

        drop(viewer);
        assert!(!state.viewers.contains(id));
        assert_eq!(state.viewer_count(), 0);
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn shutdown_ends_waiting_viewer() {
        let state = AppState::new();
        let mut viewer = state.attach_viewer();
        for _ in 0..WARMUP_FRAMES {
            assert!(viewer.next_frame().await.is_some());
        }

        let waiter = tokio::spawn(async move { viewer.next_frame().await });
        tokio::task::yield_now().await;
        state.shutdown();

        let result = timeout(WAIT, waiter).await;
        assert!(matches!(result, Ok(Ok(None))));
        assert_eq!(state.viewer_count(), 0);
    }

    #[tokio::test]
    async fn render_failure_skips_push() {
        let renderer = SnapshotRenderer::from_sources("{{ missing_fn() }}", INDEX_PAGE);
        let state = AppState::with_options(SquarePolicy::Reject, renderer);
        let mut viewer = state.attach_viewer();

        assert!(timeout(WAIT, viewer.next_frame()).await.is_err());
        assert_eq!(state.viewer_count(), 1);
    }

    #[test]
    fn ids_are_unique() {
        let registry = ViewerRegistry::new();
        let (a, _) = registry.register();
        let (b, _) = registry.register();
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert!(registry.deregister(a));
        assert!(!registry.deregister(a));
        assert_eq!(registry.len(), 1);
        assert_eq!(b.to_string(), format!("viewer-{}", b.0));
    }
}
