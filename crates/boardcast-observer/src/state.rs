//! Shared application state for the live view server.
//!
//! [`AppState`] is the one object that both the move input and the HTTP
//! handlers hold. It owns the board behind a [`RwLock`], the broadcast
//! channel that wakes viewer tasks after each accepted move, the
//! renderer, and the registry of attached viewers.

use std::sync::Arc;

use boardcast_board::{Board, BoardError, MoveCommand, Side, SquarePolicy};
use tokio::sync::{broadcast, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::render::{RenderError, SnapshotRenderer};
use crate::viewer::{Viewer, ViewerRegistry};

/// Capacity of the move pulse channel.
///
/// Viewers coalesce whatever has queued up by the time they wake, so
/// this only bounds how far a slow viewer can fall behind before it is
/// reported as lagged. Either way it renders the latest board.
pub(crate) const PULSE_CAPACITY: usize = 16;

/// Published once per accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MoveApplied {
    /// Number of moves accepted so far, this one included.
    pub sequence: u64,
    /// The command that was applied.
    pub command: MoveCommand,
    /// The side to move after this one.
    pub turn: Side,
}

/// The board together with its move counter.
///
/// Stored behind the state lock and copied out for every render, so no
/// render ever holds the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BoardSnapshot {
    /// Number of moves accepted when this snapshot was taken.
    pub sequence: u64,
    /// Board contents and side to move.
    #[serde(flatten)]
    pub board: Board,
}

impl BoardSnapshot {
    /// Wrap a board with a zero move count.
    pub const fn new(board: Board) -> Self {
        Self { sequence: 0, board }
    }
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self::new(Board::standard())
    }
}

/// Shared state for the Axum application and the move input.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast sender for move pulses.
    pub tx: broadcast::Sender<MoveApplied>,
    /// The live board (mutated by [`AppState::update`]).
    pub snapshot: Arc<RwLock<BoardSnapshot>>,
    /// Renders snapshots for viewers and the index page.
    pub renderer: Arc<SnapshotRenderer>,
    /// Currently attached viewers.
    pub viewers: Arc<ViewerRegistry>,
    /// How unmapped characters in move commands are treated.
    pub policy: SquarePolicy,
}

impl AppState {
    /// Create state for a standard board, rejecting unmapped squares.
    pub fn new() -> Self {
        Self::with_options(SquarePolicy::Reject, SnapshotRenderer::new())
    }

    /// Create state for a standard board with the given square policy.
    pub fn with_policy(policy: SquarePolicy) -> Self {
        Self::with_options(policy, SnapshotRenderer::new())
    }

    /// Create state with an explicit policy and renderer.
    pub fn with_options(policy: SquarePolicy, renderer: SnapshotRenderer) -> Self {
        let (tx, _) = broadcast::channel(PULSE_CAPACITY);
        Self {
            tx,
            snapshot: Arc::new(RwLock::new(BoardSnapshot::default())),
            renderer: Arc::new(renderer),
            viewers: Arc::new(ViewerRegistry::new()),
            policy,
        }
    }

    /// Apply a raw move command, logging and discarding failures.
    ///
    /// This is the entry point for move input. Nothing is reported back to
    /// the caller; a rejected command leaves the board as it was and
    /// publishes nothing.
    pub async fn update(&self, raw: &str) {
        if let Err(e) = self.try_update(raw).await {
            warn!(input = raw.trim_end(), error = %e, "move rejected");
        }
    }

    /// Apply a raw move command and publish one pulse on success.
    ///
    /// The board and move counter change together under the write lock.
    /// The lock is released before the pulse is sent.
    pub async fn try_update(&self, raw: &str) -> Result<MoveApplied, BoardError> {
        let applied = {
            let mut snap = self.snapshot.write().await;
            debug!(board = %snap.board, "board before update");
            let command = snap.board.apply_move_with(raw, self.policy)?;
            snap.sequence = snap.sequence.saturating_add(1);
            debug!(board = %snap.board, "board after update");
            MoveApplied {
                sequence: snap.sequence,
                command,
                turn: snap.board.turn(),
            }
        };

        let receivers = self.broadcast(&applied);
        info!(
            sequence = applied.sequence,
            command = %applied.command,
            turn = %applied.turn,
            receivers,
            "move applied"
        );
        Ok(applied)
    }

    /// Publish a pulse to all attached viewers.
    ///
    /// Returns the number of receivers that got it; 0 when nobody is
    /// attached, which is not an error.
    pub fn broadcast(&self, applied: &MoveApplied) -> usize {
        self.tx.send(*applied).unwrap_or(0)
    }

    /// Subscribe to move pulses.
    pub fn subscribe(&self) -> broadcast::Receiver<MoveApplied> {
        self.tx.subscribe()
    }

    /// Copy of the current board, taken under a brief read lock.
    pub async fn current(&self) -> BoardSnapshot {
        *self.snapshot.read().await
    }

    /// Render the board fragment from a fresh snapshot.
    pub async fn render_board(&self) -> Result<String, RenderError> {
        let snapshot = self.current().await;
        self.renderer.render_board(&snapshot)
    }

    /// Render the index page from a fresh snapshot.
    pub async fn render_index(&self) -> Result<String, RenderError> {
        let snapshot = self.current().await;
        self.renderer.render_index(&snapshot)
    }

    /// Register a new viewer.
    ///
    /// The viewer is subscribed before this returns, so every pulse sent
    /// afterwards reaches it. Its first two frames are rendered without
    /// waiting for a move.
    pub fn attach_viewer(&self) -> Viewer {
        let (id, cancel) = self.viewers.register();
        let rx = self.subscribe();
        Viewer::new(id, rx, cancel, self.clone())
    }

    /// Number of attached viewers.
    pub fn viewer_count(&self) -> usize {
        self.viewers.len()
    }

    /// Token cancelled by [`AppState::shutdown`].
    pub fn shutdown_token(&self) -> CancellationToken {
        self.viewers.root_token()
    }

    /// Cancel every viewer, ending their streams.
    pub fn shutdown(&self) {
        info!(viewers = self.viewer_count(), "shutting down live view");
        self.viewers.cancel_all();
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use boardcast_board::{File, Piece, PieceKind, Rank, Square};

    use super::*;

    #[tokio::test]
    async fn update_applies_move_and_publishes_once() {
        let state = AppState::new();
        let mut rx = state.subscribe();

        state.update("e2e4\n").await;

        let snap = state.current().await;
        assert_eq!(snap.sequence, 1);
        assert_eq!(snap.board.turn(), Side::Black);
        assert_eq!(
            snap.board.cell(Square::new(File::E, Rank::Four)),
            Some(Piece::new(Side::White, PieceKind::Pawn))
        );

        let pulse = rx.try_recv();
        assert!(matches!(pulse, Ok(MoveApplied { sequence: 1, turn: Side::Black, .. })));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn rejected_update_changes_nothing() {
        let state = AppState::new();
        let mut rx = state.subscribe();

        state.update("e2e").await;
        state.update("e2e4x").await;
        state.update("q9q9").await;

        assert_eq!(state.current().await, BoardSnapshot::default());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn try_update_surfaces_error() {
        let state = AppState::new();
        let result = state.try_update("e2e").await;
        assert_eq!(result, Err(BoardError::MalformedCommand { length: 3 }));
    }

    #[tokio::test]
    async fn zero_policy_accepts_unmapped_characters() {
        let state = AppState::with_policy(SquarePolicy::Zero);
        let applied = state.try_update("e2?4").await;
        assert!(applied.is_ok());
        assert_eq!(
            state.current().await.board.cell(Square::new(File::A, Rank::Four)),
            Some(Piece::new(Side::White, PieceKind::Pawn))
        );
    }

    #[tokio::test]
    async fn broadcast_without_receivers_is_zero() {
        let state = AppState::new();
        let applied = state.try_update("g1f3").await;
        assert!(applied.is_ok());
        if let Ok(applied) = applied {
            assert_eq!(state.broadcast(&applied), 0);
        }
    }

    #[test]
    fn snapshot_json_flattens_board() {
        let value = serde_json::to_value(BoardSnapshot::default()).unwrap_or_default();
        assert_eq!(value["sequence"], 0);
        assert_eq!(value["turn"], "white");
        assert_eq!(value["grid"][1][0]["kind"], "pawn");
    }
}
