//! Live view server for the Boardcast chess board.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Event stream** (`/sse`) pushing a rendered board to every attached
//!   viewer after each accepted move
//! - **Index page** (`GET /`) with the board rendered in at request time
//! - **JSON endpoint** (`GET /api/board`) for the current board
//! - **Static assets** for everything else
//!
//! # Architecture
//!
//! [`AppState`] owns the board behind a lock and a broadcast channel of
//! [`MoveApplied`] pulses. [`AppState::update`] applies a move under the
//! write lock and publishes one pulse. Every attached [`Viewer`] holds
//! its own receiver; on a pulse it copies the board out, renders it, and
//! the SSE stream pushes the result. Rendering never holds the lock.
//!
//! [`MoveApplied`]: state::MoveApplied
//! [`Viewer`]: viewer::Viewer

pub mod error;
pub mod handlers;
pub mod render;
pub mod router;
pub mod server;
pub mod sse;
pub mod startup;
pub mod state;
pub mod viewer;

// Re-export primary types for convenience.
pub use render::{RenderError, SnapshotRenderer};
pub use router::build_router;
pub use server::{ServerConfig, ServerError};
pub use startup::spawn_observer;
pub use state::{AppState, BoardSnapshot, MoveApplied};
pub use viewer::{Viewer, ViewerId};
