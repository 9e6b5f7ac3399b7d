//! Snapshot rendering via `minijinja`.
//!
//! The board fragment is a template (`board.html`) rendered from a
//! [`BoardSnapshot`]. The index page is static markup with a fixed
//! placeholder token that is replaced by a freshly rendered board.
//!
//! Templates are embedded at compile time and compiled on first use, so
//! a broken template surfaces as a [`RenderError`] at render time rather
//! than at startup.

use boardcast_board::{File, Rank};
use minijinja::Environment;
use serde::Serialize;

use crate::state::BoardSnapshot;

/// Token in the index page replaced by the rendered board.
pub const BOARD_PLACEHOLDER: &str = "<!--BOARD-->";

/// Embedded board fragment template.
pub const BOARD_TEMPLATE: &str = include_str!("../templates/board.html");

/// Embedded index page.
pub const INDEX_PAGE: &str = include_str!("../templates/index.html");

const BOARD_TEMPLATE_NAME: &str = "board.html";

/// Errors produced while rendering a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The template could not be loaded or compiled.
    #[error("template error: {0}")]
    Template(String),

    /// The template failed while rendering.
    #[error("render error: {0}")]
    Render(String),
}

/// Renders board snapshots to markup.
pub struct SnapshotRenderer {
    env: Environment<'static>,
    index_page: String,
}

impl SnapshotRenderer {
    /// Create a renderer using the embedded templates.
    pub fn new() -> Self {
        Self::from_sources(BOARD_TEMPLATE, INDEX_PAGE)
    }

    /// Create a renderer from a board template and an index page.
    ///
    /// The index page must contain [`BOARD_PLACEHOLDER`] for the board to
    /// appear in it.
    pub fn from_sources(board_template: &str, index_page: &str) -> Self {
        let mut env = Environment::new();
        let board_source = board_template.to_owned();
        env.set_loader(move |name| {
            if name == BOARD_TEMPLATE_NAME {
                Ok(Some(board_source.clone()))
            } else {
                Ok(None)
            }
        });
        Self {
            env,
            index_page: index_page.to_owned(),
        }
    }

    /// Render the board fragment for one snapshot.
    ///
    /// Newlines are removed so the result fits on a single SSE `data:`
    /// line.
    pub fn render_board(&self, snapshot: &BoardSnapshot) -> Result<String, RenderError> {
        let template = self
            .env
            .get_template(BOARD_TEMPLATE_NAME)
            .map_err(|e| RenderError::Template(format!("failed to load board template: {e}")))?;
        let rendered = template
            .render(BoardView::from_snapshot(snapshot))
            .map_err(|e| RenderError::Render(format!("board render failed: {e}")))?;
        Ok(rendered.replace(['\n', '\r'], ""))
    }

    /// Render the full index page with the current board substituted in.
    pub fn render_index(&self, snapshot: &BoardSnapshot) -> Result<String, RenderError> {
        let board = self.render_board(snapshot)?;
        Ok(self.index_page.replace(BOARD_PLACEHOLDER, &board))
    }
}

impl Default for SnapshotRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for SnapshotRenderer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SnapshotRenderer").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Template context
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct BoardView {
    turn: &'static str,
    sequence: u64,
    files: Vec<char>,
    ranks: Vec<RankView>,
}

#[derive(Serialize)]
struct RankView {
    label: char,
    squares: Vec<SquareView>,
}

#[derive(Serialize)]
struct SquareView {
    name: String,
    dark: bool,
    symbol: String,
    side: Option<&'static str>,
}

impl BoardView {
    fn from_snapshot(snapshot: &BoardSnapshot) -> Self {
        let grid = snapshot.board.grid();
        let ranks = grid
            .ranks_top_down()
            .map(|(rank, cells)| RankView {
                label: rank.to_char(),
                squares: File::ALL
                    .into_iter()
                    .zip(cells)
                    .map(|(file, cell)| SquareView {
                        name: format!("{}{}", file.to_char(), rank.to_char()),
                        dark: is_dark(file, rank),
                        symbol: cell.map_or_else(|| String::from(" "), |p| p.symbol().to_string()),
                        side: cell.map(|p| p.side.name()),
                    })
                    .collect(),
            })
            .collect();

        Self {
            turn: snapshot.board.turn().name(),
            sequence: snapshot.sequence,
            files: File::ALL.into_iter().map(File::to_char).collect(),
            ranks,
        }
    }
}

/// `a1` is dark; squares whose file and rank share parity are dark.
const fn is_dark(file: File, rank: Rank) -> bool {
    (file.index() ^ rank.index()) & 1 == 0
}

#[cfg(test)]
mod tests {
    use boardcast_board::Board;

    use super::*;

    fn initial() -> BoardSnapshot {
        BoardSnapshot::new(Board::standard())
    }

    #[test]
    fn board_fragment_is_single_line() {
        let html = SnapshotRenderer::new().render_board(&initial());
        assert!(html.is_ok());
        let html = html.unwrap_or_default();
        assert!(!html.contains('\n'));
        assert!(html.contains("white to move"));
        assert!(html.contains('♚'));
        assert!(html.contains('♔'));
    }

    #[test]
    fn squares_alternate_colour() {
        assert!(is_dark(File::A, Rank::One));
        assert!(!is_dark(File::B, Rank::One));
        assert!(!is_dark(File::A, Rank::Two));
        assert!(is_dark(File::H, Rank::Eight));
    }

    #[test]
    fn index_substitutes_placeholder() {
        let renderer = SnapshotRenderer::new();
        let page = renderer.render_index(&initial()).unwrap_or_default();
        let board = renderer.render_board(&initial()).unwrap_or_default();
        assert!(!page.contains(BOARD_PLACEHOLDER));
        assert!(page.contains(&board));
        assert!(page.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn broken_template_reports_error() {
        let renderer = SnapshotRenderer::from_sources("{% for %}", INDEX_PAGE);
        assert!(matches!(
            renderer.render_board(&initial()),
            Err(RenderError::Template(_))
        ));

        let renderer = SnapshotRenderer::from_sources("{{ missing_fn() }}", INDEX_PAGE);
        assert!(matches!(
            renderer.render_board(&initial()),
            Err(RenderError::Render(_))
        ));
    }

    #[test]
    fn custom_template_sees_turn_and_sequence() {
        let renderer = SnapshotRenderer::from_sources("{{ turn }}#{{ sequence }}", INDEX_PAGE);
        assert_eq!(
            renderer.render_board(&initial()).ok().as_deref(),
            Some("white#0")
        );
    }
}
