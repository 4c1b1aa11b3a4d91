//! Core Connect Four game logic: gravity board with apply/undo, player ids,
//! four-in-a-row detection, and the in-place game state.

mod board;
mod player;
mod state;
pub mod win;

pub use board::{Board, Cell, LegalMoves, Snapshot, COLS, ROWS};
pub use player::Player;
pub use state::GameState;
pub use win::{check_win, is_draw, Verdict};
