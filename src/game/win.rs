//! Four-in-a-row detection over a whole board.

use serde::{Deserialize, Serialize};

use super::board::{Board, COLS, ROWS};
use super::player::Player;
use crate::error::ConsistencyError;

/// Final result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Win(Player),
    Draw,
}

/// Line directions as (row step, col step): horizontal, vertical, `/`, `\`.
const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

/// Does `player` have four consecutive cells along any row, column or diagonal?
pub fn check_win(board: &Board, player: Player) -> bool {
    let cell = player.to_cell();
    for row in 0..ROWS as i32 {
        for col in 0..COLS as i32 {
            for &(dr, dc) in &DIRECTIONS {
                let end_row = row + 3 * dr;
                let end_col = col + 3 * dc;
                if !(0..ROWS as i32).contains(&end_row) || end_col >= COLS as i32 {
                    continue;
                }
                if (0..4).all(|i| {
                    board.get((row + i * dr) as usize, (col + i * dc) as usize) == cell
                }) {
                    return true;
                }
            }
        }
    }
    false
}

/// The player holding four in a row, if any.
pub fn winner(board: &Board) -> Result<Option<Player>, ConsistencyError> {
    match (check_win(board, Player::One), check_win(board, Player::Two)) {
        (true, true) => Err(ConsistencyError::BothPlayersConnected),
        (true, false) => Ok(Some(Player::One)),
        (false, true) => Ok(Some(Player::Two)),
        (false, false) => Ok(None),
    }
}

/// Full board with no four-in-a-row for either player.
pub fn is_draw(board: &Board) -> bool {
    board.legal_moves().is_empty()
        && !check_win(board, Player::One)
        && !check_win(board, Player::Two)
}

/// Verdict for a decided board, `None` while the game is still open.
/// A win always takes precedence over a full board.
pub fn outcome(board: &Board) -> Result<Option<Verdict>, ConsistencyError> {
    if let Some(player) = winner(board)? {
        return Ok(Some(Verdict::Win(player)));
    }
    if board.is_full() {
        return Ok(Some(Verdict::Draw));
    }
    Ok(None)
}
