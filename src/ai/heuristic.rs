use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::error::GameError;
use crate::game::{check_win, Board, GameState, Player};

use super::agent::Agent;

/// Why the heuristic picked its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    Win,
    Block,
    Random,
}

/// One-ply lookahead player: take a win, else block the opponent's win,
/// else play a uniformly random legal column.
pub struct HeuristicAgent {
    rng: StdRng,
}

impl HeuristicAgent {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        HeuristicAgent { rng }
    }

    /// Choose a column for `player`. Every speculative move is undone before
    /// this returns, whichever branch decides.
    pub fn choose(&mut self, board: &mut Board, player: Player) -> Result<(usize, Reason), GameError> {
        let legal = board.legal_moves();
        if legal.is_empty() {
            return Err(GameError::NoLegalMoves(player));
        }

        if let Some(col) = first_connecting(board, &legal, player)? {
            return Ok((col, Reason::Win));
        }
        if let Some(col) = first_connecting(board, &legal, player.other())? {
            return Ok((col, Reason::Block));
        }

        let col = legal[self.rng.random_range(0..legal.len())];
        Ok((col, Reason::Random))
    }
}

impl Default for HeuristicAgent {
    fn default() -> Self {
        Self::new()
    }
}

/// First column (ascending) where a `player` piece would make four in a row.
fn first_connecting(
    board: &mut Board,
    legal: &[usize],
    player: Player,
) -> Result<Option<usize>, GameError> {
    for &col in legal {
        board.apply_move(col, player)?;
        let connects = check_win(board, player);
        board.undo_move(col)?;
        if connects {
            return Ok(Some(col));
        }
    }
    Ok(None)
}

impl Agent for HeuristicAgent {
    fn select_move(&mut self, state: &mut GameState) -> Result<usize, GameError> {
        let player = state.current_player();
        let (col, reason) = self.choose(state.board_mut(), player)?;
        trace!(%player, col, ?reason, "heuristic move");
        Ok(col)
    }

    fn name(&self) -> &str {
        "Heuristic"
    }
}
