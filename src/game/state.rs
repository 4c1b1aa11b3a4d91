use super::board::{Board, LegalMoves};
use super::player::Player;
use super::win::{self, Verdict};
use crate::error::{ConsistencyError, MoveError};

/// Board plus side to move and ply count.
///
/// Mutated in place; `apply_move` commits a real move and records the
/// verdict, while search and heuristics speculate directly on the board
/// through [`GameState::board_mut`] and must undo before returning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_player: Player,
    ply: usize,
    outcome: Option<Verdict>,
}

impl GameState {
    /// Create initial game state
    pub fn initial() -> Self {
        GameState {
            board: Board::new(),
            current_player: Player::One,
            ply: 0,
            outcome: None,
        }
    }

    /// Resume from an arbitrary board. The side to move follows from the piece
    /// count, since player one always starts.
    pub fn from_board(board: Board) -> Result<Self, ConsistencyError> {
        let ply = board.piece_count();
        let current_player = if ply % 2 == 0 { Player::One } else { Player::Two };
        let outcome = win::outcome(&board)?;
        Ok(GameState {
            board,
            current_player,
            ply,
            outcome,
        })
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Number of moves played so far
    pub fn ply(&self) -> usize {
        self.ply
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access for speculative apply/undo
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Get game outcome if game is over
    pub fn outcome(&self) -> Option<Verdict> {
        self.outcome
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Get list of legal columns (empty once the game is decided)
    pub fn legal_moves(&self) -> LegalMoves {
        if self.is_terminal() {
            return LegalMoves::new();
        }
        self.board.legal_moves()
    }

    /// Play a move for the current player: apply it, check win then draw, and
    /// hand the turn over.
    pub fn apply_move(&mut self, column: usize) -> Result<Option<Verdict>, MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }

        self.board.apply_move(column, self.current_player)?;

        if win::check_win(&self.board, self.current_player) {
            self.outcome = Some(Verdict::Win(self.current_player));
        } else if win::is_draw(&self.board) {
            self.outcome = Some(Verdict::Draw);
        }

        self.current_player = self.current_player.other();
        self.ply += 1;

        Ok(self.outcome)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}
