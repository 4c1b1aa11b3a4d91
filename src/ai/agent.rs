use crate::error::GameError;
use crate::game::GameState;

/// Universal interface for computer players.
pub trait Agent {
    /// Pick a column for `state.current_player()`.
    ///
    /// Implementations may speculate on `state.board_mut()`, but the board must
    /// be back in its original state on every return path, including errors.
    fn select_move(&mut self, state: &mut GameState) -> Result<usize, GameError>;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}
