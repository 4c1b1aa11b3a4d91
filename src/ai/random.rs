use crate::error::GameError;
use crate::game::GameState;
use rand::Rng;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::agent::Agent;

/// An agent that selects uniformly at random from legal moves.
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        RandomAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn select_move(&mut self, state: &mut GameState) -> Result<usize, GameError> {
        let moves = state.legal_moves();
        if moves.is_empty() {
            return Err(GameError::NoLegalMoves(state.current_player()));
        }
        let idx = self.rng.random_range(0..moves.len());
        Ok(moves[idx])
    }

    fn name(&self) -> &str {
        "Random"
    }
}
