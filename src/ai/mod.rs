//! Computer players: the agent trait, depth-limited negamax search, the
//! win/block/random heuristic, and a uniform random baseline.

mod agent;
mod heuristic;
pub mod negamax;
mod random;

pub use agent::Agent;
pub use heuristic::{HeuristicAgent, Reason};
pub use negamax::{
    search, ConnectFourHeuristic, Heuristic, NegamaxAgent, SearchConfig, SearchEngine,
    SearchResult, MAX_DEPTH, WIN_SCORE,
};
pub use random::RandomAgent;
