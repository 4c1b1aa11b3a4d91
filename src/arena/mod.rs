//! Playing games: the ply-by-ply game loop, observers that receive snapshots
//! and verdicts, and multi-game series with result tallies.

pub mod game_loop;
pub mod observer;
pub mod series;

pub use game_loop::{GameLoop, GameRecord, Phase, MAX_PLIES};
pub use observer::{NullObserver, Observer, TextObserver};
pub use series::{play_series, Contender, MatchStats};
