use std::path::PathBuf;

use crate::game::Player;

/// Errors raised when a move cannot be applied to the board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {0} is out of range (expected 0..=6)")]
    InvalidColumn(usize),

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("column {0} is empty, nothing to undo")]
    ColumnEmpty(usize),

    #[error("game is already over")]
    GameOver,
}

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),

    #[error("search depth {0} is outside the supported range 1..=10")]
    InvalidDepth(u8),

    #[error("cannot search a position that is already decided")]
    TerminalPosition,
}

/// A board that violates an invariant upstream. Always fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsistencyError {
    #[error("unrecognized cell value {value} at row {row}, column {col}")]
    UnknownCell { row: usize, col: usize, value: u8 },

    #[error("piece at row {row}, column {col} is floating above an empty cell")]
    FloatingPiece { row: usize, col: usize },

    #[error("both players have four in a row")]
    BothPlayersConnected,

    #[error("{0} left speculative pieces on the board")]
    BoardLeftModified(String),
}

/// Errors surfaced while playing a game.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("invalid move: {0}")]
    Move(#[from] MoveError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("internal consistency error: {0}")]
    Consistency(#[from] ConsistencyError),

    #[error("{agent} proposed column {column} for {player}: {source}")]
    IllegalProposal {
        agent: String,
        player: Player,
        column: usize,
        source: MoveError,
    },

    #[error("no legal moves left for {0}")]
    NoLegalMoves(Player),

    #[error("observer failed: {0}")]
    Observer(#[from] std::io::Error),
}
