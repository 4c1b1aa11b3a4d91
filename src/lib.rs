//! # Connect Four Arena
//!
//! A Connect Four engine for computer-vs-computer play: a gravity board with
//! O(1) apply/undo, four-in-a-row detection, depth-limited negamax search with
//! optional alpha-beta pruning, and a cheaper win/block/random heuristic player.
//!
//! ## Modules
//!
//! - [`game`] — Board, player ids, win detection, game state
//! - [`ai`] — Agent trait, negamax search, heuristic and random players
//! - [`arena`] — Game loop, snapshot observers, multi-game series
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod ai;
pub mod arena;
pub mod config;
pub mod error;
pub mod game;
