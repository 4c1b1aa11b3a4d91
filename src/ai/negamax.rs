use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, GameError, MoveError};
use crate::game::{check_win, win, Board, GameState, Player, COLS, ROWS};

use super::agent::Agent;

/// Score of a win on the very next ply. Wins further away score one less per ply.
pub const WIN_SCORE: i32 = 100;

/// Deepest search accepted by [`SearchConfig`].
pub const MAX_DEPTH: u8 = 10;

/// Positional scores are clamped to this magnitude so they stay below every
/// win or loss reachable within `MAX_DEPTH + 1` plies.
pub const POSITIONAL_LIMIT: i32 = WIN_SCORE - MAX_DEPTH as i32 - 2;

const INF: i32 = WIN_SCORE + 1;

/// Trait for evaluating a board position from a player's perspective.
pub trait Heuristic: Send {
    fn evaluate(&self, board: &Board, player: Player) -> i32;
}

/// Default heuristic that scans all 4-cell windows and scores threats.
pub struct ConnectFourHeuristic;

impl ConnectFourHeuristic {
    fn score_window(own: usize, opp: usize, empty: usize) -> i32 {
        match (own, opp, empty) {
            (3, 0, 1) => 5,
            (2, 0, 2) => 2,
            (0, 3, 1) => -8,
            (0, 2, 2) => -2,
            _ => 0,
        }
    }
}

impl Heuristic for ConnectFourHeuristic {
    fn evaluate(&self, board: &Board, player: Player) -> i32 {
        let own_cell = player.to_cell();
        let opp_cell = player.other().to_cell();
        let mut score = 0;

        // Center column bonus
        for row in 0..ROWS {
            let cell = board.get(row, COLS / 2);
            if cell == own_cell {
                score += 1;
            } else if cell == opp_cell {
                score -= 1;
            }
        }

        // Horizontal, vertical, then both diagonals
        let directions: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];
        for (dr, dc) in directions {
            for row in 0..ROWS as i32 {
                for col in 0..COLS as i32 {
                    let end_row = row + 3 * dr;
                    if !(0..ROWS as i32).contains(&end_row) || col + 3 * dc >= COLS as i32 {
                        continue;
                    }
                    let (mut own, mut opp, mut empty) = (0, 0, 0);
                    for i in 0..4 {
                        match board.get((row + i * dr) as usize, (col + i * dc) as usize) {
                            c if c == own_cell => own += 1,
                            c if c == opp_cell => opp += 1,
                            _ => empty += 1,
                        }
                    }
                    score += Self::score_window(own, opp, empty);
                }
            }
        }

        score
    }
}

/// Search settings for one computer player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies searched below the root, 1..=10.
    pub depth: u8,
    /// Prune with alpha-beta. Picks the same move and score as plain negamax.
    pub alpha_beta: bool,
    /// Score quiet horizon nodes with [`ConnectFourHeuristic`] instead of 0.
    pub positional: bool,
    /// Draw uniformly among equally scored best moves instead of the lowest column.
    pub random_ties: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: 5,
            alpha_beta: true,
            positional: false,
            random_ties: false,
        }
    }
}

impl SearchConfig {
    pub fn with_depth(depth: u8) -> Self {
        SearchConfig {
            depth,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 || self.depth > MAX_DEPTH {
            return Err(ConfigError::InvalidDepth(self.depth));
        }
        Ok(())
    }
}

/// Best root move, its score for the side to move, and nodes visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub column: usize,
    pub score: i32,
    pub nodes: u64,
}

/// Depth-limited negamax over a mutable board.
///
/// Scores are always from the perspective of the side to move at the node.
/// A lost node scores `-(WIN_SCORE - ply)`, where `ply` counts moves from the
/// root, so faster wins and slower losses are preferred.
pub struct SearchEngine {
    config: SearchConfig,
    heuristic: Option<Box<dyn Heuristic>>,
    rng: Option<StdRng>,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let heuristic: Option<Box<dyn Heuristic>> = if config.positional {
            Some(Box::new(ConnectFourHeuristic))
        } else {
            None
        };
        let rng = config.random_ties.then(StdRng::from_os_rng);
        Ok(SearchEngine {
            config,
            heuristic,
            rng,
        })
    }

    /// Replace the positional evaluator. Enables positional scoring.
    pub fn with_heuristic(mut self, heuristic: Box<dyn Heuristic>) -> Self {
        self.config.positional = true;
        self.heuristic = Some(heuristic);
        self
    }

    /// Inject the random source used for tie-breaks. Enables random ties.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.config.random_ties = true;
        self.rng = Some(rng);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Pick the best column for `player`. The board is restored before returning.
    pub fn search(&mut self, board: &mut Board, player: Player) -> Result<SearchResult, GameError> {
        if win::winner(board)?.is_some() || board.is_full() {
            return Err(ConfigError::TerminalPosition.into());
        }

        let depth = self.config.depth as usize;
        let mut nodes = 1;
        let mut best_score = -INF;
        let mut best_moves: Vec<usize> = Vec::with_capacity(COLS);

        for col in board.legal_moves() {
            board.apply_move(col, player)?;
            let child = if self.config.alpha_beta {
                // With random ties the window stays open one point below the best
                // so that equal moves come back with exact scores.
                let floor = if self.config.random_ties {
                    best_score - 1
                } else {
                    best_score
                };
                self.alpha_beta(board, depth - 1, 1, player.other(), -INF, -floor, &mut nodes)
            } else {
                self.negamax(board, depth - 1, 1, player.other(), &mut nodes)
            };
            board.undo_move(col)?;
            let score = -child?;

            if score > best_score {
                best_score = score;
                best_moves.clear();
                best_moves.push(col);
            } else if score == best_score {
                best_moves.push(col);
            }
        }

        let column = match (self.config.random_ties, self.rng.as_mut()) {
            (true, Some(rng)) if best_moves.len() > 1 => {
                best_moves[rng.random_range(0..best_moves.len())]
            }
            _ => best_moves[0],
        };

        debug!(
            %player,
            column,
            score = best_score,
            nodes,
            depth,
            tied = best_moves.len(),
            "search finished"
        );

        Ok(SearchResult {
            column,
            score: best_score,
            nodes,
        })
    }

    /// Exact score for nodes where the game has ended. `player` is to move.
    fn terminal_score(board: &Board, player: Player, ply: usize) -> Option<i32> {
        if check_win(board, player.other()) {
            Some(-(WIN_SCORE - ply as i32))
        } else if board.is_full() {
            Some(0)
        } else {
            None
        }
    }

    /// Horizon score: an immediate win for the side to move is exact,
    /// otherwise the clamped positional estimate or 0.
    fn leaf_score(&self, board: &Board, player: Player, ply: usize) -> i32 {
        if (0..COLS).any(|col| board.completes_four(col, player)) {
            return WIN_SCORE - (ply as i32 + 1);
        }
        match &self.heuristic {
            Some(heuristic) => heuristic
                .evaluate(board, player)
                .clamp(-POSITIONAL_LIMIT, POSITIONAL_LIMIT),
            None => 0,
        }
    }

    fn negamax(
        &self,
        board: &mut Board,
        depth: usize,
        ply: usize,
        player: Player,
        nodes: &mut u64,
    ) -> Result<i32, MoveError> {
        *nodes += 1;

        if let Some(score) = Self::terminal_score(board, player, ply) {
            return Ok(score);
        }
        if depth == 0 {
            return Ok(self.leaf_score(board, player, ply));
        }

        let mut best = -INF;
        for col in board.legal_moves() {
            board.apply_move(col, player)?;
            let child = self.negamax(board, depth - 1, ply + 1, player.other(), nodes);
            board.undo_move(col)?;
            best = best.max(-child?);
        }
        Ok(best)
    }

    #[allow(clippy::too_many_arguments)]
    fn alpha_beta(
        &self,
        board: &mut Board,
        depth: usize,
        ply: usize,
        player: Player,
        mut alpha: i32,
        beta: i32,
        nodes: &mut u64,
    ) -> Result<i32, MoveError> {
        *nodes += 1;

        if let Some(score) = Self::terminal_score(board, player, ply) {
            return Ok(score);
        }
        if depth == 0 {
            return Ok(self.leaf_score(board, player, ply));
        }

        let mut best = -INF;
        for col in board.legal_moves() {
            board.apply_move(col, player)?;
            let child =
                self.alpha_beta(board, depth - 1, ply + 1, player.other(), -beta, -alpha, nodes);
            board.undo_move(col)?;
            let score = -child?;

            if score > best {
                best = score;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break;
            }
        }
        Ok(best)
    }
}

/// One-shot search with default settings at the given depth.
pub fn search(board: &mut Board, depth: u8, player: Player) -> Result<SearchResult, GameError> {
    SearchEngine::new(SearchConfig::with_depth(depth))?.search(board, player)
}

/// Computer player backed by [`SearchEngine`].
pub struct NegamaxAgent {
    engine: SearchEngine,
    name: String,
}

impl NegamaxAgent {
    pub fn new(config: SearchConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_engine(SearchEngine::new(config)?))
    }

    /// Deterministic agent: seeded tie-breaks when `config.random_ties` is set.
    pub fn seeded(config: SearchConfig, seed: u64) -> Result<Self, ConfigError> {
        let mut engine = SearchEngine::new(config)?;
        if config.random_ties {
            engine = engine.with_rng(StdRng::seed_from_u64(seed));
        }
        Ok(Self::from_engine(engine))
    }

    pub fn from_engine(engine: SearchEngine) -> Self {
        let name = format!("Negamax(depth {})", engine.config().depth);
        NegamaxAgent { engine, name }
    }

    pub fn depth(&self) -> u8 {
        self.engine.config().depth
    }
}

impl Agent for NegamaxAgent {
    fn select_move(&mut self, state: &mut GameState) -> Result<usize, GameError> {
        let player = state.current_player();
        let result = self.engine.search(state.board_mut(), player)?;
        Ok(result.column)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::ai::RandomAgent;
    use crate::error::ConsistencyError;
    use crate::game::Verdict;

    fn engine(depth: u8, alpha_beta: bool) -> SearchEngine {
        SearchEngine::new(SearchConfig {
            depth,
            alpha_beta,
            ..Default::default()
        })
        .unwrap()
    }

    fn play(moves: &[usize]) -> GameState {
        let mut state = GameState::initial();
        for &col in moves {
            state.apply_move(col).unwrap();
        }
        state
    }

    /// Unique undecided positions reachable within `plies` moves.
    fn reachable(plies: usize) -> Vec<(Board, Player)> {
        fn walk(
            board: &mut Board,
            player: Player,
            left: usize,
            seen: &mut HashSet<Board>,
            out: &mut Vec<(Board, Player)>,
        ) {
            if check_win(board, player.other()) || board.is_full() || !seen.insert(*board) {
                return;
            }
            out.push((*board, player));
            if left == 0 {
                return;
            }
            for col in board.legal_moves() {
                board.apply_move(col, player).unwrap();
                walk(board, player.other(), left - 1, seen, out);
                board.undo_move(col).unwrap();
            }
        }
        let mut out = Vec::new();
        walk(&mut Board::new(), Player::One, plies, &mut HashSet::new(), &mut out);
        out
    }

    fn allows_immediate_win(board: &mut Board, col: usize, player: Player) -> bool {
        board.apply_move(col, player).unwrap();
        let result = !check_win(board, player)
            && (0..COLS).any(|c| board.completes_four(c, player.other()));
        board.undo_move(col).unwrap();
        result
    }

    // --- Heuristic tests ---

    #[test]
    fn heuristic_empty_board_is_zero() {
        let board = Board::new();
        let h = ConnectFourHeuristic;
        assert_eq!(h.evaluate(&board, Player::One), 0);
        assert_eq!(h.evaluate(&board, Player::Two), 0);
    }

    #[test]
    fn heuristic_center_preference() {
        let h = ConnectFourHeuristic;
        let mut board_center = Board::new();
        board_center.apply_move(3, Player::One).unwrap();
        let mut board_edge = Board::new();
        board_edge.apply_move(0, Player::One).unwrap();

        let score_center = h.evaluate(&board_center, Player::One);
        let score_edge = h.evaluate(&board_edge, Player::One);
        assert!(
            score_center > score_edge,
            "Center ({score_center}) should score higher than edge ({score_edge})"
        );
    }

    #[test]
    fn heuristic_three_in_a_row_scores_high() {
        let h = ConnectFourHeuristic;
        let mut board = Board::new();
        for col in 0..3 {
            board.apply_move(col, Player::One).unwrap();
        }
        assert!(h.evaluate(&board, Player::One) > 4);
        assert!(h.evaluate(&board, Player::Two) < -4);
    }

    // --- Configuration ---

    #[test]
    fn rejects_depth_out_of_range() {
        for depth in [0, MAX_DEPTH + 1] {
            let err = SearchEngine::new(SearchConfig::with_depth(depth)).err();
            assert!(matches!(err, Some(ConfigError::InvalidDepth(d)) if d == depth));
        }
        assert!(SearchEngine::new(SearchConfig::with_depth(1)).is_ok());
        assert!(SearchEngine::new(SearchConfig::with_depth(MAX_DEPTH)).is_ok());
    }

    #[test]
    fn rejects_terminal_position() {
        let state = play(&[0, 1, 0, 1, 0, 1, 0]);
        assert_eq!(state.outcome(), Some(Verdict::Win(Player::One)));
        let mut board = *state.board();

        let err = engine(3, true).search(&mut board, Player::Two).unwrap_err();
        assert!(matches!(err, GameError::Config(ConfigError::TerminalPosition)));
        assert_eq!(board, *state.board());
    }

    #[test]
    fn rejects_inconsistent_board() {
        let mut board = Board::from_grid([
            [1, 1, 1, 1, 2, 2, 2],
            [2, 0, 0, 0, 0, 0, 0],
            [2, 0, 0, 0, 0, 0, 0],
            [2, 0, 0, 0, 0, 0, 0],
            [2, 0, 0, 0, 0, 0, 0],
            [0; COLS],
        ])
        .unwrap();
        let err = engine(2, false).search(&mut board, Player::One).unwrap_err();
        assert!(matches!(
            err,
            GameError::Consistency(ConsistencyError::BothPlayersConnected)
        ));
    }

    // --- Algorithm tests ---

    #[test]
    fn search_restores_board() {
        let state = play(&[3, 3, 2, 4]);
        let mut board = *state.board();
        for alpha_beta in [false, true] {
            engine(4, alpha_beta).search(&mut board, Player::One).unwrap();
            assert_eq!(board, *state.board());
        }
    }

    #[test]
    fn takes_winning_move() {
        // Player one has three along the bottom, column 3 wins
        let state = play(&[0, 0, 1, 1, 2, 2]);
        let mut board = *state.board();
        for depth in 1..=5 {
            let result = engine(depth, true).search(&mut board, Player::One).unwrap();
            assert_eq!(result.column, 3, "depth {depth}");
            assert_eq!(result.score, WIN_SCORE - 1);
        }
    }

    #[test]
    fn blocks_opponent_win() {
        // Player two has [0, 1, 2] on the bottom row; player one must block col 3
        let state = play(&[6, 0, 6, 1, 5, 2]);
        let mut board = *state.board();
        for depth in 1..=5 {
            let result = engine(depth, true).search(&mut board, Player::One).unwrap();
            assert_eq!(result.column, 3, "depth {depth}");
        }
    }

    #[test]
    fn prefers_win_over_block() {
        // Both players threaten column 3; player one moves first and wins
        let state = play(&[0, 0, 1, 1, 2, 2]);
        let mut board = *state.board();
        let result = engine(4, true).search(&mut board, Player::One).unwrap();
        assert_eq!(result.column, 3);
        assert!(result.score > 0);
    }

    #[test]
    fn sees_forced_loss_one_move_out() {
        // Open three on the bottom for player one: (1, 2, 3) with 0 and 4 free.
        // Player two cannot cover both ends.
        let state = play(&[1, 1, 2, 2, 3]);
        let mut board = *state.board();
        for depth in 1..=3 {
            let result = engine(depth, false).search(&mut board, Player::Two).unwrap();
            assert_eq!(result.score, -(WIN_SCORE - 2), "depth {depth}");
        }
    }

    #[test]
    fn ties_break_to_lowest_column() {
        let mut board = Board::new();
        let result = engine(1, false).search(&mut board, Player::One).unwrap();
        assert_eq!(result.column, 0);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn alpha_beta_matches_plain_negamax() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut positions = vec![GameState::initial()];
        while positions.len() < 40 {
            let mut state = GameState::initial();
            let plies = rng.random_range(1..16);
            for _ in 0..plies {
                let legal = state.legal_moves();
                if legal.is_empty() {
                    break;
                }
                state.apply_move(legal[rng.random_range(0..legal.len())]).unwrap();
            }
            if !state.is_terminal() {
                positions.push(state);
            }
        }

        for positional in [false, true] {
            for depth in 1..=4 {
                let config = SearchConfig {
                    depth,
                    positional,
                    ..Default::default()
                };
                let mut plain = SearchEngine::new(SearchConfig {
                    alpha_beta: false,
                    ..config
                })
                .unwrap();
                let mut pruned = SearchEngine::new(config).unwrap();

                for state in &positions {
                    let mut board = *state.board();
                    let player = state.current_player();
                    let a = plain.search(&mut board, player).unwrap();
                    let b = pruned.search(&mut board, player).unwrap();
                    assert_eq!(
                        (a.column, a.score),
                        (b.column, b.score),
                        "depth {depth}, positional {positional}, board {:?}",
                        board.snapshot()
                    );
                    assert!(b.nodes <= a.nodes);
                }
            }
        }
    }

    #[test]
    fn alpha_beta_matches_plain_negamax_with_random_ties() {
        for seed in 0..20 {
            let config = SearchConfig {
                depth: 3,
                random_ties: true,
                ..Default::default()
            };
            let mut plain = NegamaxAgent::seeded(
                SearchConfig {
                    alpha_beta: false,
                    ..config
                },
                seed,
            )
            .unwrap();
            let mut pruned = NegamaxAgent::seeded(config, seed).unwrap();
            let mut state = play(&[3, 2]);
            assert_eq!(
                plain.select_move(&mut state).unwrap(),
                pruned.select_move(&mut state).unwrap()
            );
        }
    }

    #[test]
    fn random_ties_are_reproducible_and_varied() {
        let config = SearchConfig {
            depth: 1,
            random_ties: true,
            ..Default::default()
        };
        let mut picks = HashSet::new();
        for seed in 0..50 {
            let mut a = NegamaxAgent::seeded(config, seed).unwrap();
            let mut b = NegamaxAgent::seeded(config, seed).unwrap();
            let mut state = GameState::initial();
            let col = a.select_move(&mut state).unwrap();
            assert_eq!(col, b.select_move(&mut state).unwrap());
            picks.insert(col);
        }
        assert!(picks.len() > 1, "random ties always picked {picks:?}");
    }

    #[test]
    fn random_ties_only_draw_from_best_moves() {
        let config = SearchConfig {
            depth: 3,
            random_ties: true,
            ..Default::default()
        };
        for seed in 0..20 {
            let mut agent = NegamaxAgent::seeded(config, seed).unwrap();
            let mut state = play(&[0, 0, 1, 1, 2, 2]);
            assert_eq!(agent.select_move(&mut state).unwrap(), 3);
        }
    }

    #[test]
    fn never_allows_immediate_loss_when_avoidable() {
        let checks: [(u8, usize); 3] = [(1, 6), (2, 5), (3, 4)];
        for (depth, plies) in checks {
            let mut search = engine(depth, true);
            for (board, player) in reachable(plies) {
                let mut board = board;
                let legal = board.legal_moves();
                let avoidable = legal
                    .iter()
                    .any(|&col| !allows_immediate_win(&mut board, col, player));
                if !avoidable {
                    continue;
                }
                let result = search.search(&mut board, player).unwrap();
                assert!(
                    !allows_immediate_win(&mut board, result.column, player),
                    "depth {depth} chose losing column {} on\n{}",
                    result.column,
                    board.snapshot()
                );
            }
        }
    }

    #[test]
    fn positional_scores_stay_inside_win_bounds() {
        struct Extreme(i32);
        impl Heuristic for Extreme {
            fn evaluate(&self, _board: &Board, _player: Player) -> i32 {
                self.0
            }
        }

        let state = play(&[6, 0, 6, 1, 5, 2]);
        for value in [i32::MIN + 1, i32::MAX] {
            let mut search = SearchEngine::new(SearchConfig::with_depth(2))
                .unwrap()
                .with_heuristic(Box::new(Extreme(value)));
            let mut board = *state.board();
            let result = search.search(&mut board, Player::One).unwrap();
            assert_eq!(result.column, 3);
            assert!(result.score.abs() <= POSITIONAL_LIMIT);
        }
    }

    #[test]
    fn search_helper_uses_requested_depth() {
        let mut board = Board::new();
        assert!(matches!(
            search(&mut board, 0, Player::One),
            Err(GameError::Config(ConfigError::InvalidDepth(0)))
        ));
        let result = search(&mut board, 2, Player::One).unwrap();
        assert!(board.legal_moves().contains(&result.column));
    }

    // --- Integration tests ---

    #[test]
    fn full_game_vs_self_completes() {
        let mut agent1 = NegamaxAgent::new(SearchConfig::with_depth(4)).unwrap();
        let mut agent2 = NegamaxAgent::new(SearchConfig::with_depth(4)).unwrap();
        let mut state = GameState::initial();

        while !state.is_terminal() && state.ply() < 42 {
            let action = if state.ply() % 2 == 0 {
                agent1.select_move(&mut state).unwrap()
            } else {
                agent2.select_move(&mut state).unwrap()
            };
            state.apply_move(action).unwrap();
        }

        assert!(state.is_terminal(), "Game should complete");
    }

    #[test]
    fn beats_random_agent() {
        let games_per_color = 10;
        let mut negamax_wins = 0;
        let total = games_per_color * 2;

        for seed in 0..games_per_color as u64 {
            for negamax_player in [Player::One, Player::Two] {
                let mut negamax = NegamaxAgent::new(SearchConfig {
                    depth: 4,
                    positional: true,
                    ..Default::default()
                })
                .unwrap();
                let mut random = RandomAgent::seeded(seed);
                let mut state = GameState::initial();

                while !state.is_terminal() {
                    let action = if state.current_player() == negamax_player {
                        negamax.select_move(&mut state).unwrap()
                    } else {
                        random.select_move(&mut state).unwrap()
                    };
                    state.apply_move(action).unwrap();
                }

                if state.outcome() == Some(Verdict::Win(negamax_player)) {
                    negamax_wins += 1;
                }
            }
        }

        assert!(
            negamax_wins * 10 >= total * 8,
            "Negamax should beat random at least 80% of the time, got {negamax_wins}/{total}"
        );
    }

    #[test]
    fn name_reports_depth() {
        let agent = NegamaxAgent::new(SearchConfig::with_depth(7)).unwrap();
        assert_eq!(agent.name(), "Negamax(depth 7)");
        assert_eq!(agent.depth(), 7);
    }
}
