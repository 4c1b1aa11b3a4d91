use serde::{Deserialize, Serialize};
use tracing::{info, trace};

use crate::ai::Agent;
use crate::error::{ConsistencyError, GameError, MoveError};
use crate::game::{win, GameState, Player, Snapshot, Verdict, COLS, ROWS};

use super::observer::Observer;

/// Upper bound on plies in one game.
pub const MAX_PLIES: usize = ROWS * COLS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InProgress,
    Finished(Verdict),
}

/// Permanent record of a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Initial empty board followed by one snapshot per ply.
    pub snapshots: Vec<Snapshot>,
    pub moves: Vec<usize>,
    pub verdict: Verdict,
}

/// Alternates two agents over a single owned [`GameState`] until the game is
/// decided, recording a snapshot per ply.
pub struct GameLoop {
    players: [Box<dyn Agent>; 2],
    state: GameState,
    phase: Phase,
    snapshots: Vec<Snapshot>,
    moves: Vec<usize>,
}

impl GameLoop {
    /// `one` moves first.
    pub fn new(one: Box<dyn Agent>, two: Box<dyn Agent>) -> Self {
        GameLoop {
            players: [one, two],
            state: GameState::initial(),
            phase: Phase::NotStarted,
            snapshots: Vec::with_capacity(MAX_PLIES + 1),
            moves: Vec::with_capacity(MAX_PLIES),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn agent_name(&self, player: Player) -> &str {
        self.players[seat(player)].name()
    }

    /// Record and emit the empty board.
    pub fn start(&mut self, observer: &mut dyn Observer) -> Result<(), GameError> {
        if self.phase != Phase::NotStarted {
            return Ok(());
        }
        let snapshot = self.state.board().snapshot();
        self.snapshots.push(snapshot);
        observer.on_snapshot(0, &snapshot)?;
        self.phase = Phase::InProgress;
        Ok(())
    }

    /// Play one ply: ask the active agent, apply, check win then draw, record
    /// and emit the snapshot.
    pub fn step(&mut self, observer: &mut dyn Observer) -> Result<Phase, GameError> {
        match self.phase {
            Phase::NotStarted => self.start(observer)?,
            Phase::InProgress => {}
            Phase::Finished(_) => return Err(MoveError::GameOver.into()),
        }

        let player = self.state.current_player();
        let before = *self.state.board();
        let agent = &mut self.players[seat(player)];

        let column = agent.select_move(&mut self.state)?;
        if *self.state.board() != before {
            return Err(ConsistencyError::BoardLeftModified(agent.name().to_string()).into());
        }

        let verdict = self
            .state
            .apply_move(column)
            .map_err(|source| GameError::IllegalProposal {
                agent: agent.name().to_string(),
                player,
                column,
                source,
            })?;
        win::winner(self.state.board())?;

        let snapshot = self.state.board().snapshot();
        self.snapshots.push(snapshot);
        self.moves.push(column);
        trace!(ply = self.state.ply(), %player, column, "move played");
        observer.on_snapshot(self.state.ply(), &snapshot)?;

        if let Some(verdict) = verdict {
            self.phase = Phase::Finished(verdict);
            info!(?verdict, plies = self.state.ply(), "game finished");
            observer.on_finish(verdict)?;
        }
        Ok(self.phase)
    }

    /// Play to the end and hand back the record.
    pub fn run(mut self, observer: &mut dyn Observer) -> Result<GameRecord, GameError> {
        self.start(observer)?;
        loop {
            if let Phase::Finished(verdict) = self.step(observer)? {
                return Ok(GameRecord {
                    snapshots: self.snapshots,
                    moves: self.moves,
                    verdict,
                });
            }
        }
    }
}

fn seat(player: Player) -> usize {
    match player {
        Player::One => 0,
        Player::Two => 1,
    }
}
