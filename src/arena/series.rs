use tracing::info;

use crate::ai::Agent;
use crate::error::GameError;
use crate::game::{Player, Verdict};

use super::game_loop::GameLoop;
use super::observer::NullObserver;

/// Which of the two configured contenders a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Contender {
    First,
    Second,
}

/// Result tally over a series of games.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub games: usize,
    pub first_wins: usize,
    pub second_wins: usize,
    pub draws: usize,
    /// Wins by whoever moved first, regardless of contender.
    pub opener_wins: usize,
    pub total_plies: usize,
}

impl MatchStats {
    pub fn record(&mut self, winner: Option<Contender>, opener_won: bool, plies: usize) {
        self.games += 1;
        self.total_plies += plies;
        match winner {
            Some(Contender::First) => self.first_wins += 1,
            Some(Contender::Second) => self.second_wins += 1,
            None => self.draws += 1,
        }
        if opener_won {
            self.opener_wins += 1;
        }
    }

    pub fn wins(&self, contender: Contender) -> usize {
        match contender {
            Contender::First => self.first_wins,
            Contender::Second => self.second_wins,
        }
    }

    pub fn win_rate(&self, contender: Contender) -> f32 {
        if self.games == 0 {
            return 0.0;
        }
        self.wins(contender) as f32 / self.games as f32
    }

    pub fn draw_rate(&self) -> f32 {
        if self.games == 0 {
            return 0.0;
        }
        self.draws as f32 / self.games as f32
    }

    pub fn average_length(&self) -> f32 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_plies as f32 / self.games as f32
    }
}

/// Plays `games` games between two agent factories. Each factory receives the
/// game index so it can derive a per-game seed. With `alternate_first`, the
/// second contender opens every odd-numbered game.
pub fn play_series<F, S>(
    games: usize,
    alternate_first: bool,
    mut make_first: F,
    mut make_second: S,
) -> Result<MatchStats, GameError>
where
    F: FnMut(usize) -> Result<Box<dyn Agent>, GameError>,
    S: FnMut(usize) -> Result<Box<dyn Agent>, GameError>,
{
    let mut stats = MatchStats::default();

    for game in 0..games {
        let first = make_first(game)?;
        let second = make_second(game)?;
        let swapped = alternate_first && game % 2 == 1;
        let (one, two) = if swapped { (second, first) } else { (first, second) };

        let record = GameLoop::new(one, two).run(&mut NullObserver)?;
        let winner = match record.verdict {
            Verdict::Win(player) => Some(contender_for(player, swapped)),
            Verdict::Draw => None,
        };
        stats.record(
            winner,
            record.verdict == Verdict::Win(Player::One),
            record.moves.len(),
        );
        info!(game, ?winner, plies = record.moves.len(), "series game finished");
    }

    Ok(stats)
}

fn contender_for(player: Player, swapped: bool) -> Contender {
    match (player, swapped) {
        (Player::One, false) | (Player::Two, true) => Contender::First,
        (Player::Two, false) | (Player::One, true) => Contender::Second,
    }
}
