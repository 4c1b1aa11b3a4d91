use std::io::{self, Write};

use crate::game::{Snapshot, Verdict};

/// Consumer of a game as it is played: one snapshot per ply (the empty board
/// is ply 0) and the final verdict.
pub trait Observer {
    fn on_snapshot(&mut self, ply: usize, snapshot: &Snapshot) -> io::Result<()>;

    fn on_finish(&mut self, verdict: Verdict) -> io::Result<()>;
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn on_snapshot(&mut self, _ply: usize, _snapshot: &Snapshot) -> io::Result<()> {
        Ok(())
    }

    fn on_finish(&mut self, _verdict: Verdict) -> io::Result<()> {
        Ok(())
    }
}

/// Writes each board as text, top row first, followed by the verdict.
pub struct TextObserver<W: Write> {
    out: W,
}

impl<W: Write> TextObserver<W> {
    pub fn new(out: W) -> Self {
        TextObserver { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Observer for TextObserver<W> {
    fn on_snapshot(&mut self, ply: usize, snapshot: &Snapshot) -> io::Result<()> {
        writeln!(self.out, "ply {ply}")?;
        writeln!(self.out, "{snapshot}")?;
        writeln!(self.out)
    }

    fn on_finish(&mut self, verdict: Verdict) -> io::Result<()> {
        match verdict {
            Verdict::Win(player) => writeln!(self.out, "{player} wins!")?,
            Verdict::Draw => writeln!(self.out, "Draw! The board is full.")?,
        }
        self.out.flush()
    }
}
