// events.rs - Event stream reported to observers

use std::fmt;

use tokio::sync::mpsc;

use crate::error::{EngineError, Result};
use crate::grid::Coord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Paused,
    Quitting,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            State::Running  => "Running",
            State::Paused   => "Paused",
            State::Quitting => "Quitting",
        };
        f.write_str(s)
    }
}

/// Everything an observer learns about a run, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    CellFlipped { turn: usize, cell: Coord },
    GenerationComplete { turn: usize },
    AliveCount { turn: usize, count: usize },
    StateChanged { turn: usize, state: State },
    FinalState { turn: usize, alive: Vec<Coord> },
}

impl Event {
    pub fn turn(&self) -> usize {
        match *self {
            Event::CellFlipped { turn, .. }
            | Event::GenerationComplete { turn }
            | Event::AliveCount { turn, .. }
            | Event::StateChanged { turn, .. }
            | Event::FinalState { turn, .. } => turn,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::CellFlipped { turn, cell }      => write!(f, "turn {turn}: cell {cell} flipped"),
            Event::GenerationComplete { turn }     => write!(f, "turn {turn}: generation complete"),
            Event::AliveCount { turn, count }      => write!(f, "turn {turn}: {count} cells alive"),
            Event::StateChanged { turn, state }    => write!(f, "turn {turn}: {state}"),
            Event::FinalState { turn, alive }      => write!(f, "turn {turn}: finished with {} cells alive", alive.len()),
        }
    }
}

/// Append-only sending side of the event stream.
///
/// `close` consumes the reporter, so nothing can be sent after the stream ends.
pub struct EventReporter {
    tx: mpsc::Sender<Event>,
}

impl EventReporter {
    pub fn new(tx: mpsc::Sender<Event>) -> Self {
        Self { tx }
    }

    pub async fn send(&self, event: Event) -> Result<()> {
        self.tx.send(event).await.map_err(|_| EngineError::EventsClosed)
    }

    pub async fn flipped(&self, turn: usize, cells: impl IntoIterator<Item = Coord>) -> Result<()> {
        for cell in cells {
            self.send(Event::CellFlipped { turn, cell }).await?;
        }
        Ok(())
    }

    pub fn close(self) {
        drop(self.tx);
    }
}
