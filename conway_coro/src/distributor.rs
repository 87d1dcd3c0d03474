// distributor.rs - Drives generations and services keys, ticks and I/O between them

use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::control::{self, Command};
use crate::error::{EngineError, Result};
use crate::events::{Event, EventReporter, State};
use crate::grid::Grid;
use crate::io::IoHandle;
use crate::params::Params;
use crate::partition::partition;
use crate::workers;

/// How often the alive count is reported while running.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(2);

/// The collaborators a run talks to.
pub struct DistributorChannels {
    pub events: mpsc::Sender<Event>,
    pub io: IoHandle,
    pub keys: mpsc::Receiver<char>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Running,
    Paused,
    Quitting,
    Done,
}

/// What one pass of the running loop picked.
enum Step {
    Tick,
    Key(char),
    Advance,
}

/// Owns the committed grid and everything that touches it.
pub struct Distributor {
    params: Params,
    ranges: Vec<Range<usize>>,
    tick_interval: Duration,
    io: IoHandle,
    events: EventReporter,
    keys: mpsc::Receiver<char>,
    grid: Arc<Grid>,
    turn: usize,
    phase: Phase,
}

impl Distributor {
    /// Checks every precondition up front; nothing is read or emitted on failure.
    pub fn new(params: Params, channels: DistributorChannels) -> Result<Self> {
        params.validate()?;
        let ranges = partition(params.height, params.threads)?;

        Ok(Self {
            params,
            ranges,
            tick_interval: DEFAULT_TICK_INTERVAL,
            io: channels.io,
            events: EventReporter::new(channels.events),
            keys: channels.keys,
            grid: Arc::new(Grid::new(params.width, params.height)),
            turn: 0,
            phase: Phase::Running,
        })
    }

    /// Sets the alive-count period. A zero period is rejected.
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Result<Self> {
        if tick_interval.is_zero() {
            return Err(EngineError::InvalidParams("tick interval must be non-zero".into()));
        }
        self.tick_interval = tick_interval;
        Ok(self)
    }

    /// Runs to completion: all turns done or a quit key, then the final
    /// state is written and the event stream is closed.
    pub async fn run(mut self) -> Result<()> {
        self.load().await?;

        let mut ticker = time::interval_at(Instant::now() + self.tick_interval, self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while self.phase != Phase::Done {
            match self.phase {
                Phase::Running  => self.poll_running(&mut ticker).await?,
                Phase::Paused   => self.wait_paused(&mut ticker).await?,
                Phase::Quitting => self.finish().await?,
                Phase::Done     => unreachable!(),
            }
        }

        self.events.close();
        Ok(())
    }

    async fn load(&mut self) -> Result<()> {
        let name = self.params.input_name();
        let grid = self.io.read_grid(&name, &self.params).await?;

        let alive = grid.alive_cells();
        info!("loaded {name} with {} alive cells", alive.len());
        self.events.flipped(0, alive).await?;

        self.grid = Arc::new(grid);
        Ok(())
    }

    /// One iteration while running: timer first, then a key, otherwise a generation.
    async fn poll_running(&mut self, ticker: &mut Interval) -> Result<()> {
        if self.turn >= self.params.turns {
            self.phase = Phase::Quitting;
            return Ok(());
        }

        let step = tokio::select! {
            biased;
            _ = ticker.tick() => Step::Tick,
            Some(key) = self.keys.recv() => Step::Key(key),
            _ = std::future::ready(()) => Step::Advance,
        };

        match step {
            Step::Tick => {
                let count = self.grid.alive_count();
                self.events.send(Event::AliveCount { turn: self.turn, count }).await
            }
            Step::Key(key) => self.handle_key(key, ticker).await,
            Step::Advance => self.advance().await,
        }
    }

    /// Blocks on the next key only; no ticks and no generations while paused.
    async fn wait_paused(&mut self, ticker: &mut Interval) -> Result<()> {
        match self.keys.recv().await {
            Some(key) => self.handle_key(key, ticker).await,
            None => {
                warn!("control source closed while paused at turn {}, quitting", self.turn);
                self.phase = Phase::Quitting;
                Ok(())
            }
        }
    }

    async fn handle_key(&mut self, key: char, ticker: &mut Interval) -> Result<()> {
        let paused = self.phase == Phase::Paused;
        let Some(command) = control::decode(key, paused) else {
            return Ok(());
        };

        match command {
            Command::Pause => {
                info!("paused at turn {}", self.turn);
                self.phase = Phase::Paused;
                self.state_changed(State::Paused).await?;
            }
            Command::Resume => {
                info!("resuming at turn {}", self.turn);
                self.phase = Phase::Running;
                ticker.reset();
                self.state_changed(State::Running).await?;
            }
            Command::SaveSnapshot => {
                info!("saving snapshot at turn {}", self.turn);
                self.io.write_grid(self.params.output_name(self.turn), &self.grid).await?;
            }
            Command::Quit => {
                info!("quit requested at turn {}", self.turn);
                self.phase = Phase::Quitting;
            }
        }
        Ok(())
    }

    /// Steps the committed grid once and reports every changed cell.
    async fn advance(&mut self) -> Result<()> {
        let next = workers::next_generation(&self.ranges, &self.grid).await?;
        let flipped = next.diff(&self.grid);
        debug!("turn {}: {} cells flipped", self.turn + 1, flipped.len());

        self.events.flipped(self.turn + 1, flipped).await?;
        self.grid = Arc::new(next);
        self.turn += 1;
        self.events.send(Event::GenerationComplete { turn: self.turn }).await?;

        // Give the timer and the key source a chance even with a single band
        tokio::task::yield_now().await;
        Ok(())
    }

    async fn finish(&mut self) -> Result<()> {
        info!("quitting at turn {}", self.turn);
        self.io.write_grid(self.params.output_name(self.turn), &self.grid).await?;
        self.events
            .send(Event::FinalState { turn: self.turn, alive: self.grid.alive_cells() })
            .await?;

        // Output must be flushed before announcing the quit
        self.io.wait_idle().await?;
        self.state_changed(State::Quitting).await?;
        self.phase = Phase::Done;
        Ok(())
    }

    async fn state_changed(&self, state: State) -> Result<()> {
        self.events.send(Event::StateChanged { turn: self.turn, state }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channels() -> (DistributorChannels, mpsc::Receiver<Event>) {
        let (events, events_rx) = mpsc::channel(16);
        let (io_tx, _io_rx) = mpsc::channel(1);
        let (_keys_tx, keys) = mpsc::channel(1);
        (DistributorChannels { events, io: IoHandle::new(io_tx), keys }, events_rx)
    }

    #[test]
    fn bad_params_fail_before_anything_runs() {
        let (chans, _rx) = channels();
        assert!(matches!(
            Distributor::new(Params::new(4, 2, 1, 3), chans),
            Err(EngineError::TooManyWorkers { workers: 3, rows: 2 })
        ));

        let (chans, _rx) = channels();
        assert!(matches!(
            Distributor::new(Params::new(4, 4, 1, 0), chans),
            Err(EngineError::InvalidParams(_))
        ));
    }

    #[test]
    fn ranges_follow_the_worker_count() {
        let (chans, _rx) = channels();
        let d = Distributor::new(Params::new(4, 10, 1, 4), chans).unwrap();
        assert_eq!(d.ranges, vec![0..3, 3..6, 6..8, 8..10]);
        assert_eq!(d.tick_interval, DEFAULT_TICK_INTERVAL);
    }

    #[tokio::test]
    async fn zero_tick_interval_is_rejected_before_any_io() {
        let (events, mut events_rx) = mpsc::channel(4);
        let (io_tx, mut io_rx) = mpsc::channel(1);
        let (_keys_tx, keys) = mpsc::channel(1);
        let chans = DistributorChannels { events, io: IoHandle::new(io_tx), keys };

        let result = Distributor::new(Params::new(3, 3, 1, 1), chans)
            .unwrap()
            .with_tick_interval(Duration::ZERO);
        assert!(matches!(result, Err(EngineError::InvalidParams(_))));

        // The distributor and its senders are gone; nothing was requested or emitted.
        drop(result);
        assert!(io_rx.recv().await.is_none());
        assert_eq!(events_rx.recv().await, None);
    }

    #[test]
    fn non_zero_tick_interval_is_kept() {
        let (chans, _rx) = channels();
        let d = Distributor::new(Params::new(3, 3, 1, 1), chans)
            .unwrap()
            .with_tick_interval(Duration::from_millis(1))
            .unwrap();
        assert_eq!(d.tick_interval, Duration::from_millis(1));
    }
}
