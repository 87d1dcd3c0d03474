#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use conway_coro::{Distributor, DistributorChannels, Event, Grid, IoCommand, IoHandle, Params};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub type Written = Arc<Mutex<Vec<(String, Vec<u8>)>>>;

/// In-memory image collaborator: serves one input, records every output.
pub fn memory_io(input: Vec<u8>) -> (IoHandle, Written) {
    let (tx, mut rx) = mpsc::channel(4);
    let written: Written = Arc::default();
    let record = Arc::clone(&written);

    tokio::spawn(async move {
        while let Some(cmd) = rx.recv().await {
            match cmd {
                IoCommand::Input { reply, .. } => {
                    let _ = reply.send(input.clone());
                }
                IoCommand::Output { name, cells } => record.lock().unwrap().push((name, cells)),
                IoCommand::CheckIdle { reply } => {
                    let _ = reply.send(());
                }
            }
        }
    });

    (IoHandle::new(tx), written)
}

pub struct Harness {
    pub events: mpsc::Receiver<Event>,
    pub keys: mpsc::Sender<char>,
    pub written: Written,
    pub task: JoinHandle<conway_coro::Result<()>>,
}

impl Harness {
    pub fn start(params: Params, grid: &Grid) -> Self {
        Self::spawn(params, grid, Duration::from_secs(60), "")
    }

    /// Keys in `preload` are queued before the distributor starts, so they
    /// are seen ahead of the first generation.
    pub fn spawn(params: Params, grid: &Grid, tick: Duration, preload: &str) -> Self {
        let (io, written) = memory_io(grid.to_bytes());
        let (events_tx, events) = mpsc::channel(64);
        let (keys, keys_rx) = mpsc::channel(8);
        for key in preload.chars() {
            keys.try_send(key).expect("preload fits the key buffer");
        }

        let channels = DistributorChannels { events: events_tx, io, keys: keys_rx };
        let distributor = Distributor::new(params, channels)
            .expect("valid params")
            .with_tick_interval(tick)
            .expect("non-zero tick");
        let task = tokio::spawn(distributor.run());

        Self { events, keys, written, task }
    }

    pub async fn next(&mut self) -> Event {
        tokio::time::timeout(Duration::from_secs(10), self.events.recv())
            .await
            .expect("timed out waiting for an event")
            .expect("event stream closed early")
    }

    /// Reads until `pred` matches, returning everything seen including the match.
    pub async fn until(&mut self, pred: impl Fn(&Event) -> bool) -> Vec<Event> {
        let mut seen = Vec::new();
        loop {
            let e = self.next().await;
            let hit = pred(&e);
            seen.push(e);
            if hit {
                return seen;
            }
        }
    }

    /// Drains the stream to its end and waits for the task.
    pub async fn finish(mut self) -> (Vec<Event>, Vec<(String, Vec<u8>)>) {
        let mut rest = Vec::new();
        loop {
            let next = tokio::time::timeout(Duration::from_secs(10), self.events.recv())
                .await
                .expect("timed out draining events");
            match next {
                Some(e) => rest.push(e),
                None => break,
            }
        }
        self.task.await.expect("distributor panicked").expect("distributor failed");
        let written = self.written.lock().unwrap().clone();
        (rest, written)
    }
}
