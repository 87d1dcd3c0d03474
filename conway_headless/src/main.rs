// main.rs - Headless runner: raw image files in and out, keys from stdin, events to the log

use std::path::{Path, PathBuf};

use anyhow::Context;
use conway_coro::patterns::{self, Pattern};
use conway_coro::{DistributorChannels, Event, Grid, IoCommand, IoHandle, Params};
use log::{debug, info, trace, warn};
use tokio::sync::mpsc;

mod config;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let params = config.params;
    info!(
        "{}x{} grid, {} turns on {} workers",
        params.width, params.height, params.turns, params.threads
    );

    let (io_tx, io_rx) = mpsc::channel(1);
    let (events_tx, events_rx) = mpsc::channel(1024);
    let (keys_tx, keys_rx) = mpsc::channel(16);

    let seed = Seed { params, pattern: config.pattern };
    let io_task = tokio::spawn(serve_files(config.images, config.out, seed, io_rx));
    read_keys(keys_tx);
    let observer = tokio::spawn(log_events(events_rx));

    let channels = DistributorChannels { events: events_tx, io: IoHandle::new(io_tx), keys: keys_rx };
    let outcome = match conway_coro::Distributor::new(params, channels)
        .and_then(|d| d.with_tick_interval(config.tick))
    {
        Ok(distributor) => distributor.run().await,
        Err(e) => Err(e),
    };

    // The distributor dropped its I/O handle, so the server has wound down
    settle(outcome, io_task.await?)?;
    observer.await?;
    Ok(())
}

/// Reports the image server's failure ahead of the engine's.
fn settle(engine: conway_coro::Result<()>, io: anyhow::Result<()>) -> anyhow::Result<()> {
    io.context("image collaborator failed")?;
    engine?;
    Ok(())
}

/// Stands in for a missing input image.
struct Seed {
    params: Params,
    pattern: Option<&'static Pattern>,
}

/// Answers image requests from `{images}/{name}.raw`, writing to `{out}/{name}.raw`.
async fn serve_files(
    images: PathBuf,
    out: PathBuf,
    seed: Seed,
    mut rx: mpsc::Receiver<IoCommand>,
) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(&out)
        .await
        .with_context(|| format!("creating {}", out.display()))?;

    while let Some(cmd) = rx.recv().await {
        match cmd {
            IoCommand::Input { name, reply } => {
                let bytes = load_or_seed(&images, &name, &seed).await?;
                let _ = reply.send(bytes);
            }
            IoCommand::Output { name, cells } => {
                let path = out.join(format!("{name}.raw"));
                tokio::fs::write(&path, &cells)
                    .await
                    .with_context(|| format!("writing {}", path.display()))?;
                info!("wrote {}", path.display());
            }
            IoCommand::CheckIdle { reply } => {
                let _ = reply.send(());
            }
        }
    }
    Ok(())
}

async fn load_or_seed(images: &Path, name: &str, seed: &Seed) -> anyhow::Result<Vec<u8>> {
    let path = images.join(format!("{name}.raw"));
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let Seed { params, pattern } = seed;
            let mut grid = Grid::new(params.width, params.height);
            match pattern {
                Some(pattern) => {
                    info!("{} not found, seeding with {}", path.display(), pattern.name);
                    patterns::place(&mut grid, pattern, params.height / 2, params.width / 2);
                }
                None => {
                    info!("{} not found, seeding at random", path.display());
                    patterns::random_fill(&mut grid, 0);
                }
            }
            Ok(grid.to_bytes())
        }
        Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
    }
}

/// Forwards the first character of every stdin line.
///
/// Runs on its own thread so a pending read never holds up runtime shutdown.
fn read_keys(tx: mpsc::Sender<char>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("stdin: {e}");
                    return;
                }
            };
            let Some(key) = line.trim().chars().next() else { continue };
            if tx.blocking_send(key).is_err() {
                return;
            }
        }
    });
}

async fn log_events(mut rx: mpsc::Receiver<Event>) {
    while let Some(event) = rx.recv().await {
        match &event {
            Event::CellFlipped { .. } => trace!("{event}"),
            Event::StateChanged { .. } | Event::AliveCount { .. } | Event::FinalState { .. } => {
                info!("{event}")
            }
            Event::GenerationComplete { turn } if turn % 100 == 0 => info!("{event}"),
            Event::GenerationComplete { .. } => trace!("{event}"),
        }
    }
    debug!("event stream closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use conway_coro::patterns::BLOCK;
    use conway_coro::EngineError;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("conway_headless_{tag}_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn missing_input_is_seeded_from_the_pattern() {
        let dir = scratch_dir("seed");
        let seed = Seed { params: Params::new(8, 8, 1, 1), pattern: Some(&BLOCK) };

        let bytes = load_or_seed(&dir, "8x8", &seed).await.unwrap();
        let grid = Grid::from_bytes(8, 8, &bytes);
        assert_eq!(grid.alive_count(), 4);
        assert!(grid.get(4, 4).is_alive());
    }

    #[tokio::test]
    async fn existing_input_is_read_verbatim() {
        let dir = scratch_dir("read");
        std::fs::write(dir.join("2x2.raw"), [0u8, 255, 255, 0]).unwrap();
        let seed = Seed { params: Params::new(2, 2, 1, 1), pattern: None };

        let bytes = load_or_seed(&dir, "2x2", &seed).await.unwrap();
        assert_eq!(bytes, vec![0, 255, 255, 0]);
    }

    #[tokio::test]
    async fn outputs_land_in_the_out_dir() {
        let images = scratch_dir("images");
        let out = scratch_dir("out").join("nested");
        let (tx, rx) = mpsc::channel(1);
        let seed = Seed { params: Params::new(2, 2, 1, 1), pattern: None };
        let server = tokio::spawn(serve_files(images, out.clone(), seed, rx));

        let io = IoHandle::new(tx);
        let mut grid = Grid::new(2, 2);
        grid.set(1, 1, conway_coro::CellState::Alive);
        io.write_grid("2x2x7".into(), &grid).await.unwrap();
        io.wait_idle().await.unwrap();
        drop(io);
        server.await.unwrap().unwrap();

        assert_eq!(std::fs::read(out.join("2x2x7.raw")).unwrap(), vec![0, 0, 0, 255]);
    }

    #[tokio::test]
    async fn unreadable_input_surfaces_the_file_error() {
        let images = scratch_dir("unreadable");
        // A directory where the image should be: reading fails with something other than NotFound.
        std::fs::create_dir_all(images.join("3x3.raw")).unwrap();
        let out = scratch_dir("unreadable_out");
        let (tx, rx) = mpsc::channel(1);
        let seed = Seed { params: Params::new(3, 3, 1, 1), pattern: None };
        let server = tokio::spawn(serve_files(images, out, seed, rx));

        let io = IoHandle::new(tx);
        let engine = io.read_grid("3x3", &Params::new(3, 3, 1, 1)).await.map(|_| ());
        assert!(matches!(engine, Err(EngineError::InputUnavailable(_))));
        drop(io);

        let err = settle(engine, server.await.unwrap()).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.starts_with("image collaborator failed"), "{chain}");
        assert!(chain.contains("reading"), "{chain}");
    }

    #[test]
    fn engine_error_is_reported_when_io_succeeded() {
        let err = settle(Err(EngineError::IoClosed), Ok(())).unwrap_err();
        assert!(err.downcast_ref::<EngineError>().is_some());
        assert!(settle(Ok(()), Ok(())).is_ok());
    }
}
