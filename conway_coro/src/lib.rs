// lib.rs - Parallel Conway's Game of Life on a torus
//
// A distributor task owns the grid, splits its rows into bands, steps each
// band on its own worker task and joins them all before committing the next
// generation. Between generations it polls a timer and a key source.

pub mod control;
pub mod distributor;
pub mod error;
pub mod events;
pub mod generation;
pub mod grid;
pub mod io;
pub mod params;
pub mod partition;
pub mod patterns;
pub mod workers;

pub use distributor::{Distributor, DistributorChannels, DEFAULT_TICK_INTERVAL};
pub use error::{EngineError, Result};
pub use events::{Event, State};
pub use grid::{CellState, Coord, Grid};
pub use io::{IoCommand, IoHandle};
pub use params::Params;
