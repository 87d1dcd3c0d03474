// workers.rs - Fans a generation out over row bands and joins the results in order

use std::ops::Range;
use std::sync::Arc;

use log::debug;

use crate::error::Result;
use crate::generation::compute_rows;
use crate::grid::{CellState, Grid};

/// Runs one rule pass per range and returns the bands in range order.
///
/// Every band is awaited before returning, so callers only ever see a
/// complete set. With a single range the work runs inline.
pub async fn run_partitions(ranges: &[Range<usize>], grid: &Arc<Grid>) -> Result<Vec<Vec<CellState>>> {
    if let [only] = ranges {
        return Ok(vec![compute_rows(only.clone(), grid)]);
    }

    debug!("fanning out {} bands", ranges.len());

    // Spawn all bands at once; each owns a handle on the shared grid
    let mut handles = Vec::with_capacity(ranges.len());
    for range in ranges {
        let range = range.clone();
        let grid = Arc::clone(grid);
        handles.push(tokio::task::spawn_blocking(move || compute_rows(range, &grid)));
    }

    // Await in spawn order so each band lines up with its range
    let mut bands = Vec::with_capacity(handles.len());
    for handle in handles {
        bands.push(handle.await?);
    }
    Ok(bands)
}

/// Steps `grid` once using the given ranges and stitches the bands back together.
pub async fn next_generation(ranges: &[Range<usize>], grid: &Arc<Grid>) -> Result<Grid> {
    let bands = run_partitions(ranges, grid).await?;
    let mut cells = Vec::with_capacity(grid.width() * grid.height());
    for band in bands {
        cells.extend(band);
    }
    Ok(Grid::from_cells(grid.width(), grid.height(), cells))
}
