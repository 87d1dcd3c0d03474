// partition.rs - Splits grid rows into balanced contiguous bands

use std::ops::Range;

use crate::error::{EngineError, Result};

/// Splits `height` rows into `workers` contiguous ranges in ascending order.
///
/// The first `height % workers` ranges get one extra row, so sizes never
/// differ by more than one and no range is empty.
pub fn partition(height: usize, workers: usize) -> Result<Vec<Range<usize>>> {
    if workers == 0 || workers > height {
        return Err(EngineError::TooManyWorkers { workers, rows: height });
    }

    let base = height / workers;
    let remainder = height % workers;

    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0;
    for i in 0..workers {
        let len = if i < remainder { base + 1 } else { base };
        ranges.push(start..start + len);
        start += len;
    }
    debug_assert_eq!(start, height);
    Ok(ranges)
}
