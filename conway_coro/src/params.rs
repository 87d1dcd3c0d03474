// params.rs - Validated run parameters and I/O names

use crate::error::{EngineError, Result};

/// Run configuration, validated once before the first generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    pub width: usize,
    pub height: usize,
    pub turns: usize,
    pub threads: usize,
}

impl Params {
    pub fn new(width: usize, height: usize, turns: usize, threads: usize) -> Self {
        Self { width, height, turns, threads }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidParams(format!(
                "grid must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.threads == 0 {
            return Err(EngineError::InvalidParams("at least one worker is required".into()));
        }
        if self.threads > self.height {
            return Err(EngineError::TooManyWorkers { workers: self.threads, rows: self.height });
        }
        Ok(())
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Identifier of the input image, e.g. `64x32`.
    pub fn input_name(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// Identifier of a written grid, tagged with the turn reached.
    pub fn output_name(&self, turn: usize) -> String {
        format!("{}x{}x{}", self.width, self.height, turn)
    }
}
