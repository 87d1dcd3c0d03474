// io.rs - Image collaborator protocol

//! Request protocol spoken to the image collaborator.
//!
//! The collaborator owns the receiving end of an [`IoCommand`] channel and
//! answers in order. Cells cross this boundary as one byte each, row-major,
//! 0 for dead and 255 for alive.

use tokio::sync::{mpsc, oneshot};

use crate::error::{EngineError, Result};
use crate::grid::Grid;
use crate::params::Params;

#[derive(Debug)]
pub enum IoCommand {
    /// Load the named image and answer with its bytes.
    Input { name: String, reply: oneshot::Sender<Vec<u8>> },
    /// Store `cells` under `name`.
    Output { name: String, cells: Vec<u8> },
    /// Answer once every earlier request has been handled.
    CheckIdle { reply: oneshot::Sender<()> },
}

#[derive(Debug, Clone)]
pub struct IoHandle {
    tx: mpsc::Sender<IoCommand>,
}

impl IoHandle {
    pub fn new(tx: mpsc::Sender<IoCommand>) -> Self {
        Self { tx }
    }

    pub async fn read_input(&self, name: &str) -> Result<Vec<u8>> {
        let (reply, rx) = oneshot::channel();
        self.request(IoCommand::Input { name: name.to_owned(), reply }).await?;
        rx.await.map_err(|_| EngineError::InputUnavailable(name.to_owned()))
    }

    /// Decodes the named input into a grid sized by `params`.
    pub async fn read_grid(&self, name: &str, params: &Params) -> Result<Grid> {
        let bytes = self.read_input(name).await?;
        let expected = params.cell_count();
        if bytes.len() != expected {
            return Err(EngineError::InputLength { expected, actual: bytes.len() });
        }
        Ok(Grid::from_bytes(params.width, params.height, &bytes))
    }

    pub async fn write_grid(&self, name: String, grid: &Grid) -> Result<()> {
        self.request(IoCommand::Output { name, cells: grid.to_bytes() }).await
    }

    pub async fn wait_idle(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.request(IoCommand::CheckIdle { reply }).await?;
        rx.await.map_err(|_| EngineError::IoClosed)
    }

    async fn request(&self, command: IoCommand) -> Result<()> {
        self.tx.send(command).await.map_err(|_| EngineError::IoClosed)
    }
}
