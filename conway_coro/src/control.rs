// control.rs - Keypress decoding

use log::debug;

/// A keypress decoded into something the distributor acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Pause,
    Resume,
    SaveSnapshot,
    Quit,
}

/// Decodes a key. `'p'` toggles, so its meaning depends on whether the run is paused.
pub fn decode(key: char, paused: bool) -> Option<Command> {
    match key {
        'p' if paused => Some(Command::Resume),
        'p'           => Some(Command::Pause),
        's'           => Some(Command::SaveSnapshot),
        'q'           => Some(Command::Quit),
        other => {
            debug!("ignoring key {other:?}");
            None
        }
    }
}
