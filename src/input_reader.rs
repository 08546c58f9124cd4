use crate::key::Key;
use crossterm::event::{self, Event};
use std::thread;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tracing::warn;

/// What the host loop needs to hear from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalEvent {
    Key(Key),
    Resize,
}

impl TerminalEvent {
    fn from_event(event: Event) -> Option<Self> {
        match event {
            Event::Key(key) => Key::from_event(key).map(TerminalEvent::Key),
            Event::Resize(..) => Some(TerminalEvent::Resize),
            _ => None,
        }
    }
}

/// Spawns a background thread that blocks on terminal input and forwards
/// keys and resizes. The thread stops when the receiver is dropped.
pub fn spawn_reader() -> UnboundedReceiver<TerminalEvent> {
    let (tx, rx) = unbounded_channel();

    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(event) => {
                    let Some(event) = TerminalEvent::from_event(event) else {
                        continue;
                    };
                    if tx.send(event).is_err() {
                        break; // Receiver dropped
                    }
                }
                Err(err) => {
                    warn!(%err, "terminal input closed");
                    break;
                }
            }
        }
    });

    rx
}
