//! midir-backed implementation of the input collaborators.
//!
//! midir delivers messages on its own callback thread. The callback decodes
//! each message into a [`KeyEvent`] and feeds a channel; [`MidirStream`]
//! pulls from that channel with a short timeout so the dispatch loop can
//! observe cancellation between events. Dropping the stream closes the
//! connection.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use keylight_core::{InputGateway, InputStream, KeyEvent, KeylightError, Result, StreamItem};
use midir::{Ignore, MidiInput, MidiInputConnection};

const CLIENT_NAME: &str = "keylight";
const RECV_WAIT: Duration = Duration::from_millis(250);

/// Enumerates and opens MIDI input ports through midir.
#[derive(Debug, Default)]
pub struct MidirGateway;

impl MidirGateway {
    pub fn new() -> Self {
        Self
    }

    fn client() -> Result<MidiInput> {
        let mut input =
            MidiInput::new(CLIENT_NAME).map_err(|err| KeylightError::device(err.to_string()))?;
        input.ignore(Ignore::None);
        Ok(input)
    }
}

impl InputGateway for MidirGateway {
    type Stream = MidirStream;

    fn input_names(&self) -> Result<Vec<String>> {
        let input = Self::client()?;
        Ok(input
            .ports()
            .iter()
            .filter_map(|port| input.port_name(port).ok())
            .collect())
    }

    fn open(&self, name: &str) -> Result<MidirStream> {
        let input = Self::client()?;
        let port = input
            .ports()
            .into_iter()
            .find(|port| {
                input
                    .port_name(port)
                    .map(|port_name| port_name == name)
                    .unwrap_or(false)
            })
            .ok_or_else(|| KeylightError::device(format!("input port `{name}` not found")))?;

        let (sender, receiver) = mpsc::channel();
        let connection = input
            .connect(
                &port,
                CLIENT_NAME,
                move |_timestamp, bytes, _| {
                    if let Some(event) = KeyEvent::from_midi_bytes(bytes) {
                        let _ = sender.send(event);
                    }
                },
                (),
            )
            .map_err(|err| KeylightError::device(err.to_string()))?;

        Ok(MidirStream {
            name: name.to_string(),
            receiver,
            _connection: connection,
        })
    }
}

/// Blocking event stream over an open midir connection.
pub struct MidirStream {
    name: String,
    receiver: Receiver<KeyEvent>,
    // RAII: closes the port when the stream is dropped.
    _connection: MidiInputConnection<()>,
}

impl InputStream for MidirStream {
    fn name(&self) -> &str {
        &self.name
    }

    fn next(&mut self) -> Result<StreamItem> {
        match self.receiver.recv_timeout(RECV_WAIT) {
            Ok(event) => Ok(StreamItem::Event(event)),
            Err(RecvTimeoutError::Timeout) => Ok(StreamItem::Idle),
            Err(RecvTimeoutError::Disconnected) => Ok(StreamItem::Closed),
        }
    }
}
