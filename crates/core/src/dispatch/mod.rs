//! Event dispatch.
//!
//! The dispatcher composes the classifier, synthesizer and lane manager
//! behind a connection state machine: wait for the configured device to
//! appear, open it, stream key events one at a time, and return the strip
//! to all-off on the way out. Everything external is reached through the
//! [`InputGateway`], [`RenderSink`](crate::render::RenderSink) and [`Clock`]
//! traits so the loop can be driven entirely by test doubles.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::PollPolicy;
use crate::event::KeyEvent;
use crate::lanes::LaneManager;
use crate::render::RenderSink;
use crate::Result;

/// Label shown on the text display while no device is connected.
const WAITING_LABEL: &str = "MIDI";

/// Shared cancellation flag observed by the dispatch loop between events.
///
/// Clones share the flag, so one token can be handed to a signal handler
/// while the dispatcher keeps another.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// The underlying flag, in the shape signal registration wants.
    pub fn flag(&self) -> Arc<AtomicBool> {
        self.flag.clone()
    }
}

/// Where the dispatcher currently is in its connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Disconnected,
    Polling,
    Connected,
    Streaming,
    Closed,
}

/// One pull from an input stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamItem {
    /// An event arrived.
    Event(KeyEvent),
    /// Nothing arrived within the stream's internal wait. Gives the caller a
    /// chance to observe cancellation between events.
    Idle,
    /// The stream ended.
    Closed,
}

/// Enumerates input devices and opens streams by name.
pub trait InputGateway {
    type Stream: InputStream;

    /// Names of the input ports currently visible on the system.
    fn input_names(&self) -> Result<Vec<String>>;

    /// Opens the named port for streaming.
    fn open(&self, name: &str) -> Result<Self::Stream>;
}

/// A stream of key events from an open input port.
pub trait InputStream {
    /// Identifier of the underlying port.
    fn name(&self) -> &str;

    /// Blocks until the next item is available.
    fn next(&mut self) -> Result<StreamItem>;
}

/// Injectable sleep used between device enumeration rounds.
pub trait Clock {
    fn sleep(&self, duration: Duration);
}

/// System clock backed by [`std::thread::sleep`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Composes the gateway, lane manager and clock into the dispatch loop.
pub struct Dispatcher<G, S, C> {
    gateway: G,
    lanes: LaneManager<S>,
    clock: C,
    cancel: CancelToken,
    device_name: String,
    policy: PollPolicy,
    state: DispatchState,
}

impl<G, S, C> Dispatcher<G, S, C>
where
    G: InputGateway,
    S: RenderSink,
    C: Clock,
{
    pub fn new(
        gateway: G,
        lanes: LaneManager<S>,
        clock: C,
        cancel: CancelToken,
        device_name: String,
        policy: PollPolicy,
    ) -> Self {
        Self {
            gateway,
            lanes,
            clock,
            cancel,
            device_name,
            policy,
            state: DispatchState::Disconnected,
        }
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// The lane manager, mainly for inspection in tests.
    pub fn lanes(&self) -> &LaneManager<S> {
        &self.lanes
    }

    /// Runs the dispatch loop until the stream ends or the token cancels.
    ///
    /// The lanes and the text display are returned to all-off on every exit
    /// path, including errors.
    pub fn run(&mut self) -> Result<()> {
        let outcome = self.run_inner();
        self.state = DispatchState::Closed;
        let reset = self.lanes.reset();
        if let Err(err) = &reset {
            tracing::warn!(%err, "reset on shutdown failed");
        }
        outcome.and(reset)
    }

    fn run_inner(&mut self) -> Result<()> {
        loop {
            self.state = DispatchState::Disconnected;
            self.lanes.show_label(WAITING_LABEL)?;

            self.state = DispatchState::Polling;
            tracing::info!(device = %self.device_name, "waiting for input device");
            if !self.poll_for_device()? {
                return Ok(());
            }

            self.state = DispatchState::Connected;
            let mut stream = match self.gateway.open(&self.device_name) {
                Ok(stream) => stream,
                Err(err) => {
                    tracing::warn!(device = %self.device_name, %err, "open failed, resuming poll");
                    self.clock.sleep(self.policy.interval());
                    continue;
                }
            };
            self.lanes.clear_label()?;
            tracing::info!(port = stream.name(), "opened input stream");

            self.state = DispatchState::Streaming;
            return self.stream_events(&mut stream);
        }
    }

    /// Re-enumerates ports until more than the baseline count is visible.
    /// Returns `false` when cancelled instead.
    fn poll_for_device(&mut self) -> Result<bool> {
        loop {
            if self.cancel.is_cancelled() {
                return Ok(false);
            }
            let names = self.gateway.input_names()?;
            if names.len() > self.policy.baseline_ports {
                return Ok(true);
            }
            tracing::debug!(visible = names.len(), "no external device yet");
            self.clock.sleep(self.policy.interval());
        }
    }

    fn stream_events(&mut self, stream: &mut G::Stream) -> Result<()> {
        loop {
            if self.cancel.is_cancelled() {
                tracing::info!("cancellation requested, shutting down");
                return Ok(());
            }
            match stream.next()? {
                StreamItem::Event(event) => self.handle(event)?,
                StreamItem::Idle => {}
                StreamItem::Closed => {
                    tracing::info!("input stream closed");
                    return Ok(());
                }
            }
        }
    }

    /// Applies one event. Domain errors on the event's own values are logged
    /// and swallowed so a malformed message cannot take the loop down; sink
    /// failures propagate.
    fn handle(&mut self, event: KeyEvent) -> Result<()> {
        let outcome = match event {
            KeyEvent::NoteOn { note, velocity } => {
                tracing::debug!(note, velocity, "note on");
                self.lanes.activate(note, velocity)
            }
            KeyEvent::NoteOff { note } => {
                tracing::debug!(note, "note off");
                self.lanes.deactivate(note)
            }
            KeyEvent::Other => Ok(()),
        };

        match outcome {
            Err(err) if err.is_invalid_input() => {
                tracing::warn!(%err, "skipping malformed event");
                Ok(())
            }
            other => other,
        }
    }
}
