//! Core library for the Keylight application.
//!
//! Keylight turns a live stream of musical key presses into colours on a
//! seven-lane indicator strip plus a one-character text display. This crate
//! is the mapping engine: note classification, colour synthesis, lane state
//! and the dispatch loop that ties them to an input stream and a render
//! sink. Each module owns a distinct subsystem; the hardware-facing
//! collaborators (MIDI input, the actual display) live behind traits and are
//! provided by the application crate.

pub mod classify;
pub mod color;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod lanes;
pub mod render;

pub use classify::{classify, PitchClass, LANE_COUNT, MIDI_MAX};
pub use color::{Color, ColorRamp};
pub use config::{AppConfig, PollPolicy};
pub use dispatch::{
    CancelToken, Clock, DispatchState, Dispatcher, InputGateway, InputStream, StreamItem,
    SystemClock,
};
pub use error::{KeylightError, Result};
pub use event::KeyEvent;
pub use lanes::LaneManager;
pub use render::{Frame, MemorySink, RenderSink};
