//! Rendering backend abstraction.
//!
//! The engine never talks to indicator hardware directly; it writes through
//! [`RenderSink`]. Writes are staged (`set_pixel`, `print_str`) and become
//! visible on `show`. [`MemorySink`] records every flushed frame and serves
//! both headless operation and unit tests of the lane manager.

use crate::classify::LANE_COUNT;
use crate::color::Color;
use crate::{KeylightError, Result};

/// Destination for the strip's pixel colours and the text display.
pub trait RenderSink {
    /// Stages a colour for one pixel of the strip.
    fn set_pixel(&mut self, index: usize, color: Color) -> Result<()>;

    /// Zeroes the whole strip buffer.
    fn clear(&mut self) -> Result<()>;

    /// Stages a label for the text display.
    fn print_str(&mut self, text: &str) -> Result<()>;

    /// Empties the text display buffer.
    fn clear_text(&mut self) -> Result<()>;

    /// Flushes all staged pixel and text state to the device.
    fn show(&mut self) -> Result<()>;
}

/// One flushed frame: the full strip plus the text display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub pixels: [Color; LANE_COUNT],
    pub text: String,
}

impl Frame {
    /// True when every pixel is unlit and the display is empty.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|pixel| pixel.is_off()) && self.text.is_empty()
    }
}

/// In-memory sink that records what a hardware backend would have shown.
#[derive(Debug, Default)]
pub struct MemorySink {
    pixels: [Color; LANE_COUNT],
    text: String,
    frames: Vec<Frame>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every frame flushed so far, oldest first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The most recently flushed frame, if any.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }
}

impl RenderSink for MemorySink {
    fn set_pixel(&mut self, index: usize, color: Color) -> Result<()> {
        let slot = self
            .pixels
            .get_mut(index)
            .ok_or_else(|| KeylightError::render(format!("pixel index {index} out of range")))?;
        *slot = color;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.pixels = [Color::OFF; LANE_COUNT];
        Ok(())
    }

    fn print_str(&mut self, text: &str) -> Result<()> {
        self.text = text.to_string();
        Ok(())
    }

    fn clear_text(&mut self) -> Result<()> {
        self.text.clear();
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        self.frames.push(Frame {
            pixels: self.pixels,
            text: self.text.clone(),
        });
        Ok(())
    }
}
