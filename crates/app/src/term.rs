//! Terminal rendering backend.
//!
//! Draws the seven lanes as coloured background cells on a single terminal
//! line, followed by the text display label. Stands in for the LED strip
//! when running on a plain terminal.

use std::io::Write;

use crossterm::{
    cursor::MoveToColumn,
    queue,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor},
    terminal::{Clear, ClearType},
};
use keylight_core::{Color, KeylightError, RenderSink, Result, LANE_COUNT};

/// Renders the lane strip into a terminal via crossterm.
#[derive(Debug)]
pub struct TerminalSink<W: Write> {
    out: W,
    pixels: [Color; LANE_COUNT],
    text: String,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            pixels: [Color::OFF; LANE_COUNT],
            text: String::new(),
        }
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
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
        queue!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        for pixel in &self.pixels {
            queue!(
                self.out,
                SetBackgroundColor(TermColor::Rgb {
                    r: pixel.r,
                    g: pixel.g,
                    b: pixel.b,
                }),
                Print("  "),
            )?;
        }
        queue!(self.out, ResetColor, Print(" "), Print(&self.text))?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_writes_the_staged_label() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.set_pixel(0, Color::new(255, 0, 0)).unwrap();
        sink.print_str("C").unwrap();
        sink.show().unwrap();

        let written = String::from_utf8_lossy(&sink.out);
        assert!(written.ends_with('C'));
        assert!(!written.is_empty());
    }

    #[test]
    fn rejects_out_of_range_pixel_indices() {
        let mut sink = TerminalSink::new(Vec::new());
        assert!(sink.set_pixel(LANE_COUNT, Color::OFF).is_err());
    }
}
