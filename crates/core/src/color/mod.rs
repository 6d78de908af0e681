//! Colour synthesis.
//!
//! A pressed key's colour is a function of two values: hue follows the
//! note's position within the keyboard range, brightness follows the attack
//! velocity. Saturation and value are pinned at 1.0 so the strip always
//! shows fully saturated rainbow colours, dimmed uniformly across channels.

use palette::{Hsv, IntoColor, Srgb};
use serde::{Deserialize, Serialize};

use crate::classify::MIDI_MAX;
use crate::{KeylightError, Result};

/// An 8-bit RGB triple as written to one pixel of the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// The unlit pixel colour.
    pub const OFF: Color = Color { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn is_off(self) -> bool {
        self == Self::OFF
    }
}

/// Pitch and velocity bounds anchoring the colour ramp.
///
/// Defaults cover a full-size 88-key keyboard (A0 to C8) and the velocity
/// band a typical keyboard actually produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorRamp {
    /// Lowest note of the hue ramp; maps to hue 0 (red).
    pub note_low: u8,
    /// Highest note of the hue ramp; maps to hue 1 (wrapping back to red).
    pub note_high: u8,
    /// Velocity at or below which the colour is fully dark.
    pub velocity_low: u8,
    /// Velocity at or above which the colour is at full brightness.
    pub velocity_high: u8,
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self {
            note_low: 21,
            note_high: 108,
            velocity_low: 10,
            velocity_high: 100,
        }
    }
}

impl ColorRamp {
    /// Synthesizes the colour for a key press.
    ///
    /// Both the hue and brightness fractions are clamped to [0, 1], so notes
    /// and velocities outside the configured bounds saturate at the ends of
    /// the ramp. Values above the 7-bit MIDI domain are rejected outright.
    pub fn synthesize(&self, note: u8, velocity: u8) -> Result<Color> {
        if note > MIDI_MAX {
            return Err(KeylightError::NoteOutOfRange(note));
        }
        if velocity > MIDI_MAX {
            return Err(KeylightError::VelocityOutOfRange(velocity));
        }

        let hue = fraction(note, self.note_low, self.note_high);
        let brightness = fraction(velocity, self.velocity_low, self.velocity_high);

        let rgb: Srgb = Hsv::new(hue * 360.0, 1.0, 1.0).into_color();
        Ok(Color {
            r: scale(rgb.red, brightness),
            g: scale(rgb.green, brightness),
            b: scale(rgb.blue, brightness),
        })
    }
}

/// Position of `value` within `[low, high]`, clamped to [0, 1].
fn fraction(value: u8, low: u8, high: u8) -> f32 {
    let span = f32::from(high) - f32::from(low);
    if span <= 0.0 {
        return 0.0;
    }
    ((f32::from(value) - f32::from(low)) / span).clamp(0.0, 1.0)
}

fn scale(channel: f32, brightness: f32) -> u8 {
    (channel * brightness * 255.0).round() as u8
}
