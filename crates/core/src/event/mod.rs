//! Typed input events consumed by the dispatch loop.

/// A single message pulled from an input stream.
///
/// Anything that is not a key press or release decodes to [`KeyEvent::Other`]
/// so streams stay total; the dispatch loop drops those on the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// A key was pressed with the given attack velocity.
    NoteOn { note: u8, velocity: u8 },
    /// A key was released.
    NoteOff { note: u8 },
    /// Any other message type.
    Other,
}

impl KeyEvent {
    /// Decodes a raw MIDI message into a typed event.
    ///
    /// A note-on with velocity 0 is a release (running-status convention).
    /// Returns `None` for an empty message; truncated or unrecognised
    /// messages decode to [`KeyEvent::Other`].
    pub fn from_midi_bytes(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        Some(match status & 0xF0 {
            0x90 if data.len() >= 2 && data[1] > 0 => Self::NoteOn {
                note: data[0],
                velocity: data[1],
            },
            0x90 if data.len() >= 2 => Self::NoteOff { note: data[0] },
            0x80 if data.len() >= 2 => Self::NoteOff { note: data[0] },
            _ => Self::Other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_note_on() {
        let event = KeyEvent::from_midi_bytes(&[0x90, 60, 100]).unwrap();
        assert_eq!(
            event,
            KeyEvent::NoteOn {
                note: 60,
                velocity: 100
            }
        );
    }

    #[test]
    fn decodes_note_off() {
        let event = KeyEvent::from_midi_bytes(&[0x80, 60, 64]).unwrap();
        assert_eq!(event, KeyEvent::NoteOff { note: 60 });
    }

    #[test]
    fn note_on_with_zero_velocity_is_a_release() {
        let event = KeyEvent::from_midi_bytes(&[0x90, 72, 0]).unwrap();
        assert_eq!(event, KeyEvent::NoteOff { note: 72 });
    }

    #[test]
    fn channel_nibble_is_ignored() {
        let event = KeyEvent::from_midi_bytes(&[0x93, 60, 100]).unwrap();
        assert_eq!(
            event,
            KeyEvent::NoteOn {
                note: 60,
                velocity: 100
            }
        );
    }

    #[test]
    fn other_messages_decode_to_other() {
        // Control change and program change.
        assert_eq!(
            KeyEvent::from_midi_bytes(&[0xB0, 7, 127]),
            Some(KeyEvent::Other)
        );
        assert_eq!(
            KeyEvent::from_midi_bytes(&[0xC0, 5]),
            Some(KeyEvent::Other)
        );
    }

    #[test]
    fn truncated_and_empty_messages() {
        assert_eq!(KeyEvent::from_midi_bytes(&[]), None);
        assert_eq!(
            KeyEvent::from_midi_bytes(&[0x90, 60]),
            Some(KeyEvent::Other)
        );
    }
}
