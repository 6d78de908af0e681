//! Lane state management.
//!
//! [`LaneManager`] is the only owner of the per-lane display state. Each
//! update rewrites the sink from the complete state: the strip buffer is
//! cleared, every lit lane redrawn, then the result flushed. The sink
//! therefore always reflects the lane state in full, never a delta.

use crate::classify::{classify, LANE_COUNT};
use crate::color::{Color, ColorRamp};
use crate::render::RenderSink;
use crate::Result;

/// Owns the lane colours and the render sink they are written to.
#[derive(Debug)]
pub struct LaneManager<S> {
    lanes: [Color; LANE_COUNT],
    ramp: ColorRamp,
    sink: S,
}

impl<S: RenderSink> LaneManager<S> {
    pub fn new(ramp: ColorRamp, sink: S) -> Self {
        Self {
            lanes: [Color::OFF; LANE_COUNT],
            ramp,
            sink,
        }
    }

    /// Current colour of every lane; unlit lanes are [`Color::OFF`].
    pub fn lanes(&self) -> &[Color; LANE_COUNT] {
        &self.lanes
    }

    /// Read access to the sink, mainly for inspection in tests.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Lights the lane for `note` and shows its pitch-class label.
    ///
    /// A note without a lane (sharp or flat) changes nothing and emits no
    /// render request. Lane state is updated before the sink is written, so
    /// a sink failure leaves the state consistent for the caller to inspect.
    pub fn activate(&mut self, note: u8, velocity: u8) -> Result<()> {
        let Some(class) = classify(note)? else {
            return Ok(());
        };
        let color = self.ramp.synthesize(note, velocity)?;
        self.lanes[class.lane()] = color;
        self.sink.clear_text()?;
        self.sink.print_str(class.label())?;
        self.redraw()
    }

    /// Darkens the lane for `note`, leaving the text display as it is.
    ///
    /// Classification is by pitch class, so any note of the same class
    /// clears the lane, whichever octave originally lit it.
    pub fn deactivate(&mut self, note: u8) -> Result<()> {
        let Some(class) = classify(note)? else {
            return Ok(());
        };
        self.lanes[class.lane()] = Color::OFF;
        self.redraw()
    }

    /// Returns every lane and the text display to the all-off state.
    pub fn reset(&mut self) -> Result<()> {
        self.lanes = [Color::OFF; LANE_COUNT];
        self.sink.clear_text()?;
        self.redraw()
    }

    /// Writes a static label without touching the lanes.
    pub fn show_label(&mut self, text: &str) -> Result<()> {
        self.sink.clear_text()?;
        self.sink.print_str(text)?;
        self.sink.show()
    }

    /// Empties the text display without touching the lanes.
    pub fn clear_label(&mut self) -> Result<()> {
        self.sink.clear_text()?;
        self.sink.show()
    }

    fn redraw(&mut self) -> Result<()> {
        self.sink.clear()?;
        for (index, color) in self.lanes.iter().enumerate() {
            if !color.is_off() {
                self.sink.set_pixel(index, *color)?;
            }
        }
        self.sink.show()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MemorySink;
    use crate::{KeylightError, Result};

    fn manager() -> LaneManager<MemorySink> {
        LaneManager::new(ColorRamp::default(), MemorySink::new())
    }

    #[test]
    fn activate_lights_the_classified_lane_and_label() {
        let mut lanes = manager();
        lanes.activate(60, 100).unwrap();

        assert!(!lanes.lanes()[0].is_off());
        assert!(lanes.lanes()[1..].iter().all(|lane| lane.is_off()));

        let frame = lanes.sink().last_frame().unwrap();
        assert_eq!(frame.text, "C");
        assert_eq!(frame.pixels[0], lanes.lanes()[0]);
    }

    #[test]
    fn sharp_notes_change_nothing() {
        let mut lanes = manager();
        lanes.activate(61, 100).unwrap();

        assert!(lanes.lanes().iter().all(|lane| lane.is_off()));
        assert!(lanes.sink().frames().is_empty());
    }

    #[test]
    fn activate_is_idempotent() {
        let mut lanes = manager();
        lanes.activate(60, 100).unwrap();
        let once = *lanes.lanes();
        lanes.activate(60, 100).unwrap();
        assert_eq!(*lanes.lanes(), once);
    }

    #[test]
    fn activate_then_deactivate_round_trips_to_unlit() {
        let mut lanes = manager();
        lanes.activate(60, 100).unwrap();
        lanes.deactivate(60).unwrap();
        assert!(lanes.lanes().iter().all(|lane| lane.is_off()));
    }

    #[test]
    fn deactivate_clears_by_pitch_class_not_note_identity() {
        let mut lanes = manager();
        lanes.activate(60, 100).unwrap();
        // One octave up, same class.
        lanes.deactivate(72).unwrap();
        assert!(lanes.lanes().iter().all(|lane| lane.is_off()));
    }

    #[test]
    fn deactivate_leaves_the_label_alone() {
        let mut lanes = manager();
        lanes.activate(64, 100).unwrap();
        lanes.deactivate(64).unwrap();

        let frame = lanes.sink().last_frame().unwrap();
        assert_eq!(frame.text, "E");
    }

    #[test]
    fn renders_carry_the_whole_state_not_a_delta() {
        let mut lanes = manager();
        lanes.activate(60, 100).unwrap();
        lanes.activate(64, 80).unwrap();

        // The second flush must still show lane 0 even though only lane 2
        // logically changed.
        let frame = lanes.sink().last_frame().unwrap();
        assert!(!frame.pixels[0].is_off());
        assert!(!frame.pixels[2].is_off());
    }

    #[test]
    fn overlapping_notes_in_one_lane_are_last_write_wins() {
        let mut lanes = manager();
        lanes.activate(60, 100).unwrap();
        let first = lanes.lanes()[0];
        lanes.activate(72, 40).unwrap();
        let second = lanes.lanes()[0];
        assert_ne!(first, second);

        // Releasing either note clears the shared lane entirely.
        lanes.deactivate(60).unwrap();
        assert!(lanes.lanes()[0].is_off());
    }

    #[test]
    fn reset_returns_to_the_canonical_blank_state() {
        let mut lanes = manager();
        lanes.activate(60, 100).unwrap();
        lanes.activate(69, 90).unwrap();
        lanes.reset().unwrap();

        assert!(lanes.lanes().iter().all(|lane| lane.is_off()));
        assert!(lanes.sink().last_frame().unwrap().is_blank());
    }

    #[test]
    fn invalid_notes_are_rejected_without_state_changes() {
        let mut lanes = manager();
        assert!(lanes.activate(128, 64).is_err());
        assert!(lanes.deactivate(200).is_err());
        assert!(lanes.lanes().iter().all(|lane| lane.is_off()));
        assert!(lanes.sink().frames().is_empty());
    }

    struct FailingSink;

    impl RenderSink for FailingSink {
        fn set_pixel(&mut self, _index: usize, _color: Color) -> Result<()> {
            Err(KeylightError::render("device gone"))
        }
        fn clear(&mut self) -> Result<()> {
            Ok(())
        }
        fn print_str(&mut self, _text: &str) -> Result<()> {
            Ok(())
        }
        fn clear_text(&mut self) -> Result<()> {
            Ok(())
        }
        fn show(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn sink_failure_propagates_but_leaves_lane_state_consistent() {
        let mut lanes = LaneManager::new(ColorRamp::default(), FailingSink);
        let err = lanes.activate(60, 100).unwrap_err();
        assert!(matches!(err, KeylightError::Render(_)));
        // The lane was set before the sink refused the write.
        assert!(!lanes.lanes()[0].is_off());
    }
}
