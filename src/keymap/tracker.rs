//! Tap-dance timing
//!
//! Turns raw press/release events on tap-dance keys into finished and reset
//! gestures. A gesture keeps counting while presses land inside the tapping
//! term, past the slot's highest defined tap count if need be; it finishes
//! when the term elapses or another key is pressed. A finished gesture resets
//! once its key is released.

use std::time::{Duration, Instant};
use tracing::trace;

use super::tap_dance::{Gesture, SlotId, SLOT_COUNT};

/// Default tapping term
pub const TAPPING_TERM: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    Finished(Gesture),
    Reset(Gesture),
}

#[derive(Debug, Clone, Copy, Default)]
struct SlotState {
    count: u8,
    pressed: bool,
    interrupted: bool,
    finished: bool,
    last_event: Option<Instant>,
}

impl SlotState {
    fn gesture(&self, slot: SlotId) -> Gesture {
        Gesture {
            slot,
            count: self.count,
            interrupted: self.interrupted,
            held: self.pressed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TapDanceTracker {
    tapping_term: Duration,
    slots: [SlotState; SLOT_COUNT],
    /// Slot whose window is currently open
    counting: Option<SlotId>,
}

impl Default for TapDanceTracker {
    fn default() -> Self {
        Self::new(TAPPING_TERM)
    }
}

impl TapDanceTracker {
    pub fn new(tapping_term: Duration) -> Self {
        Self {
            tapping_term,
            slots: [SlotState::default(); SLOT_COUNT],
            counting: None,
        }
    }

    pub fn press(&mut self, slot: SlotId, now: Instant) -> Vec<GestureEvent> {
        let mut events = Vec::new();

        if self.counting.is_some_and(|active| active != slot) {
            events.extend(self.interrupt());
        }

        let state = &mut self.slots[slot.index()];
        if state.finished {
            // Pressed again before the previous gesture's release was seen
            let gesture = state.gesture(slot);
            *state = SlotState::default();
            events.push(GestureEvent::Reset(gesture));
        }

        let state = &mut self.slots[slot.index()];
        state.count = state.count.saturating_add(1);
        state.pressed = true;
        state.last_event = Some(now);
        self.counting = Some(slot);
        trace!("{} press, count {}", slot, state.count);

        events
    }

    pub fn release(&mut self, slot: SlotId, now: Instant) -> Vec<GestureEvent> {
        let state = &mut self.slots[slot.index()];
        if !state.pressed {
            return Vec::new();
        }
        state.pressed = false;
        state.last_event = Some(now);
        trace!("{} release", slot);

        if state.finished {
            vec![self.reset(slot)]
        } else {
            Vec::new()
        }
    }

    /// A key outside the tap-dance set was pressed
    pub fn interrupt(&mut self) -> Vec<GestureEvent> {
        match self.counting {
            Some(slot) => self.finish(slot, true),
            None => Vec::new(),
        }
    }

    /// Close the open window if the tapping term has elapsed
    pub fn tick(&mut self, now: Instant) -> Vec<GestureEvent> {
        let Some(slot) = self.counting else {
            return Vec::new();
        };
        let expired = self.slots[slot.index()]
            .last_event
            .map_or(true, |at| now.saturating_duration_since(at) >= self.tapping_term);

        if expired {
            self.finish(slot, false)
        } else {
            Vec::new()
        }
    }

    fn finish(&mut self, slot: SlotId, interrupted: bool) -> Vec<GestureEvent> {
        if self.counting == Some(slot) {
            self.counting = None;
        }

        let state = &mut self.slots[slot.index()];
        if state.finished {
            return Vec::new();
        }
        state.finished = true;
        state.interrupted |= interrupted;

        let mut events = vec![GestureEvent::Finished(state.gesture(slot))];
        if !state.pressed {
            events.push(self.reset(slot));
        }
        events
    }

    fn reset(&mut self, slot: SlotId) -> GestureEvent {
        let state = &mut self.slots[slot.index()];
        let gesture = state.gesture(slot);
        *state = SlotState::default();
        trace!("{} reset", slot);
        GestureEvent::Reset(gesture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn finished(events: &[GestureEvent]) -> Vec<Gesture> {
        events
            .iter()
            .filter_map(|e| match e {
                GestureEvent::Finished(g) => Some(*g),
                GestureEvent::Reset(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_single_tap_finishes_after_term() {
        let t0 = Instant::now();
        let mut tracker = TapDanceTracker::default();

        assert!(tracker.press(SlotId::HueChange, t0).is_empty());
        assert!(tracker.release(SlotId::HueChange, t0 + ms(40)).is_empty());
        assert!(tracker.tick(t0 + ms(150)).is_empty());

        let events = tracker.tick(t0 + ms(240));
        assert_eq!(
            events,
            vec![
                GestureEvent::Finished(Gesture {
                    slot: SlotId::HueChange,
                    count: 1,
                    interrupted: false,
                    held: false,
                }),
                GestureEvent::Reset(Gesture {
                    slot: SlotId::HueChange,
                    count: 1,
                    interrupted: false,
                    held: false,
                }),
            ]
        );
        assert_eq!(tracker.counting, None);
        assert!(tracker.tick(t0 + ms(1000)).is_empty());
    }

    #[test]
    fn test_double_tap_counts_within_term() {
        let t0 = Instant::now();
        let mut tracker = TapDanceTracker::default();

        tracker.press(SlotId::Rgb, t0);
        tracker.release(SlotId::Rgb, t0 + ms(30));
        tracker.press(SlotId::Rgb, t0 + ms(150));
        tracker.release(SlotId::Rgb, t0 + ms(180));

        // Window restarts on every event
        assert!(tracker.tick(t0 + ms(350)).is_empty());
        let done = finished(&tracker.tick(t0 + ms(380)));
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].count, 2);
    }

    #[test]
    fn test_counting_continues_past_table() {
        let t0 = Instant::now();
        let mut tracker = TapDanceTracker::default();

        let mut now = t0;
        for _ in 0..3 {
            assert!(tracker.press(SlotId::BrightUp, now).is_empty());
            assert!(tracker.release(SlotId::BrightUp, now + ms(20)).is_empty());
            now += ms(50);
        }
        assert_eq!(tracker.counting, Some(SlotId::BrightUp));

        let done = finished(&tracker.tick(now + ms(300)));
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].count, 3);
        assert!(!done[0].held);
    }

    #[test]
    fn test_held_gesture_resets_on_release() {
        let t0 = Instant::now();
        let mut tracker = TapDanceTracker::default();

        tracker.press(SlotId::Rgb, t0);
        let events = tracker.tick(t0 + ms(250));
        assert!(matches!(events.as_slice(), [GestureEvent::Finished(g)] if g.held));

        let events = tracker.release(SlotId::Rgb, t0 + ms(400));
        assert!(matches!(events.as_slice(), [GestureEvent::Reset(g)] if g.count == 1));
        assert!(tracker.tick(t0 + ms(1000)).is_empty());
    }

    #[test]
    fn test_other_slot_interrupts() {
        let t0 = Instant::now();
        let mut tracker = TapDanceTracker::default();

        tracker.press(SlotId::Rgb, t0);
        tracker.release(SlotId::Rgb, t0 + ms(20));
        let events = tracker.press(SlotId::HueChange, t0 + ms(50));

        let done = finished(&events);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].slot, SlotId::Rgb);
        assert!(done[0].interrupted);
        assert_eq!(tracker.counting, Some(SlotId::HueChange));
    }

    #[test]
    fn test_hold_past_term_reports_held() {
        let t0 = Instant::now();
        let mut tracker = TapDanceTracker::default();

        tracker.press(SlotId::EncoderButton, t0);
        let done = finished(&tracker.tick(t0 + ms(300)));
        assert_eq!(done.len(), 1);
        assert!(done[0].held);

        let events = tracker.release(SlotId::EncoderButton, t0 + ms(900));
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], GestureEvent::Reset(_)));
    }

    #[test]
    fn test_interrupt_without_counting_is_noop() {
        let mut tracker = TapDanceTracker::default();
        assert!(tracker.interrupt().is_empty());
        assert!(tracker.tick(Instant::now()).is_empty());
        assert!(tracker.release(SlotId::Rgb, Instant::now()).is_empty());
    }
}
