use std::time::{Duration, Instant};

use bigknob::keymap::{
    tap_dance::classify, Action, ActionLog, Delta, Gesture, Keycode, Keymap, KeymapEvent,
    KnobVariant, Rotation, SlotId, KNOB_CHANNEL,
};
use bigknob::lighting::LightingMode;

const ENCODER_BUTTON: usize = 0;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn rotate(rotation: Rotation) -> KeymapEvent {
    KeymapEvent::Rotate {
        channel: KNOB_CHANNEL,
        rotation,
    }
}

/// Feed `(offset_ms, event)` pairs and let every window close afterwards
fn run(keymap: &mut Keymap, events: &[(u64, KeymapEvent)]) -> Vec<Action> {
    let t0 = Instant::now();
    let mut log = ActionLog::new();
    for &(at, event) in events {
        keymap.handle(event, t0 + ms(at), &mut log);
    }
    let last = events.last().map_or(0, |&(at, _)| at);
    keymap.tick(t0 + ms(last + 1000), &mut log);
    log.take()
}

#[test]
fn test_hold_rotate_scenario() {
    for variant in [KnobVariant::Toggle, KnobVariant::Keycode] {
        let mut keymap = Keymap::new(variant, ms(200));
        let actions = run(
            &mut keymap,
            &[
                (0, KeymapEvent::Press(ENCODER_BUTTON)),
                (100, rotate(Rotation::Clockwise)),
                (150, rotate(Rotation::Clockwise)),
                (220, rotate(Rotation::CounterClockwise)),
                (400, KeymapEvent::Release(ENCODER_BUTTON)),
            ],
        );

        assert_eq!(
            actions,
            vec![
                Action::LightingValue(Delta::Increase),
                Action::LightingValue(Delta::Increase),
                Action::LightingValue(Delta::Decrease),
            ],
            "{variant:?}"
        );
    }
}

#[test]
fn test_press_release_scenario() {
    let mut keymap = Keymap::new(KnobVariant::Toggle, ms(200));
    let actions = run(
        &mut keymap,
        &[
            (0, KeymapEvent::Press(ENCODER_BUTTON)),
            (60, KeymapEvent::Release(ENCODER_BUTTON)),
        ],
    );
    assert_eq!(actions, vec![Action::LightingToggle]);

    // A long hold without rotation is still a plain tap
    let actions = run(
        &mut keymap,
        &[
            (0, KeymapEvent::Press(ENCODER_BUTTON)),
            (800, KeymapEvent::Release(ENCODER_BUTTON)),
        ],
    );
    assert_eq!(actions, vec![Action::LightingToggle]);
}

#[test]
fn test_plain_tap_never_emits_keycode_and_toggle() {
    let mut keymap = Keymap::new(KnobVariant::Toggle, ms(200));
    let actions = run(
        &mut keymap,
        &[
            (0, KeymapEvent::Press(ENCODER_BUTTON)),
            (40, KeymapEvent::Release(ENCODER_BUTTON)),
        ],
    );
    assert!(!actions.iter().any(|a| matches!(a, Action::Emit(_))));
    assert_eq!(actions.len(), 1);
}

#[test]
fn test_rotation_sign_is_deterministic() {
    let mut keymap = Keymap::default();
    let mut log = ActionLog::new();

    for clockwise in [true, false, true, true, false] {
        keymap.on_rotation(KNOB_CHANNEL, clockwise, &mut log);
        let action = log.take().pop().unwrap();
        let expected = if clockwise {
            Action::Emit(Keycode::VolumeUp)
        } else {
            Action::Emit(Keycode::VolumeDown)
        };
        assert_eq!(action, expected);
    }

    let t0 = Instant::now();
    keymap.on_key_event(ENCODER_BUTTON, true, t0, &mut log);
    for clockwise in [false, true, false] {
        keymap.on_rotation(KNOB_CHANNEL, clockwise, &mut log);
        let action = log.take().pop().unwrap();
        let expected = if clockwise {
            Action::LightingValue(Delta::Increase)
        } else {
            Action::LightingValue(Delta::Decrease)
        };
        assert_eq!(action, expected);
    }
}

#[test]
fn test_rgb_slot_tap_table() {
    let expected = [
        None,
        Some(Action::Emit(Keycode::F16)),
        Some(Action::LightingToggle),
        Some(Action::LightingStepMode),
        Some(Action::LightingSetMode(LightingMode::RainbowSwirl)),
        None,
        None,
    ];
    for (count, action) in expected.into_iter().enumerate() {
        let gesture = Gesture {
            slot: SlotId::Rgb,
            count: count as u8,
            interrupted: false,
            held: false,
        };
        assert_eq!(classify(&gesture), action, "count {count}");
    }
}

#[test]
fn test_counts_beyond_max_dispatch_nothing() {
    let mut keymap = Keymap::default();
    let mut log = ActionLog::new();
    for slot in [SlotId::HueChange, SlotId::BrightUp, SlotId::BrightDown] {
        keymap.on_gesture_finished(
            Gesture {
                slot,
                count: 3,
                interrupted: false,
                held: false,
            },
            &mut log,
        );
    }
    assert!(log.actions().is_empty());
}

#[test]
fn test_one_action_per_gesture() {
    let mut keymap = Keymap::default();
    let actions = run(
        &mut keymap,
        &[
            (0, KeymapEvent::Press(2)),
            (30, KeymapEvent::Release(2)),
            (500, KeymapEvent::Tick),
            (600, KeymapEvent::Press(2)),
            (630, KeymapEvent::Release(2)),
        ],
    );
    assert_eq!(
        actions,
        vec![Action::Emit(Keycode::F14), Action::Emit(Keycode::F14)]
    );
}

/// `taps` press/release pairs on `position`, 25ms apart
fn taps(position: usize, taps: u64) -> Vec<(u64, KeymapEvent)> {
    (0..taps)
        .flat_map(|i| {
            [
                (i * 50, KeymapEvent::Press(position)),
                (i * 50 + 25, KeymapEvent::Release(position)),
            ]
        })
        .collect()
}

#[test]
fn test_taps_past_table_are_silent() {
    let mut keymap = Keymap::default();
    assert!(run(&mut keymap, &taps(2, 3)).is_empty());
    assert!(run(&mut keymap, &taps(4, 5)).is_empty());
    assert!(run(&mut keymap, &taps(1, 7)).is_empty());
}

#[test]
fn test_encoder_button_double_tap_is_silent() {
    for variant in [KnobVariant::Toggle, KnobVariant::Keycode] {
        let mut keymap = Keymap::new(variant, ms(200));
        assert!(
            run(&mut keymap, &taps(ENCODER_BUTTON, 2)).is_empty(),
            "{variant:?}"
        );
        assert_eq!(
            run(&mut keymap, &taps(ENCODER_BUTTON, 1)),
            vec![variant.release_action()]
        );
    }
}
