//! Property tests: arbitrary command sequences never break engine invariants.

use proptest::prelude::*;
use safedrill_core::{
    AlarmState, Drill, DrillEngine, DrillOptions, DrillStatus, PlayState, Step,
};

#[derive(Debug, Clone)]
enum Op {
    Play,
    Pause,
    Reset,
    ToggleAlarm,
    Tick(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Play),
        1 => Just(Op::Pause),
        1 => Just(Op::Reset),
        1 => Just(Op::ToggleAlarm),
        6 => (1u64..1500).prop_map(Op::Tick),
    ]
}

fn drill(durations: &[u64]) -> Drill {
    let steps = durations
        .iter()
        .enumerate()
        .map(|(i, &duration_ms)| Step {
            id: i.to_string(),
            title: format!("Step {i}"),
            description: String::new(),
            safety_note: String::new(),
            icon: None,
            duration_ms,
        })
        .collect();
    Drill::new("prop", "Prop", steps).unwrap()
}

fn apply(engine: &mut DrillEngine, op: &Op) -> DrillStatus {
    match op {
        Op::Play => engine.play().status,
        Op::Pause => engine.pause().status,
        Op::Reset => engine.reset().status,
        Op::ToggleAlarm => engine.toggle_alarm().status,
        Op::Tick(ms) => engine.tick(*ms).status,
    }
}

proptest! {
    #[test]
    fn invariants_hold_for_any_command_sequence(
        durations in prop::collection::vec(0u64..3000, 1..5),
        settle_delay_ms in 0u64..800,
        ops in prop::collection::vec(op(), 0..80),
    ) {
        let len = durations.len();
        let mut engine = DrillEngine::with_options(
            drill(&durations),
            DrillOptions { settle_delay_ms, alarm_enabled: true },
        );
        let mut before = engine.status();

        for op in &ops {
            let after = apply(&mut engine, op);

            prop_assert!((0.0..=100.0).contains(&after.step_progress));
            prop_assert!(after.current_index <= len);
            prop_assert_eq!(after.current_index == len, after.play_state == PlayState::Completed);

            if after.alarm_state == AlarmState::On {
                prop_assert_eq!(after.play_state, PlayState::Running);
                prop_assert!(after.alarm_enabled);
            }

            match op {
                Op::Reset => prop_assert!(after.is_initial()),
                _ => prop_assert!(after.current_index >= before.current_index),
            }

            if matches!(op, Op::Tick(_)) && after.current_index == before.current_index {
                prop_assert!(after.step_progress >= before.step_progress);
            }

            before = after;
        }
    }

    #[test]
    fn two_ticks_never_lose_progress(t1 in 1u64..2000, t2 in 1u64..2000) {
        let mut engine = DrillEngine::new(drill(&[2000]));
        engine.play();
        let first = engine.tick(t1).status.step_progress;
        let second = engine.tick(t2).status.step_progress;
        prop_assert!(second >= first);
    }

    #[test]
    fn pause_and_play_are_idempotent(ticks in prop::collection::vec(1u64..500, 0..10)) {
        let mut engine = DrillEngine::new(drill(&[1000, 1000, 1000]));
        engine.play();
        for t in ticks {
            engine.tick(t);
        }
        let once = engine.play();
        prop_assert!(once.is_quiet());

        let paused = engine.pause().status;
        let again = engine.pause();
        prop_assert!(again.is_quiet());
        prop_assert_eq!(paused, again.status);
    }
}
