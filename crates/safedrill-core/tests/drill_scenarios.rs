//! Integration tests for complete drill runs through the controller.

use safedrill_core::{
    AlarmSignal, AlarmState, Drill, DrillCatalog, DrillController, DrillEngine, DrillOptions,
    Event, FixedPoints, ManualClock, MockAlarm, PlayState, Step, SummaryError, Ticker,
    TimeSource,
};

fn drill(durations: &[u64]) -> Drill {
    let steps = durations
        .iter()
        .enumerate()
        .map(|(i, &duration_ms)| Step {
            id: format!("step-{i}"),
            title: format!("Step {i}"),
            description: String::new(),
            safety_note: String::new(),
            icon: None,
            duration_ms,
        })
        .collect();
    Drill::new("scenario", "Scenario", steps).unwrap()
}

fn controller(durations: &[u64], alarm: MockAlarm) -> DrillController<MockAlarm> {
    DrillController::new(DrillEngine::new(drill(durations)), alarm)
}

#[test]
fn one_step_drill_completes_after_settle() {
    let mut c = controller(&[1000], MockAlarm::new());
    c.play();

    let t = c.tick(500);
    assert_eq!(t.status.step_progress, 50.0);
    assert_eq!(t.status.play_state, PlayState::Running);

    let t = c.tick(600);
    assert_eq!(t.status.step_progress, 100.0);
    assert!(matches!(
        c.summary(),
        Err(SummaryError::NotAvailable {
            state: PlayState::Running
        })
    ));

    let t = c.tick(500);
    assert_eq!(t.status.play_state, PlayState::Completed);
    assert!(t
        .events
        .iter()
        .any(|e| matches!(e, Event::DrillCompleted { steps_completed: 1, .. })));
    assert!(!c.alarm().is_on());

    let summary = c.summary().unwrap();
    assert_eq!(summary.drill_id, "scenario");
    assert_eq!(summary.steps_completed, 1);
}

#[test]
fn second_step_starts_at_zero_after_settle() {
    let mut c = controller(&[1000, 2000], MockAlarm::new());
    c.play();
    c.tick(1000);

    for _ in 0..4 {
        let t = c.tick(100);
        assert_eq!(t.status.current_index, 0);
        assert_eq!(t.status.step_progress, 100.0);
    }

    let t = c.tick(100);
    assert_eq!(t.status.current_index, 1);
    assert_eq!(t.status.step_progress, 0.0);

    let t = c.tick(1000);
    assert_eq!(t.status.step_progress, 50.0);
}

#[test]
fn play_pause_cycle_starts_and_stops_alarm_twice() {
    let mut c = controller(&[1000], MockAlarm::new());
    c.play();
    assert_eq!(c.alarm().start_calls(), 1);
    c.pause();
    assert_eq!(c.alarm().stop_calls(), 1);
    c.play();
    c.pause();
    assert_eq!(c.alarm().start_calls(), 2);
    assert_eq!(c.alarm().stop_calls(), 2);
}

#[test]
fn broken_alarm_does_not_stop_the_drill() {
    let mut c = controller(&[300, 300], MockAlarm::failing());
    let t = c.play();
    assert_eq!(t.status.alarm_state, AlarmState::Off);
    assert!(t
        .events
        .iter()
        .any(|e| matches!(e, Event::AlarmUnavailable { .. })));

    let mut last = t.status;
    for _ in 0..20 {
        last = c.tick(100).status;
        assert_eq!(last.alarm_state, AlarmState::Off);
    }
    assert_eq!(last.play_state, PlayState::Completed);
    assert_eq!(c.alarm().start_calls(), 1);
    assert!(c.summary().is_ok());
}

#[test]
fn reset_mid_settle_cancels_everything() {
    let mut c = controller(&[1000, 1000], MockAlarm::new());
    c.play();
    c.tick(1000);
    assert!(c.engine().is_settling());

    let t = c.reset();
    assert!(t.status.is_initial());
    assert!(!c.alarm().is_on());

    // Ticks after reset are discarded until play.
    assert!(c.tick(1000).status.is_initial());
}

#[test]
fn builtin_earthquake_drill_runs_on_manual_clock() {
    let drill = DrillCatalog::builtin().get("earthquake").clone();
    let options = DrillOptions {
        settle_delay_ms: 500,
        alarm_enabled: true,
    };
    let mut c = DrillController::new(DrillEngine::with_options(drill, options), MockAlarm::new());
    let clock = ManualClock::new(0);
    let mut ticker = Ticker::new(clock.clone());

    c.play();
    ticker.resume();
    let mut advanced = 0;
    while c.status().play_state == PlayState::Running {
        clock.advance(100);
        let elapsed = ticker.sample().unwrap();
        let t = c.tick(elapsed);
        advanced += t
            .events
            .iter()
            .filter(|e| matches!(e, Event::StepAdvanced { .. }))
            .count();
    }

    assert_eq!(advanced, 3);
    assert_eq!(c.status().play_state, PlayState::Completed);
    // 14 s of steps plus four 500 ms settle windows.
    assert_eq!(clock.now_ms(), 16_000);

    let award = c.award(&FixedPoints::default()).unwrap();
    assert_eq!(award.points, 250);
    assert_eq!(award.summary.steps_completed, 4);
    assert_eq!(c.award(&FixedPoints::default()), Err(SummaryError::AlreadyAwarded));
}
