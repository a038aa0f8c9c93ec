//! End-to-end range slider behaviour through the public API.

use estate::{
    DomainRange, DragPhase, GestureScript, LifecyclePhase, RangeChanged, RangeSlider, Replayer,
    SliderManifest, SyncOutcome, Thumb, ValueFormat, Widget,
};
use estate_test::Harness;
use proptest::prelude::*;
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<(f64, f64)>>>;

/// 124px wide with 12px thumbs: the track spans x=12..112, one pixel per unit.
fn harness(low: f64, high: f64) -> (Harness<RangeSlider>, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let slider = RangeSlider::new(DomainRange::new(0.0, 100.0, 1.0).unwrap(), low, high)
        .unwrap()
        .on_change(move |l, h| sink.lock().unwrap().push((l, h)));
    (Harness::new(slider).viewport(124.0, 100.0), log)
}

fn x(value: f32) -> f32 {
    12.0 + value
}

fn calls(log: &Log) -> Vec<(f64, f64)> {
    log.lock().unwrap().clone()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn drag_low_past_high_sticks_one_step_below() {
    let (mut h, log) = harness(20.0, 80.0);
    h.press(x(20.0)).drag_to(x(95.0)).wait(50);
    assert_eq!(calls(&log), vec![(79.0, 80.0)]);

    h.release().wait(10);
    assert_eq!(calls(&log), vec![(79.0, 80.0), (79.0, 80.0)]);
    h.assert_last_message(&RangeChanged::new(79.0, 80.0));
}

#[test]
fn degenerate_domain_reports_zero() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let slider = RangeSlider::new(DomainRange::new(0.0, 0.0, 1.0).unwrap(), 0.0, 0.0)
        .unwrap()
        .on_change(move |l, h| sink.lock().unwrap().push((l, h)));
    let mut h = Harness::new(slider).viewport(124.0, 100.0);
    h.press(x(0.0)).drag_to(x(60.0)).release().wait(10);
    assert_eq!(calls(&log), vec![(0.0, 0.0)]);
    assert!(h.widget().position(Thumb::Low).abs() < f64::EPSILON);
    assert!(h.widget().position(Thumb::High).abs() < f64::EPSILON);
}

#[test]
fn external_update_ignored_mid_drag_then_honored() {
    let (mut h, _) = harness(30.0, 70.0);
    h.press(x(70.0)).drag_to(x(75.0));
    assert_eq!(
        h.widget_mut().sync(40.0, 60.0, 0.0, 100.0),
        Ok(SyncOutcome::IgnoredWhileDragging)
    );
    assert_eq!(h.widget().values(), (30.0, 75.0));

    h.release().wait(10);
    assert_eq!(
        h.widget_mut().sync(40.0, 60.0, 0.0, 100.0),
        Ok(SyncOutcome::Applied)
    );
    assert_eq!(h.widget().values(), (40.0, 60.0));
}

#[test]
fn burst_of_moves_delivers_once() {
    let (mut h, log) = harness(20.0, 80.0);
    h.press(x(20.0));
    for step in 1..=10u8 {
        h.drag_to(x(20.0 + f32::from(step))).wait(5);
    }
    assert!(calls(&log).is_empty());
    h.wait(45);
    assert_eq!(calls(&log), vec![(30.0, 80.0)]);
}

#[test]
fn release_forces_exactly_one_more_notification() {
    let (mut h, log) = harness(20.0, 80.0);
    h.press(x(20.0)).drag_to(x(40.0)).release();
    h.wait(9);
    assert!(calls(&log).is_empty());
    h.wait(1).wait(500);
    assert_eq!(calls(&log), vec![(40.0, 80.0)]);
    assert_eq!(h.widget().phase(Thumb::Low), DragPhase::Idle);
}

#[test]
fn unmount_drops_pending_notifications() {
    let (mut h, log) = harness(20.0, 80.0);
    h.press(x(20.0)).drag_to(x(40.0)).unmount().wait(1000);
    assert!(calls(&log).is_empty());
    assert!(!h.widget().is_mounted());
    h.assert_message_count(0);
}

#[test]
fn two_pointers_drag_both_thumbs() {
    let (mut h, log) = harness(20.0, 80.0);
    h.pointer_down(1, x(20.0))
        .pointer_down(2, x(80.0))
        .pointer_move(1, x(35.0))
        .pointer_move(2, x(50.0))
        .pointer_up(1)
        .pointer_up(2)
        .wait(10);
    assert_eq!(h.widget().values(), (35.0, 50.0));
    assert_eq!(calls(&log), vec![(35.0, 50.0), (35.0, 50.0)]);
}

#[test]
fn pointer_cancel_settles_thumb() {
    let (mut h, log) = harness(20.0, 80.0);
    h.pointer_down(9, x(80.0)).pointer_move(9, x(90.0)).pointer_cancel(9);
    assert_eq!(h.widget().phase(Thumb::High), DragPhase::Settling);
    h.wait(10);
    assert_eq!(calls(&log), vec![(20.0, 90.0)]);
}

#[test]
fn labels_follow_formatter() {
    let slider = RangeSlider::new(
        DomainRange::new(0.0, 50_000_000.0, 100_000.0).unwrap(),
        2_500_000.0,
        15_000_000.0,
    )
    .unwrap()
    .value_format(ValueFormat::lakh("₹"));
    let h = Harness::new(slider).viewport(344.0, 60.0);
    h.assert_texts(&["₹25L", "₹1.5Cr"]);
}

#[test]
fn remount_restores_input() {
    let (mut h, log) = harness(20.0, 80.0);
    h.unmount();
    h.widget_mut().lifecycle(LifecyclePhase::Mount);
    h.press(x(20.0)).drag_to(x(25.0)).release().wait(10);
    assert_eq!(calls(&log), vec![(25.0, 80.0)]);
}

// =============================================================================
// Manifest + Replay
// =============================================================================

#[test]
fn manifest_and_script_replay() {
    let manifest = SliderManifest::from_yaml(
        r##"
min: 0
max: 1000
step: 10
low: 200
high: 800
width: 124
format:
  style: compact
  prefix: "$"
"##,
    )
    .unwrap();
    let script = GestureScript::from_yaml(
        r"
steps:
  - action: press
    x: 92
  - action: move
    x: 22
  - action: wait
    ms: 50
  - action: release
  - action: wait
    ms: 10
",
    )
    .unwrap();

    let replayer = Replayer::from_manifest(&manifest).unwrap();
    assert_eq!(replayer.slider().labels().1, "$800");
    let report = replayer.run(&script).unwrap();
    // High thumb dragged down onto low stops one step above it.
    assert!((report.high - 210.0).abs() < 1e-9);
    assert_eq!(report.notifications.len(), 2);
    assert_eq!(report.notifications[1].at_ms, 60);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_random_gestures_keep_invariants(
        moves in proptest::collection::vec((0u8..3, 0.0f32..124.0, 0u32..80), 1..40),
    ) {
        let (mut h, log) = harness(20.0, 80.0);
        for (kind, px, wait) in moves {
            match kind {
                0 => { h.press(px); }
                1 => { h.drag_to(px); }
                _ => { h.release(); }
            }
            h.wait(wait);
            let (low, high) = h.widget().values();
            prop_assert!(0.0 <= low && low <= high && high <= 100.0);
            prop_assert!(high - low >= 1.0 - 1e-9);
        }
        h.release().wait(100);
        prop_assert!(!h.widget().is_interacting());
        for (low, high) in calls(&log) {
            prop_assert!(low <= high);
        }
    }
}
