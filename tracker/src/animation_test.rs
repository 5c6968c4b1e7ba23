#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

// --- easing ---

#[test]
fn ease_endpoints_and_midpoint() {
    assert_eq!(ease_in_out_quad(0.0), 0.0);
    assert!(approx_eq(ease_in_out_quad(0.5), 0.5));
    assert_eq!(ease_in_out_quad(1.0), 1.0);
}

#[test]
fn ease_is_slow_at_the_ends() {
    assert!(approx_eq(ease_in_out_quad(0.25), 0.125));
    assert!(approx_eq(ease_in_out_quad(0.75), 0.875));
}

#[test]
fn ease_is_monotonic() {
    let mut prev = 0.0;
    for i in 0..=100 {
        let v = ease_in_out_quad(f64::from(i) / 100.0);
        assert!(v >= prev);
        prev = v;
    }
}

// --- Tween ---

#[test]
fn tween_progress_is_clamped() {
    let tween = Tween { from: GridCoord::default(), to: GridCoord::new(1.0, 1.0), started_ms: 100.0, duration_ms: 500.0 };
    assert_eq!(tween.progress(0.0), 0.0);
    assert!(approx_eq(tween.progress(350.0), 0.5));
    assert_eq!(tween.progress(10_000.0), 1.0);
}

#[test]
fn zero_duration_tween_completes_immediately() {
    let tween = Tween { from: GridCoord::default(), to: GridCoord::new(2.0, 2.0), started_ms: 0.0, duration_ms: 0.0 };
    assert_eq!(tween.sample(0.0), GridCoord::new(2.0, 2.0));
}

// --- Animator ---

#[test]
fn idle_animator_does_not_tick() {
    let mut anim = Animator::new(GridCoord::new(1.0, 1.0));
    assert!(!anim.is_animating());
    assert_eq!(anim.tick(16.0), None);
    assert_eq!(anim.position(), GridCoord::new(1.0, 1.0));
}

#[test]
fn run_reaches_target_and_stops() {
    let mut anim = Animator::default();
    anim.animate_to(GridCoord::new(2.0, 2.0), 0.0, 700.0);

    let mid = anim.tick(350.0).expect("mid-run tick");
    assert!(approx_eq(mid.x, 1.0));
    assert!(anim.is_animating());

    let end = anim.tick(700.0).expect("final tick");
    assert_eq!(end, GridCoord::new(2.0, 2.0));
    assert!(!anim.is_animating());
    assert_eq!(anim.tick(716.0), None);
}

#[test]
fn late_frame_lands_exactly_on_target() {
    let mut anim = Animator::default();
    anim.animate_to(GridCoord::new(0.3, 2.7), 1_000.0, 500.0);
    assert_eq!(anim.tick(9_999.0), Some(GridCoord::new(0.3, 2.7)));
}

#[test]
fn frame_before_start_holds_origin() {
    let mut anim = Animator::new(GridCoord::new(1.0, 0.0));
    anim.animate_to(GridCoord::new(2.0, 0.0), 500.0, 500.0);
    assert_eq!(anim.tick(400.0), Some(GridCoord::new(1.0, 0.0)));
    assert!(anim.is_animating());
}

#[test]
fn retarget_starts_from_mid_flight_position() {
    let mut anim = Animator::default();
    anim.animate_to(GridCoord::new(2.0, 0.0), 0.0, 700.0);
    let mid = anim.tick(350.0).expect("mid-run tick");

    anim.animate_to(GridCoord::new(2.0, 2.0), 350.0, 700.0);
    let tween = *anim.active().expect("one active run");
    assert_eq!(tween.from, mid);
    assert_eq!(tween.to, GridCoord::new(2.0, 2.0));

    // The next frame never falls back toward the first run's origin.
    let next = anim.tick(366.0).expect("tick");
    assert!(next.x >= mid.x - EPSILON);
}

#[test]
fn retarget_never_jumps_back_to_first_origin() {
    let origin = GridCoord::new(0.0, 0.0);
    let mut anim = Animator::new(origin);
    anim.animate_to(GridCoord::new(3.0, 3.0), 0.0, 700.0);

    let mut now = 0.0;
    for step in 0..20 {
        now += 16.0;
        anim.tick(now);
        if step % 4 == 0 {
            anim.animate_to(GridCoord::new(3.0, 3.0 - f64::from(step) * 0.05), now, 700.0);
        }
        let pos = anim.position();
        if now > 16.0 {
            assert!(pos.distance(origin) > 0.0, "snapped back to origin at {now}");
        }
    }
}

#[test]
fn snap_cancels_and_moves() {
    let mut anim = Animator::default();
    anim.animate_to(GridCoord::new(3.0, 3.0), 0.0, 700.0);
    anim.snap_to(GridCoord::new(1.0, 2.0));
    assert!(!anim.is_animating());
    assert_eq!(anim.position(), GridCoord::new(1.0, 2.0));
}

#[test]
fn cancel_freezes_in_place() {
    let mut anim = Animator::default();
    anim.animate_to(GridCoord::new(3.0, 0.0), 0.0, 600.0);
    let mid = anim.tick(300.0).expect("tick");
    anim.cancel();
    assert!(!anim.is_animating());
    assert_eq!(anim.tick(600.0), None);
    assert_eq!(anim.position(), mid);
}
