//! Interaction Tests
//!
//! Tests for:
//! - Drag modes: orbit vs depth-roll (secondary button / Ctrl)
//! - Drag suppression while the active card is mid-flip
//! - Camera distance clamping under wheel and button zoom
//! - Flip spam: one half-turn per completed flip
//! - Action dispatch (the keyboard aliases route through the same actions)
//! - Folder lookup and image-upload input validation

use std::f32::consts::PI;
use std::time::{Duration, Instant};

use glam::Vec2;

use deckview::catalog::CardCatalog;
use deckview::config::ViewerConfig;
use deckview::interaction::{PointerButton, ViewerAction};
use deckview::render::{CardFace, HeadlessBackend};
use deckview::session::ViewerSession;

fn new_session() -> ViewerSession<HeadlessBackend> {
    ViewerSession::new(
        HeadlessBackend::new(),
        ViewerConfig::default(),
        CardCatalog::score_1989(),
    )
}

fn settle(session: &mut ViewerSession<HeadlessBackend>, mut now: Instant) -> Instant {
    for _ in 0..600 {
        let engaged = session.tick(now);
        now += Duration::from_millis(50);
        if !engaged {
            return now;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    panic!("session did not settle");
}

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

// ============================================================================
// Dragging
// ============================================================================

#[test]
fn orbit_drag_applies_yaw_and_pitch() {
    let mut session = new_session();
    session.add_card();

    session.pointer_down(Vec2::new(100.0, 100.0), PointerButton::Primary, false);
    session.pointer_move(Vec2::new(110.0, 105.0));
    session.pointer_up();

    let card = session.active_card().unwrap();
    assert!(approx(card.rotation.y, 10.0 * 0.005), "yaw {}", card.rotation.y);
    assert!(approx(card.rotation.x, 5.0 * 0.005), "pitch {}", card.rotation.x);
    assert!(approx(card.rotation.z, 0.0));
}

#[test]
fn depth_roll_from_secondary_button() {
    let mut session = new_session();
    session.add_card();

    session.pointer_down(Vec2::new(0.0, 0.0), PointerButton::Secondary, false);
    session.pointer_move(Vec2::new(20.0, 50.0));

    let card = session.active_card().unwrap();
    assert!(approx(card.rotation.z, 20.0 * 0.005), "roll {}", card.rotation.z);
    assert!(approx(card.rotation.y, 0.0), "depth-roll must not yaw");
    assert!(approx(card.rotation.x, 0.0), "depth-roll must not pitch");
}

#[test]
fn depth_roll_from_ctrl_modifier() {
    let mut session = new_session();
    session.add_card();

    session.pointer_down(Vec2::new(0.0, 0.0), PointerButton::Primary, true);
    session.pointer_move(Vec2::new(-40.0, 0.0));

    let card = session.active_card().unwrap();
    assert!(approx(card.rotation.z, -40.0 * 0.005));
}

#[test]
fn drag_deltas_accumulate_between_samples() {
    let mut session = new_session();
    session.add_card();

    session.pointer_down(Vec2::new(0.0, 0.0), PointerButton::Primary, false);
    session.pointer_move(Vec2::new(10.0, 0.0));
    session.pointer_move(Vec2::new(30.0, 0.0)); // delta 20 from the last sample

    let card = session.active_card().unwrap();
    assert!(approx(card.rotation.y, 30.0 * 0.005));
}

#[test]
fn drag_is_ignored_while_flipping() {
    let mut session = new_session();
    session.add_card();
    session.flip_card();

    session.pointer_down(Vec2::new(0.0, 0.0), PointerButton::Primary, false);
    session.pointer_move(Vec2::new(100.0, 100.0));

    let card = session.active_card().unwrap();
    assert!(approx(card.rotation.y, 0.0), "mid-flip drags must be dropped");
    assert!(approx(card.rotation.x, 0.0));
}

#[test]
fn drag_without_active_card_is_a_noop() {
    let mut session = new_session();
    session.pointer_down(Vec2::new(0.0, 0.0), PointerButton::Primary, false);
    session.pointer_move(Vec2::new(50.0, 50.0));
    session.pointer_up();
    assert!(session.pool().is_empty());
}

// ============================================================================
// Zoom
// ============================================================================

#[test]
fn wheel_zoom_is_always_clamped() {
    let mut session = new_session();
    assert!(approx(session.camera().distance, 5.0));

    session.wheel(100_000.0);
    assert!(approx(session.camera().distance, 10.0));

    session.wheel(-100_000.0);
    assert!(approx(session.camera().distance, 2.0));

    // An arbitrary mixed sequence stays inside the bounds.
    for (i, &delta) in [35.0, -900.0, 4.0, 1200.0, -3.0, -0.5, 777.0]
        .iter()
        .cycle()
        .take(100)
        .enumerate()
    {
        session.wheel(delta * if i % 3 == 0 { -1.0 } else { 1.0 });
        let d = session.camera().distance;
        assert!((2.0..=10.0).contains(&d), "distance escaped clamp: {d}");
    }
}

#[test]
fn zoom_buttons_step_and_clamp() {
    let mut session = new_session();
    session.zoom_in();
    assert!(approx(session.camera().distance, 4.5));

    for _ in 0..50 {
        session.zoom_in();
    }
    assert!(approx(session.camera().distance, 2.0));

    for _ in 0..50 {
        session.zoom_out();
    }
    assert!(approx(session.camera().distance, 10.0));
}

// ============================================================================
// Flip spam
// ============================================================================

#[test]
fn flip_spam_advances_target_once_per_completed_flip() {
    let mut session = new_session();
    session.add_card();

    for _ in 0..5 {
        session.dispatch(ViewerAction::Flip);
    }
    assert!(
        approx(session.active_card().unwrap().target_rotation_y, PI),
        "spamming flip mid-flight must not double-increment"
    );

    let now = settle(&mut session, Instant::now());
    assert!(!session.active_card().unwrap().is_flipping);

    session.dispatch(ViewerAction::Flip);
    assert!(approx(
        session.active_card().unwrap().target_rotation_y,
        2.0 * PI
    ));
    settle(&mut session, now);
    assert!(approx(session.active_card().unwrap().rotation.y, 2.0 * PI));
}

// ============================================================================
// Discrete actions
// ============================================================================

#[test]
fn dispatch_routes_like_the_direct_methods() {
    let mut session = new_session();
    session.dispatch(ViewerAction::AddCard);
    assert_eq!(session.pool().len(), 1);

    session.dispatch(ViewerAction::ToggleRotate);
    assert!(session.auto_rotate());
    session.dispatch(ViewerAction::ToggleRotate);
    assert!(!session.auto_rotate());

    session.dispatch(ViewerAction::ZoomIn);
    assert!(approx(session.camera().distance, 4.5));
    session.dispatch(ViewerAction::ZoomOut);
    assert!(approx(session.camera().distance, 5.0));

    session.dispatch(ViewerAction::TogglePanel);
    assert!(!session.controls_visible());
}

#[test]
fn toggle_rotate_without_a_card_is_a_noop() {
    let mut session = new_session();
    session.dispatch(ViewerAction::ToggleRotate);
    assert!(!session.auto_rotate());
}

#[test]
fn auto_rotate_spins_only_the_active_card() {
    let mut session = new_session();
    session.add_card();
    let now = settle(&mut session, Instant::now());

    session.dispatch(ViewerAction::ToggleRotate);
    let mut t = now;
    for _ in 0..5 {
        session.tick(t);
        t += Duration::from_millis(50);
    }
    let card = session.active_card().unwrap();
    assert!(card.rotation.y > 0.0, "auto-rotate should accumulate yaw");
    assert!(session.needs_frame(), "auto-rotate keeps the scheduler armed");
}

// ============================================================================
// Folder lookup & uploads
// ============================================================================

#[test]
fn add_from_folder_accepts_the_known_folder() {
    let mut session = new_session();
    session.add_from_folder("1989 Score Football", 150);
    assert_eq!(session.pool().len(), 1);
    assert!(session.banner().is_empty());
}

#[test]
fn add_from_folder_rejects_bad_input_before_mutation() {
    let mut session = new_session();

    session.add_from_folder("NFL 1990", 5);
    assert!(session.pool().is_empty());
    assert!(!session.banner().is_empty());

    session.add_from_folder("1989 score football", 331);
    assert_eq!(session.pool().len(), 0, "rejected input must not allocate");
}

#[test]
fn empty_upload_is_rejected() {
    let mut session = new_session();
    session.add_card();
    session.dispatch(ViewerAction::SetFrontImage(Vec::new()));
    assert!(!session.banner().is_empty(), "empty file input is an error");
}

#[test]
fn upload_without_selection_is_rejected() {
    let mut session = new_session();
    session.dispatch(ViewerAction::SetFrontImage(vec![1, 2, 3]));
    assert!(!session.banner().is_empty());
}

#[test]
fn invalid_image_bytes_report_and_keep_the_old_face() {
    let mut session = new_session();
    session.add_card();
    let now = settle(&mut session, Instant::now());

    let object = session.active_card().unwrap().object;
    let before = session
        .backend()
        .object(object)
        .and_then(|record| record.faces.get(&CardFace::Front).cloned())
        .expect("placeholder face should have resolved");

    session.dispatch(ViewerAction::SetFrontImage(b"not an image".to_vec()));
    settle(&mut session, now);

    assert!(!session.banner().is_empty(), "decode failure must be reported");
    let after = session
        .backend()
        .object(object)
        .and_then(|record| record.faces.get(&CardFace::Front).cloned())
        .unwrap();
    assert_eq!(before, after, "a failed upload must not blank the face");
}

#[test]
fn valid_upload_replaces_the_face_pixels() {
    let mut session = new_session();
    session.add_card();
    let now = settle(&mut session, Instant::now());

    let mut png = Vec::new();
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .expect("png encode");

    let object = session.active_card().unwrap().object;
    let face = session
        .backend()
        .object(object)
        .and_then(|record| record.faces.get(&CardFace::Front).cloned())
        .unwrap();
    let version_before = face.version();

    session.dispatch(ViewerAction::SetFrontImage(png));
    settle(&mut session, now);

    assert!(session.banner().is_empty(), "valid upload should not report");
    assert_eq!(face.width(), 2, "pixels are swapped in place");
    assert!(face.version() > version_before, "version must advance");
}
