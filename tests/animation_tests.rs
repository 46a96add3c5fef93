//! Animation Scheduler Tests
//!
//! Tests for:
//! - Fade ramps: 60-updates-per-second normalization, clamped snap, exactly
//!   one completion
//! - Flip easing: exponential approach, exact snap, `is_flipping` lifecycle
//! - Auto-rotate: perpetual advancement, suspended while mid-flip
//! - Delta clamping across stalled ticks
//! - Lazy self-cancellation when the bound card is disposed
//! - Idle detection and re-arming at the session level

use std::f32::consts::PI;
use std::time::{Duration, Instant};

use deckview::animation::{AnimationScheduler, AnimationTask, Completion, TaskKind};
use deckview::assets::TextureHandle;
use deckview::cards::{Card, CardId, CardPool};
use deckview::catalog::CardCatalog;
use deckview::config::ViewerConfig;
use deckview::render::{HeadlessBackend, SceneObjectId};
use deckview::session::ViewerSession;

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// A pool with one bare card, bypassing loader and backend.
fn pool_with_card() -> (CardPool, CardId) {
    let mut pool = CardPool::new();
    let id = pool.cards_mut().insert(Card::new(
        TextureHandle::default(),
        TextureHandle::default(),
        SceneObjectId(1),
    ));
    (pool, id)
}

// ============================================================================
// Fades
// ============================================================================

#[test]
fn fade_in_rate_is_normalized_to_reference_ticks() {
    let (mut pool, id) = pool_with_card();
    let config = ViewerConfig::default();
    let mut scheduler = AnimationScheduler::new();
    scheduler.push(AnimationTask::new(id, TaskKind::FadeIn));

    let t0 = Instant::now();
    scheduler.advance(pool.cards_mut(), t0, &config); // first tick: dt = 0
    scheduler.advance(pool.cards_mut(), t0 + Duration::from_millis(100), &config);

    // 0.05 per reference tick * 0.1 s * 60 = 0.3
    let card = pool.get(id).unwrap();
    assert!(approx(card.opacity, 0.3), "opacity was {}", card.opacity);
}

#[test]
fn fade_in_completes_exactly_once_and_clamps_to_one() {
    let (mut pool, id) = pool_with_card();
    let config = ViewerConfig::default();
    let mut scheduler = AnimationScheduler::new();
    scheduler.push(AnimationTask::new(id, TaskKind::FadeIn));

    let t0 = Instant::now();
    let mut completions = 0;
    for i in 0..20 {
        let now = t0 + Duration::from_millis(100 * i);
        completions += scheduler.advance(pool.cards_mut(), now, &config).len();
    }

    assert_eq!(completions, 1, "a fade completes exactly once");
    assert!(!scheduler.has_tasks(), "completed tasks leave the active set");
    let card = pool.get(id).unwrap();
    assert!(approx(card.opacity, 1.0));
    assert!(card.opacity <= 1.0, "opacity must never overshoot");
}

#[test]
fn fade_out_reports_its_completion_payload() {
    let (mut pool, id) = pool_with_card();
    pool.get_mut(id).unwrap().opacity = 1.0;
    let config = ViewerConfig::default();
    let mut scheduler = AnimationScheduler::new();
    scheduler.push(AnimationTask::with_completion(
        id,
        TaskKind::FadeOut,
        Completion::CommitSelection,
    ));

    let t0 = Instant::now();
    let mut seen = None;
    for i in 0..20 {
        let now = t0 + Duration::from_millis(100 * i);
        for done in scheduler.advance(pool.cards_mut(), now, &config) {
            seen = done.completion;
        }
    }

    assert_eq!(seen, Some(Completion::CommitSelection));
    assert!(approx(pool.get(id).unwrap().opacity, 0.0));
}

#[test]
fn delta_is_clamped_after_a_stalled_tick() {
    let (mut pool, id) = pool_with_card();
    let config = ViewerConfig::default();
    let mut scheduler = AnimationScheduler::new();
    scheduler.push(AnimationTask::new(id, TaskKind::FadeIn));

    let t0 = Instant::now();
    scheduler.advance(pool.cards_mut(), t0, &config);
    // Ten seconds of stall must advance the fade by at most one max step.
    scheduler.advance(pool.cards_mut(), t0 + Duration::from_secs(10), &config);

    let card = pool.get(id).unwrap();
    assert!(
        card.opacity <= 0.3 + EPSILON,
        "stalled tick advanced opacity to {}",
        card.opacity
    );
}

// ============================================================================
// Flip
// ============================================================================

#[test]
fn flip_eases_toward_target_and_snaps_exactly() {
    let (mut pool, id) = pool_with_card();
    {
        let card = pool.get_mut(id).unwrap();
        card.is_flipping = true;
        card.target_rotation_y = PI;
    }
    let config = ViewerConfig::default();
    let mut scheduler = AnimationScheduler::new();
    scheduler.push(AnimationTask::new(id, TaskKind::Flip));

    let t0 = Instant::now();
    let mut completed = false;
    for i in 0..200 {
        let now = t0 + Duration::from_millis(16 * i);
        if !scheduler.advance(pool.cards_mut(), now, &config).is_empty() {
            completed = true;
            break;
        }
    }

    assert!(completed, "flip never converged");
    let card = pool.get(id).unwrap();
    assert_eq!(card.rotation.y, PI, "flip must snap exactly to its target");
    assert!(!card.is_flipping, "the flip flag clears on completion");
}

#[test]
fn flip_progress_is_monotonic() {
    let (mut pool, id) = pool_with_card();
    {
        let card = pool.get_mut(id).unwrap();
        card.is_flipping = true;
        card.target_rotation_y = PI;
    }
    let config = ViewerConfig::default();
    let mut scheduler = AnimationScheduler::new();
    scheduler.push(AnimationTask::new(id, TaskKind::Flip));

    let t0 = Instant::now();
    let mut last = 0.0_f32;
    for i in 0..40 {
        let now = t0 + Duration::from_millis(30 * i);
        scheduler.advance(pool.cards_mut(), now, &config);
        let y = pool.get(id).unwrap().rotation.y;
        assert!(y >= last - EPSILON, "flip moved backwards: {last} -> {y}");
        assert!(y <= PI + EPSILON, "flip overshot: {y}");
        last = y;
    }
}

// ============================================================================
// Auto-rotate
// ============================================================================

#[test]
fn auto_rotate_is_perpetual_and_pauses_mid_flip() {
    let (mut pool, id) = pool_with_card();
    let config = ViewerConfig::default();
    let mut scheduler = AnimationScheduler::new();
    scheduler.push(AnimationTask::new(id, TaskKind::AutoRotate));

    let t0 = Instant::now();
    scheduler.advance(pool.cards_mut(), t0, &config);
    scheduler.advance(pool.cards_mut(), t0 + Duration::from_millis(100), &config);
    let spun = pool.get(id).unwrap().rotation.y;
    assert!(approx(spun, 0.02 * 0.1 * 60.0), "rotation was {spun}");
    assert!(scheduler.has_tasks(), "auto-rotate never completes on its own");

    // A mid-flip card holds still until the flip snaps.
    pool.get_mut(id).unwrap().is_flipping = true;
    scheduler.advance(pool.cards_mut(), t0 + Duration::from_millis(200), &config);
    assert!(approx(pool.get(id).unwrap().rotation.y, spun));
}

#[test]
fn cancel_auto_rotate_drops_only_the_spin() {
    let (mut pool, id) = pool_with_card();
    let mut scheduler = AnimationScheduler::new();
    scheduler.push(AnimationTask::new(id, TaskKind::AutoRotate));
    scheduler.push(AnimationTask::new(id, TaskKind::FadeIn));

    scheduler.cancel_auto_rotate();
    assert_eq!(scheduler.task_count(), 1);
    assert!(scheduler.has_fade(id));
}

// ============================================================================
// Cancellation via disposal
// ============================================================================

#[test]
fn task_for_a_disposed_card_self_cancels_without_completion() {
    let (mut pool, id) = pool_with_card();
    let config = ViewerConfig::default();
    let mut scheduler = AnimationScheduler::new();
    scheduler.push(AnimationTask::with_completion(
        id,
        TaskKind::FadeOut,
        Completion::CommitSelection,
    ));

    pool.cards_mut().remove(id);

    let completed = scheduler.advance(pool.cards_mut(), Instant::now(), &config);
    assert!(
        completed.is_empty(),
        "a cancelled task must not fire its completion"
    );
    assert!(!scheduler.has_tasks(), "stale task should be dropped");
}

// ============================================================================
// Idle detection (session level)
// ============================================================================

#[test]
fn session_idles_when_quiet_and_rearms_on_mutation() {
    let mut session = ViewerSession::new(
        HeadlessBackend::new(),
        ViewerConfig::default(),
        CardCatalog::score_1989(),
    );
    session.add_card();

    let mut now = Instant::now();
    let mut engaged = true;
    for _ in 0..600 {
        engaged = session.tick(now);
        now += Duration::from_millis(50);
        if !engaged {
            break;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    assert!(!engaged, "session never went idle");
    assert!(!session.needs_frame(), "idle session must stop requesting ticks");

    // Any discrete mutation re-arms the scheduler.
    session.zoom_in();
    assert!(session.needs_frame(), "mutation should re-arm the scheduler");
}
