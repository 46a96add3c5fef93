use std::f32::consts::PI;

use crate::cards::{Card, CardId};
use crate::config::ViewerConfig;

/// What a task animates. Tasks are tagged variants sharing one `advance`
/// operation; there is no per-kind vtable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Linear opacity ramp toward 1.
    FadeIn,
    /// Linear opacity ramp toward 0.
    FadeOut,
    /// Ease-out yaw toward `target_rotation_y`.
    Flip,
    /// Perpetual yaw increment; never completes on its own.
    AutoRotate,
}

/// Follow-up work fired exactly once when a task completes naturally.
/// A cancelled task (its card disposed) never fires this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Commit the pending selection: the one place an old-to-new selection
    /// transition is allowed to change the active index.
    CommitSelection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Running,
    Completed,
}

/// One scheduled unit of animation, bound to a card by id. Holding the id
/// rather than a reference lets a task outlive its card safely: the
/// scheduler drops any task whose arena lookup misses.
#[derive(Debug)]
pub struct AnimationTask {
    pub card: CardId,
    pub kind: TaskKind,
    pub on_complete: Option<Completion>,
}

impl AnimationTask {
    #[must_use]
    pub fn new(card: CardId, kind: TaskKind) -> Self {
        Self {
            card,
            kind,
            on_complete: None,
        }
    }

    #[must_use]
    pub fn with_completion(card: CardId, kind: TaskKind, completion: Completion) -> Self {
        Self {
            card,
            kind,
            on_complete: Some(completion),
        }
    }

    /// Advances the bound card by `dt` seconds (already clamped by the
    /// scheduler). Rates are normalized to the 60-updates-per-second
    /// reference, matching the configured per-tick constants.
    pub(crate) fn advance(&self, card: &mut Card, dt: f32, config: &ViewerConfig) -> TaskStatus {
        let steps = dt * 60.0;
        match self.kind {
            TaskKind::FadeIn => {
                card.opacity += config.fade_rate * steps;
                if card.opacity >= 1.0 {
                    card.opacity = 1.0;
                    TaskStatus::Completed
                } else {
                    TaskStatus::Running
                }
            }
            TaskKind::FadeOut => {
                card.opacity -= config.fade_rate * steps;
                if card.opacity <= 0.0 {
                    card.opacity = 0.0;
                    TaskStatus::Completed
                } else {
                    TaskStatus::Running
                }
            }
            TaskKind::Flip => {
                let remaining = card.target_rotation_y - card.rotation.y;
                card.rotation.y += remaining * steps * config.flip_easing;
                if (card.target_rotation_y - card.rotation.y).abs() < config.flip_epsilon {
                    // Snap exactly; half-turn multiples must stay exact.
                    card.rotation.y = card.target_rotation_y;
                    card.is_flipping = false;
                    TaskStatus::Completed
                } else {
                    TaskStatus::Running
                }
            }
            TaskKind::AutoRotate => {
                // A mid-flip card is left to the flip's easing; the spin
                // resumes once the flip has snapped.
                if !card.is_flipping {
                    card.rotation.y += config.auto_rotate_rate * steps;
                }
                TaskStatus::Running
            }
        }
    }
}

/// Yaw increment added by one flip action.
pub const FLIP_HALF_TURN: f32 = PI;
