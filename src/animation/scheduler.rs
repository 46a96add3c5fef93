//! The frame-driven animation scheduler.
//!
//! Single-threaded and cooperative: the host hands it wall-clock timestamps,
//! it advances every in-flight task by the clamped delta, and it reports
//! which tasks completed so the session can run their follow-ups. It holds
//! one coalesced "next frame" request; repeated requests while already armed
//! are no-ops, and the session disarms it when nothing is left to animate.

use std::time::Instant;

use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::animation::task::{AnimationTask, Completion, TaskKind, TaskStatus};
use crate::cards::{Card, CardId};
use crate::config::ViewerConfig;

/// Record of a task that finished naturally during a tick.
#[derive(Debug)]
pub struct CompletedTask {
    pub card: CardId,
    pub kind: TaskKind,
    pub completion: Option<Completion>,
}

#[derive(Debug, Default)]
pub struct AnimationScheduler {
    tasks: SmallVec<[AnimationTask; 8]>,
    needs_frame: bool,
    last_tick: Option<Instant>,
}

impl AnimationScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the scheduler for (at least) one more tick. Coalesced.
    pub fn request_animation(&mut self) {
        self.needs_frame = true;
    }

    /// Whether a tick is currently requested.
    #[must_use]
    pub fn needs_frame(&self) -> bool {
        self.needs_frame
    }

    pub(crate) fn set_armed(&mut self, armed: bool) {
        self.needs_frame = armed;
        if !armed {
            // Forget the tick clock while idle; the first tick after a
            // re-arm integrates from zero instead of the idle gap.
            self.last_tick = None;
        }
    }

    /// Schedules a task and arms the next tick.
    pub fn push(&mut self, task: AnimationTask) {
        self.tasks.push(task);
        self.needs_frame = true;
    }

    #[must_use]
    pub fn has_tasks(&self) -> bool {
        !self.tasks.is_empty()
    }

    #[must_use]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// True if a fade (either direction) is in flight for the card.
    #[must_use]
    pub fn has_fade(&self, card: CardId) -> bool {
        self.tasks.iter().any(|t| {
            t.card == card && matches!(t.kind, TaskKind::FadeIn | TaskKind::FadeOut)
        })
    }

    /// Cancels fade tasks for one card without firing their completions.
    pub fn cancel_fades(&mut self, card: CardId) {
        self.tasks.retain(|t| {
            !(t.card == card && matches!(t.kind, TaskKind::FadeIn | TaskKind::FadeOut))
        });
    }

    /// Cancels every auto-rotate task (there is at most one in practice).
    pub fn cancel_auto_rotate(&mut self) {
        self.tasks.retain(|t| t.kind != TaskKind::AutoRotate);
    }

    /// Advances all tasks against the card arena.
    ///
    /// The delta is `now - last_tick`, clamped to the configured maximum
    /// step. A task whose card has been disposed is dropped silently (no
    /// completion); a task that reaches its terminal state is removed and
    /// reported. One task can never affect another's advancement.
    pub fn advance(
        &mut self,
        cards: &mut SlotMap<CardId, Card>,
        now: Instant,
        config: &ViewerConfig,
    ) -> Vec<CompletedTask> {
        let dt = match self.last_tick {
            Some(prev) => config.clamp_delta(now.saturating_duration_since(prev).as_secs_f32()),
            None => 0.0,
        };
        self.last_tick = Some(now);

        let mut completed = Vec::new();
        self.tasks.retain(|task| {
            let Some(card) = cards.get_mut(task.card) else {
                // Card disposed since the task was scheduled: self-cancel.
                return false;
            };
            match task.advance(card, dt, config) {
                TaskStatus::Running => true,
                TaskStatus::Completed => {
                    completed.push(CompletedTask {
                        card: task.card,
                        kind: task.kind,
                        completion: task.on_complete.take(),
                    });
                    false
                }
            }
        });
        completed
    }
}
