//! Single-selection tracking.
//!
//! At most one card is active. Replacing the active card is a serialized
//! transition: the old card fades out, and only inside that fade's
//! completion does the pending target become active (and start fading in).
//! This controller owns the two indices; the session owns the choreography.

use crate::cards::CardId;

#[derive(Debug, Default)]
pub struct SelectionController {
    active: Option<CardId>,
    pending: Option<CardId>,
}

impl SelectionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn active(&self) -> Option<CardId> {
        self.active
    }

    #[must_use]
    pub fn pending(&self) -> Option<CardId> {
        self.pending
    }

    /// True while an old-to-new transition is awaiting its fade-out.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    /// Commit point: makes `id` the active card (or clears it). Only the
    /// session may call this, and only at the two places the model allows:
    /// an immediate commit when nothing was active, or inside a fade-out
    /// completion.
    pub fn set_active(&mut self, id: Option<CardId>) {
        self.active = id;
    }

    /// Starts a transition toward `target` while `active` keeps its value.
    pub fn begin_transition(&mut self, target: CardId) {
        self.pending = Some(target);
    }

    /// Re-points an in-flight transition at a new target (last one wins).
    pub fn retarget(&mut self, target: CardId) {
        debug_assert!(self.pending.is_some());
        self.pending = Some(target);
    }

    /// Consumes the pending target at commit time.
    pub fn take_pending(&mut self) -> Option<CardId> {
        self.pending.take()
    }

    /// Drops the pending target without committing (its card was disposed).
    pub fn clear_pending(&mut self) {
        self.pending = None;
    }

    /// Clears both indices: the active card was disposed, so any in-flight
    /// transition is abandoned with it.
    pub fn clear(&mut self) {
        self.active = None;
        self.pending = None;
    }
}
