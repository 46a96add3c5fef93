//! The card arena.
//!
//! Cards live in a slotmap keyed by [`CardId`]; the versioned keys are the
//! stable identities the rest of the system passes around, so a disposed
//! card turns every task or selection that still references it into a cheap
//! arena miss instead of a dangling pointer. Insertion order (= selector
//! order) is kept in a separate vec.

use glam::Vec3;
use rand::Rng;
use rustc_hash::FxHashSet;
use slotmap::{SlotMap, new_key_type};

use crate::assets::{AssetRef, ResourceLoader, TextureHandle};
use crate::errors::Result;
use crate::render::{CardGeometry, RenderBackend, SceneObjectId};

new_key_type! {
    /// Stable identity of a live card. Never reused while the card is live.
    pub struct CardId;
}

/// One double-sided trading card.
#[derive(Debug)]
pub struct Card {
    pub front: TextureHandle,
    pub back: TextureHandle,
    pub object: SceneObjectId,

    pub position: Vec3,
    /// Euler rotation in radians (x = pitch, y = yaw, z = roll).
    pub rotation: Vec3,
    /// Yaw the flip animation converges toward.
    pub target_rotation_y: f32,

    /// Always within `[0, 1]`.
    pub opacity: f32,
    pub visible: bool,
    pub is_flipping: bool,
}

impl Card {
    #[must_use]
    pub fn new(front: TextureHandle, back: TextureHandle, object: SceneObjectId) -> Self {
        Self {
            front,
            back,
            object,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            target_rotation_y: 0.0,
            opacity: 0.0,
            visible: false,
            is_flipping: false,
        }
    }
}

/// Owner of all live cards.
#[derive(Debug, Default)]
pub struct CardPool {
    cards: SlotMap<CardId, Card>,
    order: Vec<CardId>,
}

impl CardPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Live cards in insertion order.
    #[must_use]
    pub fn order(&self) -> &[CardId] {
        &self.order
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id)
    }

    #[must_use]
    pub fn get_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.get_mut(id)
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(id)
    }

    /// Card at a selector position.
    #[must_use]
    pub fn at(&self, position: usize) -> Option<CardId> {
        self.order.get(position).copied()
    }

    /// Selector position of a card.
    #[must_use]
    pub fn position_of(&self, id: CardId) -> Option<usize> {
        self.order.iter().position(|&c| c == id)
    }

    /// Direct access to the arena, for the animation scheduler.
    pub fn cards_mut(&mut self) -> &mut SlotMap<CardId, Card> {
        &mut self.cards
    }

    /// Creates a card: backend object first (a creation failure yields no
    /// card at all), then texture requests. Texture readiness never gates
    /// allocation; the card starts invisible at opacity 0.
    pub fn allocate<B: RenderBackend + ?Sized>(
        &mut self,
        front: Option<AssetRef>,
        back: Option<AssetRef>,
        loader: &mut ResourceLoader,
        backend: &mut B,
        geometry: &CardGeometry,
    ) -> Result<CardId> {
        let object = backend.create_scene_object(geometry)?;

        let index = self.order.len();
        let front = front.unwrap_or_else(|| AssetRef::placeholder(format!("Front {index}")));
        let back = back.unwrap_or_else(|| AssetRef::placeholder(format!("Back {index}")));
        let front_handle = loader.request(&front);
        let back_handle = loader.request(&back);

        let id = self.cards.insert(Card::new(front_handle, back_handle, object));
        self.order.push(id);
        log::info!("allocated card {id:?} ({})", front.label());
        Ok(id)
    }

    /// Disposes a card: releases both texture handles (idempotent even when a
    /// handle never resolved), removes the backend object, drops the card
    /// from the arena and the order. Safe to call while animation tasks still
    /// reference the card; they self-cancel on their next tick.
    pub fn dispose<B: RenderBackend + ?Sized>(
        &mut self,
        id: CardId,
        loader: &mut ResourceLoader,
        backend: &mut B,
    ) {
        let Some(card) = self.cards.remove(id) else {
            return;
        };
        loader.release(card.front);
        loader.release(card.back);
        backend.remove_scene_object(card.object);
        self.order.retain(|&c| c != id);
        log::info!("disposed card {id:?}");
    }
}

/// Draws `n` distinct indices uniformly from `[0, len)` by rejection
/// sampling: draw, reject anything already chosen, repeat. Expected O(n)
/// draws while `n` is small relative to `len`, and still correct (terminating
/// with n pairwise-distinct results, with probability 1) all the way up to
/// `n == len`.
///
/// # Panics
/// If `n > len`.
pub fn sample_without_replacement<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    len: usize,
) -> Vec<usize> {
    assert!(n <= len, "cannot draw {n} distinct indices from {len}");
    let mut chosen = FxHashSet::default();
    let mut picks = Vec::with_capacity(n);
    while picks.len() < n {
        let index = rng.random_range(0..len);
        if chosen.insert(index) {
            picks.push(index);
        }
    }
    picks
}
