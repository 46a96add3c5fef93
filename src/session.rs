//! The viewer session.
//!
//! One [`ViewerSession`] per process lifetime holds every piece of collection
//! state and choreographs the controllers: discrete actions come in through
//! [`ViewerSession::dispatch`], continuous manipulation through the pointer
//! and wheel methods, and time passes only through [`ViewerSession::tick`],
//! which the host calls once per scheduled frame. There is no global state;
//! everything the viewer knows lives in this value.

use std::time::{Duration, Instant};

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;

use crate::animation::{AnimationScheduler, AnimationTask, CompletedTask, Completion, FLIP_HALF_TURN, TaskKind};
use crate::assets::{AssetRef, ResourceLoader, TextureHandle};
use crate::banner::ErrorBanner;
use crate::camera::ViewCamera;
use crate::cards::{Card, CardId, CardPool, sample_without_replacement};
use crate::catalog::CardCatalog;
use crate::config::ViewerConfig;
use crate::errors::ViewerError;
use crate::interaction::{DragMode, InteractionController, PointerButton, ViewerAction};
use crate::render::{CardFace, CardGeometry, RenderBackend};
use crate::selection::SelectionController;
use crate::viewport::ViewportController;

pub struct ViewerSession<B: RenderBackend> {
    config: ViewerConfig,
    catalog: CardCatalog,
    backend: B,

    pool: CardPool,
    loader: ResourceLoader,
    scheduler: AnimationScheduler,
    selection: SelectionController,
    interaction: InteractionController,
    viewport: ViewportController,
    camera: ViewCamera,
    banner: ErrorBanner,

    auto_rotate: bool,
    controls_visible: bool,

    // Routes resolved texture handles back to the owning card face.
    pending_faces: FxHashMap<TextureHandle, (CardId, CardFace)>,
    rng: StdRng,
}

impl<B: RenderBackend> ViewerSession<B> {
    #[must_use]
    pub fn new(backend: B, config: ViewerConfig, catalog: CardCatalog) -> Self {
        let camera = ViewCamera::new(&config);
        let banner = ErrorBanner::new(Duration::from_secs_f32(config.banner_lifetime_secs));
        Self {
            camera,
            banner,
            backend,
            catalog,
            pool: CardPool::new(),
            loader: ResourceLoader::new(),
            scheduler: AnimationScheduler::new(),
            selection: SelectionController::new(),
            interaction: InteractionController::new(),
            viewport: ViewportController::new(1280, 720),
            auto_rotate: false,
            controls_visible: true,
            pending_faces: FxHashMap::default(),
            rng: StdRng::from_os_rng(),
            config,
        }
    }

    // ========================================================================
    // Discrete actions
    // ========================================================================

    pub fn dispatch(&mut self, action: ViewerAction) {
        match action {
            ViewerAction::Select(index) => self.select_card(index),
            ViewerAction::AddCard => self.add_card(),
            ViewerAction::AddFromFolder { folder, number } => {
                self.add_from_folder(&folder, number);
            }
            ViewerAction::Flip => self.flip_card(),
            ViewerAction::ToggleRotate => self.toggle_auto_rotate(),
            ViewerAction::ZoomIn => self.zoom_in(),
            ViewerAction::ZoomOut => self.zoom_out(),
            ViewerAction::RipPack => self.rip_pack(),
            ViewerAction::TogglePanel => self.toggle_controls(),
            ViewerAction::SetFrontImage(bytes) => self.set_front_image(bytes),
            ViewerAction::SetBackImage(bytes) => self.set_back_image(bytes),
        }
    }

    /// Selects the card at a selector position. Out-of-range positions are
    /// silently ignored: they are only reachable through an empty selector.
    pub fn select_card(&mut self, position: usize) {
        let Some(target) = self.pool.at(position) else {
            return;
        };
        self.select_id(target);
    }

    /// Selects a card by id. Selecting the already-active card is a no-op;
    /// replacing the active card fades it out first and commits the new
    /// index only when that fade completes.
    pub fn select_id(&mut self, target: CardId) {
        if !self.pool.contains(target) {
            return;
        }
        if self.selection.is_transitioning() {
            // A transition is already in flight: re-point it. The commit
            // still happens inside the original fade-out's completion.
            self.selection.retarget(target);
            self.scheduler.request_animation();
            return;
        }
        if self.selection.active() == Some(target) {
            return;
        }
        match self.selection.active() {
            Some(old) => {
                self.selection.begin_transition(target);
                self.scheduler.cancel_fades(old);
                self.scheduler.push(AnimationTask::with_completion(
                    old,
                    TaskKind::FadeOut,
                    Completion::CommitSelection,
                ));
            }
            None => self.commit_active(Some(target)),
        }
    }

    /// Allocates a card with placeholder faces and selects it.
    pub fn add_card(&mut self) {
        if let Some(id) = self.allocate_card(None, None) {
            self.select_id(id);
        }
    }

    /// Looks up a catalog entry by folder name and 1-based card number,
    /// then allocates and selects it. Invalid input is rejected before any
    /// state mutation.
    pub fn add_from_folder(&mut self, folder: &str, number: i64) {
        match self.catalog.lookup_folder_card(folder, number) {
            Ok(index) => {
                let Some(entry) = self.catalog.get(index).cloned() else {
                    return;
                };
                if let Some(id) = self.allocate_card(Some(entry.front), Some(entry.back)) {
                    self.select_id(id);
                }
            }
            Err(e) => self.report_error(&e),
        }
    }

    /// Flips the active card by one half turn. A no-op while a flip is
    /// already in flight, so spamming the action advances the target by
    /// exactly one half turn per completed flip.
    pub fn flip_card(&mut self) {
        let Some(id) = self.selection.active() else {
            return;
        };
        let Some(card) = self.pool.get_mut(id) else {
            return;
        };
        if card.is_flipping {
            return;
        }
        card.is_flipping = true;
        card.target_rotation_y += FLIP_HALF_TURN;
        self.scheduler.push(AnimationTask::new(id, TaskKind::Flip));
    }

    /// Toggles continuous rotation of the active card.
    pub fn toggle_auto_rotate(&mut self) {
        let Some(id) = self.selection.active() else {
            return;
        };
        self.auto_rotate = !self.auto_rotate;
        if self.auto_rotate {
            self.scheduler.push(AnimationTask::new(id, TaskKind::AutoRotate));
        } else {
            self.scheduler.cancel_auto_rotate();
        }
    }

    pub fn zoom_in(&mut self) {
        let step = self.config.zoom_step;
        self.camera.zoom_by(-step);
        self.scheduler.request_animation();
    }

    pub fn zoom_out(&mut self) {
        let step = self.config.zoom_step;
        self.camera.zoom_by(step);
        self.scheduler.request_animation();
    }

    pub fn toggle_controls(&mut self) {
        self.controls_visible = !self.controls_visible;
    }

    /// Disposes every live card, samples `pack_size` distinct catalog
    /// entries and allocates them, then selects the first. Disposal always
    /// fully precedes allocation; one card's failure never aborts the rest.
    pub fn rip_pack(&mut self) {
        let live: Vec<CardId> = self.pool.order().to_vec();
        for id in live {
            self.dispose_card(id);
        }

        let len = self.catalog.len();
        let count = self.config.pack_size.min(len);
        let picks = sample_without_replacement(&mut self.rng, count, len);

        let mut first = None;
        for index in picks {
            let Some(entry) = self.catalog.get(index).cloned() else {
                continue;
            };
            if let Some(id) = self.allocate_card(Some(entry.front), Some(entry.back)) {
                first.get_or_insert(id);
            }
        }
        if let Some(id) = first {
            self.select_id(id);
        }
        self.scheduler.request_animation();
        log::info!("ripped a pack of {} cards", self.pool.len());
    }

    /// Disposes one card. If it was the active card (or the target of an
    /// in-flight transition) the selection is cleared atomically, before the
    /// arena removal, so no later scheduling can observe a stale index. Any
    /// task still referencing the card self-cancels on its next tick without
    /// firing its completion.
    pub fn dispose_card(&mut self, id: CardId) {
        if self.selection.active() == Some(id) {
            self.selection.clear();
        } else if self.selection.pending() == Some(id) {
            self.selection.clear_pending();
        }
        self.pending_faces.retain(|_, owner| owner.0 != id);
        self.pool.dispose(id, &mut self.loader, &mut self.backend);
        self.scheduler.request_animation();
    }

    // ========================================================================
    // Continuous manipulation
    // ========================================================================

    pub fn pointer_down(&mut self, position: Vec2, button: PointerButton, ctrl_held: bool) {
        self.interaction.pointer_down(position, button, ctrl_held);
        self.scheduler.request_animation();
    }

    /// Applies a drag delta directly to the active card's rotation. Ignored
    /// while the card is mid-flip: the flip's easing owns the yaw until it
    /// snaps.
    pub fn pointer_move(&mut self, position: Vec2) {
        let Some((mode, delta)) = self.interaction.pointer_move(position) else {
            return;
        };
        let Some(id) = self.selection.active() else {
            return;
        };
        let sensitivity = self.config.drag_sensitivity;
        let Some(card) = self.pool.get_mut(id) else {
            return;
        };
        if card.is_flipping {
            return;
        }
        match mode {
            DragMode::Orbit => {
                card.rotation.y += delta.x * sensitivity;
                card.rotation.x += delta.y * sensitivity;
            }
            DragMode::DepthRoll => {
                card.rotation.z += delta.x * sensitivity;
            }
        }
        self.scheduler.request_animation();
    }

    pub fn pointer_up(&mut self) {
        self.interaction.pointer_up();
    }

    /// Adjusts camera distance from wheel input, clamped to the zoom bounds.
    pub fn wheel(&mut self, delta_y: f32) {
        let delta = delta_y * self.config.wheel_zoom_sensitivity;
        self.camera.zoom_by(delta);
        self.scheduler.request_animation();
    }

    /// Replaces the front texture of the active card from raw image bytes.
    pub fn set_front_image(&mut self, bytes: Vec<u8>) {
        self.set_face_image_bytes(CardFace::Front, bytes);
    }

    /// Replaces the back texture of the active card from raw image bytes.
    pub fn set_back_image(&mut self, bytes: Vec<u8>) {
        self.set_face_image_bytes(CardFace::Back, bytes);
    }

    fn set_face_image_bytes(&mut self, face: CardFace, bytes: Vec<u8>) {
        let Some(id) = self.selection.active() else {
            self.banner.report("No card selected");
            return;
        };
        let Some(card) = self.pool.get(id) else {
            return;
        };
        let (handle, label) = match face {
            CardFace::Front => (card.front, "front image upload"),
            CardFace::Back => (card.back, "back image upload"),
        };
        self.pending_faces.insert(handle, (id, face));
        if let Err(e) = self.loader.decode_into(handle, label, bytes) {
            self.report_error(&e);
        }
    }

    // ========================================================================
    // Host integration
    // ========================================================================

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport.resize(
            width,
            height,
            &mut self.camera,
            &mut self.backend,
            &mut self.scheduler,
        );
    }

    /// One scheduler tick: applies finished resource loads, advances every
    /// animation task by the clamped delta, runs completions, pushes the
    /// resulting scene state to the backend and renders exactly one frame.
    ///
    /// Returns whether another tick should be scheduled; `false` means the
    /// viewer has gone idle until the next discrete mutation re-arms it.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.banner.prune(now);
        self.pump_loader();

        let completed = self.scheduler.advance(self.pool.cards_mut(), now, &self.config);
        for done in completed {
            self.handle_completion(done);
        }

        self.sync_scene();
        if let Err(e) = self.backend.render_frame(&self.camera) {
            log::error!("render frame failed: {e}");
        }

        let engaged = self.scheduler.has_tasks()
            || self.interaction.is_dragging()
            || self.auto_rotate
            || self.loader.has_pending();
        self.scheduler.set_armed(engaged);
        engaged
    }

    /// Whether the host should schedule another tick right now.
    #[must_use]
    pub fn needs_frame(&self) -> bool {
        self.scheduler.needs_frame() || self.loader.has_pending()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn allocate_card(
        &mut self,
        front: Option<AssetRef>,
        back: Option<AssetRef>,
    ) -> Option<CardId> {
        let geometry = self.card_geometry();
        match self
            .pool
            .allocate(front, back, &mut self.loader, &mut self.backend, &geometry)
        {
            Ok(id) => {
                let faces = self.pool.get(id).map(|card| (card.front, card.back));
                if let Some((front_handle, back_handle)) = faces {
                    self.pending_faces.insert(front_handle, (id, CardFace::Front));
                    self.pending_faces.insert(back_handle, (id, CardFace::Back));
                }
                self.scheduler.request_animation();
                Some(id)
            }
            Err(e) => {
                self.report_error(&e);
                None
            }
        }
    }

    fn handle_completion(&mut self, done: CompletedTask) {
        match done.completion {
            Some(Completion::CommitSelection) => {
                // The old card has faded out; hide it, then hand the stage
                // to whichever target the transition currently points at.
                if let Some(card) = self.pool.get_mut(done.card) {
                    card.visible = false;
                    card.opacity = 0.0;
                }
                let next = self.selection.take_pending();
                self.commit_active(next);
            }
            None => {}
        }
    }

    /// The immediate commit point: used when no card was active, and from a
    /// fade-out completion. Starts the fade-in and re-homes auto-rotate.
    fn commit_active(&mut self, next: Option<CardId>) {
        self.scheduler.cancel_auto_rotate();
        let next = next.filter(|&id| self.pool.contains(id));
        self.selection.set_active(next);
        let Some(id) = next else {
            return;
        };
        self.begin_fade_in(id);
        if self.auto_rotate {
            self.scheduler.push(AnimationTask::new(id, TaskKind::AutoRotate));
        }
    }

    fn begin_fade_in(&mut self, id: CardId) {
        let Some(card) = self.pool.get_mut(id) else {
            return;
        };
        card.visible = true;
        card.opacity = 0.0;
        card.position = Vec3::ZERO;
        if !self.scheduler.has_fade(id) {
            self.scheduler.push(AnimationTask::new(id, TaskKind::FadeIn));
        }
    }

    fn pump_loader(&mut self) {
        for event in self.loader.pump() {
            match event.outcome {
                Ok(_) => {
                    if let Some(&(card_id, face)) = self.pending_faces.get(&event.handle) {
                        let object = self.pool.get(card_id).map(|card| card.object);
                        let image = self.loader.store().image(event.handle);
                        if let (Some(object), Some(image)) = (object, image) {
                            self.backend.set_face_image(object, face, &image);
                        }
                    }
                }
                Err(e) => self.report_error(&e),
            }
            self.scheduler.request_animation();
        }
    }

    fn sync_scene(&mut self) {
        for &id in self.pool.order() {
            let Some(card) = self.pool.get(id) else {
                continue;
            };
            self.backend.set_visible(card.object, card.visible);
            self.backend
                .set_transform(card.object, card.position, card.rotation);
            self.backend.set_opacity(card.object, card.opacity);
        }
    }

    fn report_error(&mut self, err: &ViewerError) {
        self.banner.report(err.to_string());
    }

    #[must_use]
    pub fn card_geometry(&self) -> CardGeometry {
        CardGeometry {
            width: self.config.card_width,
            height: self.config.card_height,
            thickness: self.config.card_thickness,
        }
    }

    // ========================================================================
    // Accessors (selector labels, button state, inspection)
    // ========================================================================

    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn camera(&self) -> &ViewCamera {
        &self.camera
    }

    #[must_use]
    pub fn pool(&self) -> &CardPool {
        &self.pool
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    #[must_use]
    pub fn banner(&self) -> &ErrorBanner {
        &self.banner
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    #[must_use]
    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    #[must_use]
    pub fn controls_visible(&self) -> bool {
        self.controls_visible
    }

    #[must_use]
    pub fn has_active(&self) -> bool {
        self.selection.active().is_some()
    }

    #[must_use]
    pub fn active_card(&self) -> Option<&Card> {
        self.selection.active().and_then(|id| self.pool.get(id))
    }

    /// 1-based selector labels for the live cards, in display order.
    #[must_use]
    pub fn card_labels(&self) -> Vec<String> {
        (1..=self.pool.len()).map(|n| format!("Card {n}")).collect()
    }

    /// True while any texture load is still in flight.
    #[must_use]
    pub fn loads_pending(&self) -> bool {
        self.loader.has_pending()
    }

    /// Number of live texture slots (two per live card).
    #[must_use]
    pub fn texture_count(&self) -> usize {
        self.loader.store().len()
    }
}
