//! Input interpretation.
//!
//! Discrete input becomes a [`ViewerAction`] dispatched by the session;
//! continuous input (pointer drags) is tracked here as per-move deltas that
//! the session applies directly to the active card. The controller is
//! host-agnostic: the winit shell translates window events into these calls,
//! and tests drive them directly.

use glam::Vec2;

/// A discrete user command, from a button, key alias or selector.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerAction {
    /// Select the card at a 0-based selector position.
    Select(usize),
    AddCard,
    AddFromFolder { folder: String, number: i64 },
    Flip,
    ToggleRotate,
    ZoomIn,
    ZoomOut,
    RipPack,
    TogglePanel,
    SetFrontImage(Vec<u8>),
    SetBackImage(Vec<u8>),
}

/// Which pointer button started a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Continuous manipulation mode chosen at drag start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Horizontal delta -> yaw, vertical delta -> pitch.
    Orbit,
    /// Horizontal delta -> roll.
    DepthRoll,
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    mode: DragMode,
    last: Vec2,
}

#[derive(Debug, Default)]
pub struct InteractionController {
    drag: Option<DragState>,
}

impl InteractionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a drag. Depth-roll when the secondary button or the Ctrl
    /// modifier is held, orbit otherwise.
    pub fn pointer_down(&mut self, position: Vec2, button: PointerButton, ctrl_held: bool) {
        let mode = if button == PointerButton::Secondary || ctrl_held {
            DragMode::DepthRoll
        } else {
            DragMode::Orbit
        };
        self.drag = Some(DragState {
            mode,
            last: position,
        });
    }

    /// Advances the drag, returning the mode and the delta since the last
    /// move sample. `None` when no drag is active.
    pub fn pointer_move(&mut self, position: Vec2) -> Option<(DragMode, Vec2)> {
        let drag = self.drag.as_mut()?;
        let delta = position - drag.last;
        drag.last = position;
        Some((drag.mode, delta))
    }

    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    #[must_use]
    pub fn drag_mode(&self) -> Option<DragMode> {
        self.drag.map(|d| d.mode)
    }
}
