use slotmap::{SlotMap, new_key_type};

use crate::assets::image::Image;

new_key_type! {
    /// Stable handle to a texture slot. Versioned, never reused while live.
    pub struct TextureHandle;
}

/// Readiness of a texture slot.
#[derive(Debug, Clone)]
pub enum TextureState {
    /// A load is in flight; the face renders blank until resolution.
    Loading,
    /// Decoded pixels are available.
    Ready(Image),
    /// The load failed; the face keeps rendering blank.
    Failed,
}

#[derive(Debug)]
pub struct TextureSlot {
    pub label: String,
    pub state: TextureState,
}

/// Owner of all live texture slots, keyed by [`TextureHandle`].
///
/// Mutated only from the control thread; the loader worker never touches it
/// and instead reports results through a channel.
#[derive(Debug, Default)]
pub struct TextureStore {
    slots: SlotMap<TextureHandle, TextureSlot>,
}

impl TextureStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new slot in the `Loading` state.
    pub fn insert_loading(&mut self, label: &str) -> TextureHandle {
        self.slots.insert(TextureSlot {
            label: label.to_string(),
            state: TextureState::Loading,
        })
    }

    #[must_use]
    pub fn get(&self, handle: TextureHandle) -> Option<&TextureSlot> {
        self.slots.get(handle)
    }

    #[must_use]
    pub fn contains(&self, handle: TextureHandle) -> bool {
        self.slots.contains_key(handle)
    }

    /// Marks the slot ready with the given image. If the slot was already
    /// ready the existing image is updated in place (re-texture path), so
    /// backends holding a clone observe the change through its version.
    pub fn resolve(&mut self, handle: TextureHandle, image: &Image) {
        let Some(slot) = self.slots.get_mut(handle) else {
            // Released while the load was in flight; drop the result.
            return;
        };
        if let TextureState::Ready(existing) = &slot.state {
            image.with_data(|data| {
                existing.update_data(data.width, data.height, data.pixels.clone());
            });
        } else {
            slot.state = TextureState::Ready(image.clone());
        }
    }

    /// Marks an unresolved slot failed. A slot that already has pixels keeps
    /// them: a failed re-texture must not blank a working face.
    pub fn fail(&mut self, handle: TextureHandle) {
        if let Some(slot) = self.slots.get_mut(handle)
            && matches!(slot.state, TextureState::Loading)
        {
            slot.state = TextureState::Failed;
        }
    }

    /// Releases a slot. Idempotent: releasing an unknown or never-resolved
    /// handle is a no-op.
    pub fn release(&mut self, handle: TextureHandle) {
        self.slots.remove(handle);
    }

    /// Clone of the slot's image, if it has resolved.
    #[must_use]
    pub fn image(&self, handle: TextureHandle) -> Option<Image> {
        match self.slots.get(handle).map(|slot| &slot.state) {
            Some(TextureState::Ready(image)) => Some(image.clone()),
            _ => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
