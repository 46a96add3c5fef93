//! The consumed rendering interface.
//!
//! The viewer core never draws anything itself: it pushes object lifecycle,
//! transform, opacity and face-image changes through [`RenderBackend`] and
//! asks for exactly one frame per scheduler tick. Any scene-graph library can
//! sit behind the trait; the crate ships [`HeadlessBackend`] for tests and
//! headless runs.

pub mod headless;

use glam::Vec3;

use crate::assets::Image;
use crate::camera::ViewCamera;
use crate::errors::Result;

pub use headless::HeadlessBackend;

/// Opaque identifier of one backend scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneObjectId(pub u64);

/// The two textured faces of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardFace {
    Front,
    Back,
}

/// Box dimensions of a card mesh, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardGeometry {
    pub width: f32,
    pub height: f32,
    pub thickness: f32,
}

/// Rendering operations the viewer depends on.
///
/// Creation may fail (resource allocation); every other mutation is
/// fire-and-forget and must tolerate ids the backend no longer knows.
pub trait RenderBackend {
    /// Allocates a double-sided card object and returns its id.
    fn create_scene_object(&mut self, geometry: &CardGeometry) -> Result<SceneObjectId>;

    /// Removes an object and releases its resources. Idempotent.
    fn remove_scene_object(&mut self, id: SceneObjectId);

    fn set_visible(&mut self, id: SceneObjectId, visible: bool);

    /// Position plus Euler rotation (radians, XYZ order).
    fn set_transform(&mut self, id: SceneObjectId, position: Vec3, rotation: Vec3);

    fn set_opacity(&mut self, id: SceneObjectId, opacity: f32);

    /// Points one face at an image. The backend keeps the `Image` clone and
    /// re-uploads when its version changes.
    fn set_face_image(&mut self, id: SceneObjectId, face: CardFace, image: &Image);

    fn resize(&mut self, width: u32, height: u32);

    /// Draws one frame with the given camera.
    fn render_frame(&mut self, camera: &ViewCamera) -> Result<()>;
}

impl<T: RenderBackend + ?Sized> RenderBackend for Box<T> {
    fn create_scene_object(&mut self, geometry: &CardGeometry) -> Result<SceneObjectId> {
        (**self).create_scene_object(geometry)
    }
    fn remove_scene_object(&mut self, id: SceneObjectId) {
        (**self).remove_scene_object(id);
    }
    fn set_visible(&mut self, id: SceneObjectId, visible: bool) {
        (**self).set_visible(id, visible);
    }
    fn set_transform(&mut self, id: SceneObjectId, position: Vec3, rotation: Vec3) {
        (**self).set_transform(id, position, rotation);
    }
    fn set_opacity(&mut self, id: SceneObjectId, opacity: f32) {
        (**self).set_opacity(id, opacity);
    }
    fn set_face_image(&mut self, id: SceneObjectId, face: CardFace, image: &Image) {
        (**self).set_face_image(id, face, image);
    }
    fn resize(&mut self, width: u32, height: u32) {
        (**self).resize(width, height);
    }
    fn render_frame(&mut self, camera: &ViewCamera) -> Result<()> {
        (**self).render_frame(camera)
    }
}
