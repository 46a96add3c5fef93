use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::assets::Image;
use crate::camera::ViewCamera;
use crate::errors::{Result, ViewerError};
use crate::render::{CardFace, CardGeometry, RenderBackend, SceneObjectId};

/// Last-known state of one headless scene object.
#[derive(Debug, Clone)]
pub struct ObjectRecord {
    pub geometry: CardGeometry,
    pub visible: bool,
    pub position: Vec3,
    pub rotation: Vec3,
    pub opacity: f32,
    pub faces: FxHashMap<CardFace, Image>,
}

/// A backend that records every operation instead of drawing.
///
/// Used by the test suite and the demo: object state is inspectable through
/// [`HeadlessBackend::object`], and `fail_next_create` exercises the
/// resource-creation failure path.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_id: u64,
    objects: FxHashMap<SceneObjectId, ObjectRecord>,
    pub frames_rendered: u64,
    pub size: (u32, u32),
    pub fail_next_create: bool,
}

impl HeadlessBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn object(&self, id: SceneObjectId) -> Option<&ObjectRecord> {
        self.objects.get(&id)
    }

    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Ids of all objects currently flagged visible.
    #[must_use]
    pub fn visible_objects(&self) -> Vec<SceneObjectId> {
        let mut ids: Vec<SceneObjectId> = self
            .objects
            .iter()
            .filter(|(_, record)| record.visible)
            .map(|(&id, _)| id)
            .collect();
        ids.sort_by_key(|id| id.0);
        ids
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_scene_object(&mut self, geometry: &CardGeometry) -> Result<SceneObjectId> {
        if self.fail_next_create {
            self.fail_next_create = false;
            return Err(ViewerError::ObjectCreation(
                "headless backend was told to fail".into(),
            ));
        }
        self.next_id += 1;
        let id = SceneObjectId(self.next_id);
        self.objects.insert(
            id,
            ObjectRecord {
                geometry: *geometry,
                visible: false,
                position: Vec3::ZERO,
                rotation: Vec3::ZERO,
                opacity: 0.0,
                faces: FxHashMap::default(),
            },
        );
        Ok(id)
    }

    fn remove_scene_object(&mut self, id: SceneObjectId) {
        self.objects.remove(&id);
    }

    fn set_visible(&mut self, id: SceneObjectId, visible: bool) {
        if let Some(record) = self.objects.get_mut(&id) {
            record.visible = visible;
        }
    }

    fn set_transform(&mut self, id: SceneObjectId, position: Vec3, rotation: Vec3) {
        if let Some(record) = self.objects.get_mut(&id) {
            record.position = position;
            record.rotation = rotation;
        }
    }

    fn set_opacity(&mut self, id: SceneObjectId, opacity: f32) {
        if let Some(record) = self.objects.get_mut(&id) {
            record.opacity = opacity;
        }
    }

    fn set_face_image(&mut self, id: SceneObjectId, face: CardFace, image: &Image) {
        if let Some(record) = self.objects.get_mut(&id) {
            record.faces.insert(face, image.clone());
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn render_frame(&mut self, _camera: &ViewCamera) -> Result<()> {
        self.frames_rendered += 1;
        Ok(())
    }
}
