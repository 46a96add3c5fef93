use crate::animation::AnimationScheduler;
use crate::camera::ViewCamera;
use crate::render::RenderBackend;

/// Reacts to host-viewport size changes: camera aspect, backend output size,
/// one redraw. Holds nothing but the last known size.
#[derive(Debug)]
pub struct ViewportController {
    width: u32,
    height: u32,
}

impl ViewportController {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn resize<B: RenderBackend + ?Sized>(
        &mut self,
        width: u32,
        height: u32,
        camera: &mut ViewCamera,
        backend: &mut B,
        scheduler: &mut AnimationScheduler,
    ) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width;
        self.height = height;
        camera.set_aspect(width as f32 / height as f32);
        backend.resize(width, height);
        scheduler.request_animation();
    }
}
