use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use rustc_hash::FxHasher;

// Global image id generator (u64 for fast map lookups on the render side).
static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Pixel payload of an image: always tightly packed RGBA8.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

#[derive(Debug)]
pub struct ImageInner {
    id: u64,
    label: String,

    data: RwLock<ImageData>,

    // Bumped on every in-place pixel update so backends can detect stale
    // uploads without comparing payloads.
    version: AtomicU64,
}

/// A decoded RGBA8 image, cheap to clone and shareable with a render backend.
///
/// Re-texturing a card face updates the existing image in place via
/// [`Image::update_data`]; consumers watch [`Image::version`] to know when
/// their copy of the pixels is out of date.
#[derive(Debug, Clone)]
pub struct Image(Arc<ImageInner>);

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}
impl Eq for Image {}
impl Hash for Image {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl Image {
    #[must_use]
    pub fn new(label: &str, width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height * 4) as usize);
        Self(Arc::new(ImageInner {
            id: NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed),
            label: label.to_string(),
            data: RwLock::new(ImageData {
                width,
                height,
                pixels,
            }),
            version: AtomicU64::new(1),
        }))
    }

    /// A 1x1 solid-color image.
    #[must_use]
    pub fn solid(label: &str, color: [u8; 4]) -> Self {
        Self::new(label, 1, 1, color.to_vec())
    }

    /// A two-tone checkerboard test image.
    #[must_use]
    pub fn checkerboard(
        label: &str,
        width: u32,
        height: u32,
        check_size: u32,
        color_a: [u8; 4],
        color_b: [u8; 4],
    ) -> Self {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let cx = x / check_size.max(1);
                let cy = y / check_size.max(1);
                if (cx + cy) % 2 == 0 {
                    pixels.extend_from_slice(&color_a);
                } else {
                    pixels.extend_from_slice(&color_b);
                }
            }
        }
        Self::new(label, width, height, pixels)
    }

    /// Deterministic placeholder surface for an asset reference that has no
    /// backing pixels: a checkerboard tinted from a hash of the label, so
    /// distinct placeholder faces are visually distinguishable.
    #[must_use]
    pub fn placeholder(label: &str) -> Self {
        let mut hasher = FxHasher::default();
        label.hash(&mut hasher);
        let h = hasher.finish();
        let tint = [
            64 + (h & 0x7F) as u8,
            64 + ((h >> 8) & 0x7F) as u8,
            64 + ((h >> 16) & 0x7F) as u8,
            255,
        ];
        Self::checkerboard(label, 64, 64, 8, tint, [235, 235, 235, 255])
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.0.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.0.label
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.0.version.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.0.data.read().width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.0.data.read().height
    }

    /// Replaces the pixel payload in place and bumps the version counter.
    pub fn update_data(&self, width: u32, height: u32, pixels: Vec<u8>) {
        debug_assert_eq!(pixels.len(), (width * height * 4) as usize);
        {
            let mut data = self.0.data.write();
            data.width = width;
            data.height = height;
            data.pixels = pixels;
        }
        self.0.version.fetch_add(1, Ordering::Relaxed);
    }

    /// Runs `f` against the current pixel payload under the read lock.
    pub fn with_data<R>(&self, f: impl FnOnce(&ImageData) -> R) -> R {
        f(&self.0.data.read())
    }
}
