//! Texture assets: decoded images, handle storage and the async loader.

pub mod image;
pub mod loader;
pub mod store;

pub use image::Image;
pub use loader::{AssetRef, LoadEvent, ResourceLoader};
pub use store::{TextureHandle, TextureSlot, TextureState, TextureStore};
