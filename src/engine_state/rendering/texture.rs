//! Texture loading boundary.
//!
//! Texture bytes are decoded and uploaded by the embedding engine. The core only asks
//! for a texture by path and receives an opaque handle once the load resolves.

use futures::future::{LocalBoxFuture, Shared};

use crate::error::VoxelResult;

/// Opaque, GPU-bindable texture handle issued by a `TextureLoader`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// External collaborator that resolves texture paths to GPU textures.
///
/// Loads are asynchronous: the returned future resolves on the caller's frame-loop
/// executor. The world awaits every load referenced by the block catalog before it
/// builds any batch, so chunk meshing only ever sees resolved textures.
///
/// `load_texture` is called while the world is borrowed and must not call back into it.
pub trait TextureLoader {
    /// Starts loading the texture at `path`.
    fn load_texture(&self, path: &str) -> LocalBoxFuture<'static, VoxelResult<TextureHandle>>;
}

/// A texture load shared by every caller that needs it while it runs.
///
/// Resolves to `None` if the load failed; the failure is logged once.
pub type SharedTextureLoad = Shared<LocalBoxFuture<'static, Option<TextureHandle>>>;

/// State of one texture path, as remembered by the resource cache.
#[derive(Clone)]
pub enum TextureState {
    /// The load is in flight.
    Loading(SharedTextureLoad),
    /// The texture is ready to bind.
    Loaded(TextureHandle),
    /// The load failed; faces using it get the flat fallback material.
    Failed,
}
