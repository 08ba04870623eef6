//! wgpu rendering of the backdrop scene: surface and device setup,
//! generated meshes and sprite textures, and the per-frame draw.

pub mod context;
pub mod mesh;
pub mod renderer;
pub mod texture;

pub use context::GpuContext;
pub use renderer::SceneRenderer;
