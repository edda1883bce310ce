//! WebGPU rendering module
//!
//! Everything is drawn as plain colored triangles; no textures are loaded.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::world_vertices;
pub use vertex::Vertex;
