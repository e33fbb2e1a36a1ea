pub mod camera;
mod line_vertex;
mod render;
mod renderer;
mod segments;

pub use line_vertex::*;
pub use renderer::*;
pub use segments::*;
