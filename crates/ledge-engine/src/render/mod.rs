pub mod camera;
pub mod draw;

// Re-export key types for convenient access
pub use camera::Camera;
pub use draw::{build_draw_buffer, DrawBuffer, DrawInstance};
