pub mod registry;
pub mod time;
pub mod uid;
pub mod zorder;

// Re-export key types for convenient access
pub use registry::Registry;
pub use time::{FrameClock, REFERENCE_FPS};
pub use uid::{UidAllocator, UidError};
