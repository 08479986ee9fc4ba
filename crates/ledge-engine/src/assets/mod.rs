pub mod images;

// Re-export key types for convenient access
pub use images::ImageSet;
