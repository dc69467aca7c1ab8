mod face;

pub use face::{FaceGeometry, FaceWidget, DEFAULT_HAPPINESS};
