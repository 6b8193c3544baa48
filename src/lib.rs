pub mod error;
pub mod math;
pub mod operations;
pub mod path;

pub use error::{CamPathError, Result};
pub use path::{CameraPath, CameraPathConfig, PathT};
