pub mod aabb;
pub mod hermite;
pub mod project;
pub mod quat;

pub use aabb::Aabb;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4D vector type, used for quaternion coordinates during interpolation.
pub type Vector4 = nalgebra::Vector4<f64>;

/// Unit quaternion used for knot orientations and camera rotations.
pub type Rotation = nalgebra::UnitQuaternion<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;
