mod evaluate;
mod project;
mod sample;
mod walk;

pub use evaluate::{FovAt, PositionAt, RotationAt, SpeedAt};
pub use project::{PathProjection, ProjectOntoPath};
pub use sample::SamplePath;
pub use walk::{MoveAlongPath, PathWalk};
