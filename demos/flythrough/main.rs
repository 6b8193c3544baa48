//! Campath flythrough: builds a looping camera path, then flies it at the
//! speed the path prescribes and prints the camera state each frame.
//!
//! Usage:
//! ```text
//! cargo run --example flythrough                        # 90 frames
//! cargo run --example flythrough -- 240                 # frame count
//! RUST_LOG=campath=debug cargo run --example flythrough # edit logging
//! ```

use campath::math::{Point3, Rotation, Vector3};
use campath::operations::edit::{AddAttributeKnot, InsertPositionKnot};
use campath::operations::query::{FovAt, MoveAlongPath, PositionAt, RotationAt, SpeedAt};
use campath::path::{KnotValue, PositionKnot};
use campath::{CameraPath, CameraPathConfig, PathT, Result};

const FRAME_SECONDS: f64 = 1.0 / 30.0;

fn build_path() -> Result<CameraPath> {
    let mut path = CameraPath::new(CameraPathConfig::default())?;
    let ring = [
        (Point3::new(0.0, 0.0, 2.0), Vector3::new(6.0, 0.0, 0.0)),
        (Point3::new(10.0, 2.0, 3.0), Vector3::new(0.0, 6.0, 0.0)),
        (Point3::new(4.0, 12.0, 5.0), Vector3::new(-6.0, 0.0, 0.0)),
        (Point3::new(-6.0, 6.0, 3.0), Vector3::new(0.0, -6.0, 0.0)),
        (Point3::new(0.0, 0.0, 2.0), Vector3::new(6.0, 0.0, 0.0)),
    ];
    for (i, (position, tangent)) in ring.into_iter().enumerate() {
        InsertPositionKnot::new(i, PositionKnot::from_tangent(position, tangent)).execute(&mut path)?;
    }

    let yaw = |angle: f64| Rotation::from_axis_angle(&Vector3::z_axis(), angle);
    for (t, value) in [
        (0.0, KnotValue::Rotation(yaw(0.0))),
        (1.0, KnotValue::Rotation(yaw(1.6))),
        (2.0, KnotValue::Rotation(yaw(3.1))),
        (3.0, KnotValue::Rotation(yaw(4.7))),
        (0.5, KnotValue::Speed(4.0)),
        (2.5, KnotValue::Speed(9.0)),
        (1.0, KnotValue::Fov(55.0)),
        (3.5, KnotValue::Fov(80.0)),
    ] {
        AddAttributeKnot::new(PathT::new(t), value).execute(&mut path)?;
    }
    Ok(path)
}

fn main() -> Result<()> {
    // Default: WARN for everything, INFO for campath.
    // Override with RUST_LOG env var (e.g. RUST_LOG=campath=trace).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("campath=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let frames: usize = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(90);

    let path = build_path()?;
    println!(
        "path: {} knots, length {:.3}, loops: {}",
        path.positions().len(),
        path.length(),
        path.path_loops()
    );

    let mut t = PathT::ZERO;
    let mut laps = 0;
    for frame in 0..frames {
        let position = PositionAt::new(t).execute(&path);
        let (roll, pitch, yaw) = RotationAt::new(t).execute(&path).euler_angles();
        let speed = SpeedAt::new(t).execute(&path);
        let fov = FovAt::new(t).execute(&path);
        println!(
            "{frame:4} {t} pos=({:7.3}, {:7.3}, {:7.3}) rpy=({roll:.3}, {pitch:.3}, {yaw:.3}) speed={speed:.2} fov={fov:.1}",
            position.x, position.y, position.z
        );

        let walk = MoveAlongPath::new(speed * FRAME_SECONDS, t).execute(&path);
        if walk.rolled {
            laps += 1;
        }
        t = walk.t;
    }
    println!("completed {laps} lap(s)");
    Ok(())
}
