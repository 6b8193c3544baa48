//! Edits and queries on a [`CameraPath`](crate::path::CameraPath).
//!
//! Each operation is a small struct built with `new(..)` and run with
//! `execute(..)`. Edits take the path mutably and leave it consistent;
//! queries only read.

pub mod edit;
pub mod query;
