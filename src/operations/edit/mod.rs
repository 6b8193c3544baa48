mod attribute_knots;
mod insert_position;
mod reflow;
mod remove_position;
mod update_position;

pub use attribute_knots::{
    AddAttributeKnot, MoveAttributeKnot, RemoveKnot, ResortAttributeKnots, SetAttributeValue,
};
pub use insert_position::InsertPositionKnot;
pub use remove_position::RemovePositionKnot;
pub use update_position::UpdatePositionKnot;
