mod coord;
mod hemisphere;
mod position;
mod vector;
mod waypoint;

pub use coord::*;
pub use hemisphere::*;
pub use position::*;
pub use vector::*;
pub use waypoint::*;
