pub mod cartesian;
pub mod rotation;

pub use cartesian::Cartesian3;
pub use rotation::{rot_x, rot_y, rot_z};
