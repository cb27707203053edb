mod angle;
mod fixed;
mod tables;

pub use angle::{ANGLE_MASK, ANGLES, Angle, Quadrant};
pub use fixed::{FRAC_BITS, Fixed};
pub use tables::{PLANE_BANDS, PLANE_DISTANCE, SCALAR_STEPS, SCALAR_TABLE, SIN_TABLE, TAN_TABLE};
