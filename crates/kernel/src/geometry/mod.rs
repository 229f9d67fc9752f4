pub mod point;
pub mod vector;

pub use point::{Point3d, Vertex};
pub use vector::Vec3;
