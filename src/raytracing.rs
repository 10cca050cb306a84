pub mod camera;
pub mod color;
pub mod core;
pub mod math;
pub mod model;
pub mod parser;

pub use math::*;
