//! Pinhole camera ray tracer for scenes of flat colored triangles.
//!
//! Every triangle either emits light or mirrors the rays that reach it,
//! tinting them with its color. [`shoot`] traces one ray per pixel of a
//! screen and reports for each one whether it reached a light, left the
//! scene, or bounced too many times.

pub mod raytracing;

pub use raytracing::camera::{shoot, shoot_with_reflections, Screen};
pub use raytracing::color::Color;
pub use raytracing::core::{raytrace, ColoredTriangle, Face, RaytraceResult, Scene, SurfaceKind};
