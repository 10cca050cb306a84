pub mod mat4;
pub mod ray;
pub mod triangle;
pub mod vec3;

pub use mat4::*;
pub use ray::*;
pub use triangle::*;
pub use vec3::*;

/// Relative tolerance of [`nearly_equal`].
///
/// The same value is the minimum parameter a ray must advance before a hit
/// counts, so a reflected ray does not hit again the surface it leaves.
pub const EPSILON: f64 = 1e-2;

/// Relative comparison: true when `a / b` is within [`EPSILON`] of 1.
///
/// Not symmetric, and meaningless when `b` is zero.
#[inline(always)]
pub fn nearly_equal(a: f64, b: f64) -> bool {
    let ratio = a / b;
    1.0 - EPSILON <= ratio && ratio <= 1.0 + EPSILON
}
