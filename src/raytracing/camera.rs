use log::trace;
use rayon::prelude::*;

use super::core::{raytrace, ColoredTriangle, RaytraceResult};
use super::math::{Ray, Vec3};

/// Planar rectangle the image is projected on; the camera sits `standoff`
/// away from its center, on the side of `cross(right edge, up edge)`.
//     ._________.
//   u |         |
//     |  screen |
//     |_________|
//  .__/__.     v
//  | /   |\camera
//  |/____|
//
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Screen {
    pub standoff: f64,
    pub bottom_left: Vec3,
    pub bottom_right: Vec3,
    pub top_left: Vec3,
}

impl Default for Screen {
    fn default() -> Self {
        Screen {
            standoff: 2.0,
            bottom_left: Vec3::zero(),
            bottom_right: Vec3::new(5.0, 0.0, 0.0),
            top_left: Vec3::new(0.0, 5.0, 0.0),
        }
    }
}

impl Screen {
    /// Horizontal and vertical edges leaving the bottom left corner.
    pub fn screen_vectors(&self) -> (Vec3, Vec3) {
        (
            self.bottom_right - self.bottom_left,
            self.top_left - self.bottom_left,
        )
    }

    pub fn camera_position(&self) -> Vec3 {
        let (v, u) = self.screen_vectors();
        let w = v.cross(u).normalize() * self.standoff;
        self.bottom_left + (v + u) * 0.5 + w
    }

    /// Point of the screen at fractions `x` along the bottom edge and `y` along the left one.
    pub fn screen_position(&self, x: f64, y: f64) -> Vec3 {
        let (v, u) = self.screen_vectors();
        self.bottom_left + v * x + u * y
    }

    /// Ray of the pixel at row `i` (counted from the bottom) and column `j`.
    pub fn ray_to(&self, i: usize, j: usize, xres: usize, yres: usize) -> Ray {
        let xunit = 1.0 / xres as f64;
        let yunit = 1.0 / yres as f64;
        let camera = self.camera_position();
        let target = self.screen_position(xunit * j as f64, yunit * i as f64);
        Ray::new(camera, target - camera)
    }
}

/// Traces one ray per pixel allowing a single reflection.
///
/// The result has `yres` rows of `xres` columns, row 0 is the bottom of the screen.
pub fn shoot(
    screen: &Screen,
    xres: usize,
    yres: usize,
    scene: &[ColoredTriangle],
) -> Vec<Vec<RaytraceResult>> {
    shoot_with_reflections(screen, xres, yres, scene, 1)
}

pub fn shoot_with_reflections(
    screen: &Screen,
    xres: usize,
    yres: usize,
    scene: &[ColoredTriangle],
    max_reflections: u32,
) -> Vec<Vec<RaytraceResult>> {
    // every row only reads the scene, so rows are traced in parallel
    (0..yres)
        .into_par_iter()
        .map(|i| {
            trace!("tracing row {}/{}", i + 1, yres);
            (0..xres)
                .map(|j| raytrace(&screen.ray_to(i, j, xres, yres), scene, max_reflections))
                .collect()
        })
        .collect()
}
