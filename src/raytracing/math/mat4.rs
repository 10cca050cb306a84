use super::{Triangle, Vec3};

/// Affine transform stored as a row major 4x4 matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Mat4 {
    value: [f64; 16],
}

impl Mat4 {
    pub fn identity() -> Mat4 {
        Mat4 {
            value: [
                1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    pub fn scale(factor: f64) -> Mat4 {
        Mat4 {
            value: [
                factor, 0.0, 0.0, 0.0, 0.0, factor, 0.0, 0.0, 0.0, 0.0, factor, 0.0, 0.0, 0.0, 0.0,
                1.0,
            ],
        }
    }

    pub fn translate(offset: Vec3) -> Mat4 {
        Mat4 {
            value: [
                1.0, 0.0, 0.0, offset.x, 0.0, 1.0, 0.0, offset.y, 0.0, 0.0, 1.0, offset.z, 0.0,
                0.0, 0.0, 1.0,
            ],
        }
    }

    //  1        0         0
    //  0  cos(t)  -sin(t)
    //  0  sin(t)   cos(t)
    pub fn rotate_x(theta: f64) -> Mat4 {
        let (sin_t, cos_t) = theta.sin_cos();
        Mat4 {
            value: [
                1.0, 0.0, 0.0, 0.0, 0.0, cos_t, -sin_t, 0.0, 0.0, sin_t, cos_t, 0.0, 0.0, 0.0, 0.0,
                1.0,
            ],
        }
    }

    //   cos(t)  0  sin(t)
    //        0  1       0
    //  -sin(t)  0  cos(t)
    pub fn rotate_y(theta: f64) -> Mat4 {
        let (sin_t, cos_t) = theta.sin_cos();
        Mat4 {
            value: [
                cos_t, 0.0, sin_t, 0.0, 0.0, 1.0, 0.0, 0.0, -sin_t, 0.0, cos_t, 0.0, 0.0, 0.0, 0.0,
                1.0,
            ],
        }
    }

    //  cos(t)  -sin(t)  0
    //  sin(t)   cos(t)  0
    //       0        0  1
    pub fn rotate_z(theta: f64) -> Mat4 {
        let (sin_t, cos_t) = theta.sin_cos();
        Mat4 {
            value: [
                cos_t, -sin_t, 0.0, 0.0, sin_t, cos_t, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0,
                1.0,
            ],
        }
    }

    /// Composes the two transforms: `self` is applied first, then `other`.
    pub fn then(&self, other: &Mat4) -> Mat4 {
        // other * self
        let mut value = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                value[row * 4 + col] = (0..4)
                    .map(|k| other.value[row * 4 + k] * self.value[k * 4 + col])
                    .sum();
            }
        }
        Mat4 { value }
    }

    /// The same transform performed with `pivot` as the origin.
    pub fn around(&self, pivot: Vec3) -> Mat4 {
        Mat4::translate(-pivot)
            .then(self)
            .then(&Mat4::translate(pivot))
    }

    pub fn apply(&self, v: Vec3) -> Vec3 {
        let m = &self.value;
        let x = m[0] * v.x + m[1] * v.y + m[2] * v.z + m[3];
        let y = m[4] * v.x + m[5] * v.y + m[6] * v.z + m[7];
        let z = m[8] * v.x + m[9] * v.y + m[10] * v.z + m[11];
        Vec3::new(x, y, z)
    }
}

/// Geometry that can be moved rigidly (or scaled) in world space.
///
/// Rotations follow the right hand rule around the axis passing by `pivot`;
/// use `Vec3::zero()` to rotate around the origin.
pub trait Transformable: Sized {
    fn transform(&self, matrix: &Mat4) -> Self;

    fn rotate_x(&self, theta: f64, pivot: Vec3) -> Self {
        self.transform(&Mat4::rotate_x(theta).around(pivot))
    }

    fn rotate_y(&self, theta: f64, pivot: Vec3) -> Self {
        self.transform(&Mat4::rotate_y(theta).around(pivot))
    }

    fn rotate_z(&self, theta: f64, pivot: Vec3) -> Self {
        self.transform(&Mat4::rotate_z(theta).around(pivot))
    }
}

impl Transformable for Vec3 {
    fn transform(&self, matrix: &Mat4) -> Self {
        matrix.apply(*self)
    }
}

impl Transformable for Triangle {
    fn transform(&self, matrix: &Mat4) -> Self {
        Triangle::new(
            matrix.apply(self.p0),
            matrix.apply(self.p1),
            matrix.apply(self.p2),
        )
    }
}
