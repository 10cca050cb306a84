use super::Vec3;

/// Infinite line `origin + t * direction`, used as a ray for positive `t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Ray {
        Ray { origin, direction }
    }

    pub fn at(self: &Self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Same line with a unit direction.
    pub fn normalize(self: &Self) -> Ray {
        Ray {
            origin: self.origin,
            direction: self.direction.normalize(),
        }
    }

    /// Projects `point` on the line, returning the projection and its parameter.
    pub fn foot_of_perpendicular(self: &Self, point: Vec3) -> (Vec3, f64) {
        let t = self.direction.dot(point - self.origin) / self.direction.squared_len();
        (self.at(t), t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_on_line() {
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(ray.at(0.0), ray.origin);
        assert_eq!(ray.at(1.5), Vec3::new(1.0, 3.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(1.0, -2.0, 0.0));
    }

    #[test]
    fn projection_on_line() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(2.0, 0.0, 0.0));
        let (foot, t) = ray.foot_of_perpendicular(Vec3::new(3.0, 7.0, 1.0));
        assert_eq!(foot, Vec3::new(3.0, 0.0, 1.0));
        assert_eq!(t, 1.5);
        // the offset to the foot is perpendicular to the line
        let offset = Vec3::new(3.0, 7.0, 1.0) - foot;
        assert_eq!(offset.dot(ray.direction), 0.0);
    }

    #[test]
    fn normalize_keeps_origin() {
        let ray = Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.0, -4.0));
        let unit = ray.normalize();
        assert_eq!(unit.origin, ray.origin);
        assert_eq!(unit.direction, Vec3::new(0.0, 0.0, -1.0));
    }
}
