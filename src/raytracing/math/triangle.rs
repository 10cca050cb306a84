use super::{nearly_equal, Ray, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub p0: Vec3,
    pub p1: Vec3,
    pub p2: Vec3,
}

impl Triangle {
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3) -> Triangle {
        Triangle { p0, p1, p2 }
    }

    /// Length of the cross product of the two edges leaving `p0`.
    /// This is twice the geometric area; only ratios of areas are ever used.
    pub fn area(&self) -> f64 {
        (self.p1 - self.p0).cross(self.p2 - self.p0).len()
    }

    /// Area based containment test, edges included.
    /// `point` is assumed to lie on the plane of the triangle.
    pub fn contains(&self, point: Vec3) -> bool {
        let Triangle { p0, p1, p2 } = *self;
        let sub_areas = Triangle::new(point, p1, p2).area()
            + Triangle::new(p0, point, p2).area()
            + Triangle::new(p0, p1, point).area();
        nearly_equal(self.area(), sub_areas)
    }

    /// Line through `p0` along the (not normalized) normal of the plane.
    pub fn normal_vector(&self) -> Ray {
        Ray {
            origin: self.p0,
            direction: (self.p1 - self.p0).cross(self.p2 - self.p0),
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.p0, self.p1, self.p2]
    }
}
