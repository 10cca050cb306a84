use super::color::Color;
use super::math::{Mat4, Ray, Transformable, Triangle, Vec3, EPSILON};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceKind {
    /// A light source: reaching it ends the trace.
    Emit,
    /// A mirror that tints the ray and lets it bounce on.
    Absorb,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColoredTriangle {
    pub kind: SurfaceKind,
    pub color: Color,
    pub shape: Triangle,
}

/// Ordered list of triangles; the order only matters when two hits are at
/// exactly the same distance, then the first one wins.
pub type Scene = Vec<ColoredTriangle>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RaytraceResult {
    /// The reflection budget ran out before reaching a light.
    Absorbed,
    /// The ray left the scene.
    Diverge,
    /// The ray reached a light, tinted by every surface on its way.
    Collide { color: Color },
}

/// Nearest hit of a ray against a whole scene.
#[derive(Clone, Copy, Debug)]
pub struct Hit {
    pub reflected: Ray,
    pub kind: SurfaceKind,
    pub color: Color,
}

/// A group of triangles posed as a whole around its `center`.
#[derive(Clone, Debug)]
pub struct Face {
    pub center: Vec3,
    pub triangles: Vec<ColoredTriangle>,
}

impl ColoredTriangle {
    pub fn new(kind: SurfaceKind, color: Color, shape: Triangle) -> ColoredTriangle {
        ColoredTriangle { kind, color, shape }
    }

    pub fn reflect(&self, ray: &Ray) -> (Option<(f64, Ray)>, SurfaceKind, Color) {
        (intersection(ray, &self.shape), self.kind, self.color)
    }
}

impl Transformable for ColoredTriangle {
    fn transform(&self, matrix: &Mat4) -> Self {
        ColoredTriangle {
            shape: self.shape.transform(matrix),
            ..*self
        }
    }
}

impl Face {
    /// Rotates the face by `theta` around the depth axis, then by `phi`
    /// around the vertical axis, both passing through the center.
    pub fn posed(&self, theta: f64, phi: f64) -> impl Iterator<Item = ColoredTriangle> + '_ {
        self.triangles
            .iter()
            .map(move |triangle| triangle.rotate_z(theta, self.center).rotate_y(phi, self.center))
    }
}

/// Mirrors `ray` on the plane through `surface.origin` orthogonal to `surface.direction`.
///
/// Returns the parameter `a` of the incidence point on `ray`, and the reflected
/// ray starting at that point. The reflected direction is the vector from the
/// incidence point to the mirror image of `ray.origin` across the normal.
/// A ray parallel to the plane never reaches it and gives `None`.
pub fn reflect_on_surface(ray: &Ray, surface: &Ray) -> Option<(f64, Ray)> {
    //       mid_point
    //  _____v_____opposite
    //  \    |    /
    //   \   |   /
    // ray\  |  /reflected
    //     \ | /
    //  ____\|/_____surface
    //       ^reflection_point
    let denominator = ray.direction.dot(surface.direction);
    if denominator.abs() < f64::EPSILON {
        return None;
    }
    let a = (surface.origin - ray.origin).dot(surface.direction) / denominator;
    let reflection_point = ray.at(a);
    let normal = Ray::new(reflection_point, surface.direction);
    let (mid_point, _) = normal.foot_of_perpendicular(ray.origin);
    let opposite = Ray::new(ray.origin, mid_point - ray.origin).at(2.0);
    Some((a, Ray::new(reflection_point, opposite - reflection_point)))
}

/// Reflection of `ray` on `triangle`, if the incidence point is inside it.
pub fn intersection(ray: &Ray, triangle: &Triangle) -> Option<(f64, Ray)> {
    let (a, reflected) = reflect_on_surface(ray, &triangle.normal_vector())?;
    if triangle.contains(reflected.origin) {
        Some((a, reflected))
    } else {
        None
    }
}

/// Finds the closest triangle the ray meets ahead of its origin.
pub fn reflect(ray: &Ray, scene: &[ColoredTriangle]) -> Option<Hit> {
    let mut closest_a = f64::INFINITY;
    let mut closest = None;
    for object in scene {
        if let (Some((a, reflected)), kind, color) = object.reflect(ray) {
            // skip the surface the ray is leaving
            if a <= EPSILON {
                continue;
            }

            if a < closest_a {
                closest_a = a;
                closest = Some(Hit {
                    reflected,
                    kind,
                    color,
                });
            }
        }
    }
    closest
}

/// Follows `ray` through at most `max_reflections` hits.
pub fn raytrace(ray: &Ray, scene: &[ColoredTriangle], max_reflections: u32) -> RaytraceResult {
    debug_assert!(ray.direction.squared_len() > 0.0, "ray without direction");
    let mut current_ray = *ray;
    let mut color = Color::WHITE;
    for _ in 0..max_reflections {
        let Some(hit) = reflect(&current_ray, scene) else {
            return RaytraceResult::Diverge;
        };
        color *= hit.color;
        match hit.kind {
            SurfaceKind::Emit => return RaytraceResult::Collide { color },
            SurfaceKind::Absorb => current_ray = hit.reflected,
        }
    }
    RaytraceResult::Absorbed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light(color: Color, p0: Vec3, p1: Vec3, p2: Vec3) -> ColoredTriangle {
        ColoredTriangle::new(SurfaceKind::Emit, color, Triangle::new(p0, p1, p2))
    }

    fn mirror(color: Color, p0: Vec3, p1: Vec3, p2: Vec3) -> ColoredTriangle {
        ColoredTriangle::new(SurfaceKind::Absorb, color, Triangle::new(p0, p1, p2))
    }

    /// Rectangle `[x0, x1] x [-1, 1]` at height `z` made of two triangles.
    fn mirror_strip(z: f64, x0: f64, x1: f64) -> Vec<ColoredTriangle> {
        vec![
            mirror(
                Color::WHITE,
                Vec3::new(x0, -1.0, z),
                Vec3::new(x1, -1.0, z),
                Vec3::new(x1, 1.0, z),
            ),
            mirror(
                Color::WHITE,
                Vec3::new(x0, -1.0, z),
                Vec3::new(x1, 1.0, z),
                Vec3::new(x0, 1.0, z),
            ),
        ]
    }

    fn angle_between(a: Vec3, b: Vec3) -> f64 {
        (a.dot(b) / (a.len() * b.len())).acos()
    }

    #[test]
    fn reflection_on_a_plane_is_specular() {
        let surface = Ray::new(Vec3::zero(), Vec3::new(0.0, 0.0, 3.0));
        let ray = Ray::new(Vec3::new(-1.0, 2.0, 4.0), Vec3::new(1.0, -0.5, -2.0));
        let (a, reflected) = reflect_on_surface(&ray, &surface).unwrap();
        assert_eq!(a, 2.0);
        assert_eq!(reflected.origin, Vec3::new(1.0, 1.0, 0.0));
        // tangent component kept, normal component flipped
        let d = reflected.direction.normalize();
        let expected = Vec3::new(1.0, -0.5, 2.0).normalize();
        assert!(d.distance(expected) < 1e-9);

        let incoming = angle_between(-ray.direction, surface.direction);
        let outgoing = angle_between(reflected.direction, surface.direction);
        assert!((incoming - outgoing).abs() < 1e-9);
    }

    #[test]
    fn head_on_reflection_goes_back() {
        let surface = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        let ray = Ray::new(Vec3::new(0.5, 0.5, 5.0), Vec3::new(0.0, 0.0, 1.0));
        let (a, reflected) = reflect_on_surface(&ray, &surface).unwrap();
        assert_eq!(a, 5.0);
        assert_eq!(reflected.origin, Vec3::new(0.5, 0.5, 10.0));
        assert_eq!(reflected.direction, Vec3::new(0.0, 0.0, -5.0));
    }

    #[test]
    fn parallel_ray_does_not_reach_the_plane() {
        let surface = Ray::new(Vec3::zero(), Vec3::new(0.0, 1.0, 0.0));
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(reflect_on_surface(&ray, &surface).is_none());
    }

    #[test]
    fn intersection_is_bounded_by_the_triangle() {
        let triangle = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        );
        let inside = Ray::new(Vec3::new(0.5, 0.5, 3.0), Vec3::new(0.0, 0.0, -1.0));
        let outside = Ray::new(Vec3::new(5.0, 5.0, 3.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(intersection(&inside, &triangle).map(|(a, _)| a), Some(3.0));
        assert!(intersection(&outside, &triangle).is_none());
    }

    #[test]
    fn nearest_hit_ahead_wins() {
        let near = light(
            Color::RED,
            Vec3::new(-5.0, -5.0, -1.0),
            Vec3::new(5.0, -5.0, -1.0),
            Vec3::new(0.0, 5.0, -1.0),
        );
        let far = light(
            Color::BLUE,
            Vec3::new(-5.0, -5.0, -3.0),
            Vec3::new(5.0, -5.0, -3.0),
            Vec3::new(0.0, 5.0, -3.0),
        );
        let behind = light(
            Color::GREEN,
            Vec3::new(-5.0, -5.0, 2.0),
            Vec3::new(5.0, -5.0, 2.0),
            Vec3::new(0.0, 5.0, 2.0),
        );
        let ray = Ray::new(Vec3::zero(), Vec3::new(0.0, 0.0, -1.0));
        for scene in [vec![far, near, behind], vec![behind, near, far]] {
            let hit = reflect(&ray, &scene).unwrap();
            assert_eq!(hit.color, Color::RED);
            assert_eq!(hit.reflected.origin, Vec3::new(0.0, 0.0, -1.0));
        }
        assert!(reflect(&ray, &[behind]).is_none());
    }

    #[test]
    fn ties_keep_the_first_triangle() {
        let p = (
            Vec3::new(-5.0, -5.0, -1.0),
            Vec3::new(5.0, -5.0, -1.0),
            Vec3::new(0.0, 5.0, -1.0),
        );
        let first = light(Color::RED, p.0, p.1, p.2);
        let second = light(Color::BLUE, p.0, p.1, p.2);
        let ray = Ray::new(Vec3::zero(), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(reflect(&ray, &[first, second]).unwrap().color, Color::RED);
    }

    #[test]
    fn single_light_collides_with_its_color() {
        let color = Color::new(0.9, 0.8, 0.7);
        let scene = vec![light(
            color,
            Vec3::new(-1.0, -1.0, -4.0),
            Vec3::new(1.0, -1.0, -4.0),
            Vec3::new(0.0, 1.0, -4.0),
        )];
        let ray = Ray::new(Vec3::zero(), Vec3::new(0.0, 0.0, -1.0));
        for bound in 1..4 {
            assert_eq!(
                raytrace(&ray, &scene, bound),
                RaytraceResult::Collide { color }
            );
        }
        assert_eq!(raytrace(&ray, &scene, 0), RaytraceResult::Absorbed);
    }

    #[test]
    fn missing_everything_diverges() {
        let scene = vec![light(
            Color::WHITE,
            Vec3::new(-1.0, -1.0, -4.0),
            Vec3::new(1.0, -1.0, -4.0),
            Vec3::new(0.0, 1.0, -4.0),
        )];
        let ray = Ray::new(Vec3::zero(), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(raytrace(&ray, &scene, 5), RaytraceResult::Diverge);
        assert_eq!(raytrace(&ray, &Scene::new(), 5), RaytraceResult::Diverge);
    }

    #[test]
    fn mirror_then_light_multiplies_tints() {
        let scene = vec![
            mirror(
                Color::new(0.5, 1.0, 1.0),
                Vec3::new(-20.0, -20.0, 0.0),
                Vec3::new(20.0, -20.0, 0.0),
                Vec3::new(0.0, 20.0, 0.0),
            ),
            light(
                Color::new(1.0, 0.5, 1.0),
                Vec3::new(10.0, -10.0, -1.0),
                Vec3::new(10.0, 10.0, -1.0),
                Vec3::new(10.0, 0.0, 20.0),
            ),
        ];
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(1.0, 0.0, -1.0));
        assert_eq!(raytrace(&ray, &scene, 1), RaytraceResult::Absorbed);
        assert_eq!(
            raytrace(&ray, &scene, 2),
            RaytraceResult::Collide {
                color: Color::new(0.5, 0.5, 1.0)
            }
        );
    }

    #[test]
    fn parallel_mirrors_absorb_at_the_bound() {
        let mut scene = mirror_strip(0.0, -1.0, 37.0);
        scene.extend(mirror_strip(10.0, -1.0, 37.0));
        // hits at x = 5, 15, 25, 35, then leaves the strips
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(1.0, 0.0, 1.0));
        for bound in 1..=4 {
            assert_eq!(raytrace(&ray, &scene, bound), RaytraceResult::Absorbed);
        }
        assert_eq!(raytrace(&ray, &scene, 5), RaytraceResult::Diverge);
    }

    #[test]
    fn closed_mirrors_never_collide() {
        let mut scene = mirror_strip(0.0, -10.0, 10.0);
        scene.extend(mirror_strip(10.0, -10.0, 10.0));
        let ray = Ray::new(Vec3::new(0.5, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(raytrace(&ray, &scene, 50), RaytraceResult::Absorbed);
    }

    #[test]
    fn posing_a_face_keeps_colors() {
        let center = Vec3::new(2.5, 1.0, -2.0);
        let face = Face {
            center,
            triangles: vec![light(
                Color::new(0.94, 0.84, 0.7),
                Vec3::new(0.0, 0.0, -1.0),
                Vec3::new(5.0, 0.0, -1.0),
                Vec3::new(2.5, 5.0, -1.0),
            )],
        };
        let unposed: Vec<_> = face.posed(0.0, 0.0).collect();
        assert_eq!(unposed.len(), 1);
        assert!(unposed[0].shape.p0.distance(face.triangles[0].shape.p0) < 1e-9);

        let posed: Vec<_> = face.posed(0.7, -0.3).collect();
        assert_eq!(posed[0].color, face.triangles[0].color);
        assert_eq!(posed[0].kind, SurfaceKind::Emit);
        let expected = face.triangles[0]
            .shape
            .p2
            .rotate_z(0.7, center)
            .rotate_y(-0.3, center);
        assert!(posed[0].shape.p2.distance(expected) < 1e-9);
        // rigid motion around the center
        for (before, after) in face.triangles[0]
            .shape
            .vertices()
            .iter()
            .zip(posed[0].shape.vertices())
        {
            assert!((before.distance(center) - after.distance(center)).abs() < 1e-9);
        }
    }
}
