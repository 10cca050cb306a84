use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};

use log::debug;
use obj::{load_obj, Obj, Position};

use super::{Mat4, Triangle, Vec3};

/// Triangulated mesh read from a Wavefront OBJ file, already moved by its transform.
#[derive(Debug)]
pub struct Model {
    obj: Obj<Position>,
    trasform: Mat4,
}

impl Model {
    pub fn load(filename: &str, trasform: Mat4) -> Result<Model, Box<dyn Error>> {
        let input = BufReader::new(File::open(filename)?);
        let model = Model::read(input, trasform)?;
        debug!(
            "loaded {} with {} triangles",
            filename,
            model.triangle_count()
        );
        Ok(model)
    }

    pub fn read(input: impl BufRead, trasform: Mat4) -> Result<Model, Box<dyn Error>> {
        let obj = load_obj(input)?;
        Ok(Model { obj, trasform })
    }

    pub fn triangle_count(&self) -> usize {
        self.obj.indices.len() / 3
    }

    pub fn get_triangle(&self, i: usize) -> Triangle {
        let vertex = |k: usize| -> Vec3 {
            let position: Vec3 = self.obj.vertices[self.obj.indices[i * 3 + k] as usize]
                .position
                .into();
            self.trasform.apply(position)
        };
        Triangle::new(vertex(0), vertex(1), vertex(2))
    }

    pub fn iter_triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.triangle_count()).map(|i| self.get_triangle(i))
    }
}
