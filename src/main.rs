use std::error::Error;
use std::fs;
use std::time::Instant;

use clap::Parser;
use image::{ImageBuffer, Rgb};
use log::{error, info};

use triangle_raytracer::raytracing::parser::{ImageData, SceneParser};
use triangle_raytracer::{shoot_with_reflections, Color, RaytraceResult};

mod cli;
mod logger;

use cli::Args;
use logger::init_logger;

fn to_rgb(value: Color) -> Rgb<u8> {
    // `as` saturates, negative channels become 0
    let channel = |c: f64| (c * 255.0).min(255.0) as u8;
    Rgb([channel(value.red), channel(value.green), channel(value.blue)])
}

fn pixel_color(result: &RaytraceResult, background: Color) -> Rgb<u8> {
    match result {
        RaytraceResult::Collide { color } => to_rgb(*color),
        RaytraceResult::Absorbed | RaytraceResult::Diverge => to_rgb(background),
    }
}

/// Size of the output image, every traced pixel drawn as a `scale`x`scale` block.
fn image_size(width: u32, height: u32, scale: u32) -> Option<(u32, u32)> {
    Some((width.checked_mul(scale)?, height.checked_mul(scale)?))
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    let content = fs::read_to_string(&args.scene)?;
    let mut parser = SceneParser::new(&content);
    let image_data = match parser.parse_scene() {
        Ok(image_data) => image_data,
        Err(parser_error) => {
            parser_error.print_error_location(&content);
            error!("cannot parse {}", args.scene);
            return Err(Box::new(parser_error));
        }
    };

    let ImageData {
        width,
        height,
        screen,
        bounces,
        background,
        ..
    } = image_data;
    let bounces = args.bounces.unwrap_or(bounces);
    let scene = image_data.scene(args.theta, args.phi);
    info!(
        "tracing {}x{} rays against {} triangles, at most {} reflections",
        width,
        height,
        scene.len(),
        bounces
    );

    // measure time
    let start = Instant::now();
    let image = shoot_with_reflections(
        &screen,
        width as usize,
        height as usize,
        &scene,
        bounces,
    );
    let collisions = image
        .iter()
        .flatten()
        .filter(|result| matches!(result, RaytraceResult::Collide { .. }))
        .count();
    info!(
        "traced in {:?}, {} rays reached a light",
        start.elapsed(),
        collisions
    );

    let scale = args.pixel_scale;
    let (image_width, image_height) = image_size(width, height, scale)
        .ok_or_else(|| format!("{}x{} pixels scaled by {} is too large", width, height, scale))?;
    let mut buffer: ImageBuffer<Rgb<u8>, Vec<_>> = ImageBuffer::new(image_width, image_height);
    // row 0 of the trace is the bottom of the screen
    for (x, y, pixel) in buffer.enumerate_pixels_mut() {
        let i = (height - 1 - y / scale) as usize;
        let j = (x / scale) as usize;
        *pixel = pixel_color(&image[i][j], background);
    }

    buffer.save(&args.output)?;
    info!("saved {}", args.output);
    Ok(())
}
