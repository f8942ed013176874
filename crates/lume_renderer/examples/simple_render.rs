//! Simple ray tracer example.
//!
//! Renders a small scene using every primitive and saves it as PNG.
//!
//! ```text
//! cargo run --release --example simple_render -- [config.json] [output.png]
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use lume_core::{Checker, Config};
use lume_renderer::{Color, Light, Material, Mesh, Plane, RenderContext, Scene, Sphere, Vec3};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => Config::from_file(&path).with_context(|| format!("loading {path}"))?,
        None => default_config()?,
    };
    let output = args.next().unwrap_or_else(|| "output.png".to_string());

    let mut context = RenderContext::from_config(&config)?;
    let scene = build_scene(&context)?;
    log::info!("Scene built: {} objects, {} lights", scene.len(), scene.lights().len());

    let frame = context.render(&scene)?;
    image::save_buffer(
        &output,
        &frame.to_rgb8(),
        frame.width,
        frame.height,
        image::ColorType::Rgb8,
    )
    .with_context(|| format!("saving {output}"))?;

    log::info!("Saved to {}", output);
    Ok(())
}

fn default_config() -> Result<Config> {
    let json = r#"{
        "camera": {
            "resolution": [640, 360],
            "position": [0.0, 2.0, 8.0],
            "look_at": [0.0, 0.5, 0.0],
            "viewport": [3.2, 1.8],
            "focal_distance": 4.0,
            "samples_per_pixel": 4,
            "max_bounce_depth": 3
        },
        "render": { "seed": 7 }
    }"#;
    Ok(Config::from_json_str(json)?)
}

fn build_scene(context: &RenderContext) -> Result<Scene> {
    let mut scene = Scene::new();

    let floor = Material::lambertian(Color::ONE).with_texture(Arc::new(Checker::new(
        Color::splat(0.8),
        Color::splat(0.2),
        1.0,
    )));
    scene.add(Plane::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y), Arc::new(floor));

    let mirror = Arc::new(Material::metal(Color::splat(0.9), 0.8, 0.05, 0.0));
    let red = Arc::new(Material::lambertian(Color::new(0.8, 0.2, 0.1)).with_shininess(32.0));
    let blue = Arc::new(Material::lambertian(Color::new(0.2, 0.3, 0.8)));
    let gold = Arc::new(Material::metal(Color::new(0.9, 0.7, 0.3), 0.5, 0.2, 0.3));

    scene.add(Sphere::new(Vec3::new(0.0, 0.0, 0.0), 1.0)?, mirror);
    scene.add(Sphere::new(Vec3::new(-2.2, -0.4, 0.8), 0.6)?, red);

    let cylinder = scene.capped_cylinder(Vec3::new(2.2, -1.0, 0.0), Vec3::Y, 1.5, 0.5, blue.clone())?;
    scene.add_root(cylinder)?;

    let cone = scene.capped_cone(Vec3::new(-1.0, 1.0, -2.5), -Vec3::Y, 2.0, 0.7, gold)?;
    scene.add_root(cone)?;

    let cube = Mesh::cube()
        .scale(Vec3::splat(0.8))
        .rotate_y(0.6)
        .translate(Vec3::new(1.2, -0.6, 1.8));
    let cube = scene.mesh(&cube, blue, Some(context.camera()))?;
    scene.add_root(cube)?;

    scene.add_light(Light::point(Vec3::new(-3.0, 5.0, 4.0), 4.0));
    scene.add_light(Light::directional(Vec3::new(1.0, -1.0, -0.5), 0.3).with_color(Color::new(1.0, 0.9, 0.8)));
    scene.add_light(Light::spot(Vec3::new(2.2, 4.0, 0.0), -Vec3::Y, 3.0, 0.4));
    scene.add_light(Light::ambient(0.05));

    Ok(scene)
}
