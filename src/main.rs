use std::env;
use std::path::Path;

use log::{info, warn};
use show_image::{create_window, event, ImageInfo, ImageView, WindowOptions};

use soft_renderer::renderer::Renderer;
use soft_renderer::shader::{ColorMap, ShaderRegistry};

/// Helper, defining exit event to be an Escape key press.
fn is_exit_event(window_event: event::WindowEvent) -> bool {
    if let event::WindowEvent::KeyboardInput(event) = window_event {
        if event.input.key_code == Some(event::VirtualKeyCode::Escape)
            && event.input.state.is_released()
        {
            return true;
        }
    }

    return false;
}

fn print_usage(registry: &ShaderRegistry) {
    println!("usage: soft_renderer [options]");
    println!("  -p <file>   scene description to render (default data/cube.scene)");
    println!("  -s <name>   shader, one of: {}", registry.names().join(", "));
    println!("  -t <file>   texture image for the texture shader");
    println!("  -c          combine the texture with the vertex colors");
    println!("  -m <name>   color map for the depth shader (gray, heat)");
    println!("  -o <file>   write the frame to a PNG instead of opening a window");
    println!("  --linear    interpolate attributes without perspective correction");
    println!("  -l          light the vertices with the scene lights");
    println!("  -w          draw the wireframe instead of solid faces");
    println!("  -n          draw the vertex normals");
    println!("  --points    draw only the projected vertices");
    println!("  -h          show this help");
}

#[show_image::main]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Default values.
    let mut scene_path = String::from("data/cube.scene");
    let mut shader_name = String::from("painter");
    let mut texture_path: Option<String> = None;
    let mut color_map_name: Option<String> = None;
    let mut output_path: Option<String> = None;
    let mut combine = false;
    let mut linear = false;
    let mut lighting = false;
    let mut wireframe = false;
    let mut normals = false;
    let mut points = false;
    let mut help = false;

    let args: Vec<String> = env::args().collect();
    for i in 1..args.len() {
        match args[i].as_str() {
            "-p" => { scene_path = args[i + 1].clone(); }
            "-s" => { shader_name = args[i + 1].clone(); }
            "-t" => { texture_path = Some(args[i + 1].clone()); }
            "-m" => { color_map_name = Some(args[i + 1].clone()); }
            "-o" => { output_path = Some(args[i + 1].clone()); }
            "-c" => { combine = true; }
            "--linear" => { linear = true; }
            "-l" => { lighting = true; }
            "-w" => { wireframe = true; }
            "-n" => { normals = true; }
            "--points" => { points = true; }
            "-h" => { help = true; }
            _ => ()
        }
    }

    let registry = ShaderRegistry::with_builtin_shaders();
    if help {
        print_usage(&registry);
        return Ok(());
    }

    let mut renderer = Renderer::new(registry, Path::new(&scene_path))?;
    if !renderer.set_shader(&shader_name) {
        return Err(format!("unknown shader '{}', try -h for the list", shader_name).into());
    }
    renderer.set_rasterizer(!linear);
    if let Some(path) = &texture_path {
        if let Err(e) = renderer.set_texture(Path::new(path)) {
            warn!("ignoring texture {}: {}", path, e);
        }
    }
    if combine {
        renderer.set_combine_with_base_color(true);
    }
    if let Some(name) = &color_map_name {
        match ColorMap::by_name(name) {
            Some(map) => renderer.set_color_map(map),
            None => warn!("unknown color map '{}', keeping the default", name),
        }
    }
    if lighting {
        renderer.set_lighting_enabled(true);
    }
    if wireframe {
        renderer.set_wired_rendered(true);
        renderer.set_solid_rendered(false);
    }
    if points {
        renderer.set_vertex_rendered(true);
        renderer.set_solid_rendered(false);
    }
    if normals {
        renderer.set_normals_rendered(true);
    }

    let screen = renderer.render();

    if let Some(path) = &output_path {
        screen.save(Path::new(path))?;
        info!("wrote {}", path);
        return Ok(());
    }

    let window_options: WindowOptions = WindowOptions {
        size: Some([screen.width, screen.height]),
        ..Default::default()
    };
    let window = create_window("soft_renderer", window_options)?;
    let image_data = ImageView::new(
        ImageInfo::rgb8(screen.width, screen.height),
        screen.as_pixel_data(),
    );
    window.set_image("render", image_data)?;

    info!("press Escape in the window to exit");
    let event_channel = window.event_channel()?;
    for window_event in event_channel.iter() {
        if is_exit_event(window_event) {
            break;
        }
    }

    return Ok(());
}
