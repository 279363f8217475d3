//! The renderer wires scene, mesh, camera, lights, rasterizer and
//! shader together and runs the frame passes.

use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::algebra::Vector;
use crate::camera::{DegenerateLookAt, Transformation};
use crate::fragment::Fragment;
use crate::light::Lighting;
use crate::mesh::{Mesh, MeshError};
use crate::raster::{LinearRasterizer, PerspectiveCorrectRasterizer, Rasterizer};
use crate::scene::{Scene, SceneError};
use crate::screen::Screen;
use crate::shader::{ColorMap, Shader, ShaderRegistry, SimpleShader};
use crate::texture::Texture;

/// Normal segments are drawn at 1/100 of the mesh bounding box
/// diagonal, long enough to see and short enough not to tangle.
const NORMAL_LENGTH_DIVIDER: f64 = 100.0;

/// Error raised while loading renderer inputs.
#[derive(Debug)]
pub enum RendererError {
    Scene(SceneError),
    Mesh(MeshError),
    Camera(DegenerateLookAt),
    Texture(image::ImageError),
}

impl fmt::Display for RendererError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RendererError::Scene(e) => return write!(f, "{}", e),
            RendererError::Mesh(e) => return write!(f, "{}", e),
            RendererError::Camera(e) => return write!(f, "invalid camera: {}", e),
            RendererError::Texture(e) => return write!(f, "texture error: {}", e),
        }
    }
}

impl Error for RendererError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RendererError::Scene(e) => return Some(e),
            RendererError::Mesh(e) => return Some(e),
            RendererError::Camera(e) => return Some(e),
            RendererError::Texture(e) => return Some(e),
        }
    }
}

impl From<SceneError> for RendererError {
    fn from(e: SceneError) -> RendererError {
        return RendererError::Scene(e);
    }
}

impl From<MeshError> for RendererError {
    fn from(e: MeshError) -> RendererError {
        return RendererError::Mesh(e);
    }
}

impl From<DegenerateLookAt> for RendererError {
    fn from(e: DegenerateLookAt) -> RendererError {
        return RendererError::Camera(e);
    }
}

impl From<image::ImageError> for RendererError {
    fn from(e: image::ImageError) -> RendererError {
        return RendererError::Texture(e);
    }
}

/// Everything derived from one scene file, loaded as a unit so a
/// failing load cannot leave the renderer half switched.
struct SceneState {
    scene: Scene,
    mesh: Mesh,
    xform: Transformation,
    lighting: Lighting,
    normal_length: f64,
}

impl SceneState {
    fn load(scene_path: &Path) -> Result<SceneState, RendererError> {
        let scene = Scene::load(scene_path)?;
        let mesh_path = resolve_mesh_path(scene_path, &scene.mesh_file_name);
        let mesh = Mesh::load(&mesh_path)?;

        let mut xform = Transformation::new();
        xform.set_look_at(&scene.camera_position, &scene.camera_look_at, &scene.camera_up)?;
        xform.set_projection();
        xform.set_calibration(
            scene.focal_length,
            scene.screen_width as f64,
            scene.screen_height as f64,
        );

        let mut lighting = Lighting::new();
        lighting.add_ambient_light(scene.ambient_intensity);
        lighting.add_point_light(
            scene.light_position[0],
            scene.light_position[1],
            scene.light_position[2],
            scene.light_intensity,
        );

        let normal_length = normal_segment_length(&mesh);
        return Ok(SceneState {
            scene,
            mesh,
            xform,
            lighting,
            normal_length,
        });
    }
}

/// The mesh file name is tried as given first and then relative to the
/// scene file's directory, so scenes can ship next to their meshes.
fn resolve_mesh_path(scene_path: &Path, name: &str) -> PathBuf {
    let direct = PathBuf::from(name);
    if direct.exists() {
        return direct;
    }
    match scene_path.parent() {
        Some(parent) => return parent.join(name),
        None => return direct,
    }
}

fn normal_segment_length(mesh: &Mesh) -> f64 {
    if mesh.num_vertices() == 0 {
        return 0.0;
    }
    let mut min = [f64::INFINITY; 3];
    let mut max = [f64::NEG_INFINITY; 3];
    for vertex in mesh.vertices() {
        for axis in 0..3 {
            min[axis] = min[axis].min(vertex.get(axis));
            max[axis] = max[axis].max(vertex.get(axis));
        }
    }
    let diagonal = Vector::from_values(&[max[0] - min[0], max[1] - min[1], max[2] - min[2]]);
    return diagonal.norm() / NORMAL_LENGTH_DIVIDER;
}

/// Renders one scene with a configurable shader, rasterizer and set of
/// passes.
pub struct Renderer {
    scene: Scene,
    mesh: Mesh,
    xform: Transformation,
    lighting: Lighting,
    normal_length: f64,
    registry: ShaderRegistry,
    shader: Box<dyn Shader>,
    rasterizer: Box<dyn Rasterizer>,
    perspective_correct: bool,
    texture_path: Option<PathBuf>,
    combine_with_base_color: bool,
    lighting_enabled: bool,
    vertex_rendered: bool,
    wired_rendered: bool,
    solid_rendered: bool,
    normals_rendered: bool,
}

impl Renderer {
    /// Creates a renderer for the given scene file. Starts with the
    /// simple shader, the linear rasterizer and only the solid pass.
    pub fn new(registry: ShaderRegistry, scene_path: &Path) -> Result<Renderer, RendererError> {
        let state = SceneState::load(scene_path)?;
        return Ok(Renderer {
            scene: state.scene,
            mesh: state.mesh,
            xform: state.xform,
            lighting: state.lighting,
            normal_length: state.normal_length,
            registry,
            shader: Box::new(SimpleShader),
            rasterizer: Box::new(LinearRasterizer),
            perspective_correct: false,
            texture_path: None,
            combine_with_base_color: false,
            lighting_enabled: false,
            vertex_rendered: false,
            wired_rendered: false,
            solid_rendered: true,
            normals_rendered: false,
        });
    }

    /// Replaces the whole scene. When loading fails the renderer keeps
    /// showing the previous scene.
    pub fn set_scene(&mut self, scene_path: &Path) -> Result<(), RendererError> {
        let state = SceneState::load(scene_path)?;
        self.scene = state.scene;
        self.mesh = state.mesh;
        self.xform = state.xform;
        self.lighting = state.lighting;
        self.normal_length = state.normal_length;
        return Ok(());
    }

    /// Switches to a registered shader by name and carries the texture
    /// and combine settings over to the new instance. Returns false
    /// and keeps the current shader for unknown names.
    pub fn set_shader(&mut self, name: &str) -> bool {
        let shader = match self.registry.create(name) {
            Some(shader) => shader,
            None => return false,
        };
        self.shader = shader;
        if let Some(path) = self.texture_path.clone() {
            if let Err(e) = self.load_texture(&path) {
                warn!("could not re-apply texture {}: {}", path.display(), e);
            }
        }
        self.shader.set_combine_with_base_color(self.combine_with_base_color);
        debug!("shader switched to '{}'", name);
        return true;
    }

    /// Loads a texture and hands it to the current shader. On failure
    /// the previously loaded texture stays active.
    pub fn set_texture(&mut self, path: &Path) -> Result<(), RendererError> {
        self.load_texture(path)?;
        self.texture_path = Some(path.to_path_buf());
        return Ok(());
    }

    fn load_texture(&mut self, path: &Path) -> Result<(), RendererError> {
        let texture = Texture::load(path)?;
        self.shader.set_texture(texture);
        return Ok(());
    }

    pub fn set_combine_with_base_color(&mut self, combine: bool) {
        self.combine_with_base_color = combine;
        self.shader.set_combine_with_base_color(combine);
    }

    /// Hands the color map to the shader if it supports one.
    pub fn set_color_map(&mut self, map: ColorMap) {
        if self.shader.supports_color_map() {
            self.shader.set_color_map(map);
        }
    }

    /// Chooses between the linear and the perspective correct
    /// rasterizer.
    pub fn set_rasterizer(&mut self, perspective_correct: bool) {
        if perspective_correct == self.perspective_correct {
            return;
        }
        self.perspective_correct = perspective_correct;
        if perspective_correct {
            self.rasterizer = Box::new(PerspectiveCorrectRasterizer);
        } else {
            self.rasterizer = Box::new(LinearRasterizer);
        }
    }

    pub fn set_lighting_enabled(&mut self, enabled: bool) {
        self.lighting_enabled = enabled;
    }

    pub fn set_vertex_rendered(&mut self, enabled: bool) {
        self.vertex_rendered = enabled;
    }

    pub fn set_wired_rendered(&mut self, enabled: bool) {
        self.wired_rendered = enabled;
    }

    pub fn set_solid_rendered(&mut self, enabled: bool) {
        self.solid_rendered = enabled;
    }

    pub fn set_normals_rendered(&mut self, enabled: bool) {
        self.normals_rendered = enabled;
    }

    /// Projects every mesh vertex into a fragment: rounded pixel
    /// position, depth, the world-space normal, texture coordinates
    /// when the mesh has them, and the vertex color, lit if lighting
    /// is enabled.
    pub fn project_vertices(&self) -> Vec<Fragment> {
        let vertices = self.mesh.vertices();
        let normals = self.mesh.normals();
        let colors = self.mesh.colors();
        let texture_coordinates = self.mesh.texture_coordinates();
        let mut fragments = Vec::with_capacity(vertices.len());
        for (i, vertex) in vertices.iter().enumerate() {
            let projected = self.xform.project_point(vertex);
            let mut fragment = Fragment::new(
                projected.get(0).round() as i32,
                projected.get(1).round() as i32,
            );
            fragment.set_depth(projected.get(2));
            // Normals stay in world space, lighting runs there too.
            fragment.set_normal(&normals[i]);
            if let Some(uv) = texture_coordinates {
                fragment.set_attribute(Fragment::TEXTURE_U, uv[2 * i]);
                fragment.set_attribute(Fragment::TEXTURE_V, uv[2 * i + 1]);
            }
            let base_color = [colors[3 * i], colors[3 * i + 1], colors[3 * i + 2]];
            if self.lighting_enabled {
                let lit = self.lighting.apply_lights(
                    vertex,
                    &normals[i],
                    &base_color,
                    &self.scene.camera_position,
                    &self.scene.material,
                );
                fragment.set_color(lit[0], lit[1], lit[2]);
            } else {
                fragment.set_color(base_color[0], base_color[1], base_color[2]);
            }
            fragments.push(fragment);
        }
        return fragments;
    }

    /// Renders the enabled passes into a fresh screen.
    pub fn render(&mut self) -> Screen {
        let mut screen = Screen::new(self.scene.screen_width, self.scene.screen_height);
        self.shader.init(screen.width, screen.height);
        self.shader.reset();
        debug!(
            "rendering {} faces at {}x{}",
            self.mesh.num_faces(),
            screen.width,
            screen.height
        );
        if self.vertex_rendered {
            self.render_vertices(&mut screen);
        }
        if self.wired_rendered {
            self.render_wireframe(&mut screen);
            self.render_vertices(&mut screen);
        }
        if self.solid_rendered {
            self.render_solid(&mut screen);
        }
        if self.normals_rendered {
            self.render_normals(&mut screen);
        }
        return screen;
    }

    fn render_vertices(&mut self, screen: &mut Screen) {
        let fragments = self.project_vertices();
        for fragment in &fragments {
            self.rasterizer.rasterize_vertex(fragment, self.shader.as_mut(), screen);
        }
    }

    fn render_wireframe(&mut self, screen: &mut Screen) {
        let fragments = self.project_vertices();
        for face in 0..self.mesh.num_faces() {
            for j in 0..3 {
                let from = self.mesh.faces()[3 * face + j];
                let to = self.mesh.faces()[3 * face + (j + 1) % 3];
                self.rasterizer.rasterize_edge(
                    &fragments[from],
                    &fragments[to],
                    self.shader.as_mut(),
                    screen,
                );
            }
        }
    }

    fn render_solid(&mut self, screen: &mut Screen) {
        let fragments = self.project_vertices();
        for face in 0..self.mesh.num_faces() {
            let v1 = &fragments[self.mesh.faces()[3 * face]];
            let v2 = &fragments[self.mesh.faces()[3 * face + 1]];
            let v3 = &fragments[self.mesh.faces()[3 * face + 2]];
            self.rasterizer.rasterize_face(v1, v2, v3, self.shader.as_mut(), screen);
        }
    }

    /// Draws a short red segment along each vertex normal, from the
    /// vertex into the direction the surface is facing.
    fn render_normals(&mut self, screen: &mut Screen) {
        let fragments = self.project_vertices();
        for (i, fragment) in fragments.iter().enumerate() {
            let vertex = &self.mesh.vertices()[i];
            let normal = fragment.normal();
            let tip = Vector::from_values(&[
                vertex.get(0) + self.normal_length * normal.get(0),
                vertex.get(1) + self.normal_length * normal.get(1),
                vertex.get(2) + self.normal_length * normal.get(2),
            ]);
            let projected = self.xform.project_point(&tip);
            let mut tip_fragment = Fragment::new(
                projected.get(0).round() as i32,
                projected.get(1).round() as i32,
            );
            tip_fragment.set_depth(projected.get(2));
            tip_fragment.set_normal(&normal);
            tip_fragment.set_color(1.0, 0.0, 0.0);
            let mut base_fragment = fragment.clone();
            base_fragment.set_color(1.0, 0.0, 0.0);
            self.rasterizer.rasterize_edge(
                &base_fragment,
                &tip_fragment,
                self.shader.as_mut(),
                screen,
            );
        }
    }
}
