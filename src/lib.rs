//! Software 3D renderer.
//!
//! Takes a triangle mesh with per vertex colors, projects it through a
//! pinhole camera and scan-converts the triangles into a pixel buffer,
//! all on the CPU. Depth handling, texturing and simple Blinn-Phong
//! lighting are layered on top through pluggable shaders.

pub mod algebra;
pub mod camera;
pub mod depth;
pub mod fragment;
pub mod light;
pub mod mesh;
pub mod raster;
pub mod renderer;
pub mod scene;
pub mod screen;
pub mod shader;
pub mod texture;
