//! The normal-mapped scene: one program, one quad, two textures.

use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use nalgebra::{Matrix4, Vector3};
use normap_core::FrameData;
use normap_gl::program::{
    LIGHT_POSITION_UNIFORM, MODEL_MATRIX_UNIFORM, PROJECTION_MATRIX_UNIFORM,
    VIEW_MATRIX_UNIFORM, VIEW_POSITION_UNIFORM,
};
use normap_gl::validate_gl::{drain_gl_errors, gl_error_name, gl_reset};
use normap_gl::{GlDriver, ShaderDriver, ShaderProgram};
use tracing::{debug, warn};

use crate::buffer::QuadMesh;
use crate::camera::Camera;
use crate::config::DemoConfig;
use crate::geometry::{normal_mapped_quad, VERTEX_ATTRIBUTES};
use crate::texture::GpuTexture;

pub const DIFFUSE_SAMPLER: &str = "brickTexture";
pub const NORMAL_SAMPLER: &str = "normalMap";

const DIFFUSE_UNIT: u32 = 0;
const NORMAL_UNIT: u32 = 1;

// Mid grey, and a normal pointing straight out of the surface.
const DIFFUSE_FALLBACK: [u8; 4] = [180, 180, 180, 255];
const NORMAL_FALLBACK: [u8; 4] = [128, 128, 255, 255];

pub const SCENE_UNIFORMS: [&str; 7] = [
    PROJECTION_MATRIX_UNIFORM,
    VIEW_MATRIX_UNIFORM,
    MODEL_MATRIX_UNIFORM,
    LIGHT_POSITION_UNIFORM,
    VIEW_POSITION_UNIFORM,
    DIFFUSE_SAMPLER,
    NORMAL_SAMPLER,
];

/// Rotation of the quad about the world Y axis after `elapsed` seconds.
pub fn model_matrix(elapsed: f32, rotation_speed: f32) -> Matrix4<f32> {
    Matrix4::from_axis_angle(&Vector3::y_axis(), elapsed * rotation_speed)
}

/// Register every uniform and attribute the scene draws with, and point the
/// samplers at their texture units.
pub fn bind_scene_locations<D: ShaderDriver>(program: &mut ShaderProgram<D>) -> Result<()> {
    for name in SCENE_UNIFORMS {
        program.register_uniform(name)?;
    }
    for attribute in VERTEX_ATTRIBUTES {
        program.register_attribute(attribute.name)?;
    }
    program.set_int(DIFFUSE_SAMPLER, DIFFUSE_UNIT as i32)?;
    program.set_int(NORMAL_SAMPLER, NORMAL_UNIT as i32)?;
    Ok(())
}

/// Link the scene program from disk and bind its locations. On failure the
/// program object is released before the error is returned.
pub fn build_scene_program<D: ShaderDriver>(
    driver: Rc<D>,
    vertex_path: &Path,
    fragment_path: &Path,
) -> Result<ShaderProgram<D>> {
    let mut program = ShaderProgram::new(driver);
    let built = program
        .init_from_files(vertex_path, fragment_path)
        .context("failed to build the normal mapping program")
        .and_then(|()| bind_scene_locations(&mut program));
    match built {
        Ok(()) => Ok(program),
        Err(e) => {
            program.clean_up();
            Err(e)
        }
    }
}

pub struct Scene {
    program: ShaderProgram<GlDriver>,
    mesh: QuadMesh,
    diffuse: GpuTexture,
    normal_map: GpuTexture,
    clear_color: [f32; 4],
    light_position: Vector3<f32>,
    rotation_speed: f32,
    near_plane: f32,
    far_plane: f32,
}

impl Scene {
    /// Build the program, register every location the shaders use, and
    /// upload the quad and its textures.
    ///
    /// # Safety
    ///
    /// The context `driver` was loaded for must be current.
    pub unsafe fn new(driver: Rc<GlDriver>, config: &DemoConfig) -> Result<Self> {
        let mut program = build_scene_program(
            driver,
            &config.vertex_shader_path(),
            &config.fragment_shader_path(),
        )?;
        let mesh = match QuadMesh::upload(&normal_mapped_quad(), &program) {
            Ok(mesh) => mesh,
            Err(e) => {
                program.clean_up();
                return Err(e);
            }
        };
        let diffuse = GpuTexture::load(&config.asset(&config.diffuse_texture), DIFFUSE_FALLBACK);
        let normal_map = GpuTexture::load(&config.asset(&config.normal_texture), NORMAL_FALLBACK);
        program.disable();

        debug!(
            program = %program.id(),
            vertices = mesh.vertex_count(),
            bytes = mesh.size(),
            "scene ready"
        );

        Ok(Self {
            program,
            mesh,
            diffuse,
            normal_map,
            clear_color: config.clear_color,
            light_position: config.light_position,
            rotation_speed: config.rotation_speed,
            near_plane: config.near_plane,
            far_plane: config.far_plane,
        })
    }

    /// # Safety
    ///
    /// The scene's context must be current.
    pub unsafe fn draw(&self, camera: &Camera, frame: &FrameData) -> Result<()> {
        let [r, g, b, a] = self.clear_color;
        gl::ClearColor(r, g, b, a);
        gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);

        let projection = camera.projection_matrix(
            frame.viewport.aspect_ratio(),
            self.near_plane,
            self.far_plane,
        );
        let model = model_matrix(frame.elapsed_secs(), self.rotation_speed);

        self.program.use_program()?;
        self.program.load_projection_matrix(&projection)?;
        self.program.load_view_matrix(&camera.view_matrix())?;
        self.program.load_model_matrix(&model)?;
        self.program.load_light_position(&self.light_position)?;
        self.program.load_view_position(&camera.position.coords)?;

        self.diffuse.bind(DIFFUSE_UNIT);
        self.normal_map.bind(NORMAL_UNIT);
        self.mesh.draw();

        self.program.disable();
        gl_reset(NORMAL_UNIT + 1);

        for code in drain_gl_errors() {
            warn!(frame = frame.frame_count(), "GL error after draw: {}", gl_error_name(code));
        }
        Ok(())
    }

    /// Release the program, the mesh and both textures.
    ///
    /// # Safety
    ///
    /// The scene's context must be current.
    pub unsafe fn clean_up(&mut self) {
        self.program.clean_up();
        self.mesh.delete();
        self.diffuse.delete();
        self.normal_map.delete();
    }
}
