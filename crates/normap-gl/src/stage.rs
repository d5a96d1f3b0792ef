//! Compilation of individual shader stages.

use std::fmt;

use gl::types::{GLenum, GLuint};

use crate::driver::ShaderDriver;
use crate::error::{Result, ShaderError};
use crate::info_log::{info_log, LogSource};

/// Pipeline stage a shader source is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
    /// Recognised so it can be rejected with a clear error.
    Geometry,
}

impl StageKind {
    pub fn gl_enum(self) -> GLenum {
        match self {
            StageKind::Vertex => gl::VERTEX_SHADER,
            StageKind::Fragment => gl::FRAGMENT_SHADER,
            StageKind::Geometry => gl::GEOMETRY_SHADER,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StageKind::Vertex => "GL_VERTEX_SHADER",
            StageKind::Fragment => "GL_FRAGMENT_SHADER",
            StageKind::Geometry => "GL_GEOMETRY_SHADER",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A compiled shader object.
///
/// The GL object is deleted when the guard drops, so a stage never outlives
/// the link step that consumes it, whichever way that step exits.
pub struct Stage<'d, D: ShaderDriver + ?Sized> {
    driver: &'d D,
    id: GLuint,
    kind: StageKind,
}

impl<'d, D: ShaderDriver + ?Sized> Stage<'d, D> {
    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }
}

impl<D: ShaderDriver + ?Sized> fmt::Debug for Stage<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}

impl<D: ShaderDriver + ?Sized> Drop for Stage<'_, D> {
    fn drop(&mut self) {
        self.driver.delete_shader(self.id);
    }
}

/// Compile `source` as a `kind` stage.
///
/// Only vertex and fragment stages are supported. The returned error carries
/// the driver's diagnostic log for both allocation and compile failures.
pub fn compile_stage<'d, D: ShaderDriver + ?Sized>(
    driver: &'d D,
    source: &str,
    kind: StageKind,
) -> Result<Stage<'d, D>> {
    if kind == StageKind::Geometry {
        return Err(ShaderError::UnsupportedStage { kind });
    }

    let id = driver.create_shader(kind.gl_enum());
    if id == 0 {
        return Err(ShaderError::StageCreation {
            kind,
            log: info_log(driver, LogSource::Shader, id),
        });
    }
    let stage = Stage { driver, id, kind };

    driver.shader_source(id, source);
    driver.compile_shader(id);

    if driver.get_shader_iv(id, gl::COMPILE_STATUS) == gl::FALSE as i32 {
        return Err(ShaderError::Compilation {
            kind,
            log: info_log(driver, LogSource::Shader, id),
        });
    }

    Ok(stage)
}
