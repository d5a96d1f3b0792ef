//! The narrow slice of the GL API that a [`ShaderProgram`](crate::ShaderProgram)
//! talks to.
//!
//! [`GlDriver`](crate::GlDriver) forwards every call to the loaded `gl`
//! function pointers. Keeping the seam as a trait lets the program wrapper be
//! exercised without a live context.

use gl::types::{GLenum, GLint, GLuint};

/// GL entry points used for shader compilation, linking, location lookup and
/// uniform upload.
///
/// Methods mirror their `gl*` counterparts one to one and take `&self`: the
/// driver is a handle to the current context, not an owner of GL state.
pub trait ShaderDriver {
    /// `glCreateShader`. Returns `0` when the driver could not allocate one.
    fn create_shader(&self, kind: GLenum) -> GLuint;
    fn shader_source(&self, shader: GLuint, source: &str);
    fn compile_shader(&self, shader: GLuint);
    fn get_shader_iv(&self, shader: GLuint, pname: GLenum) -> GLint;
    /// `glGetShaderInfoLog` into `buf`. Returns the number of bytes written,
    /// excluding the terminating NUL.
    fn get_shader_info_log(&self, shader: GLuint, buf: &mut [u8]) -> usize;
    fn delete_shader(&self, shader: GLuint);

    /// `glCreateProgram`. Returns `0` on failure.
    fn create_program(&self) -> GLuint;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn detach_shader(&self, program: GLuint, shader: GLuint);
    fn link_program(&self, program: GLuint);
    fn validate_program(&self, program: GLuint);
    fn get_program_iv(&self, program: GLuint, pname: GLenum) -> GLint;
    /// `glGetProgramInfoLog` into `buf`, same contract as
    /// [`get_shader_info_log`](Self::get_shader_info_log).
    fn get_program_info_log(&self, program: GLuint, buf: &mut [u8]) -> usize;
    fn use_program(&self, program: GLuint);
    fn delete_program(&self, program: GLuint);

    /// `glGetAttribLocation`. `-1` if the name is unknown or was optimized out.
    fn get_attrib_location(&self, program: GLuint, name: &str) -> GLint;
    /// `glGetUniformLocation`. `-1` if the name is unknown or was optimized out.
    fn get_uniform_location(&self, program: GLuint, name: &str) -> GLint;

    fn uniform_1i(&self, location: GLint, value: GLint);
    fn uniform_3f(&self, location: GLint, x: f32, y: f32, z: f32);
    /// `glUniformMatrix4fv` for a single column-major matrix.
    fn uniform_matrix_4fv(&self, location: GLint, transpose: bool, value: &[f32; 16]);
}
