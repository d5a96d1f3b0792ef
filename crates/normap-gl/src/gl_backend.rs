//! [`ShaderDriver`] backed by the `gl` crate's loaded function pointers.

use std::ffi::{c_void, CString};
use std::marker::PhantomData;
use std::sync::Once;

use gl::types::{GLchar, GLenum, GLint, GLsizei, GLuint};

use crate::driver::ShaderDriver;

pub(crate) static GL_INIT_ONCE: Once = Once::new();

/// Forwards [`ShaderDriver`] calls to the GL context current on this thread.
#[derive(Debug)]
pub struct GlDriver {
    // GL contexts are bound to one thread; keep the driver off the others.
    thread_mark: PhantomData<*const u8>,
}

impl GlDriver {
    /// Load GL function pointers with `loader` and return a driver for the
    /// current context.
    ///
    /// Pointers are loaded exactly once per process; later calls reuse them.
    ///
    /// # Safety
    ///
    /// A GL context must be current on the calling thread, and `loader` must
    /// resolve symbols for that context. Every driver call afterwards must
    /// happen on the same thread while the context is still alive.
    pub unsafe fn load_with<F>(mut loader: F) -> Self
    where
        F: FnMut(&str) -> *const c_void,
    {
        GL_INIT_ONCE.call_once(|| {
            gl::load_with(|symbol| loader(symbol));
        });

        Self {
            thread_mark: PhantomData,
        }
    }
}

fn location_name(name: &str) -> Option<CString> {
    match CString::new(name) {
        Ok(name) => Some(name),
        Err(_) => {
            tracing::warn!(name, "location name contains an interior NUL");
            None
        }
    }
}

impl ShaderDriver for GlDriver {
    fn create_shader(&self, kind: GLenum) -> GLuint {
        unsafe { gl::CreateShader(kind) }
    }

    fn shader_source(&self, shader: GLuint, source: &str) {
        // Explicit length, so the source needs no NUL terminator.
        let ptr = source.as_ptr() as *const GLchar;
        let len = source.len() as GLint;
        unsafe { gl::ShaderSource(shader, 1, &ptr, &len) };
    }

    fn compile_shader(&self, shader: GLuint) {
        unsafe { gl::CompileShader(shader) };
    }

    fn get_shader_iv(&self, shader: GLuint, pname: GLenum) -> GLint {
        let mut value = 0;
        unsafe { gl::GetShaderiv(shader, pname, &mut value) };
        value
    }

    fn get_shader_info_log(&self, shader: GLuint, buf: &mut [u8]) -> usize {
        if buf.is_empty() {
            return 0;
        }
        let mut written: GLsizei = 0;
        unsafe {
            gl::GetShaderInfoLog(
                shader,
                buf.len() as GLsizei,
                &mut written,
                buf.as_mut_ptr() as *mut GLchar,
            )
        };
        written.max(0) as usize
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader) };
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) };
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::DetachShader(program, shader) };
    }

    fn link_program(&self, program: GLuint) {
        unsafe { gl::LinkProgram(program) };
    }

    fn validate_program(&self, program: GLuint) {
        unsafe { gl::ValidateProgram(program) };
    }

    fn get_program_iv(&self, program: GLuint, pname: GLenum) -> GLint {
        let mut value = 0;
        unsafe { gl::GetProgramiv(program, pname, &mut value) };
        value
    }

    fn get_program_info_log(&self, program: GLuint, buf: &mut [u8]) -> usize {
        if buf.is_empty() {
            return 0;
        }
        let mut written: GLsizei = 0;
        unsafe {
            gl::GetProgramInfoLog(
                program,
                buf.len() as GLsizei,
                &mut written,
                buf.as_mut_ptr() as *mut GLchar,
            )
        };
        written.max(0) as usize
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) };
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) };
    }

    fn get_attrib_location(&self, program: GLuint, name: &str) -> GLint {
        match location_name(name) {
            Some(name) => unsafe { gl::GetAttribLocation(program, name.as_ptr()) },
            None => -1,
        }
    }

    fn get_uniform_location(&self, program: GLuint, name: &str) -> GLint {
        match location_name(name) {
            Some(name) => unsafe { gl::GetUniformLocation(program, name.as_ptr()) },
            None => -1,
        }
    }

    fn uniform_1i(&self, location: GLint, value: GLint) {
        unsafe { gl::Uniform1i(location, value) };
    }

    fn uniform_3f(&self, location: GLint, x: f32, y: f32, z: f32) {
        unsafe { gl::Uniform3f(location, x, y, z) };
    }

    fn uniform_matrix_4fv(&self, location: GLint, transpose: bool, value: &[f32; 16]) {
        let transpose = if transpose { gl::TRUE } else { gl::FALSE };
        unsafe { gl::UniformMatrix4fv(location, 1, transpose, value.as_ptr()) };
    }
}
