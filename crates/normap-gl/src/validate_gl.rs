//! Reset and check the state of the OpenGL context between frames.

use gl::types::GLenum;

/// Describes an OpenGL texture target/binding pair.
pub struct TextureType {
    pub target: u32,
    pub binding: u32,
}

/// Texture targets unbound during GL state reset.
pub const TEXTURE_TYPES: [TextureType; 2] = [
    TextureType {
        target: gl::TEXTURE_2D,
        binding: gl::TEXTURE_BINDING_2D,
    },
    TextureType {
        target: gl::TEXTURE_CUBE_MAP,
        binding: gl::TEXTURE_BINDING_CUBE_MAP,
    },
];

// A lost context keeps reporting errors; stop draining after this many.
const MAX_DRAINED_ERRORS: usize = 32;

/// Unbind the program, the first `texture_units` texture units, the array
/// buffer and the VAO, leaving texture unit 0 active.
///
/// # Safety
///
/// Must be called with a valid OpenGL context active.
pub unsafe fn gl_reset(texture_units: u32) {
    gl::UseProgram(0);

    for texture_type in TEXTURE_TYPES.iter() {
        for unit in 0..texture_units {
            gl::ActiveTexture(gl::TEXTURE0 + unit);
            gl::BindTexture(texture_type.target, 0);
        }
    }

    gl::ActiveTexture(gl::TEXTURE0);

    gl::BindBuffer(gl::ARRAY_BUFFER, 0);
    gl::BindVertexArray(0);
}

/// Read and clear every pending `glGetError` code.
///
/// # Safety
///
/// Must be called with a valid OpenGL context active.
pub unsafe fn drain_gl_errors() -> Vec<GLenum> {
    let mut errors = Vec::new();
    while errors.len() < MAX_DRAINED_ERRORS {
        let error = gl::GetError();
        if error == gl::NO_ERROR {
            break;
        }
        errors.push(error);
    }
    errors
}

/// Symbolic name of a `glGetError` code.
pub fn gl_error_name(code: GLenum) -> &'static str {
    match code {
        gl::NO_ERROR => "GL_NO_ERROR",
        gl::INVALID_ENUM => "GL_INVALID_ENUM",
        gl::INVALID_VALUE => "GL_INVALID_VALUE",
        gl::INVALID_OPERATION => "GL_INVALID_OPERATION",
        gl::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        gl::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        gl::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        gl::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        _ => "unknown GL error",
    }
}
