//! Shader program management over raw OpenGL.
//!
//! [`ShaderProgram`] compiles a vertex and a fragment stage, links them,
//! and keeps a registry of attribute and uniform locations with typed
//! uploads for the values a normal-mapped draw needs.
//!
//! Every GL call goes through the [`ShaderDriver`] trait. [`GlDriver`] is the
//! implementation for a live context:
//!
//! ```rust,ignore
//! let driver = Rc::new(unsafe { GlDriver::load_with(|s| display.get_proc_address(s)) });
//! let mut program = ShaderProgram::new(driver);
//! program.init_from_files("shader.vert", "shader.frag")?;
//! program.register_uniform("modelMatrix")?;
//! program.load_model_matrix(&model)?;
//! ```
//!
//! ### Warning
//!
//! A program and its driver are tied to the thread whose GL context is
//! current. Neither is `Send`.

mod driver;
mod error;
mod gl_backend;
mod info_log;
pub mod glsl;
pub mod observer;
pub mod program;
pub mod stage;
pub mod validate_gl;

#[cfg(test)]
mod mock;

pub use driver::ShaderDriver;
pub use error::{Result, ShaderError};
pub use gl_backend::GlDriver;
pub use info_log::{info_log, LogSource};
pub use observer::{ProgramEvent, ProgramObserver, TracingObserver};
pub use program::{load_shader_source, ProgramId, ShaderProgram};
pub use stage::{compile_stage, Stage, StageKind};
