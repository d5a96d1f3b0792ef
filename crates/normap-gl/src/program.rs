//! [`ShaderProgram`]: a linked vertex + fragment program with a registry of
//! attribute and uniform locations.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use gl::types::{GLint, GLuint};
use nalgebra::{Matrix4, Vector3};

use crate::driver::ShaderDriver;
use crate::error::{Result, ShaderError};
use crate::gl_backend::GlDriver;
use crate::info_log::{info_log, LogSource};
use crate::observer::{ProgramEvent, ProgramObserver, TracingObserver};
use crate::stage::{self, Stage, StageKind};

pub const VIEW_POSITION_UNIFORM: &str = "viewPosition";
pub const LIGHT_POSITION_UNIFORM: &str = "lightPosition";
pub const MODEL_MATRIX_UNIFORM: &str = "modelMatrix";
pub const VIEW_MATRIX_UNIFORM: &str = "viewMatrix";
pub const PROJECTION_MATRIX_UNIFORM: &str = "projectionMatrix";

/// GL name of a program object, if one has been allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(Option<GLuint>);

impl ProgramId {
    pub fn raw(self) -> Option<GLuint> {
        self.0
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(id) => write!(f, "{id}"),
            None => f.write_str("-1"),
        }
    }
}

/// Read a whole shader source file.
pub fn load_shader_source(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|source| ShaderError::FileOpen {
        path: path.to_path_buf(),
        source,
    })
}

/// Owns one GL program object and the locations registered against it.
///
/// The program object is only ever deleted by [`clean_up`](Self::clean_up);
/// dropping the wrapper without calling it leaks the object and logs a
/// warning.
pub struct ShaderProgram<D: ShaderDriver = GlDriver> {
    driver: Rc<D>,
    program: Option<GLuint>,
    attributes: HashMap<String, GLint>,
    uniforms: HashMap<String, GLint>,
    initialized: bool,
    observer: Box<dyn ProgramObserver>,
}

impl<D: ShaderDriver> fmt::Debug for ShaderProgram<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("program", &self.id())
            .field("initialized", &self.initialized)
            .field("attributes", &self.attributes)
            .field("uniforms", &self.uniforms)
            .finish_non_exhaustive()
    }
}

impl<D: ShaderDriver> ShaderProgram<D> {
    /// An uninitialized wrapper. No GL object is created until one of the
    /// `init_*` methods or [`initialize`](Self::initialize) runs.
    pub fn new(driver: Rc<D>) -> Self {
        Self {
            driver,
            program: None,
            attributes: HashMap::new(),
            uniforms: HashMap::new(),
            initialized: false,
            observer: Box::new(TracingObserver),
        }
    }

    /// Replace the default [`TracingObserver`].
    pub fn with_observer(mut self, observer: impl ProgramObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn id(&self) -> ProgramId {
        ProgramId(self.program)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Read both sources from disk, [`initialize`](Self::initialize), and bind
    /// the program.
    pub fn init_from_files(
        &mut self,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<()> {
        let vertex_source = load_shader_source(vertex_path)?;
        let fragment_source = load_shader_source(fragment_path)?;
        self.init_from_strings(&vertex_source, &fragment_source)
    }

    /// [`initialize`](Self::initialize) from in-memory sources and bind the
    /// program.
    pub fn init_from_strings(&mut self, vertex_source: &str, fragment_source: &str) -> Result<()> {
        self.initialize(vertex_source, fragment_source)?;
        self.use_program()
    }

    /// Compile a single stage against this program's driver.
    pub fn compile_stage(&self, source: &str, kind: StageKind) -> Result<Stage<'_, D>> {
        compile_observed(&*self.driver, &*self.observer, source, kind)
    }

    /// Compile both stages, link them into the program and validate it.
    ///
    /// Any previous link result is discarded first, so on error the program
    /// is left uninitialized. Registered names survive: after a successful
    /// relink each one is resolved again. Stage objects are detached after
    /// linking and deleted on every exit path.
    pub fn initialize(&mut self, vertex_source: &str, fragment_source: &str) -> Result<()> {
        self.initialized = false;

        let program = self.ensure_program()?;
        let driver = Rc::clone(&self.driver);
        let observer = &*self.observer;

        let vertex = compile_observed(driver.as_ref(), observer, vertex_source, StageKind::Vertex)?;
        let fragment = compile_observed(
            driver.as_ref(),
            observer,
            fragment_source,
            StageKind::Fragment,
        )?;

        driver.attach_shader(program, vertex.id());
        driver.attach_shader(program, fragment.id());
        driver.link_program(program);
        driver.detach_shader(program, vertex.id());
        driver.detach_shader(program, fragment.id());

        if driver.get_program_iv(program, gl::LINK_STATUS) != gl::TRUE as GLint {
            return Err(ShaderError::Link {
                log: info_log(driver.as_ref(), LogSource::Program, program),
            });
        }
        observer.on_event(&ProgramEvent::Linked {
            program: ProgramId(Some(program)),
        });

        // Validation depends on the state at draw time; a failure here is
        // not an error.
        driver.validate_program(program);

        self.refresh_locations(program);
        self.initialized = true;
        Ok(())
    }

    /// Fetch the diagnostic log of this program object.
    pub fn info_log(&self) -> String {
        match self.program {
            Some(program) => info_log(self.driver.as_ref(), LogSource::Program, program),
            None => String::new(),
        }
    }

    /// Resolve `name` as a vertex attribute and cache its location.
    pub fn register_attribute(&mut self, name: &str) -> Result<GLint> {
        let program = self.linked_program()?;
        let location = self.driver.get_attrib_location(program, name);
        if location < 0 {
            return Err(ShaderError::AttributeBinding {
                name: name.to_owned(),
            });
        }

        self.attributes.insert(name.to_owned(), location);
        self.observer.on_event(&ProgramEvent::AttributeBound {
            name: name.to_owned(),
            location,
        });
        Ok(location)
    }

    /// Resolve `name` as a uniform and cache its location.
    pub fn register_uniform(&mut self, name: &str) -> Result<GLint> {
        let program = self.linked_program()?;
        let location = self.driver.get_uniform_location(program, name);
        if location < 0 {
            return Err(ShaderError::UniformBinding {
                name: name.to_owned(),
            });
        }

        self.uniforms.insert(name.to_owned(), location);
        self.observer.on_event(&ProgramEvent::UniformBound {
            name: name.to_owned(),
            location,
        });
        Ok(location)
    }

    /// Location of a previously registered attribute.
    pub fn attribute(&self, name: &str) -> Result<GLuint> {
        self.attributes
            .get(name)
            .map(|&location| location as GLuint)
            .ok_or_else(|| ShaderError::AttributeNotFound {
                name: name.to_owned(),
            })
    }

    /// Location of a previously registered uniform.
    pub fn uniform(&self, name: &str) -> Result<GLint> {
        self.uniforms
            .get(name)
            .copied()
            .ok_or_else(|| ShaderError::UniformNotFound {
                name: name.to_owned(),
            })
    }

    pub fn load_view_position(&self, view_position: &Vector3<f32>) -> Result<()> {
        self.load_vec3(VIEW_POSITION_UNIFORM, view_position)
    }

    pub fn load_light_position(&self, light_position: &Vector3<f32>) -> Result<()> {
        self.load_vec3(LIGHT_POSITION_UNIFORM, light_position)
    }

    pub fn load_model_matrix(&self, model: &Matrix4<f32>) -> Result<()> {
        self.load_matrix(MODEL_MATRIX_UNIFORM, model)
    }

    pub fn load_view_matrix(&self, view: &Matrix4<f32>) -> Result<()> {
        self.load_matrix(VIEW_MATRIX_UNIFORM, view)
    }

    pub fn load_projection_matrix(&self, projection: &Matrix4<f32>) -> Result<()> {
        self.load_matrix(PROJECTION_MATRIX_UNIFORM, projection)
    }

    /// Upload an integer (e.g. a sampler's texture unit) to a registered uniform.
    pub fn set_int(&self, name: &str, value: i32) -> Result<()> {
        let location = self.uniform(name)?;
        self.driver.uniform_1i(location, value);
        Ok(())
    }

    /// Make this program current. Fails unless it has been initialized.
    pub fn use_program(&self) -> Result<()> {
        match self.program {
            Some(program) if self.initialized => {
                self.driver.use_program(program);
                Ok(())
            }
            _ => Err(ShaderError::NotInitialized { program: self.id() }),
        }
    }

    /// Bind the default (null) program.
    pub fn disable(&self) {
        self.driver.use_program(0);
    }

    /// Delete the program object and return to the uninitialized state.
    ///
    /// Calling it again, or on a wrapper that never allocated a program, does
    /// nothing.
    pub fn clean_up(&mut self) {
        self.initialized = false;
        self.attributes.clear();
        self.uniforms.clear();

        if let Some(program) = self.program.take() {
            self.driver.delete_program(program);
            self.observer.on_event(&ProgramEvent::CleanedUp {
                program: ProgramId(Some(program)),
            });
        }
    }

    fn ensure_program(&mut self) -> Result<GLuint> {
        if let Some(program) = self.program {
            return Ok(program);
        }
        let program = self.driver.create_program();
        if program == 0 {
            return Err(ShaderError::ProgramCreation);
        }
        self.program = Some(program);
        Ok(program)
    }

    /// Re-resolve every registered name against a freshly linked program. A
    /// name the new program no longer exposes keeps its last location.
    fn refresh_locations(&mut self, program: GLuint) {
        let driver = &*self.driver;
        for (name, location) in self.attributes.iter_mut() {
            match driver.get_attrib_location(program, name) {
                fresh if fresh >= 0 => *location = fresh,
                _ => tracing::warn!(name = %name, location = *location, "attribute inactive after relink"),
            }
        }
        for (name, location) in self.uniforms.iter_mut() {
            match driver.get_uniform_location(program, name) {
                fresh if fresh >= 0 => *location = fresh,
                _ => tracing::warn!(name = %name, location = *location, "uniform inactive after relink"),
            }
        }
    }

    fn linked_program(&self) -> Result<GLuint> {
        match self.program {
            Some(program) if self.initialized => Ok(program),
            _ => Err(ShaderError::NotInitialized { program: self.id() }),
        }
    }

    fn load_vec3(&self, name: &str, value: &Vector3<f32>) -> Result<()> {
        let location = self.uniform(name)?;
        self.driver.uniform_3f(location, value.x, value.y, value.z);
        Ok(())
    }

    fn load_matrix(&self, name: &str, value: &Matrix4<f32>) -> Result<()> {
        let location = self.uniform(name)?;
        // nalgebra stores matrices column-major, which is what GL expects.
        let mut columns = [0.0; 16];
        columns.copy_from_slice(value.as_slice());
        self.driver.uniform_matrix_4fv(location, false, &columns);
        Ok(())
    }
}

impl<D: ShaderDriver> Drop for ShaderProgram<D> {
    fn drop(&mut self) {
        if self.program.is_some() {
            tracing::warn!(
                program = %self.id(),
                "shader program dropped without clean_up, GL object leaked"
            );
        }
    }
}

fn compile_observed<'d, D: ShaderDriver + ?Sized>(
    driver: &'d D,
    observer: &dyn ProgramObserver,
    source: &str,
    kind: StageKind,
) -> Result<Stage<'d, D>> {
    let stage = stage::compile_stage(driver, source, kind)?;
    observer.on_event(&ProgramEvent::StageCompiled { kind });
    Ok(stage)
}
