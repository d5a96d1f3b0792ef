//! Recording [`ShaderDriver`] for tests that run without a GL context.
//!
//! Compilation rejects identifiers of the form `glFoo` (a misspelt built-in),
//! linking assigns locations to the `uniform` declarations of every attached
//! stage and to the `in`/`attribute` declarations of the vertex stage, in
//! declaration order.

use std::cell::RefCell;
use std::collections::HashMap;

use gl::types::{GLenum, GLint, GLuint};

use crate::driver::ShaderDriver;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Upload {
    Int { location: GLint, value: GLint },
    Vec3 { location: GLint, value: [f32; 3] },
    Mat4 { location: GLint, transpose: bool, value: [f32; 16] },
}

#[derive(Debug)]
struct MockShader {
    kind: GLenum,
    source: String,
    compiled: bool,
    log: String,
    deleted: bool,
}

#[derive(Debug, Default)]
struct MockProgram {
    attached: Vec<GLuint>,
    linked: bool,
    validated: bool,
    log: String,
    deleted: bool,
    uniforms: HashMap<String, GLint>,
    attributes: HashMap<String, GLint>,
}

#[derive(Debug, Default)]
struct State {
    next_id: GLuint,
    shaders: HashMap<GLuint, MockShader>,
    programs: HashMap<GLuint, MockProgram>,
    current: GLuint,
    uploads: Vec<Upload>,
    calls: Vec<&'static str>,
    shaders_created: usize,
    fail_shader_allocation: bool,
    fail_program_allocation: bool,
    fail_next_link: bool,
    last_info_log_capacity: Option<usize>,
}

impl State {
    fn allocate(&mut self) -> GLuint {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug, Default)]
pub(crate) struct MockDriver {
    state: RefCell<State>,
}

fn misspelt_builtins(source: &str) -> Vec<&str> {
    source
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|token| {
            token.starts_with("gl")
                && token
                    .as_bytes()
                    .get(2)
                    .map_or(false, |c| c.is_ascii_uppercase())
        })
        .collect()
}

/// Strip comments and preprocessor lines, then split into statements.
fn statements(source: &str) -> Vec<String> {
    let body: String = source
        .lines()
        .map(|line| line.split("//").next().unwrap_or_default())
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");

    body.split(';').map(|s| s.trim().to_owned()).collect()
}

/// Names declared by statements starting with one of `qualifiers`.
fn declared(source: &str, qualifiers: &[&str]) -> Vec<String> {
    let mut names = Vec::new();
    for statement in statements(source) {
        let statement = match statement.strip_prefix("layout") {
            Some(rest) => rest.split_once(')').map_or("", |(_, tail)| tail).trim(),
            None => statement.as_str(),
        };
        let mut tokens = statement.split_whitespace();
        match tokens.next() {
            Some(first) if qualifiers.contains(&first) => {}
            _ => continue,
        }
        // Skip the type, keep comma separated names.
        let _ = tokens.next();
        let rest: String = tokens.collect::<Vec<_>>().join(" ");
        for name in rest.split(',') {
            let name = name.trim().split('[').next().unwrap_or_default().trim();
            if !name.is_empty() && !name.contains('{') {
                names.push(name.to_owned());
            }
        }
    }
    names
}

impl MockDriver {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_shader_allocation(&self) {
        self.state.borrow_mut().fail_shader_allocation = true;
    }

    pub(crate) fn fail_program_allocation(&self) {
        self.state.borrow_mut().fail_program_allocation = true;
    }

    pub(crate) fn fail_next_link(&self) {
        self.state.borrow_mut().fail_next_link = true;
    }

    /// Move `name` to `location` in `program`, as a relink could.
    pub(crate) fn relocate_uniform(&self, program: GLuint, name: &str, location: GLint) {
        if let Some(p) = self.state.borrow_mut().programs.get_mut(&program) {
            p.uniforms.insert(name.to_owned(), location);
        }
    }

    pub(crate) fn relocate_attribute(&self, program: GLuint, name: &str, location: GLint) {
        if let Some(p) = self.state.borrow_mut().programs.get_mut(&program) {
            p.attributes.insert(name.to_owned(), location);
        }
    }

    pub(crate) fn shaders_created(&self) -> usize {
        self.state.borrow().shaders_created
    }

    pub(crate) fn shader_alive(&self, shader: GLuint) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map_or(false, |s| !s.deleted)
    }

    pub(crate) fn live_shaders(&self) -> usize {
        self.state
            .borrow()
            .shaders
            .values()
            .filter(|s| !s.deleted)
            .count()
    }

    pub(crate) fn program_alive(&self, program: GLuint) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map_or(false, |p| !p.deleted)
    }

    pub(crate) fn programs_created(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub(crate) fn attached_shaders(&self, program: GLuint) -> Vec<GLuint> {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.attached.clone())
            .unwrap_or_default()
    }

    pub(crate) fn validated(&self, program: GLuint) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map_or(false, |p| p.validated)
    }

    pub(crate) fn current_program(&self) -> GLuint {
        self.state.borrow().current
    }

    pub(crate) fn uploads(&self) -> Vec<Upload> {
        self.state.borrow().uploads.clone()
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.state.borrow().calls.clone()
    }

    pub(crate) fn last_info_log_capacity(&self) -> Option<usize> {
        self.state.borrow().last_info_log_capacity
    }
}

fn copy_log(state: &mut State, log: &str, buf: &mut [u8]) -> usize {
    state.last_info_log_capacity = Some(buf.len());
    if buf.is_empty() {
        return 0;
    }
    let written = log.len().min(buf.len() - 1);
    buf[..written].copy_from_slice(&log.as_bytes()[..written]);
    buf[written] = 0;
    written
}

fn log_length(log: &str) -> GLint {
    if log.is_empty() {
        0
    } else {
        log.len() as GLint + 1
    }
}

impl ShaderDriver for MockDriver {
    fn create_shader(&self, kind: GLenum) -> GLuint {
        let mut state = self.state.borrow_mut();
        if state.fail_shader_allocation {
            return 0;
        }
        let id = state.allocate();
        state.shaders_created += 1;
        state.shaders.insert(
            id,
            MockShader {
                kind,
                source: String::new(),
                compiled: false,
                log: String::new(),
                deleted: false,
            },
        );
        id
    }

    fn shader_source(&self, shader: GLuint, source: &str) {
        if let Some(s) = self.state.borrow_mut().shaders.get_mut(&shader) {
            s.source = source.to_owned();
        }
    }

    fn compile_shader(&self, shader: GLuint) {
        if let Some(s) = self.state.borrow_mut().shaders.get_mut(&shader) {
            let unknown = misspelt_builtins(&s.source);
            s.compiled = unknown.is_empty();
            s.log = unknown
                .iter()
                .map(|name| format!("ERROR: 0:1: '{name}' : undeclared identifier\n"))
                .collect();
        }
    }

    fn get_shader_iv(&self, shader: GLuint, pname: GLenum) -> GLint {
        let state = self.state.borrow();
        let Some(s) = state.shaders.get(&shader) else {
            return 0;
        };
        match pname {
            gl::COMPILE_STATUS => s.compiled as GLint,
            gl::INFO_LOG_LENGTH => log_length(&s.log),
            gl::SHADER_TYPE => s.kind as GLint,
            gl::DELETE_STATUS => s.deleted as GLint,
            _ => 0,
        }
    }

    fn get_shader_info_log(&self, shader: GLuint, buf: &mut [u8]) -> usize {
        let mut state = self.state.borrow_mut();
        let log = state
            .shaders
            .get(&shader)
            .map(|s| s.log.clone())
            .unwrap_or_default();
        copy_log(&mut state, &log, buf)
    }

    fn delete_shader(&self, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        state.calls.push("delete_shader");
        if let Some(s) = state.shaders.get_mut(&shader) {
            s.deleted = true;
        }
    }

    fn create_program(&self) -> GLuint {
        let mut state = self.state.borrow_mut();
        if state.fail_program_allocation {
            return 0;
        }
        let id = state.allocate();
        state.programs.insert(id, MockProgram::default());
        id
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        state.calls.push("attach_shader");
        if let Some(p) = state.programs.get_mut(&program) {
            p.attached.push(shader);
        }
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        state.calls.push("detach_shader");
        if let Some(p) = state.programs.get_mut(&program) {
            p.attached.retain(|&s| s != shader);
        }
    }

    fn link_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        state.calls.push("link_program");
        let forced_failure = std::mem::take(&mut state.fail_next_link);

        let Some(p) = state.programs.get(&program) else {
            return;
        };
        let stages: Vec<&MockShader> = p
            .attached
            .iter()
            .filter_map(|id| state.shaders.get(id))
            .collect();

        let mut log = String::new();
        if forced_failure {
            log.push_str("error: link failed\n");
        }
        for kind in [gl::VERTEX_SHADER, gl::FRAGMENT_SHADER] {
            match stages.iter().find(|s| s.kind == kind) {
                Some(s) if !s.compiled => log.push_str("error: attached shader not compiled\n"),
                Some(s) if !s.source.contains("main") => {
                    log.push_str("error: shader lacks `main'\n")
                }
                Some(_) => {}
                None => log.push_str("error: missing shader stage\n"),
            }
        }

        let mut uniforms = HashMap::new();
        let mut attributes = HashMap::new();
        for stage in &stages {
            for name in declared(&stage.source, &["uniform"]) {
                let next = uniforms.len() as GLint;
                uniforms.entry(name).or_insert(next);
            }
            if stage.kind == gl::VERTEX_SHADER {
                for name in declared(&stage.source, &["in", "attribute"]) {
                    let next = attributes.len() as GLint;
                    attributes.entry(name).or_insert(next);
                }
            }
        }

        if let Some(p) = state.programs.get_mut(&program) {
            p.linked = log.is_empty();
            p.log = log;
            p.validated = false;
            p.uniforms = uniforms;
            p.attributes = attributes;
        }
    }

    fn validate_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        state.calls.push("validate_program");
        if let Some(p) = state.programs.get_mut(&program) {
            p.validated = true;
        }
    }

    fn get_program_iv(&self, program: GLuint, pname: GLenum) -> GLint {
        let mut state = self.state.borrow_mut();
        if pname == gl::LINK_STATUS {
            state.calls.push("link_status");
        }
        let Some(p) = state.programs.get(&program) else {
            return 0;
        };
        match pname {
            gl::LINK_STATUS => p.linked as GLint,
            gl::VALIDATE_STATUS => p.validated as GLint,
            gl::INFO_LOG_LENGTH => log_length(&p.log),
            gl::ATTACHED_SHADERS => p.attached.len() as GLint,
            gl::DELETE_STATUS => p.deleted as GLint,
            _ => 0,
        }
    }

    fn get_program_info_log(&self, program: GLuint, buf: &mut [u8]) -> usize {
        let mut state = self.state.borrow_mut();
        let log = state
            .programs
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default();
        copy_log(&mut state, &log, buf)
    }

    fn use_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        state.calls.push("use_program");
        state.current = program;
    }

    fn delete_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        state.calls.push("delete_program");
        if let Some(p) = state.programs.get_mut(&program) {
            p.deleted = true;
        }
    }

    fn get_attrib_location(&self, program: GLuint, name: &str) -> GLint {
        let state = self.state.borrow();
        state
            .programs
            .get(&program)
            .filter(|p| p.linked && !p.deleted)
            .and_then(|p| p.attributes.get(name).copied())
            .unwrap_or(-1)
    }

    fn get_uniform_location(&self, program: GLuint, name: &str) -> GLint {
        let state = self.state.borrow();
        state
            .programs
            .get(&program)
            .filter(|p| p.linked && !p.deleted)
            .and_then(|p| p.uniforms.get(name).copied())
            .unwrap_or(-1)
    }

    fn uniform_1i(&self, location: GLint, value: GLint) {
        self.state
            .borrow_mut()
            .uploads
            .push(Upload::Int { location, value });
    }

    fn uniform_3f(&self, location: GLint, x: f32, y: f32, z: f32) {
        self.state.borrow_mut().uploads.push(Upload::Vec3 {
            location,
            value: [x, y, z],
        });
    }

    fn uniform_matrix_4fv(&self, location: GLint, transpose: bool, value: &[f32; 16]) {
        self.state.borrow_mut().uploads.push(Upload::Mat4 {
            location,
            transpose,
            value: *value,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declarations_are_collected_in_order() {
        let source = "#version 330 core\n\
                      layout (location = 0) in vec3 position;\n\
                      in vec2 texCoords; // uv\n\
                      uniform mat4 viewMatrix, modelMatrix;\n\
                      uniform sampler2D normalMap;\n\
                      void main() {}";
        assert_eq!(declared(source, &["in"]), ["position", "texCoords"]);
        assert_eq!(
            declared(source, &["uniform"]),
            ["viewMatrix", "modelMatrix", "normalMap"]
        );
    }

    #[test]
    fn misspelt_builtin_is_flagged() {
        assert_eq!(
            misspelt_builtins("void main(){glFragColor=vec4(1);}"),
            ["glFragColor"]
        );
        assert!(misspelt_builtins("void main(){gl_FragColor=vec4(1);}").is_empty());
    }
}
